//! Board-level types: Board, Column

use super::ids::{BoardId, ColumnId, TaskId};
use super::ordered_map::OrderedMap;
use super::task::Task;
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A vertical lane of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Task ids, top to bottom
    #[serde(default)]
    pub task_ids: Vec<TaskId>,
}

impl Column {
    /// Create an empty column with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(ColumnId::new(), title)
    }

    /// Create an empty column with a caller-chosen id
    pub fn with_id(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.index_of(task_id).is_some()
    }

    pub fn index_of(&self, task_id: &str) -> Option<usize> {
        self.task_ids.iter().position(|t| t.as_str() == task_id)
    }
}

/// One board document: ordered columns plus the tasks they reference.
///
/// On the wire the columns are split into `columnOrder` and a `columns`
/// object keyed by id, matching the REST service's document format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardDocument", into = "BoardDocument")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    /// Columns, left to right
    pub columns: OrderedMap<ColumnId, Column>,
    pub tasks: IndexMap<TaskId, Task>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Board {
    /// Create an empty board with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(BoardId::new(), title)
    }

    /// Create an empty board with a caller-chosen id
    pub fn with_id(id: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            columns: OrderedMap::new(),
            tasks: IndexMap::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Column ids, left to right
    pub fn column_order(&self) -> Vec<&ColumnId> {
        self.columns.keys().collect()
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// The column whose task list currently contains `task_id`
    pub fn column_of(&self, task_id: &str) -> Option<&ColumnId> {
        self.columns
            .iter()
            .find(|(_, column)| column.contains(task_id))
            .map(|(id, _)| id)
    }

    /// Task ids of a column, top to bottom; empty for an unknown column
    pub fn task_ids_in(&self, column_id: &str) -> &[TaskId] {
        self.columns
            .get(column_id)
            .map(|column| column.task_ids.as_slice())
            .unwrap_or_default()
    }

    /// Tasks of a column in display order, filtered by a content query
    pub fn filtered_tasks(&self, column_id: &str, query: &str) -> Vec<&Task> {
        self.task_ids_in(column_id)
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(|task| task.matches(query))
            .collect()
    }

    /// Append a column to the right edge
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.columns.contains_key(&column.id) {
            return Err(BoardError::duplicate_id("column", column.id.to_string()));
        }
        self.columns.insert(column.id.clone(), column);
        Ok(())
    }

    /// Remove a column together with the tasks it holds
    pub fn remove_column(&mut self, id: &str) -> Option<Column> {
        let column = self.columns.remove(id)?;
        for task_id in &column.task_ids {
            self.tasks.shift_remove(task_id);
        }
        Some(column)
    }

    /// Add a task to the bottom of a column
    pub fn add_task(&mut self, column_id: &str, task: Task) -> Result<()> {
        if self.tasks.contains_key(&task.id) {
            return Err(BoardError::duplicate_id("task", task.id.to_string()));
        }
        let column = self
            .columns
            .get_mut(column_id)
            .ok_or_else(|| BoardError::ColumnNotFound {
                id: column_id.to_string(),
            })?;
        column.task_ids.push(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Check the settled-state invariants: every referenced task exists,
    /// and no task is listed by more than one column (or twice in one).
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen: HashSet<&TaskId> = HashSet::new();
        for (column_id, column) in self.columns.iter() {
            if &column.id != column_id {
                return Err(BoardError::malformed(format!(
                    "column keyed '{}' carries id '{}'",
                    column_id, column.id
                )));
            }
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    return Err(BoardError::malformed(format!(
                        "column '{}' references missing task '{}'",
                        column_id, task_id
                    )));
                }
                if !seen.insert(task_id) {
                    return Err(BoardError::malformed(format!(
                        "task '{}' is listed more than once",
                        task_id
                    )));
                }
            }
        }
        if let Some((key, task)) = self.tasks.iter().find(|(key, task)| &task.id != *key) {
            return Err(BoardError::malformed(format!(
                "task keyed '{}' carries id '{}'",
                key, task.id
            )));
        }
        Ok(())
    }
}

/// Wire form of [`Board`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardDocument {
    id: BoardId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    column_order: Vec<ColumnId>,
    #[serde(default)]
    columns: IndexMap<ColumnId, Column>,
    #[serde(default)]
    tasks: IndexMap<TaskId, Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<BoardDocument> for Board {
    type Error = BoardError;

    fn try_from(doc: BoardDocument) -> Result<Self> {
        let board = Board {
            id: doc.id,
            title: doc.title,
            columns: OrderedMap::from_parts(doc.column_order, doc.columns)?,
            tasks: doc.tasks,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        };
        board.check_invariants()?;
        Ok(board)
    }
}

impl From<Board> for BoardDocument {
    fn from(board: Board) -> Self {
        let columns = board.columns.into_inner();
        let column_order = columns.keys().cloned().collect();
        Self {
            id: board.id,
            title: board.title,
            column_order,
            columns,
            tasks: board.tasks,
            created_at: board.created_at,
            updated_at: board.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        let mut board = Board::with_id("b1", "Sample");
        board.add_column(Column::with_id("todo", "To Do")).unwrap();
        board.add_column(Column::with_id("done", "Done")).unwrap();
        board
            .add_task("todo", Task::with_id("t1", "Write tests"))
            .unwrap();
        board
            .add_task("todo", Task::with_id("t2", "Fix login"))
            .unwrap();
        board
    }

    #[test]
    fn test_board_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["columnOrder"], serde_json::json!(["todo", "done"]));
        assert_eq!(
            json["columns"]["todo"]["taskIds"],
            serde_json::json!(["t1", "t2"])
        );
        assert_eq!(json["tasks"]["t2"]["content"], "Fix login");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_board_reads_service_document() {
        let json = r#"{
            "_id": "665f",
            "id": "b1",
            "title": "Roadmap",
            "columns": {
                "done": {"id": "done", "title": "Done", "taskIds": []},
                "todo": {"id": "todo", "title": "To Do", "taskIds": ["t1"]}
            },
            "tasks": {"t1": {"id": "t1", "content": "Plan"}},
            "columnOrder": ["todo", "done"],
            "updatedAt": "2024-05-01T10:00:00Z",
            "__v": 0
        }"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.column_order()[0], "todo");
        assert_eq!(board.column_of("t1").unwrap(), "todo");
        assert!(board.updated_at.is_some());
    }

    #[test]
    fn test_board_rejects_dangling_task_reference() {
        let json = r#"{
            "id": "b1",
            "title": "Broken",
            "columns": {"todo": {"id": "todo", "title": "To Do", "taskIds": ["ghost"]}},
            "tasks": {},
            "columnOrder": ["todo"]
        }"#;
        let err = serde_json::from_str::<Board>(json).unwrap_err();
        assert!(err.to_string().contains("missing task 'ghost'"));
    }

    #[test]
    fn test_board_rejects_task_in_two_columns() {
        let mut board = sample();
        board
            .columns
            .get_mut("done")
            .unwrap()
            .task_ids
            .push(TaskId::from("t1"));
        assert!(board.check_invariants().is_err());
    }

    #[test]
    fn test_filtered_tasks() {
        let board = sample();
        let all: Vec<&str> = board
            .filtered_tasks("todo", "")
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(all, vec!["Write tests", "Fix login"]);
        assert_eq!(board.filtered_tasks("todo", "LOGIN").len(), 1);
        assert!(board.filtered_tasks("nope", "").is_empty());
    }

    #[test]
    fn test_task_ids_in() {
        let board = sample();
        assert_eq!(board.task_ids_in("todo"), ["t1", "t2"]);
        assert!(board.task_ids_in("done").is_empty());
        assert!(board.task_ids_in("nope").is_empty());
    }

    #[test]
    fn test_remove_column_drops_its_tasks() {
        let mut board = sample();
        let removed = board.remove_column("todo").unwrap();
        assert_eq!(removed.task_ids.len(), 2);
        assert!(board.tasks.is_empty());
        assert_eq!(board.column_order().len(), 1);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_add_task_to_missing_column() {
        let mut board = sample();
        let result = board.add_task("nope", Task::new("x"));
        assert!(matches!(result, Err(BoardError::ColumnNotFound { .. })));
    }
}
