//! Task types: Task, Subtask

use super::ids::{SubtaskId, TaskId};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Checklist, in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
}

/// One checklist entry of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub content: String,
    #[serde(default)]
    pub completed: bool,
}

/// Checklist completion summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 for an empty checklist
    pub percent: u8,
}

impl Task {
    /// Create a new task with a fresh id
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(TaskId::new(), content)
    }

    /// Create a task with a caller-chosen id
    pub fn with_id(id: impl Into<TaskId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            description: None,
            labels: None,
            subtasks: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive substring match on the card content
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || self
                .content
                .to_lowercase()
                .contains(&query.to_lowercase())
    }

    pub fn subtasks(&self) -> &[Subtask] {
        self.subtasks.as_deref().unwrap_or_default()
    }

    pub fn labels(&self) -> &[String] {
        self.labels.as_deref().unwrap_or_default()
    }

    /// Append a checklist entry; blank content is rejected
    pub fn add_subtask(&mut self, content: &str) -> Result<SubtaskId> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BoardError::invalid_value("subtask", "content is blank"));
        }
        let subtask = Subtask {
            id: SubtaskId::new(),
            content: content.to_string(),
            completed: false,
        };
        let id = subtask.id.clone();
        self.subtasks.get_or_insert_with(Vec::new).push(subtask);
        Ok(id)
    }

    /// Flip the completion flag, returning the new state
    pub fn toggle_subtask(&mut self, id: &SubtaskId) -> Option<bool> {
        let subtask = self
            .subtasks
            .as_mut()?
            .iter_mut()
            .find(|s| &s.id == id)?;
        subtask.completed = !subtask.completed;
        Some(subtask.completed)
    }

    pub fn remove_subtask(&mut self, id: &SubtaskId) -> bool {
        let Some(subtasks) = self.subtasks.as_mut() else {
            return false;
        };
        let before = subtasks.len();
        subtasks.retain(|s| &s.id != id);
        subtasks.len() != before
    }

    /// Drop every completed entry, returning how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let Some(subtasks) = self.subtasks.as_mut() else {
            return 0;
        };
        let before = subtasks.len();
        subtasks.retain(|s| !s.completed);
        before - subtasks.len()
    }

    pub fn progress(&self) -> Progress {
        let subtasks = self.subtasks();
        let total = subtasks.len();
        let completed = subtasks.iter().filter(|s| s.completed).count();
        let percent = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Progress {
            completed,
            total,
            percent,
        }
    }

    /// Add a label unless it is already present
    pub fn add_label(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        let labels = self.labels.get_or_insert_with(Vec::new);
        if labels.iter().any(|l| l == label) {
            return false;
        }
        labels.push(label.to_string());
        true
    }

    pub fn remove_label(&mut self, label: &str) -> bool {
        let Some(labels) = self.labels.as_mut() else {
            return false;
        };
        let before = labels.len();
        labels.retain(|l| l != label);
        labels.len() != before
    }
}
