//! BoardEditor - the surface a front end drives
//!
//! Owns the board store, the drag engine and the save queue. Every change
//! is applied to the store first and then queued for persistence, so the
//! in-memory boards are always what gets shown, whatever the backend says.

use crate::config::Config;
use crate::drag::{DragItem, DragSession, Reconciler};
use crate::gateway::{HttpGateway, PersistenceGateway};
use crate::save_queue::{SaveQueue, SaveRequest, SaveStatus};
use crate::store::BoardStore;
use crate::types::{Board, BoardId, Column, ColumnId, Task, TaskId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Whether boards have been loaded from the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Loading failed; the message is meant for display
    Failed(String),
}

pub struct BoardEditor {
    store: BoardStore,
    engine: Reconciler,
    gateway: Arc<dyn PersistenceGateway>,
    saves: SaveQueue,
    load_state: LoadState,
    /// A write was queued while a drag was open, so the backend may hold
    /// the live hover state
    wrote_mid_drag: bool,
}

impl BoardEditor {
    /// Create an editor over `gateway`. Must be called inside a tokio runtime.
    pub fn new(gateway: Arc<dyn PersistenceGateway>, saved_linger: Duration) -> Self {
        let saves = SaveQueue::spawn(Arc::clone(&gateway), saved_linger);
        Self {
            store: BoardStore::new(),
            engine: Reconciler::new(),
            gateway,
            saves,
            load_state: LoadState::Loading,
            wrote_mid_drag: false,
        }
    }

    /// Editor talking to the REST service named in `config`
    pub fn from_config(config: &Config) -> Self {
        let gateway = Arc::new(HttpGateway::new(&config.api_url));
        Self::new(gateway, config.saved_linger())
    }

    /// Fetch every board from the backend.
    ///
    /// On failure the boards already in memory are kept and the state
    /// becomes `Failed`; call [`BoardEditor::retry`] to try again.
    pub async fn load(&mut self) -> &LoadState {
        self.load_state = LoadState::Loading;
        match self.gateway.list_all().await {
            Ok(boards) => {
                info!(count = boards.len(), "loaded boards");
                if !self.engine.session().is_idle() {
                    self.engine.on_drag_cancel(&mut self.store);
                    self.wrote_mid_drag = false;
                }
                self.store.reset(boards);
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "failed to load boards");
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
        &self.load_state
    }

    pub async fn retry(&mut self) -> &LoadState {
        self.load().await
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn boards(&self) -> &[Board] {
        self.store.all()
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.store.current()
    }

    pub fn select_board(&mut self, id: &str) -> bool {
        self.store.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    // Boards

    /// Create an empty board, select it, and queue its creation.
    ///
    /// A missing or blank title becomes `Project N`.
    pub fn create_board(&mut self, title: Option<&str>) -> BoardId {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Project {}", self.store.all().len() + 1));
        let board = Board::new(title);
        let id = board.id.clone();
        info!(board = %id, title = %board.title, "creating board");

        self.store.insert(board.clone());
        self.store.select(id.as_str());
        self.saves.enqueue(SaveRequest::Create(board));
        id
    }

    /// Rename a board. Blank titles are ignored.
    pub fn rename_board(&mut self, id: &str, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        let Some(board) = self.store.get(id) else {
            return false;
        };
        let mut next = board.clone();
        next.title = title.to_string();
        self.commit(next)
    }

    pub fn delete_board(&mut self, id: &str) -> bool {
        let Some(board) = self.store.remove(id) else {
            return false;
        };
        info!(board = %board.id, "deleting board");
        self.saves.enqueue(SaveRequest::Delete(board.id));
        true
    }

    // Columns and tasks, on the current board

    /// Append a column to the current board. Blank titles are ignored.
    pub fn add_column(&mut self, title: &str) -> Option<ColumnId> {
        if title.trim().is_empty() {
            return None;
        }
        let mut next = self.store.current()?.clone();
        let column = Column::new(title);
        let id = column.id.clone();
        next.add_column(column).ok()?;
        self.commit(next).then_some(id)
    }

    /// Delete a column and the tasks it holds
    pub fn delete_column(&mut self, id: &str) -> bool {
        let Some(board) = self.store.current() else {
            return false;
        };
        let mut next = board.clone();
        if next.remove_column(id).is_none() {
            return false;
        }
        self.commit(next)
    }

    /// Append a task to a column of the current board. Blank content is
    /// ignored.
    pub fn add_task(&mut self, column_id: &str, content: &str) -> Option<TaskId> {
        if content.trim().is_empty() {
            return None;
        }
        let mut next = self.store.current()?.clone();
        let task = Task::new(content);
        let id = task.id.clone();
        if let Err(e) = next.add_task(column_id, task) {
            debug!(column = column_id, error = %e, "add task ignored");
            return None;
        }
        self.commit(next).then_some(id)
    }

    /// Replace a task's value on the current board. Unknown tasks are ignored.
    pub fn update_task(&mut self, task: Task) -> bool {
        let Some(board) = self.store.current() else {
            return false;
        };
        if !board.tasks.contains_key(&task.id) {
            debug!(task = %task.id, "update ignored: no such task");
            return false;
        }
        let mut next = board.clone();
        next.tasks.insert(task.id.clone(), task);
        self.commit(next)
    }

    fn commit(&mut self, board: Board) -> bool {
        if !self.store.replace(board.clone()) {
            return false;
        }
        if !self.engine.session().is_idle() {
            self.wrote_mid_drag = true;
        }
        self.saves.enqueue(SaveRequest::Replace(board));
        true
    }

    // Drag and drop

    /// Begin dragging the column or task with `id` on the current board.
    /// Column ids are tried before task ids.
    pub fn drag_start(&mut self, id: &str) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(board) = self.store.current() else {
            return false;
        };
        let item = if let Some(column) = board.column(id) {
            DragItem::Column(column.clone())
        } else if let Some(task) = board.task(id) {
            DragItem::Task(task.clone())
        } else {
            debug!(active = id, "drag start ignored: unknown id");
            return false;
        };
        if !self.engine.session().is_idle() {
            self.drag_cancel();
        }
        self.engine.on_drag_start(&mut self.store, item);
        true
    }

    pub fn drag_over(
        &mut self,
        active_id: &str,
        over_id: Option<&str>,
        index_hint: Option<usize>,
    ) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.engine
            .on_drag_over(&mut self.store, active_id, over_id, index_hint)
    }

    /// Finish the gesture, queueing a write when it changed the board.
    /// Returns true when a write was queued.
    pub fn drag_end(&mut self, active_id: &str, over_id: Option<&str>) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.wrote_mid_drag = false;
        match self.engine.on_drag_end(&mut self.store, active_id, over_id) {
            Some(board) => {
                self.saves.enqueue(SaveRequest::Replace(board));
                true
            }
            None => false,
        }
    }

    /// Abandon the gesture. When an edit was saved mid-gesture the restored
    /// board is saved too, so the backend does not keep the hover state.
    pub fn drag_cancel(&mut self) -> bool {
        let restored = self.engine.on_drag_cancel(&mut self.store);
        let rewrite = std::mem::take(&mut self.wrote_mid_drag);
        match restored {
            Some(board) => {
                if rewrite {
                    self.saves.enqueue(SaveRequest::Replace(board));
                }
                true
            }
            None => false,
        }
    }

    pub fn drag_session(&self) -> &DragSession {
        self.engine.session()
    }

    // Queries

    /// Tasks of a column on the current board, filtered by `query`
    pub fn visible_tasks(&self, column_id: &str, query: &str) -> Vec<&Task> {
        self.store
            .current()
            .map(|board| board.filtered_tasks(column_id, query))
            .unwrap_or_default()
    }

    /// Title of the column currently holding `task_id`
    pub fn column_title_for_task(&self, task_id: &str) -> Option<&str> {
        let board = self.store.current()?;
        let column = board.column(board.column_of(task_id)?.as_str())?;
        Some(column.title.as_str())
    }

    // Persistence status

    pub fn save_status(&self) -> SaveStatus {
        self.saves.status()
    }

    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.saves.subscribe()
    }

    /// Wait for every queued write to be attempted
    pub async fn flush(&self) {
        self.saves.flush().await;
    }
}
