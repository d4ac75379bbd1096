//! Kanban board engine with drag-and-drop reconciliation
//!
//! Boards hold ordered columns, columns hold ordered task ids. Drag gestures
//! are reconciled against an in-memory store as they happen and persisted
//! only when they finish.
//!
//! ## Overview
//!
//! - **Optimistic** - every change lands in the [`BoardStore`] first; the
//!   backend is written afterwards and never rolls the store back
//! - **Two-phase drags** - cross-column moves are applied live on drag-over,
//!   reorders and persistence happen once on drag-end
//! - **Pluggable storage** - in-memory, one-JSON-file-per-board, or the REST
//!   service in `tasklane-server`
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tasklane::{BoardEditor, MemoryGateway};
//!
//! # async fn example() {
//! let mut editor = BoardEditor::new(Arc::new(MemoryGateway::new()), Duration::from_secs(3));
//! editor.load().await;
//!
//! editor.create_board(Some("Roadmap"));
//! let todo = editor.add_column("To Do").unwrap();
//! let done = editor.add_column("Done").unwrap();
//! let task = editor.add_task(todo.as_str(), "Ship it").unwrap();
//!
//! // Pointer picks the card up, hovers the other column, lets go
//! editor.drag_start(task.as_str());
//! editor.drag_over(task.as_str(), Some(done.as_str()), None);
//! editor.drag_end(task.as_str(), Some(done.as_str()));
//!
//! editor.flush().await;
//! # }
//! ```

pub mod config;
pub mod drag;
pub mod editor;
mod error;
pub mod gateway;
pub mod save_queue;
pub mod store;
pub mod types;

pub use config::Config;
pub use drag::{DragItem, DragKind, DragPhase, DragSession, Reconciler};
pub use editor::{BoardEditor, LoadState};
pub use error::{BoardError, Result};
pub use gateway::{FileGateway, HttpGateway, MemoryGateway, PersistenceGateway};
pub use save_queue::{SaveQueue, SaveRequest, SaveStatus};
pub use store::BoardStore;
pub use types::{Board, BoardId, Column, ColumnId, Task, TaskId};
