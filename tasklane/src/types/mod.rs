//! Core types for the board engine

mod board;
mod ids;
mod ordered_map;
mod task;

// Re-export all types
pub use board::{Board, Column};
pub use ids::{BoardId, ColumnId, SubtaskId, TaskId};
pub use ordered_map::{move_position, OrderedMap};
pub use task::{Progress, Subtask, Task};
