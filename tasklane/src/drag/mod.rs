//! Drag-and-drop reconciliation: session bookkeeping and the engine that
//! applies drag events to the board store.

mod engine;
mod session;

pub use engine::Reconciler;
pub use session::{DragItem, DragKind, DragPhase, DragSession};
