//! Reconciler - turns drag lifecycle events into board reorderings
//!
//! Drag-over applies cross-column task moves to the store immediately and
//! never persists. Drag-end computes the final order and hands back the
//! board to persist; the caller owns the actual write.

use super::session::{DragItem, DragKind, DragSession};
use crate::store::BoardStore;
use crate::types::{move_position, Board, BoardId, ColumnId, TaskId};
use tracing::debug;

/// Where a dragged task sat when the gesture started
#[derive(Debug, Clone)]
struct TaskOrigin {
    board: BoardId,
    column: ColumnId,
    index: usize,
}

#[derive(Debug, Default)]
pub struct Reconciler {
    session: DragSession,
    /// Slot of the dragged task at drag start, for cancellation
    origin: Option<TaskOrigin>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Start a gesture. A gesture that never ended is cancelled first;
    /// otherwise the board is not touched.
    pub fn on_drag_start(&mut self, store: &mut BoardStore, item: DragItem) {
        if !self.session.is_idle() {
            self.on_drag_cancel(store);
        }
        debug!(active = item.id(), kind = ?item.kind(), "drag start");
        self.origin = match &item {
            DragItem::Task(task) => store.current().and_then(|board| {
                let column = board.column_of(task.id.as_str())?.clone();
                let index = board.column(column.as_str())?.index_of(task.id.as_str())?;
                Some(TaskOrigin {
                    board: board.id.clone(),
                    column,
                    index,
                })
            }),
            DragItem::Column(_) => None,
        };
        self.session.begin(item);
    }

    /// Apply a live hover. Only task drags across columns change anything.
    ///
    /// `index_hint` is the slot within the destination column the pointer is
    /// nearest to; it is used when hovering over a task and ignored when
    /// hovering over the column itself, which appends.
    ///
    /// Returns true when the store was updated.
    pub fn on_drag_over(
        &mut self,
        store: &mut BoardStore,
        active_id: &str,
        over_id: Option<&str>,
        index_hint: Option<usize>,
    ) -> bool {
        let Some(over_id) = over_id else {
            return false;
        };
        if active_id == over_id || !self.session.is_dragging() {
            return false;
        }
        // Column reordering is settled at drag-end only
        if self.session.kind() != Some(DragKind::Task) {
            return false;
        }
        let Some(board) = store.current() else {
            return false;
        };

        let Some(active_column) = board.column_of(active_id).cloned() else {
            debug!(active = active_id, "drag over: active task has no column");
            return false;
        };
        let over_is_task = board.tasks.contains_key(over_id);
        let over_column = if over_is_task {
            board.column_of(over_id).cloned()
        } else if board.columns.contains_key(over_id) {
            Some(ColumnId::from(over_id))
        } else {
            None
        };
        let Some(over_column) = over_column else {
            debug!(over = over_id, "drag over: target has no column");
            return false;
        };
        if active_column == over_column {
            return false;
        }

        let mut next = board.clone();
        let mut moved = None;
        if let Some(source) = next.columns.get_mut(&active_column) {
            if let Some(index) = source.index_of(active_id) {
                moved = Some(source.task_ids.remove(index));
            }
        }
        let Some(destination) = next.columns.get_mut(&over_column) else {
            return false;
        };
        if !destination.contains(active_id) {
            let task_id = moved.unwrap_or_else(|| active_id.into());
            let slot = if over_is_task {
                index_hint
                    .unwrap_or(destination.task_ids.len())
                    .min(destination.task_ids.len())
            } else {
                destination.task_ids.len()
            };
            destination.task_ids.insert(slot, task_id);
        }

        debug!(
            active = active_id,
            from = %active_column,
            to = %over_column,
            "drag over: moved task across columns"
        );
        store.replace(next)
    }

    /// Finish a gesture. Returns the board to persist, or None when the
    /// gesture changed nothing that needs writing.
    ///
    /// The session is cleared whatever the outcome.
    pub fn on_drag_end(
        &mut self,
        store: &mut BoardStore,
        active_id: &str,
        over_id: Option<&str>,
    ) -> Option<Board> {
        let kind = self.session.commit().map(DragItem::kind);
        let commit = match kind {
            Some(kind) => Self::settle(store, kind, active_id, over_id),
            None => None,
        };
        self.session.end();
        self.origin = None;
        commit
    }

    /// Abandon a gesture, putting a live-moved task back in the slot it
    /// started from. Nothing else on the board is reverted: edits committed
    /// while the gesture was open stay.
    ///
    /// Returns the restored board when a move was undone.
    pub fn on_drag_cancel(&mut self, store: &mut BoardStore) -> Option<Board> {
        let active = self.session.end();
        let restored = match (active, self.origin.take()) {
            (Some(DragItem::Task(task)), Some(origin)) => {
                Self::restore(store, &task.id, &origin)
            }
            _ => None,
        };
        debug!(restored = restored.is_some(), "drag cancel");
        restored
    }

    fn restore(store: &mut BoardStore, task_id: &TaskId, origin: &TaskOrigin) -> Option<Board> {
        let board = store.get(origin.board.as_str())?;
        let current = board.column_of(task_id.as_str())?.clone();
        if current == origin.column || !board.columns.contains_key(&origin.column) {
            return None;
        }
        let mut next = board.clone();
        if let Some(column) = next.columns.get_mut(&current) {
            column.task_ids.retain(|t| t != task_id);
        }
        if let Some(column) = next.columns.get_mut(&origin.column) {
            let slot = origin.index.min(column.task_ids.len());
            column.task_ids.insert(slot, task_id.clone());
        }
        store.replace(next.clone()).then_some(next)
    }

    fn settle(
        store: &mut BoardStore,
        kind: DragKind,
        active_id: &str,
        over_id: Option<&str>,
    ) -> Option<Board> {
        let Some(over_id) = over_id else {
            debug!(active = active_id, "drag end: released outside any target");
            return None;
        };
        if active_id == over_id {
            return None;
        }
        let board = store.current()?;

        match kind {
            DragKind::Column => {
                let from = board.columns.position(active_id)?;
                let to = board.columns.position(over_id)?;
                let mut next = board.clone();
                next.columns.move_to(from, to);
                debug!(active = active_id, from, to, "drag end: moved column");
                store.replace(next.clone()).then_some(next)
            }
            DragKind::Task => {
                let Some(active_column) = board.column_of(active_id).cloned() else {
                    debug!(active = active_id, "drag end: active task has no column");
                    return None;
                };
                if board.column_of(over_id) == Some(&active_column) {
                    let column = board.column(active_column.as_str())?;
                    let from = column.index_of(active_id)?;
                    let to = column.index_of(over_id)?;
                    let mut next = board.clone();
                    let column = next.columns.get_mut(&active_column)?;
                    move_position(&mut column.task_ids, from, to);
                    debug!(active = active_id, from, to, "drag end: reordered within column");
                    store.replace(next.clone()).then_some(next)
                } else {
                    // The structural move already happened during drag-over;
                    // persist whatever the store holds now.
                    debug!(active = active_id, "drag end: committing cross-column move");
                    store.current().cloned()
                }
            }
        }
    }
}
