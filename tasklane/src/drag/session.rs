//! Drag session bookkeeping: what is being dragged, and which phase the
//! gesture is in.

use crate::types::{Column, Task};
use serde::{Deserialize, Serialize};

/// The entity picked up at gesture start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DragItem {
    Column(Column),
    Task(Task),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Column,
    Task,
}

impl DragItem {
    pub fn kind(&self) -> DragKind {
        match self {
            Self::Column(_) => DragKind::Column,
            Self::Task(_) => DragKind::Task,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Column(column) => column.id.as_str(),
            Self::Task(task) => task.id.as_str(),
        }
    }
}

/// `Idle -> Dragging -> Committing -> Idle`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer or keyboard is moving the item; drag-over events apply live
    Dragging(DragItem),
    /// The gesture was released and the final order is being computed
    Committing(DragItem),
}

#[derive(Debug, Default)]
pub struct DragSession {
    phase: DragPhase,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the dragged entity. A session left over from a gesture that
    /// never ended is discarded.
    pub fn begin(&mut self, item: DragItem) {
        if !self.is_idle() {
            tracing::debug!("discarding unfinished drag session");
        }
        self.phase = DragPhase::Dragging(item);
    }

    /// Move from Dragging to Committing. Returns the item being committed,
    /// or None when no gesture is in progress.
    pub fn commit(&mut self) -> Option<&DragItem> {
        let phase = std::mem::take(&mut self.phase);
        self.phase = match phase {
            DragPhase::Dragging(item) | DragPhase::Committing(item) => DragPhase::Committing(item),
            DragPhase::Idle => DragPhase::Idle,
        };
        self.active()
    }

    /// Clear the record unconditionally, returning what was being dragged
    pub fn end(&mut self) -> Option<DragItem> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging(item) | DragPhase::Committing(item) => Some(item),
            DragPhase::Idle => None,
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn active(&self) -> Option<&DragItem> {
        match &self.phase {
            DragPhase::Dragging(item) | DragPhase::Committing(item) => Some(item),
            DragPhase::Idle => None,
        }
    }

    pub fn kind(&self) -> Option<DragKind> {
        self.active().map(DragItem::kind)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }
}
