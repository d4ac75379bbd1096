//! Persistence gateway: durable storage for whole board documents.
//!
//! The drag engine never calls into this directly; the save queue does, at
//! gesture boundaries. Every write is a full-document replace, so the last
//! write to reach storage wins.

mod file;
mod http;
mod memory;

pub use file::FileGateway;
pub use http::HttpGateway;
pub use memory::MemoryGateway;

use crate::error::Result;
use crate::types::{Board, BoardId};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Storage backend for board documents
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Store a new board and return it as stored
    async fn create(&self, board: &Board) -> Result<Board>;

    /// Replace an existing board. Unknown ids fail with `BoardNotFound`.
    async fn replace(&self, id: &BoardId, board: &Board) -> Result<Board>;

    /// Delete a board. Deleting an unknown id is not an error.
    async fn delete(&self, id: &BoardId) -> Result<()>;

    /// Every stored board, most recently updated first
    async fn list_all(&self) -> Result<Vec<Board>>;
}

/// Hands out strictly increasing timestamps so that "most recently
/// updated" is well defined even for writes within the same clock tick.
#[derive(Debug, Default)]
pub(crate) struct Stamper {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl Stamper {
    pub(crate) fn now(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let mut now = Utc::now();
        if let Some(previous) = *last {
            if now <= previous {
                now = previous + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

/// Sort boards most recently updated first; never-stamped boards go last
pub(crate) fn sort_most_recent_first(boards: &mut [Board]) {
    boards.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
