//! Fire-and-forget persistence.
//!
//! Writes are handed to a single background task through an unbounded
//! channel, so they reach the gateway in the order they were enqueued and
//! the caller never waits. Outcomes surface only through [`SaveStatus`].
//! A failed write is logged and reported; the in-memory board is left as
//! it is.

use crate::gateway::PersistenceGateway;
use crate::types::{Board, BoardId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

/// Passive indicator of the most recent write
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error(String),
}

/// A write to issue against the gateway
#[derive(Debug, Clone)]
pub enum SaveRequest {
    Create(Board),
    Replace(Board),
    Delete(BoardId),
}

impl SaveRequest {
    fn describe(&self) -> (&'static str, &BoardId) {
        match self {
            Self::Create(board) => ("create", &board.id),
            Self::Replace(board) => ("replace", &board.id),
            Self::Delete(id) => ("delete", id),
        }
    }
}

enum Message {
    Save(SaveRequest),
    Flush(oneshot::Sender<()>),
}

pub struct SaveQueue {
    tx: mpsc::UnboundedSender<Message>,
    status: watch::Receiver<SaveStatus>,
}

impl SaveQueue {
    /// Start the background writer. Must be called inside a tokio runtime.
    ///
    /// `linger` is how long `Saved` stays up before falling back to `Idle`.
    pub fn spawn(gateway: Arc<dyn PersistenceGateway>, linger: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(SaveStatus::Idle);
        tokio::spawn(run(gateway, rx, Arc::new(status_tx), linger));
        Self { tx, status }
    }

    /// Queue a write. Never blocks and never fails the caller.
    pub fn enqueue(&self, request: SaveRequest) {
        let (op, id) = request.describe();
        tracing::debug!(op, board = %id, "queued save");
        if self.tx.send(Message::Save(request)).is_err() {
            tracing::warn!(op, "save queue is closed; write dropped");
        }
    }

    /// Wait until every write queued before this call has been attempted
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Message::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }
}

async fn run(
    gateway: Arc<dyn PersistenceGateway>,
    mut rx: mpsc::UnboundedReceiver<Message>,
    status: Arc<watch::Sender<SaveStatus>>,
    linger: Duration,
) {
    let generation = Arc::new(AtomicU64::new(0));

    while let Some(message) = rx.recv().await {
        let request = match message {
            Message::Save(request) => request,
            Message::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        let (op, id) = request.describe();
        let id = id.clone();
        generation.fetch_add(1, Ordering::SeqCst);
        status.send_replace(SaveStatus::Saving);

        let outcome = match &request {
            SaveRequest::Create(board) => gateway.create(board).await.map(|_| ()),
            SaveRequest::Replace(board) => gateway.replace(&board.id, board).await.map(|_| ()),
            SaveRequest::Delete(board_id) => gateway.delete(board_id).await,
        };

        match outcome {
            Ok(()) if matches!(request, SaveRequest::Delete(_)) => {
                tracing::debug!(op, board = %id, "save complete");
                status.send_replace(SaveStatus::Idle);
            }
            Ok(()) => {
                tracing::debug!(op, board = %id, "save complete");
                status.send_replace(SaveStatus::Saved);
                let ticket = generation.load(Ordering::SeqCst);
                let status = Arc::clone(&status);
                let generation = Arc::clone(&generation);
                tokio::spawn(async move {
                    tokio::time::sleep(linger).await;
                    status.send_if_modified(|current| {
                        let unchanged = generation.load(Ordering::SeqCst) == ticket;
                        if unchanged && *current == SaveStatus::Saved {
                            *current = SaveStatus::Idle;
                            true
                        } else {
                            false
                        }
                    });
                });
            }
            Err(e) => {
                tracing::warn!(op, board = %id, error = %e, "failed to save board");
                status.send_replace(SaveStatus::Error(e.to_string()));
            }
        }
    }
}
