//! In-memory gateway implementation.

use super::{sort_most_recent_first, PersistenceGateway, Stamper};
use crate::error::{BoardError, Result};
use crate::types::{Board, BoardId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    boards: RwLock<HashMap<BoardId, Board>>,
    stamper: Stamper,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored boards
    pub async fn len(&self) -> usize {
        self.boards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.boards.read().await.is_empty()
    }

    /// Fetch one stored board
    pub async fn get(&self, id: &str) -> Option<Board> {
        self.boards.read().await.get(id).cloned()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn create(&self, board: &Board) -> Result<Board> {
        let mut boards = self.boards.write().await;
        if boards.contains_key(&board.id) {
            return Err(BoardError::duplicate_id("board", board.id.to_string()));
        }
        let now = self.stamper.now();
        let mut stored = board.clone();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        boards.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn replace(&self, id: &BoardId, board: &Board) -> Result<Board> {
        let mut boards = self.boards.write().await;
        let existing = boards.get_mut(id).ok_or_else(|| BoardError::BoardNotFound {
            id: id.to_string(),
        })?;
        let mut stored = board.clone();
        stored.id = id.clone();
        stored.created_at = existing.created_at;
        stored.updated_at = Some(self.stamper.now());
        *existing = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, id: &BoardId) -> Result<()> {
        self.boards.write().await.remove(id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Board>> {
        let mut boards: Vec<Board> = self.boards.read().await.values().cloned().collect();
        sort_most_recent_first(&mut boards);
        Ok(boards)
    }
}
