//! BoardStore - the authoritative in-memory copy of every loaded board
//!
//! Existing boards are only ever changed through [`BoardStore::replace`],
//! a whole-value swap. Callers that change part of a board (the drag engine
//! touches columns only) clone the current board, edit the clone, and hand
//! the complete value back.

use crate::types::{Board, BoardId};

#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    boards: Vec<Board>,
    current: Option<BoardId>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `boards`, with nothing selected
    pub fn with_boards(boards: Vec<Board>) -> Self {
        Self {
            boards,
            current: None,
        }
    }

    /// Every board, in load/creation order
    pub fn all(&self) -> &[Board] {
        &self.boards
    }

    pub fn get(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id.as_str() == id)
    }

    pub fn current_id(&self) -> Option<&BoardId> {
        self.current.as_ref()
    }

    /// The selected board, if one is selected and still present
    pub fn current(&self) -> Option<&Board> {
        self.current.as_ref().and_then(|id| self.get(id.as_str()))
    }

    /// Select a board. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        match self.get(id) {
            Some(board) => {
                self.current = Some(board.id.clone());
                true
            }
            None => {
                tracing::debug!(board = id, "select ignored: no matching board");
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    /// Replace a board wholesale, matched by id.
    ///
    /// An unknown id is a no-op: the collection is left unchanged and
    /// `false` is returned.
    pub fn replace(&mut self, board: Board) -> bool {
        match self.boards.iter_mut().find(|b| b.id == board.id) {
            Some(slot) => {
                *slot = board;
                true
            }
            None => {
                tracing::warn!(board = %board.id, "replace ignored: no matching board found");
                false
            }
        }
    }

    /// Add a newly created board. Returns false if the id is already taken.
    pub fn insert(&mut self, board: Board) -> bool {
        if self.get(board.id.as_str()).is_some() {
            return false;
        }
        self.boards.push(board);
        true
    }

    /// Remove a board, clearing the selection if it was selected
    pub fn remove(&mut self, id: &str) -> Option<Board> {
        let index = self.boards.iter().position(|b| b.id.as_str() == id)?;
        if self.current.as_ref().is_some_and(|c| c.as_str() == id) {
            self.current = None;
        }
        Some(self.boards.remove(index))
    }

    /// Swap in a freshly loaded collection. The selection survives when the
    /// selected board is still present.
    pub fn reset(&mut self, boards: Vec<Board>) {
        self.boards = boards;
        if let Some(current) = &self.current {
            if self.get(current.as_str()).is_none() {
                self.current = None;
            }
        }
    }
}
