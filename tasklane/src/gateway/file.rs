//! File-backed gateway: one JSON document per board in a data directory.
//!
//! ```text
//! data_dir/
//! ├── {board-id}.json
//! └── {board-id}.json
//! ```

use super::{sort_most_recent_first, PersistenceGateway, Stamper};
use crate::error::{BoardError, Result};
use crate::types::{Board, BoardId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct FileGateway {
    /// Directory holding the board documents
    root: PathBuf,
    stamper: Stamper,
    /// Serializes writers so create-if-absent and replace-if-present hold
    write_lock: Mutex<()>,
}

impl FileGateway {
    /// Create a gateway over `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stamper: Stamper::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a board's JSON document
    pub fn board_path(&self, id: &BoardId) -> Result<PathBuf> {
        let raw = id.as_str();
        if raw.is_empty()
            || raw.starts_with('.')
            || raw.contains(['/', '\\'])
            || raw.contains("..")
        {
            return Err(BoardError::invalid_value(
                "board id",
                format!("'{}' cannot be used as a file name", raw),
            ));
        }
        Ok(self.root.join(format!("{}.json", raw)))
    }

    async fn read_board(&self, path: &Path) -> Result<Board> {
        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content).map_err(|e| {
            BoardError::malformed(format!("{}: {}", path.display(), e))
        })
    }

    /// Write via a temporary sibling so readers never see a partial file
    async fn write_board(&self, path: &Path, board: &Board) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(board)?;
        let tmp = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;
        drop(file);
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn create(&self, board: &Board) -> Result<Board> {
        let path = self.board_path(&board.id)?;
        let _guard = self.write_lock.lock().await;
        if fs::try_exists(&path).await? {
            return Err(BoardError::duplicate_id("board", board.id.to_string()));
        }
        let now = self.stamper.now();
        let mut stored = board.clone();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.write_board(&path, &stored).await?;
        tracing::debug!(board = %stored.id, "created board document");
        Ok(stored)
    }

    async fn replace(&self, id: &BoardId, board: &Board) -> Result<Board> {
        let path = self.board_path(id)?;
        let _guard = self.write_lock.lock().await;
        if !fs::try_exists(&path).await? {
            return Err(BoardError::BoardNotFound { id: id.to_string() });
        }
        let existing = self.read_board(&path).await.ok();
        let mut stored = board.clone();
        stored.id = id.clone();
        stored.created_at = existing.and_then(|b| b.created_at);
        stored.updated_at = Some(self.stamper.now());
        self.write_board(&path, &stored).await?;
        tracing::debug!(board = %id, "replaced board document");
        Ok(stored)
    }

    async fn delete(&self, id: &BoardId) -> Result<()> {
        let path = self.board_path(id)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_all(&self) -> Result<Vec<Board>> {
        let mut boards = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(boards),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            boards.push(self.read_board(&path).await?);
        }
        sort_most_recent_first(&mut boards);
        Ok(boards)
    }
}
