use std::path::{Path, PathBuf};

use crate::io::board_io::{self, BoardIoError};
use crate::io::lock::{BoardLock, LockError};
use crate::model::board::Board;

/// Error type for board store commits
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("board rejected: {0}")]
    Rejected(String),
    #[error("could not lock board: {0}")]
    Lock(#[from] LockError),
    #[error("could not save board: {0}")]
    Io(#[from] BoardIoError),
}

/// Durable home of the committed board.
///
/// `commit` is called once per successful drop with the complete new
/// snapshot; on error the caller keeps its previous board.
pub trait BoardStore {
    fn commit(&mut self, board: &Board) -> Result<(), StoreError>;
}

/// Store that keeps every committed snapshot in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub commits: Vec<Board>,
    /// When set, every commit is rejected with this message
    pub reject_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Board> {
        self.commits.last()
    }
}

impl BoardStore for MemoryStore {
    fn commit(&mut self, board: &Board) -> Result<(), StoreError> {
        if let Some(msg) = &self.reject_with {
            return Err(StoreError::Rejected(msg.clone()));
        }
        self.commits.push(board.clone());
        Ok(())
    }
}

/// Store backed by a JSON board file.
///
/// Commits are validated, serialized under an advisory lock and written
/// atomically.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Board, BoardIoError> {
        board_io::read_board(&self.path)
    }
}

impl BoardStore for FileStore {
    fn commit(&mut self, board: &Board) -> Result<(), StoreError> {
        if !board.is_consistent() {
            return Err(StoreError::Rejected(format!(
                "board {} has tasks outside their group",
                board.id
            )));
        }
        let _lock = BoardLock::acquire_default(&self.path)?;
        board_io::write_board(&self.path, board)?;
        tracing::info!(path = %self.path.display(), board = %board.id, "board committed");
        Ok(())
    }
}
