use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::board::Board;

/// Error type for board file I/O
#[derive(Debug, thiserror::Error)]
pub enum BoardIoError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize board: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Load a board from a JSON file
pub fn read_board(path: &Path) -> Result<Board, BoardIoError> {
    let text = fs::read_to_string(path).map_err(|e| BoardIoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| BoardIoError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a board as pretty JSON, replacing the file atomically
pub fn write_board(path: &Path, board: &Board) -> Result<(), BoardIoError> {
    let mut content = serde_json::to_string_pretty(board)?;
    content.push('\n');
    atomic_write(path, content.as_bytes()).map_err(|e| BoardIoError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
