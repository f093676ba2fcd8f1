//! Commit lock for a board file.
//!
//! Every `FileStore` commit holds an exclusive `flock` on `.<board>.lock`
//! next to the board. The lock file is created on first use and never
//! removed: a waiter may already hold an open descriptor on it, and
//! unlinking would let the next process lock a fresh inode while the
//! waiter locks the orphaned one.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a commit waits for another writer before giving up
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("board is busy: {path} still held after {waited:?}")]
    Busy { path: PathBuf, waited: Duration },
    #[error("could not lock {path}: {source}")]
    Flock { path: PathBuf, source: io::Error },
}

/// Exclusive hold on a board's commit lock, released when dropped
#[derive(Debug)]
pub struct BoardLock {
    // the flock lives as long as this descriptor
    _file: File,
    path: PathBuf,
}

/// Path of the lock file guarding `board_path`
pub fn lock_path(board_path: &Path) -> PathBuf {
    let name = board_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "board".to_string());
    board_path.with_file_name(format!(".{}.lock", name))
}

impl BoardLock {
    /// Take the lock if nobody holds it; `Ok(None)` when it is busy
    pub fn try_acquire(board_path: &Path) -> Result<Option<Self>, LockError> {
        let path = lock_path(board_path);
        let file = open_lock_file(&path)?;
        match flock_exclusive(&file) {
            Ok(true) => Ok(Some(BoardLock { _file: file, path })),
            Ok(false) => Ok(None),
            Err(source) => Err(LockError::Flock { path, source }),
        }
    }

    /// Take the lock, polling until `timeout` has passed
    pub fn acquire(board_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let started = Instant::now();
        loop {
            if let Some(lock) = Self::try_acquire(board_path)? {
                return Ok(lock);
            }
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(LockError::Busy {
                    path: lock_path(board_path),
                    waited,
                });
            }
            tracing::debug!(board = %board_path.display(), "board lock busy, waiting");
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    pub fn acquire_default(board_path: &Path) -> Result<Self, LockError> {
        Self::acquire(board_path, DEFAULT_LOCK_TIMEOUT)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_lock_file(path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|source| LockError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Non-blocking exclusive flock. `Ok(false)` means another holder has it.
#[cfg(unix)]
fn flock_exclusive(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.kind() == io::ErrorKind::WouldBlock {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> io::Result<bool> {
    Ok(true)
}
