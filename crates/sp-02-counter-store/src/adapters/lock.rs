//! # Store File Locking
//!
//! Keeps two stores (in one process or across processes) from flushing into
//! the same counter file and interleaving snapshots.
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::errors::StoreError;

/// Exclusive lock on `<path>.lock`.
///
/// Acquired when the store opens, released on drop (RAII).
#[derive(Debug)]
pub struct StoreLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    /// Path to the lock file
    path: PathBuf,
    /// PID of this process
    pid: u32,
}

impl StoreLock {
    /// Acquire the lock at `lock_path` without blocking.
    ///
    /// # Errors
    ///
    /// `StoreError::Locked` if another handle holds it, `StoreError::Io` if
    /// the lock file cannot be created or written.
    pub fn acquire(lock_path: &Path) -> Result<Self, StoreError> {
        // No truncate before locking: the holder's PID must survive a failed attempt.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked {
                pid: Self::read_existing_pid(lock_path),
                path: lock_path.to_path_buf(),
            });
        }

        let pid = std::process::id();
        file.set_len(0)?;
        writeln!(file, "{}", pid)?;
        file.sync_all()?;

        Ok(Self {
            file,
            path: lock_path.to_path_buf(),
            pid,
        })
    }

    /// Get the PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}
