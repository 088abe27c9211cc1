//! # Store Configuration
//!
//! Where the counter file lives, how often it is flushed and how.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::StoreError;

/// Flush period used when the configured interval is zero.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(60);

/// Key/value delimiter on disk.
pub const DEFAULT_SPLIT: char = ':';

/// Incremental files are compacted once they grow past this size (64 MiB).
pub const DEFAULT_COMPACT_THRESHOLD_BYTES: u64 = 64 * 1024 * 1024;

/// How a flush writes to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushMode {
    /// Rewrite the whole map to `<path>.tmp`, fsync, rename over `<path>`.
    /// The file always holds exactly one snapshot.
    #[default]
    Snapshot,
    /// Append only the keys changed since the last flush. Compacts into a
    /// snapshot once the file passes `compact_threshold_bytes`.
    Incremental,
}

/// Counter store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Counter file path.
    pub path: PathBuf,
    /// Period between background flushes. Zero means [`DEFAULT_FLUSH_INTERVAL`].
    pub flush_interval: Duration,
    /// Key/value delimiter.
    pub split: char,
    /// Flush strategy.
    pub mode: FlushMode,
    /// Incremental mode compaction trigger. `None` never compacts.
    pub compact_threshold_bytes: Option<u64>,
    /// Hold an exclusive lock on `<path>.lock` while open.
    pub lock_file: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("file_seq"),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            split: DEFAULT_SPLIT,
            mode: FlushMode::Snapshot,
            compact_threshold_bytes: Some(DEFAULT_COMPACT_THRESHOLD_BYTES),
            lock_file: true,
        }
    }
}

impl StoreConfig {
    /// Default config for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Fast-flushing config for tests.
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            flush_interval: Duration::from_millis(50),
            ..Self::new(path)
        }
    }

    /// Set the flush period.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set the flush strategy.
    pub fn with_mode(mut self, mode: FlushMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the key/value delimiter.
    pub fn with_split(mut self, split: char) -> Self {
        self.split = split;
        self
    }

    /// Set the incremental compaction trigger.
    pub fn with_compact_threshold(mut self, bytes: Option<u64>) -> Self {
        self.compact_threshold_bytes = bytes;
        self
    }

    /// Enable or disable the `<path>.lock` guard.
    pub fn with_lock_file(mut self, lock_file: bool) -> Self {
        self.lock_file = lock_file;
        self
    }

    /// Flush period with the zero-means-default rule applied.
    pub fn effective_flush_interval(&self) -> Duration {
        if self.flush_interval.is_zero() {
            DEFAULT_FLUSH_INTERVAL
        } else {
            self.flush_interval
        }
    }

    /// `<path>.lock`
    pub fn lock_path(&self) -> PathBuf {
        sibling(&self.path, ".lock")
    }

    /// `<path>.tmp`, the snapshot staging file.
    pub fn temp_path(&self) -> PathBuf {
        sibling(&self.path, ".tmp")
    }

    /// Check the config before any file is touched.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig("path is empty".to_string()));
        }
        if self.split == '\n' || self.split == '\r' || self.split.is_ascii_digit() {
            return Err(StoreError::InvalidConfig(format!(
                "split {:?} collides with the line format",
                self.split
            )));
        }
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
