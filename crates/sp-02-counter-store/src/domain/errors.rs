//! # Domain Errors
//!
//! Error types for the counter store.
//!
//! `NotOpen` and `NotRegistered` are ordinary outcomes for the caller to act
//! on (a missing key usually means "bootstrap a fresh counter"). Only an
//! open failure keeps a store from being created.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during counter store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has been closed.
    #[error("counter store is not open")]
    NotOpen,

    /// No counter has been stored or recovered for this key.
    #[error("key not registered: {key}")]
    NotRegistered {
        /// The business key that was looked up
        key: String,
    },

    /// Another process or handle owns the store file.
    #[error("counter store already in use ({}){}", path.display(), pid.map(|p| format!(" by process {p}")).unwrap_or_default())]
    Locked {
        /// Lock file that could not be acquired
        path: PathBuf,
        /// PID recorded by the current holder, if readable
        pid: Option<u32>,
    },

    /// Configuration rejected by validation.
    #[error("invalid store config: {0}")]
    InvalidConfig(String),

    /// Underlying file I/O failed.
    #[error("counter store I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// True for the "first use of this key" outcome.
    pub fn is_not_registered(&self) -> bool {
        matches!(self, StoreError::NotRegistered { .. })
    }
}
