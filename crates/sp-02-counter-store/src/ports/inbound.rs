//! # Inbound Ports
//!
//! The storage contract consumed by the sequence proxy.

use std::sync::Arc;

use crate::domain::errors::StoreError;

/// Per-key high-water mark storage.
///
/// Implementations keep both calls free of synchronous disk I/O.
pub trait CounterStorage: Send + Sync {
    /// Last stored value for `key`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotOpen` once closed, `StoreError::NotRegistered` if the
    /// key was never stored or recovered.
    fn load(&self, key: &str) -> Result<u64, StoreError>;

    /// Record `value` as the latest counter for `key`.
    ///
    /// Callers supply non-decreasing values; the store does not check.
    ///
    /// # Errors
    ///
    /// `StoreError::NotOpen` once closed.
    fn store(&self, key: &str, value: u64) -> Result<(), StoreError>;
}

impl<T: CounterStorage + ?Sized> CounterStorage for Arc<T> {
    fn load(&self, key: &str) -> Result<u64, StoreError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: u64) -> Result<(), StoreError> {
        (**self).store(key, value)
    }
}
