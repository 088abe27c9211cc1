use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use crate::domain::errors::StoreError;
use crate::domain::record::CounterRecord;
use crate::ports::inbound::CounterStorage;

/// Non-durable counter store.
///
/// Same contract as the file store without the disk: for proxies running
/// with an external source of truth, and for tests.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: DashMap<String, u64>,
    closed: AtomicBool,
}

impl InMemoryCounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CounterRecord>,
    {
        let store = Self::new();
        for record in records {
            store.counters.insert(record.key, record.value);
        }
        store
    }

    /// Reject further calls with `NotOpen`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// True if no key is held.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::NotOpen);
        }
        Ok(())
    }
}

impl CounterStorage for InMemoryCounterStore {
    fn load(&self, key: &str) -> Result<u64, StoreError> {
        self.ensure_open()?;
        self.counters
            .get(key)
            .map(|v| *v)
            .ok_or_else(|| StoreError::NotRegistered {
                key: key.to_string(),
            })
    }

    fn store(&self, key: &str, value: u64) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.counters.insert(key.to_string(), value);
        Ok(())
    }
}
