//! # Counter Record
//!
//! One business key and its last persisted sequence value.

use std::fmt;

/// A `(key, value)` pair as held in memory and written to disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterRecord {
    /// Business key (ssid).
    pub key: String,
    /// Last issued sequence value.
    pub value: u64,
}

impl CounterRecord {
    /// Create a record.
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Whether `key` can be written as a single line.
    pub fn is_persistable_key(key: &str) -> bool {
        !key.is_empty() && !key.contains(['\n', '\r'])
    }
}

impl fmt::Display for CounterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
