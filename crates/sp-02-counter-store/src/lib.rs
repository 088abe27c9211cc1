//! # Counter Store (sp-02)
//!
//! Durable, crash-recoverable high-water marks for sequence allocation.
//!
//! The proxy records the last issued sequence value per business key. Reads
//! and writes hit an in-memory map only; a background task flushes the map
//! to a flat text file on a timer and the file is replayed on startup.
//!
//! ## On-disk Format
//!
//! ```text
//! <key><SPLIT><value>\n      SPLIT defaults to ':'; value is base-10 u64
//! ```
//!
//! Lines are replayed top to bottom, later lines win, malformed lines are
//! skipped. A last line missing its newline is kept if it parses and dropped
//! as a torn write otherwise.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | No Sync I/O | `load`/`store` never touch disk |
//! | 2 | Latest Write Wins | A returned `store` is visible to every later `load` |
//! | 3 | Dirty Retained | A failed flush leaves the store dirty for retry |
//! | 4 | Single Writer | One store per file, enforced by `<path>.lock` |
//! | 5 | Clean Skip | A tick with no new writes leaves the file untouched |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Config, errors, records, flush statistics
//! - `algorithms/` - Line codec and recovery scan
//! - `ports/` - `CounterStorage` trait (the proxy-facing contract)
//! - `adapters/` - File-backed and in-memory stores, process lock
//! - `service.rs` - Background flush task with explicit shutdown
//!
//! ## Usage
//!
//! ```ignore
//! use sp_02_counter_store::{CounterStorage, CounterStoreService, StoreConfig};
//!
//! let service = CounterStoreService::start(StoreConfig::new("/var/lib/seq/counters"))?;
//! service.store("tenant-42", 10_000)?;
//! assert_eq!(service.load("tenant-42")?, 10_000);
//! service.shutdown().await?; // final flush
//! ```

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{FileCounterStore, InMemoryCounterStore};
pub use algorithms::{encode_record, parse_line, recover, RecoveredCounters};
pub use domain::config::{
    FlushMode, StoreConfig, DEFAULT_COMPACT_THRESHOLD_BYTES, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_SPLIT,
};
pub use domain::errors::StoreError;
pub use domain::record::CounterRecord;
pub use domain::stats::{FlushOutcome, FlushStats, RecoveryReport};
pub use ports::inbound::CounterStorage;
pub use service::CounterStoreService;

#[cfg(feature = "locking")]
pub use adapters::StoreLock;
