//! # Seq-Proxy Core Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion benchmarks per subsystem
//! │   ├── sp_01_hash_ring.rs
//! │   └── sp_02_counter_store.rs
//! │
//! └── integration/      # Ring + store allocation flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sp-tests
//!
//! # Benchmarks
//! cargo bench -p sp-tests
//! ```

pub mod benchmarks;
pub mod integration;
