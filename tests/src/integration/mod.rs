//! # Integration Tests
//!
//! Cross-subsystem flows between the hash ring and the counter store.

pub mod flows;
