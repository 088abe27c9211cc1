//! # Seq-Proxy Benchmarks
//!
//! Performance benchmarks per subsystem.

pub mod sp_01_hash_ring;
pub mod sp_02_counter_store;
