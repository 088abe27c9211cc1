//! # Domain Layer
//!
//! Pure types for the counter store. No I/O happens here.

pub mod config;
pub mod errors;
pub mod record;
pub mod stats;
