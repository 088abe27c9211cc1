//! # Algorithms
//!
//! Line codec and the recovery scan. Both are pure over `Read`/`Vec<u8>`.

pub mod codec;
pub mod recovery;

pub use codec::{encode_record, parse_line};
pub use recovery::{recover, RecoveredCounters};
