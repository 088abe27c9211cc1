//! # Domain Errors
//!
//! Error types for the hash ring.

use thiserror::Error;

/// Opaque identifier of a backend shard owner.
pub type OwnerId = String;

/// Hash ring error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// Lookup on a ring with no virtual nodes.
    #[error("hash ring is empty: no owners registered")]
    EmptyRing,

    /// Replication factor must be at least one.
    #[error("invalid replica count {0}: must be >= 1")]
    InvalidReplicas(usize),
}
