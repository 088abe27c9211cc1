//! # Domain Value Objects
//!
//! Immutable value types for the hash ring.

use super::errors::{OwnerId, RingError};
use serde::{Deserialize, Serialize};

/// Default number of virtual nodes per owner.
pub const DEFAULT_REPLICAS: usize = 50;

/// Ring configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual nodes placed per owner. Low values balance poorly.
    pub replicas: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
        }
    }
}

impl RingConfig {
    /// Create config for testing.
    pub fn for_testing() -> Self {
        Self { replicas: 3 }
    }

    /// Reject a zero replication factor.
    pub fn validate(&self) -> Result<(), RingError> {
        if self.replicas == 0 {
            return Err(RingError::InvalidReplicas(self.replicas));
        }
        Ok(())
    }
}

/// One point on the ring.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VirtualNode {
    /// Position on the u32 keyspace.
    pub position: u32,
    /// Owner bound to this position.
    pub owner: OwnerId,
}

impl VirtualNode {
    /// Create a virtual node.
    pub fn new(position: u32, owner: impl Into<OwnerId>) -> Self {
        Self {
            position,
            owner: owner.into(),
        }
    }
}
