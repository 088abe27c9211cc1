//! # Inbound Ports
//!
//! API trait defining what the hash ring offers to the routing layer.

use crate::domain::{OwnerId, RingError};

/// Owner resolution - inbound port.
///
/// The proxy resolves every allocation request through this trait so tests
/// can substitute a fixed routing table.
pub trait OwnerResolver: Send + Sync {
    /// Owner responsible for `key`.
    fn resolve(&self, key: &str) -> Result<OwnerId, RingError>;

    /// Register owners (idempotent).
    fn add_owners(&self, owners: &[OwnerId]);

    /// Unregister an owner. Returns false if it held no positions.
    fn remove_owner(&self, owner: &str) -> bool;

    /// Currently registered owners, sorted.
    fn owners(&self) -> Vec<OwnerId>;
}
