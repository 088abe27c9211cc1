//! # Domain Invariants
//!
//! Rules the ring must satisfy after every mutation.

use super::entities::RingSnapshot;
use super::errors::OwnerId;

/// Invariant: ring positions are strictly ascending.
pub fn invariant_sorted_unique(positions: &[u32]) -> bool {
    positions.windows(2).all(|w| w[0] < w[1])
}

/// Invariant: at most `replicas * owners` virtual nodes.
///
/// Fewer is legal when positions collide.
pub fn invariant_vnode_bound(snapshot: &RingSnapshot, replicas: usize) -> bool {
    snapshot.len() <= replicas.saturating_mul(snapshot.owners().len())
}

/// Invariant: lookups are deterministic.
///
/// Same key + unchanged ring = same owner.
pub fn invariant_deterministic_lookup<F>(lookup: F, key: &str) -> bool
where
    F: Fn(&str) -> Option<OwnerId>,
{
    lookup(key) == lookup(key)
}
