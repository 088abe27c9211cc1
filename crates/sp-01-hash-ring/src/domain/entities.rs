//! # Domain Entities
//!
//! The ring state: a sorted position list and the owner bound to each position.

use std::collections::{BTreeSet, HashMap};

use super::errors::OwnerId;
use super::value_objects::VirtualNode;
use crate::algorithms::successor_index;

/// Point-in-time view of the ring.
///
/// `positions` is strictly ascending; every position has exactly one entry
/// in `owners`. A position hashed twice keeps the owner inserted last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RingSnapshot {
    positions: Vec<u32>,
    owners: HashMap<u32, OwnerId>,
}

impl RingSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a batch of virtual nodes, then re-sort once.
    ///
    /// Returns how many positions were new (collisions overwrite in place).
    pub fn insert_all<I>(&mut self, vnodes: I) -> usize
    where
        I: IntoIterator<Item = VirtualNode>,
    {
        let mut added = 0;
        for vnode in vnodes {
            if self.owners.insert(vnode.position, vnode.owner).is_none() {
                self.positions.push(vnode.position);
                added += 1;
            }
        }
        if added > 0 {
            self.positions.sort_unstable();
        }
        added
    }

    /// Drop `position` if it is still bound to `owner`.
    pub fn remove_if_owned(&mut self, position: u32, owner: &str) -> bool {
        match self.owners.get(&position) {
            Some(current) if current == owner => {
                self.owners.remove(&position);
                if let Ok(idx) = self.positions.binary_search(&position) {
                    self.positions.remove(idx);
                }
                true
            }
            _ => false,
        }
    }

    /// Owner of the first position >= `hash`, wrapping to the lowest position.
    pub fn owner_for_hash(&self, hash: u32) -> Option<&OwnerId> {
        let idx = successor_index(&self.positions, hash)?;
        self.owners.get(&self.positions[idx])
    }

    /// Sorted ring positions.
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// Distinct owners, sorted.
    pub fn owners(&self) -> Vec<OwnerId> {
        self.owners
            .values()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of virtual nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no owner has been added.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
