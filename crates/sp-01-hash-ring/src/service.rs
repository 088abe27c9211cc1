//! # Hash Ring Service
//!
//! Thread-safe consistent-hash ring.
//!
//! Owner changes are rare and lookups are hot, so the snapshot sits behind a
//! `parking_lot::RwLock`: `get` takes the read side, `add`/`remove` rebuild
//! under the write side. A reader never sees a half-sorted position list.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use sp_telemetry::metrics::{RING_LOOKUPS, RING_VNODES};
use tracing::debug;

use crate::algorithms::{default_hash, vnode_key};
use crate::domain::{
    invariant_sorted_unique, OwnerId, RingConfig, RingError, RingSnapshot, VirtualNode,
};
use crate::ports::OwnerResolver;

/// Pluggable ring hash: bytes -> position.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Consistent-hash ring mapping business keys to owners.
pub struct HashRing {
    replicas: usize,
    hash_fn: HashFn,
    inner: RwLock<RingSnapshot>,
}

impl HashRing {
    /// Create an empty ring with `replicas` virtual nodes per owner.
    ///
    /// # Errors
    ///
    /// Returns `RingError::InvalidReplicas` when `replicas` is zero.
    pub fn new<F>(replicas: usize, hash_fn: F) -> Result<Self, RingError>
    where
        F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        RingConfig { replicas }.validate()?;
        Ok(Self {
            replicas,
            hash_fn: Arc::new(hash_fn),
            inner: RwLock::new(RingSnapshot::new()),
        })
    }

    /// Create an empty ring hashing with CRC-32.
    pub fn with_default_hash(replicas: usize) -> Result<Self, RingError> {
        Self::new(replicas, default_hash)
    }

    /// Create an empty ring from config, hashing with CRC-32.
    pub fn from_config(config: &RingConfig) -> Result<Self, RingError> {
        Self::with_default_hash(config.replicas)
    }

    /// Add owners to the ring.
    ///
    /// Each owner gets `replicas` positions at `hash("{i}{owner}")`. Adding an
    /// owner twice lands on the same positions, so it is a no-op. Colliding
    /// positions are rebound to the owner added last.
    pub fn add<I, S>(&self, owners: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<OwnerId>,
    {
        let mut buf = String::new();
        let mut vnodes = Vec::new();
        for owner in owners {
            let owner: OwnerId = owner.into();
            for i in 0..self.replicas {
                let position = self.hash(vnode_key(&mut buf, i, &owner));
                vnodes.push(VirtualNode::new(position, owner.clone()));
            }
        }

        let mut ring = self.inner.write();
        let added = ring.insert_all(vnodes);
        debug_assert!(invariant_sorted_unique(ring.positions()));
        RING_VNODES.set(ring.len() as i64);
        debug!(added, vnodes = ring.len(), "[sp-01] owners added to ring");
    }

    /// Remove an owner's virtual nodes.
    ///
    /// Positions that a later owner took over by collision are left alone.
    /// Returns false if the owner held no position.
    pub fn remove(&self, owner: &str) -> bool {
        let mut buf = String::new();
        let positions: Vec<u32> = (0..self.replicas)
            .map(|i| self.hash(vnode_key(&mut buf, i, owner)))
            .collect();

        let mut ring = self.inner.write();
        let mut removed = 0;
        for position in positions {
            if ring.remove_if_owned(position, owner) {
                removed += 1;
            }
        }
        RING_VNODES.set(ring.len() as i64);
        debug!(owner, removed, vnodes = ring.len(), "[sp-01] owner removed from ring");
        removed > 0
    }

    /// Resolve the owner for `key`.
    ///
    /// Picks the first ring position >= `hash(key)`, wrapping to the lowest
    /// position when the hash is past the end.
    ///
    /// # Errors
    ///
    /// Returns `RingError::EmptyRing` when no owner has been added.
    pub fn get(&self, key: &str) -> Result<OwnerId, RingError> {
        let hash = self.hash(key.as_bytes());
        let ring = self.inner.read();
        match ring.owner_for_hash(hash) {
            Some(owner) => {
                RING_LOOKUPS.with_label_values(&["hit"]).inc();
                Ok(owner.clone())
            }
            None => {
                RING_LOOKUPS.with_label_values(&["empty"]).inc();
                Err(RingError::EmptyRing)
            }
        }
    }

    /// Hash `data` with this ring's hash function.
    pub fn hash(&self, data: &[u8]) -> u32 {
        (self.hash_fn)(data)
    }

    /// Copy of the current ring state.
    pub fn snapshot(&self) -> RingSnapshot {
        self.inner.read().clone()
    }

    /// Virtual nodes per owner.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// True when no owner has been added.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn vnode_count(&self) -> usize {
        self.inner.read().len()
    }

    /// Number of distinct owners.
    pub fn owner_count(&self) -> usize {
        self.inner.read().owners().len()
    }

    /// Distinct owners, sorted.
    pub fn owners(&self) -> Vec<OwnerId> {
        self.inner.read().owners()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("vnodes", &self.vnode_count())
            .finish_non_exhaustive()
    }
}

impl OwnerResolver for HashRing {
    fn resolve(&self, key: &str) -> Result<OwnerId, RingError> {
        self.get(key)
    }

    fn add_owners(&self, owners: &[OwnerId]) {
        self.add(owners.iter().cloned());
    }

    fn remove_owner(&self, owner: &str) -> bool {
        self.remove(owner)
    }

    fn owners(&self) -> Vec<OwnerId> {
        HashRing::owners(self)
    }
}
