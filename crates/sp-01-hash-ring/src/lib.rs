//! # SP-01 Hash Ring
//!
//! Consistent-hash placement of business keys ("ssid") onto backend owners.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The sequence proxy shards allocation traffic across several backend
//! generators. Each generator is an opaque owner identifier on the ring:
//! - `replicas` virtual nodes per owner, placed at `hash("{i}{owner}")`
//! - Lookup is the nearest successor of `hash(key)`, wrapping at the top
//! - Adding an owner only remaps keys falling into its new arcs
//!
//! ## Module Structure
//!
//! ```text
//! sp-01-hash-ring/
//! ├── domain/          # RingSnapshot, RingConfig, RingError, invariants
//! ├── algorithms/      # Hashing, successor search, reassignment diff
//! ├── ports/           # OwnerResolver trait
//! └── service.rs       # HashRing (RwLock-guarded snapshot)
//! ```
//!
//! ## Usage
//!
//! ```
//! use sp_01_hash_ring::HashRing;
//!
//! let ring = HashRing::with_default_hash(50).unwrap();
//! ring.add(["seq-a", "seq-b", "seq-c"]);
//! let owner = ring.get("tenant-42").unwrap();
//! assert!(["seq-a", "seq-b", "seq-c"].contains(&owner.as_str()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::reassignment::MovedKey;
pub use algorithms::{default_hash, moved_keys, successor_index, vnode_key};
pub use domain::{
    invariant_deterministic_lookup, invariant_sorted_unique, invariant_vnode_bound, OwnerId,
    RingConfig, RingError, RingSnapshot, VirtualNode, DEFAULT_REPLICAS,
};
pub use ports::OwnerResolver;
pub use service::{HashFn, HashRing};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
