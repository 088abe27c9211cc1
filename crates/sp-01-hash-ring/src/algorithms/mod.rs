//! # Algorithms Module
//!
//! Pure functions behind ring placement.

pub mod hashing;
pub mod reassignment;
pub mod successor;

pub use hashing::{default_hash, vnode_key};
pub use reassignment::moved_keys;
pub use successor::successor_index;
