//! # Adapters
//!
//! Concrete `CounterStorage` implementations.

mod file;
#[cfg(feature = "locking")]
mod lock;
mod memory;

pub use file::FileCounterStore;
#[cfg(feature = "locking")]
pub use lock::StoreLock;
pub use memory::InMemoryCounterStore;
