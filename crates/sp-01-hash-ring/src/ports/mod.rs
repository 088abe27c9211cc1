//! # Ports Module
//!
//! Traits the proxy layer programs against.

pub mod inbound;

pub use inbound::OwnerResolver;
