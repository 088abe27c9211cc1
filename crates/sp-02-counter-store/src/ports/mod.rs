//! # Ports
//!
//! Contract between the counter store and the proxy layer.

pub mod inbound;
