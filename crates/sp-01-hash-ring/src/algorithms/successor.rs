//! # Successor Search
//!
//! Clockwise lookup on a sorted position list.

/// Index of the smallest position >= `hash`, wrapping to 0 past the top.
///
/// Returns `None` only for an empty ring.
pub fn successor_index(positions: &[u32], hash: u32) -> Option<usize> {
    if positions.is_empty() {
        return None;
    }
    let idx = positions.partition_point(|&p| p < hash);
    Some(if idx == positions.len() { 0 } else { idx })
}
