//! # Ring Hashing
//!
//! Default hash function and virtual node key derivation.

use std::fmt::Write;

/// CRC-32 (IEEE) of the input bytes.
///
/// Fast, non-cryptographic and well distributed over the u32 keyspace.
pub fn default_hash(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Key hashed to place virtual node `index` of `owner`: the decimal index
/// immediately followed by the owner id, e.g. `"2seq-a"`.
///
/// Writes into `buf` so callers can reuse one allocation across replicas.
pub fn vnode_key<'a>(buf: &'a mut String, index: usize, owner: &str) -> &'a [u8] {
    buf.clear();
    // Writing to a String cannot fail.
    let _ = write!(buf, "{index}{owner}");
    buf.as_bytes()
}
