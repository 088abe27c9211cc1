//! # Reassignment Diff
//!
//! Which keys change owner between two ring states.

use crate::domain::{OwnerId, RingSnapshot};

/// A key whose owner differs between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovedKey {
    /// The business key.
    pub key: String,
    /// Owner before the change (`None` if the old ring was empty).
    pub from: Option<OwnerId>,
    /// Owner after the change (`None` if the new ring is empty).
    pub to: Option<OwnerId>,
}

/// List the keys in `keys` whose owner changed from `before` to `after`.
///
/// Both snapshots must have been built with the same hash function.
pub fn moved_keys<'a, I, F>(
    before: &RingSnapshot,
    after: &RingSnapshot,
    keys: I,
    hash_fn: F,
) -> Vec<MovedKey>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&[u8]) -> u32,
{
    keys.into_iter()
        .filter_map(|key| {
            let hash = hash_fn(key.as_bytes());
            let from = before.owner_for_hash(hash);
            let to = after.owner_for_hash(hash);
            (from != to).then(|| MovedKey {
                key: key.to_string(),
                from: from.cloned(),
                to: to.cloned(),
            })
        })
        .collect()
}
