// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::hash::{BuildHasher, Hash};

use foldhash::fast::FixedState;

// Any fixed value works, as long as every mapping is hashed with the same one.
const SEED: u64 = 0x5EED_A11A_5E0F_0001;

fn element_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    FixedState::with_seed(SEED).hash_one(value)
}

/// Hashes one key/value association as `hash(key) ^ hash(value)`.
#[must_use]
pub fn pair_hash<K: Hash + ?Sized, V: Hash + ?Sized>(key: &K, value: &V) -> u64 {
    element_hash(key) ^ element_hash(value)
}

/// Hashes a mapping as the wrapping sum of [`pair_hash()`] over its associations.
///
/// The result does not depend on the order of the pairs, so a
/// [`PairedMapView`][crate::PairedMapView] and an ordinary map holding the same associations
/// hash the same.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use array_views::{BoundedView, as_cells, mapping_hash};
///
/// let mut data = [1, 10, 2, 20];
/// let paired = BoundedView::new(as_cells(&mut data)).paired()?;
/// let map = HashMap::from([(2, 20), (1, 10)]);
///
/// assert_eq!(paired.mapping_hash(), mapping_hash(&map));
/// # Ok::<(), array_views::Error>(())
/// ```
pub fn mapping_hash<K: Hash, V: Hash>(pairs: impl IntoIterator<Item = (K, V)>) -> u64 {
    pairs
        .into_iter()
        .fold(0, |sum: u64, (key, value)| sum.wrapping_add(pair_hash(&key, &value)))
}
