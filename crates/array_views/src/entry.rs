// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use crate::hash::pair_hash;
use crate::{Backing, BoundedView, Result};

/// One key/value pair of a [`PairedMapView`][crate::PairedMapView].
///
/// An entry is a two-element window into the same storage as the map: the key at thumb 0 and
/// the value at thumb 1. Reads always observe the current contents of the storage and
/// [`set_value()`][Self::set_value] writes straight through to it.
pub struct Entry<'a, S: ?Sized> {
    window: BoundedView<'a, S>,
}

impl<S: ?Sized> Clone for Entry<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Entry<'_, S> {}

impl<'a, S: ?Sized + Backing> Entry<'a, S> {
    pub(crate) fn new(window: BoundedView<'a, S>) -> Self {
        debug_assert_eq!(window.len(), 2);

        Self { window }
    }

    /// The key of the pair.
    #[must_use]
    pub fn key(&self) -> S::Item {
        self.window.load_index(self.window.begin_index())
    }

    /// The value of the pair.
    #[must_use]
    pub fn value(&self) -> S::Item {
        self.window.load_index(self.window.begin_index() + 1)
    }

    /// The key and the value.
    #[must_use]
    pub fn pair(&self) -> (S::Item, S::Item) {
        (self.key(), self.value())
    }

    /// Overwrites the value of the pair, returning the value it replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not
    /// admit `value`.
    pub fn set_value(&self, value: S::Item) -> Result<S::Item> {
        self.window.check_admits(&value)?;

        let index = self.window.begin_index() + 1;
        let previous = self.window.load_index(index);
        self.window.store_index(index, value);
        Ok(previous)
    }

    /// The two-element window of storage behind this entry.
    #[must_use]
    pub const fn window(&self) -> BoundedView<'a, S> {
        self.window
    }
}

impl<S, T> PartialEq<Entry<'_, T>> for Entry<'_, S>
where
    S: ?Sized + Backing,
    T: ?Sized + Backing,
    S::Item: PartialEq<T::Item>,
{
    fn eq(&self, other: &Entry<'_, T>) -> bool {
        self.key() == other.key() && self.value() == other.value()
    }
}

impl<S> Eq for Entry<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Eq,
{
}

impl<S, K, V> PartialEq<(K, V)> for Entry<'_, S>
where
    S: ?Sized + Backing,
    S::Item: PartialEq<K> + PartialEq<V>,
{
    fn eq(&self, other: &(K, V)) -> bool {
        self.key() == other.0 && self.value() == other.1
    }
}

/// Hashes as `hash(key) ^ hash(value)`, the per-pair term of
/// [`mapping_hash()`][crate::mapping_hash].
impl<S> Hash for Entry<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(pair_hash(&self.key(), &self.value()));
    }
}

impl<S> Debug for Entry<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entry").field(&self.key()).field(&self.value()).finish()
    }
}
