// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Formatter};
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter::StepBy;
use std::ops::Range;

use crate::hash::pair_hash;
use crate::{
    Backing, BoundedView, Entries, Entry, Error, FixedCardinality, Keys, Result, SequenceView, SplittableCursor, Values,
};

/// A map-shaped view over a [`BoundedView`] of even length.
///
/// The element at thumb `2i` is a key and the element at thumb `2i + 1` is its value. Keys
/// are found by a linear scan in storage order; if a key occurs more than once, the first
/// occurrence wins. Later pairs with a repeated key are shadowed: lookups, equality, hashing,
/// and `Debug` output all ignore them, while traversals such as [`for_each()`][Self::for_each]
/// and the cursors still visit every pair in storage.
///
/// The view covers a fixed range of storage, so it can never gain or lose a key. Operations
/// that would insert a key fail with [`ErrorKind::KeyNotFound`][crate::ErrorKind::KeyNotFound]
/// and operations that would remove one fail with
/// [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange].
/// Values of existing keys can be changed freely.
///
/// # Examples
///
/// ```
/// use array_views::{BoundedView, ErrorKind, as_cells};
///
/// let mut data = [1, 10, 2, 20];
/// let paired = BoundedView::new(as_cells(&mut data)).paired()?;
///
/// assert_eq!(paired.get(&1), Some(10));
/// assert_eq!(paired.put(2, 21)?, 20);
/// assert_eq!(paired.put(3, 30).unwrap_err().kind(), &ErrorKind::KeyNotFound);
/// assert_eq!(data, [1, 10, 2, 21]);
/// # Ok::<(), array_views::Error>(())
/// ```
pub struct PairedMapView<'a, S: ?Sized> {
    view: BoundedView<'a, S>,
}

impl<S: ?Sized> Clone for PairedMapView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for PairedMapView<'_, S> {}

impl<'a, S: ?Sized + Backing> PairedMapView<'a, S> {
    /// Creates a paired view over the range of `view`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OddLength`][crate::ErrorKind::OddLength] if `view` has an odd
    /// number of elements.
    pub fn new(view: BoundedView<'a, S>) -> Result<Self> {
        if view.len() % 2 != 0 {
            return Err(Error::odd_length(view.len()));
        }

        Ok(Self { view })
    }

    /// The underlying bounded view.
    #[must_use]
    pub const fn view(&self) -> BoundedView<'a, S> {
        self.view
    }

    /// The keys and values as one interleaved sequence.
    #[must_use]
    pub const fn as_sequence(&self) -> SequenceView<'a, S> {
        SequenceView::new(self.view)
    }

    /// The number of key/value pairs, including shadowed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len() / 2
    }

    /// Whether the view holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    fn key_indexes(&self) -> StepBy<Range<usize>> {
        (self.view.begin_index()..self.view.end_index()).step_by(2)
    }

    /// Storage index of the first occurrence of `key`.
    fn find(&self, key: &S::Item) -> Option<usize>
    where
        S::Item: PartialEq,
    {
        self.key_indexes().find(|&index| self.view.load_index(index) == *key)
    }

    /// Storage indexes of the keys that are not shadowed by an earlier occurrence.
    fn mapped_key_indexes(&self) -> impl Iterator<Item = usize>
    where
        S::Item: PartialEq,
    {
        self.key_indexes()
            .filter(move |&index| self.find(&self.view.load_index(index)) == Some(index))
    }

    /// The number of distinct keys.
    fn mapped_len(&self) -> usize
    where
        S::Item: PartialEq,
    {
        self.mapped_key_indexes().count()
    }

    /// Storage index of the value paired with `key`, failing if the key is absent.
    fn value_index(&self, key: &S::Item) -> Result<usize>
    where
        S::Item: PartialEq,
    {
        self.find(key).map(|index| index + 1).ok_or_else(Error::key_not_found)
    }

    fn swap_value(&self, value_index: usize, value: S::Item) -> Result<S::Item> {
        self.view.check_admits(&value)?;

        let previous = self.view.load_index(value_index);
        self.view.store_index(value_index, value);
        Ok(previous)
    }

    /// The pair position of `key`: the `p` for which the key sits at thumb `2p`.
    #[must_use]
    pub fn key_thumb(&self, key: &S::Item) -> Option<usize>
    where
        S::Item: PartialEq,
    {
        self.find(key).map(|index| (index - self.view.begin_index()) / 2)
    }

    /// The value paired with `key`.
    #[must_use]
    pub fn get(&self, key: &S::Item) -> Option<S::Item>
    where
        S::Item: PartialEq,
    {
        self.find(key).map(|index| self.view.load_index(index + 1))
    }

    /// The value paired with `key`, or `default` if the key is absent.
    #[must_use]
    pub fn get_or_default(&self, key: &S::Item, default: S::Item) -> S::Item
    where
        S::Item: PartialEq,
    {
        self.get(key).unwrap_or(default)
    }

    /// Whether `key` is one of the keys.
    #[must_use]
    pub fn contains_key(&self, key: &S::Item) -> bool
    where
        S::Item: PartialEq,
    {
        self.find(key).is_some()
    }

    /// Whether `value` is one of the values.
    #[must_use]
    pub fn contains_value(&self, value: &S::Item) -> bool
    where
        S::Item: PartialEq,
    {
        self.mapped_key_indexes()
            .any(|index| self.view.load_index(index + 1) == *value)
    }

    /// Stores `value` for an existing `key` and returns the value it replaced.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::KeyNotFound`][crate::ErrorKind::KeyNotFound] if `key` is absent, as the
    ///   view cannot insert keys.
    /// * [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not admit
    ///   `value`.
    pub fn put(&self, key: S::Item, value: S::Item) -> Result<S::Item>
    where
        S::Item: PartialEq,
    {
        self.replace(&key, value)
    }

    /// Stores `value` for an existing `key` and returns the value it replaced.
    ///
    /// # Errors
    ///
    /// Same as [`put()`][Self::put].
    pub fn replace(&self, key: &S::Item, value: S::Item) -> Result<S::Item>
    where
        S::Item: PartialEq,
    {
        let index = self.value_index(key)?;
        self.swap_value(index, value)
    }

    /// Stores `value` for `key` only if the key is present and currently paired with
    /// `expected`. Returns whether the value was stored.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not
    /// admit `value`.
    pub fn replace_exact(&self, key: &S::Item, expected: &S::Item, value: S::Item) -> Result<bool>
    where
        S::Item: PartialEq,
    {
        let Some(index) = self.find(key).map(|index| index + 1) else {
            return Ok(false);
        };

        if self.view.load_index(index) != *expected {
            return Ok(false);
        }

        self.swap_value(index, value)?;
        Ok(true)
    }

    /// Returns the value of `key` if present. Otherwise asks `compute` for one.
    ///
    /// Returns `Ok(None)` if the key is absent and `compute` declines to produce a value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::KeyNotFound`][crate::ErrorKind::KeyNotFound] if the key is absent
    /// and `compute` produces a value, as the view cannot insert keys.
    pub fn compute_if_absent(
        &self,
        key: &S::Item,
        compute: impl FnOnce(&S::Item) -> Option<S::Item>,
    ) -> Result<Option<S::Item>>
    where
        S::Item: PartialEq,
    {
        if let Some(value) = self.get(key) {
            return Ok(Some(value));
        }

        match compute(key) {
            None => Ok(None),
            Some(_) => Err(Error::key_not_found()),
        }
    }

    /// Replaces the value of an existing `key` with what `compute` returns for it, and returns
    /// the new value.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::KeyNotFound`][crate::ErrorKind::KeyNotFound] if `key` is absent.
    /// * [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange]
    ///   if `compute` returns `None`, which would remove the key.
    /// * [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not admit
    ///   the new value.
    pub fn compute_if_present(
        &self,
        key: &S::Item,
        compute: impl FnOnce(&S::Item, S::Item) -> Option<S::Item>,
    ) -> Result<S::Item>
    where
        S::Item: PartialEq + Clone,
    {
        let index = self.value_index(key)?;
        let value = compute(key, self.view.load_index(index)).ok_or_else(|| Error::unsupported("remove"))?;

        self.swap_value(index, value.clone())?;
        Ok(value)
    }

    /// Recomputes the value of `key` from its current value, or from `None` if the key is
    /// absent, and returns the new value.
    ///
    /// The view never gains or loses a key: `Ok(None)` is returned when the key is absent and
    /// `compute` returns `None`, and nothing changes.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::KeyNotFound`][crate::ErrorKind::KeyNotFound] if the key is absent and
    ///   `compute` returns a value.
    /// * [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange]
    ///   if the key is present and `compute` returns `None`.
    /// * [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not admit
    ///   the new value.
    pub fn compute(
        &self,
        key: &S::Item,
        compute: impl FnOnce(&S::Item, Option<S::Item>) -> Option<S::Item>,
    ) -> Result<Option<S::Item>>
    where
        S::Item: PartialEq + Clone,
    {
        let Some(index) = self.find(key).map(|index| index + 1) else {
            return match compute(key, None) {
                None => Ok(None),
                Some(_) => Err(Error::key_not_found()),
            };
        };

        let value = compute(key, Some(self.view.load_index(index))).ok_or_else(|| Error::unsupported("remove"))?;

        self.swap_value(index, value.clone())?;
        Ok(Some(value))
    }

    /// Combines the current value of an existing `key` with `value` and stores the result,
    /// which is also returned.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::KeyNotFound`][crate::ErrorKind::KeyNotFound] if `key` is absent.
    /// * [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange]
    ///   if `combine` returns `None`, which would remove the key.
    /// * [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not admit
    ///   the combined value.
    pub fn merge(
        &self,
        key: &S::Item,
        value: S::Item,
        combine: impl FnOnce(S::Item, S::Item) -> Option<S::Item>,
    ) -> Result<S::Item>
    where
        S::Item: PartialEq + Clone,
    {
        let index = self.value_index(key)?;
        let merged = combine(self.view.load_index(index), value).ok_or_else(|| Error::unsupported("remove"))?;

        self.swap_value(index, merged.clone())?;
        Ok(merged)
    }

    /// Stores every pair of `pairs`, as if by [`put()`][Self::put].
    ///
    /// Every key is looked up and every value validated before anything is written.
    ///
    /// # Errors
    ///
    /// Same as [`put()`][Self::put], for the first pair that fails. Nothing is written in that
    /// case.
    pub fn put_all(&self, pairs: impl IntoIterator<Item = (S::Item, S::Item)>) -> Result<()>
    where
        S::Item: PartialEq,
    {
        let writes = pairs
            .into_iter()
            .map(|(key, value)| {
                let index = self.value_index(&key)?;
                self.view.check_admits(&value)?;
                Ok((index, value))
            })
            .collect::<Result<Vec<_>>>()?;

        for (index, value) in writes {
            self.view.store_index(index, value);
        }

        Ok(())
    }

    /// Replaces every value with what `rewrite` returns for its key and current value.
    ///
    /// All values are computed and validated before the first one is written.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not
    /// admit one of the new values. Nothing is written in that case.
    pub fn replace_all(&self, mut rewrite: impl FnMut(&S::Item, S::Item) -> S::Item) -> Result<()> {
        let values: Vec<_> = self
            .key_indexes()
            .map(|index| rewrite(&self.view.load_index(index), self.view.load_index(index + 1)))
            .collect();

        for value in &values {
            self.view.check_admits(value)?;
        }

        for (index, value) in self.key_indexes().zip(values) {
            self.view.store_index(index + 1, value);
        }

        Ok(())
    }

    /// Always fails, as the view cannot remove keys.
    ///
    /// # Errors
    ///
    /// Always returns [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange].
    pub fn remove(&self, key: &S::Item) -> Result<S::Item> {
        _ = key;
        Err(Error::unsupported("remove"))
    }

    /// Calls `visitor` with every key and value, in storage order.
    pub fn for_each(&self, mut visitor: impl FnMut(S::Item, S::Item)) {
        for index in self.key_indexes() {
            visitor(self.view.load_index(index), self.view.load_index(index + 1));
        }
    }

    /// The entry at pair position `pair`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`][crate::ErrorKind::IndexOutOfRange] unless
    /// `pair < self.len()`.
    pub fn entry(&self, pair: usize) -> Result<Entry<'a, S>> {
        if pair >= self.len() {
            return Err(Error::index_out_of_range(pair, self.len()));
        }

        Ok(Entry::new(self.view.window(self.view.begin_index() + pair * 2, 2)))
    }

    /// A cursor over the entries, in storage order.
    #[must_use]
    pub fn entries(&self) -> SplittableCursor<'a, S, Entries> {
        SplittableCursor::new(self.view)
    }

    /// A cursor over the keys, in storage order.
    #[must_use]
    pub fn keys(&self) -> SplittableCursor<'a, S, Keys> {
        SplittableCursor::new(self.view)
    }

    /// A cursor over the values, in storage order.
    #[must_use]
    pub fn values(&self) -> SplittableCursor<'a, S, Values> {
        SplittableCursor::new(self.view)
    }

    /// The order-independent hash of the associations, as computed by
    /// [`mapping_hash()`][crate::mapping_hash]. Shadowed pairs do not contribute.
    #[must_use]
    pub fn mapping_hash(&self) -> u64
    where
        S::Item: Hash + PartialEq,
    {
        self.mapped_key_indexes().fold(0, |sum: u64, index| {
            sum.wrapping_add(pair_hash(
                &self.view.load_index(index),
                &self.view.load_index(index + 1),
            ))
        })
    }

    /// Whether every association of this view is also an association of `lookup`.
    fn all_found_in(&self, mut lookup: impl FnMut(&S::Item, &S::Item) -> bool) -> bool
    where
        S::Item: PartialEq,
    {
        self.mapped_key_indexes()
            .all(|index| lookup(&self.view.load_index(index), &self.view.load_index(index + 1)))
    }
}

impl<'a, S: ?Sized + Backing> IntoIterator for PairedMapView<'a, S> {
    type Item = Entry<'a, S>;
    type IntoIter = SplittableCursor<'a, S, Entries>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<S: ?Sized + Backing> FixedCardinality for PairedMapView<'_, S> {
    type Item = (S::Item, S::Item);
}

/// Two paired views are equal if they hold the same associations, in any order.
impl<S, T> PartialEq<PairedMapView<'_, T>> for PairedMapView<'_, S>
where
    S: ?Sized + Backing,
    T: ?Sized + Backing<Item = S::Item>,
    S::Item: PartialEq,
{
    fn eq(&self, other: &PairedMapView<'_, T>) -> bool {
        self.mapped_len() == other.mapped_len()
            && self.all_found_in(|key, value| other.get(key).is_some_and(|v| v == *value))
    }
}

impl<S> Eq for PairedMapView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Eq,
{
}

impl<S, H> PartialEq<HashMap<S::Item, S::Item, H>> for PairedMapView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Eq + Hash,
    H: BuildHasher,
{
    fn eq(&self, other: &HashMap<S::Item, S::Item, H>) -> bool {
        self.mapped_len() == other.len() && self.all_found_in(|key, value| other.get(key) == Some(value))
    }
}

impl<S> PartialEq<BTreeMap<S::Item, S::Item>> for PairedMapView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Ord,
{
    fn eq(&self, other: &BTreeMap<S::Item, S::Item>) -> bool {
        self.mapped_len() == other.len() && self.all_found_in(|key, value| other.get(key) == Some(value))
    }
}

/// Hashes the order-independent [`mapping_hash()`][PairedMapView::mapping_hash].
impl<S> Hash for PairedMapView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Hash + PartialEq,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.mapping_hash());
    }
}

impl<S> Debug for PairedMapView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Debug + PartialEq,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.mapped_key_indexes()
                    .map(|index| (self.view.load_index(index), self.view.load_index(index + 1))),
            )
            .finish()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use rstest::rstest;

    use super::*;
    use crate::{ErrorKind, Narrowed, as_cells, mapping_hash};

    fn strings(items: &[&str]) -> Vec<RefCell<String>> {
        items.iter().map(|s| RefCell::new((*s).to_string())).collect()
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn odd_length_is_rejected(#[case] len: usize) {
        let storage = vec![Cell::new(0_u8); len];

        let error = BoundedView::new(&storage[..]).paired().unwrap_err();

        assert_eq!(error.kind(), &ErrorKind::OddLength { len });
    }

    #[test]
    fn reads_interleaved_pairs() {
        let mut data = [1, 10, 2, 20];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert_eq!(paired.len(), 2);
        assert!(!paired.is_empty());
        assert_eq!(paired.get(&1), Some(10));
        assert_eq!(paired.get(&2), Some(20));
        assert_eq!(paired.get(&10), None);
        assert_eq!(paired.get_or_default(&3, -1), -1);
        assert!(paired.contains_key(&2));
        assert!(!paired.contains_key(&20));
        assert!(paired.contains_value(&20));
        assert!(!paired.contains_value(&2));
        assert_eq!(paired.key_thumb(&2), Some(1));
    }

    #[test]
    fn empty_view_has_no_pairs() {
        let mut data: [i32; 0] = [];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert!(paired.is_empty());
        assert_eq!(paired.len(), 0);
        assert_eq!(paired.get(&0), None);
        assert_eq!(paired.mapping_hash(), 0);
    }

    #[test]
    fn first_duplicate_key_wins() {
        let mut data = [7, 1, 7, 2];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert_eq!(paired.get(&7), Some(1));
        assert_eq!(paired.put(7, 5).unwrap(), 1);
        assert_eq!(data, [7, 5, 7, 2]);
    }

    #[test]
    fn shadowed_pairs_are_ignored_by_equality() {
        let mut first = [7, 1, 7, 1];
        let mut second = [7, 1, 8, 9];
        let a = BoundedView::new(as_cells(&mut first)).paired().unwrap();
        let b = BoundedView::new(as_cells(&mut second)).paired().unwrap();

        assert_ne!(a, b);
        assert_ne!(b, a);
        assert_ne!(a, HashMap::from([(7, 1), (8, 9)]));
        assert_ne!(a, BTreeMap::from([(7, 1), (8, 9)]));
        assert_eq!(a, HashMap::from([(7, 1)]));
        assert_eq!(a, BTreeMap::from([(7, 1)]));
    }

    #[test]
    fn shadowed_pairs_do_not_affect_hash_or_debug() {
        let mut repeated = [7, 1, 7, 2, 3, 4];
        let mut distinct = [3, 4, 7, 1];
        let a = BoundedView::new(as_cells(&mut repeated)).paired().unwrap();
        let b = BoundedView::new(as_cells(&mut distinct)).paired().unwrap();

        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a.mapping_hash(), b.mapping_hash());
        assert_eq!(a.mapping_hash(), mapping_hash([(7, 1), (3, 4)]));
        assert_eq!(format!("{a:?}"), "{7: 1, 3: 4}");
        assert!(!a.contains_value(&2));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn lookup_is_confined_to_the_range() {
        let mut data = [9, 90, 1, 10, 2, 20];
        let paired = BoundedView::with_range(as_cells(&mut data), 2, 6).unwrap().paired().unwrap();

        assert_eq!(paired.get(&9), None);
        assert_eq!(paired.key_thumb(&1), Some(0));
        assert_eq!(paired.put(9, 0).unwrap_err().kind(), &ErrorKind::KeyNotFound);
    }

    #[test]
    fn put_requires_existing_key() {
        let mut data = [1, 10, 2, 20];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert_eq!(paired.put(2, 21).unwrap(), 20);
        assert_eq!(paired.put(3, 30).unwrap_err().kind(), &ErrorKind::KeyNotFound);
        assert_eq!(paired.replace(&1, 11).unwrap(), 10);
        assert_eq!(paired.replace(&4, 0).unwrap_err().kind(), &ErrorKind::KeyNotFound);
        assert_eq!(paired.view().len(), 4);
        assert_eq!(data, [1, 11, 2, 21]);
    }

    #[test]
    fn replace_exact_compares_current_value() {
        let mut data = [1, 10];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert!(!paired.replace_exact(&1, &11, 12).unwrap());
        assert!(!paired.replace_exact(&2, &10, 12).unwrap());
        assert!(paired.replace_exact(&1, &10, 12).unwrap());
        assert_eq!(data, [1, 12]);
    }

    #[test]
    fn compute_if_absent_never_inserts() {
        let mut data = [1, 10];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert_eq!(paired.compute_if_absent(&1, |_| unreachable!()).unwrap(), Some(10));
        assert_eq!(paired.compute_if_absent(&2, |_| None).unwrap(), None);
        assert_eq!(
            paired.compute_if_absent(&2, |k| Some(k * 10)).unwrap_err().kind(),
            &ErrorKind::KeyNotFound
        );
        assert_eq!(data, [1, 10]);
    }

    #[test]
    fn compute_if_present_never_removes() {
        let mut data = [1, 10];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert_eq!(paired.compute_if_present(&1, |k, v| Some(k + v)).unwrap(), 11);
        assert_eq!(
            paired.compute_if_present(&1, |_, _| None).unwrap_err().kind(),
            &ErrorKind::UnsupportedStructuralChange { operation: "remove" }
        );
        assert_eq!(
            paired.compute_if_present(&2, |_, v| Some(v)).unwrap_err().kind(),
            &ErrorKind::KeyNotFound
        );
        assert_eq!(data, [1, 11]);
    }

    #[test]
    fn compute_keeps_cardinality() {
        let mut data = [1, 10];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert_eq!(paired.compute(&1, |_, v| v.map(|v| v * 2)).unwrap(), Some(20));
        assert_eq!(paired.compute(&2, |_, v| v).unwrap(), None);
        assert_eq!(
            paired.compute(&2, |_, _| Some(0)).unwrap_err().kind(),
            &ErrorKind::KeyNotFound
        );
        assert_eq!(
            paired.compute(&1, |_, _| None).unwrap_err().kind(),
            &ErrorKind::UnsupportedStructuralChange { operation: "remove" }
        );
        assert_eq!(data, [1, 20]);
    }

    #[test]
    fn merge_combines_existing_value() {
        let storage = strings(&["a", "x", "b", "y"]);
        let paired = BoundedView::new(&storage[..]).paired().unwrap();

        let merged = paired
            .merge(&"a".to_string(), "z".to_string(), |old, new| Some(old + &new))
            .unwrap();

        assert_eq!(merged, "xz");
        assert_eq!(paired.get(&"a".to_string()).as_deref(), Some("xz"));
        assert_eq!(
            paired
                .merge(&"c".to_string(), String::new(), |old, _| Some(old))
                .unwrap_err()
                .kind(),
            &ErrorKind::KeyNotFound
        );
        assert_eq!(
            paired
                .merge(&"b".to_string(), String::new(), |_, _| None)
                .unwrap_err()
                .kind(),
            &ErrorKind::UnsupportedStructuralChange { operation: "remove" }
        );
    }

    #[test]
    fn put_all_is_all_or_nothing() {
        let mut data = [1, 10, 2, 20, 3, 30];
        let cells = as_cells(&mut data);
        let paired = BoundedView::new(cells).paired().unwrap();

        assert_eq!(
            paired.put_all([(1, 11), (4, 40), (2, 22)]).unwrap_err().kind(),
            &ErrorKind::KeyNotFound
        );
        assert_eq!(paired.values().collect::<Vec<_>>(), vec![10, 20, 30]);

        paired.put_all([(3, 33), (1, 11)]).unwrap();
        assert_eq!(paired.values().collect::<Vec<_>>(), vec![11, 20, 33]);
    }

    #[test]
    fn narrowed_storage_rejects_values_before_writing() {
        let storage = [Cell::new(1_i32), Cell::new(2), Cell::new(3), Cell::new(4)];
        let positive = Narrowed::new(&storage[..], "positive i32", |x: &i32| *x > 0);
        let paired = BoundedView::new(&positive).paired().unwrap();

        assert_eq!(
            paired.put(1, -2).unwrap_err().kind(),
            &ErrorKind::StoreType { kind: "positive i32" }
        );
        assert!(paired.put_all([(3, 5), (1, 0)]).is_err());
        assert!(paired.replace_all(|k, v| v - k - 1).is_err());
        assert_eq!(storage.iter().map(Cell::get).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        paired.replace_all(|k, v| v * k).unwrap();
        assert_eq!(storage.iter().map(Cell::get).collect::<Vec<_>>(), vec![1, 2, 3, 12]);
    }

    #[test]
    fn structural_changes_are_rejected() {
        let mut data = [1, 10];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        assert_eq!(
            paired.remove(&1).unwrap_err().kind(),
            &ErrorKind::UnsupportedStructuralChange { operation: "remove" }
        );
        assert_eq!(
            paired.push((2, 20)).unwrap_err().kind(),
            &ErrorKind::UnsupportedStructuralChange { operation: "push" }
        );
        assert_eq!(
            paired.insert_at(0, (2, 20)).unwrap_err().kind(),
            &ErrorKind::UnsupportedStructuralChange { operation: "insert" }
        );
        assert_eq!(
            paired.clear().unwrap_err().kind(),
            &ErrorKind::UnsupportedStructuralChange { operation: "clear" }
        );
        assert_eq!(data, [1, 10]);
    }

    #[test]
    fn entries_write_through() {
        let mut data = [1, 10, 2, 20];
        let cells = as_cells(&mut data);
        let paired = BoundedView::new(cells).paired().unwrap();

        for entry in paired {
            _ = entry.set_value(entry.value() + entry.key()).unwrap();
        }

        let second = paired.entry(1).unwrap();
        assert_eq!(second, (2, 22));
        assert_eq!(
            paired.entry(2).unwrap_err().kind(),
            &ErrorKind::IndexOutOfRange { thumb: 2, len: 2 }
        );
        assert_eq!(cells.iter().map(Cell::get).collect::<Vec<_>>(), vec![1, 11, 2, 22]);
    }

    #[test]
    fn for_each_visits_in_storage_order() {
        let mut data = [3, 30, 1, 10, 2, 20];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();
        let mut seen = Vec::new();

        paired.for_each(|k, v| seen.push((k, v)));

        assert_eq!(seen, vec![(3, 30), (1, 10), (2, 20)]);
        assert_eq!(paired.as_sequence(), [3, 30, 1, 10, 2, 20]);
    }

    #[test]
    fn equality_ignores_order_and_storage() {
        let mut first = [1, 10, 2, 20];
        let mut second = [0, 2, 20, 1, 10];
        let a = BoundedView::new(as_cells(&mut first)).paired().unwrap();
        let b = BoundedView::with_range(as_cells(&mut second), 1, 5)
            .unwrap()
            .paired()
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.mapping_hash(), b.mapping_hash());

        b.put(2, 21).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn equality_with_standard_maps() {
        let mut data = [1, 10, 2, 20];
        let paired = BoundedView::new(as_cells(&mut data)).paired().unwrap();

        let hash_map = HashMap::from([(2, 20), (1, 10)]);
        let btree_map = BTreeMap::from([(1, 10), (2, 20)]);

        assert_eq!(paired, hash_map);
        assert_eq!(paired, btree_map);
        assert_eq!(paired.mapping_hash(), mapping_hash(&hash_map));
        assert_eq!(paired.mapping_hash(), mapping_hash(&btree_map));

        assert_ne!(paired, HashMap::from([(1, 10)]));
        assert_ne!(paired, BTreeMap::from([(1, 10), (2, 21)]));
    }

    #[test]
    fn debug_prints_as_map() {
        let storage = strings(&["k", "v"]);
        let paired = BoundedView::new(&storage[..]).paired().unwrap();

        assert_eq!(format!("{paired:?}"), r#"{"k": "v"}"#);
    }
}
