// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use nm::{Event, Magnitude};
use tracing::{Level, event};

use crate::search::binary_search;
use crate::{Backing, BoundedView, Elements, Error, FixedCardinality, Result, SearchResult, SplittableCursor};

/// A list-shaped view over a [`BoundedView`].
///
/// All positions are thumbs, relative to the start of the view. Reads and writes go straight
/// to the backing storage, and bulk operations never touch storage outside the view.
///
/// # Examples
///
/// ```
/// use array_views::{BoundedView, SearchResult, as_cells};
///
/// let mut data = [0, 9, 3, 1, 2, 0];
/// let sequence = BoundedView::with_range(as_cells(&mut data), 1, 5)?.sequence();
///
/// sequence.sort();
///
/// assert_eq!(sequence, [1, 2, 3, 9]);
/// assert_eq!(sequence.search(&3), SearchResult::Found(2));
/// assert_eq!(sequence.search(&4).encoded(), -4);
/// assert_eq!(data, [0, 1, 2, 3, 9, 0]);
/// # Ok::<(), array_views::Error>(())
/// ```
pub struct SequenceView<'a, S: ?Sized> {
    view: BoundedView<'a, S>,
}

impl<S: ?Sized> Clone for SequenceView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for SequenceView<'_, S> {}

impl<'a, S: ?Sized + Backing> SequenceView<'a, S> {
    /// Creates a sequence view over the range of `view`.
    #[must_use]
    pub const fn new(view: BoundedView<'a, S>) -> Self {
        Self { view }
    }

    /// The underlying bounded view.
    #[must_use]
    pub const fn view(&self) -> BoundedView<'a, S> {
        self.view
    }

    /// The number of elements in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Reads the element at `thumb`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`][crate::ErrorKind::IndexOutOfRange] if `thumb` is
    /// not inside the sequence.
    pub fn get(&self, thumb: usize) -> Result<S::Item> {
        let index = self.view.to_index(thumb)?;

        Ok(self.view.load_index(index))
    }

    /// Overwrites the element at `thumb`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`][crate::ErrorKind::IndexOutOfRange] if `thumb` is
    /// not inside the sequence, or [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the
    /// storage does not admit `value`.
    pub fn set(&self, thumb: usize, value: S::Item) -> Result<()> {
        let index = self.view.to_index(thumb)?;
        self.view.check_admits(&value)?;

        self.view.store_index(index, value);
        Ok(())
    }

    /// Overwrites the element at `thumb`, returning the element it replaced.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`set()`][Self::set].
    pub fn replace(&self, thumb: usize, value: S::Item) -> Result<S::Item> {
        let index = self.view.to_index(thumb)?;
        self.view.check_admits(&value)?;

        let previous = self.view.load_index(index);
        self.view.store_index(index, value);
        Ok(previous)
    }

    /// Exchanges the elements at two thumbs.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`][crate::ErrorKind::IndexOutOfRange] if either
    /// thumb is not inside the sequence.
    pub fn swap(&self, a: usize, b: usize) -> Result<()> {
        let a = self.view.to_index(a)?;
        let b = self.view.to_index(b)?;

        let first = self.view.load_index(a);
        let second = self.view.load_index(b);
        self.view.store_index(a, second);
        self.view.store_index(b, first);
        Ok(())
    }

    /// The first element, if any.
    #[must_use]
    pub fn first(&self) -> Option<S::Item> {
        self.get(0).ok()
    }

    /// The last element, if any.
    #[must_use]
    pub fn last(&self) -> Option<S::Item> {
        self.len().checked_sub(1).and_then(|thumb| self.get(thumb).ok())
    }

    /// The thumb of the first element equal to `target`.
    #[must_use]
    pub fn index_of(&self, target: &S::Item) -> Option<usize>
    where
        S::Item: PartialEq,
    {
        self.indexes()
            .position(|index| self.view.load_index(index) == *target)
    }

    /// The thumb of the last element equal to `target`.
    #[must_use]
    pub fn last_index_of(&self, target: &S::Item) -> Option<usize>
    where
        S::Item: PartialEq,
    {
        self.indexes()
            .rposition(|index| self.view.load_index(index) == *target)
    }

    /// Whether any element is equal to `target`.
    #[must_use]
    pub fn contains(&self, target: &S::Item) -> bool
    where
        S::Item: PartialEq,
    {
        self.index_of(target).is_some()
    }

    /// Binary searches a sequence sorted in ascending natural order for `target`.
    ///
    /// If several elements are equal to `target`, any one of them may be reported. If the
    /// sequence is not sorted, the result is unspecified.
    #[must_use]
    pub fn search(&self, target: &S::Item) -> SearchResult
    where
        S::Item: Ord,
    {
        self.search_by(|element| element.cmp(target))
    }

    /// Binary searches a sorted sequence with a comparator.
    ///
    /// `compare` returns the ordering of an element relative to the target, as in
    /// [`slice::binary_search_by`].
    pub fn search_by(&self, mut compare: impl FnMut(&S::Item) -> Ordering) -> SearchResult {
        binary_search(self.view.begin_index(), self.view.end_index(), |index| {
            compare(&self.view.load_index(index))
        })
    }

    /// Binary searches a sequence sorted by a key extracted from each element.
    pub fn search_by_key<K: Ord>(&self, key: &K, mut extract: impl FnMut(&S::Item) -> K) -> SearchResult {
        self.search_by(|element| extract(element).cmp(key))
    }

    /// Sorts the sequence in ascending natural order.
    ///
    /// The sort is stable: elements that compare equal keep their relative order.
    pub fn sort(&self)
    where
        S::Item: Ord,
    {
        self.sort_by(Ord::cmp);
    }

    /// Sorts the sequence with a comparator, keeping equal elements in their original order.
    ///
    /// The elements are sorted in a temporary buffer and written back once sorting is done,
    /// so a panicking comparator leaves the storage unchanged.
    pub fn sort_by(&self, compare: impl FnMut(&S::Item, &S::Item) -> Ordering) {
        let mut items = self.to_vec();
        items.sort_by(compare);
        self.write_back(items);
    }

    /// Sorts the sequence by a key extracted from each element, keeping equal keys in their
    /// original order.
    pub fn sort_by_key<K: Ord>(&self, mut extract: impl FnMut(&S::Item) -> K) {
        self.sort_by(|a, b| extract(a).cmp(&extract(b)));
    }

    /// Overwrites every element with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not
    /// admit `value`. Nothing is written in that case.
    pub fn fill(&self, value: S::Item) -> Result<()>
    where
        S::Item: Clone,
    {
        self.view.check_admits(&value)?;

        for index in self.indexes() {
            self.view.store_index(index, value.clone());
        }

        Ok(())
    }

    /// Overwrites every element with the value `generate` returns for its thumb.
    ///
    /// All values are generated and validated before the first one is written.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the storage does not
    /// admit one of the generated values. Nothing is written in that case.
    pub fn set_all(&self, generate: impl FnMut(usize) -> S::Item) -> Result<()> {
        let items: Vec<_> = (0..self.len()).map(generate).collect();

        for item in &items {
            self.view.check_admits(item)?;
        }

        self.write_back(items);
        Ok(())
    }

    /// Calls `visitor` with every element, in order.
    pub fn for_each(&self, mut visitor: impl FnMut(S::Item)) {
        for index in self.indexes() {
            visitor(self.view.load_index(index));
        }
    }

    /// Copies the first `count` elements of this sequence into `destination`, starting at
    /// thumb `destination_thumb` of the destination.
    ///
    /// The destination may be a view of the same storage, with a range overlapping this one.
    /// The copy then behaves as if all source elements were read before any destination
    /// element is written.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if `count` exceeds the
    ///   length of this sequence or the room left in the destination after `destination_thumb`.
    /// * [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] if the destination storage does
    ///   not admit one of the elements.
    ///
    /// Nothing is written if the copy fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_views::{BoundedView, as_cells};
    ///
    /// let mut data = [1, 2, 3, 4, 5];
    /// let view = BoundedView::new(as_cells(&mut data));
    ///
    /// view.sequence().copy_into(&view.sequence(), 2, 3)?;
    ///
    /// assert_eq!(data, [1, 2, 1, 2, 3]);
    /// # Ok::<(), array_views::Error>(())
    /// ```
    pub fn copy_into(&self, destination: &SequenceView<'_, S>, destination_thumb: usize, count: usize) -> Result<()> {
        self.view.check_range_between(0, count)?;

        let available = destination.view.check_range(destination_thumb)?;
        if count > available {
            return Err(Error::invalid_range(
                destination_thumb,
                destination_thumb.saturating_add(count),
                destination.len(),
            ));
        }

        let source = self.view.begin_index();
        let target = destination.view.begin_index() + destination_thumb;

        if destination.view.storage().is_narrowed() {
            // Every element must be validated before anything is written, so the whole
            // source is staged. This also makes any overlap harmless.
            let staged: Vec<_> = (source..source + count).map(|index| self.view.load_index(index)).collect();

            for item in &staged {
                destination.view.check_admits(item)?;
            }

            for (offset, item) in staged.into_iter().enumerate() {
                destination.view.store_index(target + offset, item);
            }

            return Ok(());
        }

        let Some(direct) = self.overlap_offset(destination, source, target, count) else {
            for offset in 0..count {
                destination
                    .view
                    .store_index(target + offset, self.view.load_index(source + offset));
            }

            return Ok(());
        };

        // The destination starts `direct` elements into the source, so writing forward would
        // overwrite the source tail before it is read. That tail is read up front.
        let staged: Vec<_> = (source + direct..source + count)
            .map(|index| self.view.load_index(index))
            .collect();

        event!(
            Level::TRACE,
            message = "staged overlapping copy",
            source_index = source,
            destination_index = target,
            count,
            staged = staged.len()
        );
        COPY_STAGED_ELEMENTS.with(|x| x.observe(staged.len()));

        for offset in 0..direct {
            destination
                .view
                .store_index(target + offset, self.view.load_index(source + offset));
        }

        for (offset, item) in staged.into_iter().enumerate() {
            destination.view.store_index(target + direct + offset, item);
        }

        Ok(())
    }

    /// How many source elements precede the destination, when the destination starts strictly
    /// inside the `count` source elements at `source`.
    ///
    /// Compares element addresses, so views borrowed through different slice handles of one
    /// allocation are detected too.
    fn overlap_offset(
        &self,
        destination: &SequenceView<'_, S>,
        source: usize,
        target: usize,
        count: usize,
    ) -> Option<usize> {
        if count < 2 {
            return None;
        }

        let storage = self.view.storage();
        let first = storage.element_address(source);
        let stride = storage.element_address(source + 1).wrapping_sub(first);
        let start = destination.view.storage().element_address(target);

        if stride == 0 || start <= first {
            return None;
        }

        let offset = (start - first) / stride;
        (offset < count).then_some(offset)
    }

    /// Copies the first `destination.len()` elements of this sequence into a plain slice.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if the slice is
    /// longer than this sequence.
    pub fn copy_to_slice(&self, destination: &mut [S::Item]) -> Result<()> {
        self.view.check_range_between(0, destination.len())?;

        for (slot, index) in destination.iter_mut().zip(self.indexes()) {
            *slot = self.view.load_index(index);
        }

        Ok(())
    }

    /// Copies the elements into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<S::Item> {
        self.view.to_vec()
    }

    /// Copies the elements into newly allocated storage of the same kind.
    #[must_use]
    pub fn snapshot(&self) -> S::Owned {
        self.view.snapshot()
    }

    /// Copies the elements into newly allocated storage of the same kind with exactly `count`
    /// elements.
    ///
    /// The copy is truncated if `count` is shorter than the sequence and padded with default
    /// values if it is longer.
    #[must_use]
    pub fn snapshot_padded(&self, count: usize) -> S::Owned
    where
        S::Item: Default,
    {
        let mut items: Vec<_> = self.indexes().take(count).map(|index| self.view.load_index(index)).collect();
        items.resize_with(count, Default::default);

        self.view.storage().allocate(items)
    }

    /// A sequence view over the thumbs `[begin_thumb, end_thumb)` of this one, borrowing the
    /// same storage.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if the range is
    /// reversed or extends past the end of the sequence.
    pub fn sub_sequence(&self, begin_thumb: usize, end_thumb: usize) -> Result<Self> {
        Ok(Self::new(self.view.sub(begin_thumb, end_thumb)?))
    }

    /// A cursor over the elements, in order.
    #[must_use]
    pub fn iter(&self) -> SplittableCursor<'a, S, Elements> {
        self.view.cursor()
    }

    fn indexes(&self) -> std::ops::Range<usize> {
        self.view.begin_index()..self.view.end_index()
    }

    fn write_back(&self, items: Vec<S::Item>) {
        debug_assert_eq!(items.len(), self.len());

        for (index, item) in self.indexes().zip(items) {
            self.view.store_index(index, item);
        }
    }
}

impl<'a, S: ?Sized + Backing> From<BoundedView<'a, S>> for SequenceView<'a, S> {
    fn from(view: BoundedView<'a, S>) -> Self {
        Self::new(view)
    }
}

impl<'a, S: ?Sized + Backing> IntoIterator for SequenceView<'a, S> {
    type Item = S::Item;
    type IntoIter = SplittableCursor<'a, S, Elements>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: ?Sized + Backing> FixedCardinality for SequenceView<'_, S> {
    type Item = S::Item;
}

impl<S, T> PartialEq<SequenceView<'_, T>> for SequenceView<'_, S>
where
    S: ?Sized + Backing,
    T: ?Sized + Backing,
    S::Item: PartialEq<T::Item>,
{
    fn eq(&self, other: &SequenceView<'_, T>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<S> Eq for SequenceView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Eq,
{
}

impl<S, U> PartialEq<[U]> for SequenceView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == *b)
    }
}

impl<S, U, const N: usize> PartialEq<[U; N]> for SequenceView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        *self == other[..]
    }
}

impl<S, U> PartialEq<Vec<U>> for SequenceView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        *self == other[..]
    }
}

/// Hashes exactly like a slice holding the same elements.
impl<S> Hash for SequenceView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_vec().hash(state);
    }
}

impl<S> Debug for SequenceView<'_, S>
where
    S: ?Sized + Backing,
    S::Item: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

const STAGED_ELEMENT_BUCKETS: &[Magnitude] = &[1, 4, 16, 64, 256, 1024, 4096];

thread_local! {
    static COPY_STAGED_ELEMENTS: Event = Event::builder()
        .name("array_views_copy_staged_elements")
        .histogram(STAGED_ELEMENT_BUCKETS)
        .build();
}
