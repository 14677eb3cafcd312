// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug, Formatter};
use std::ptr;

use crate::{Backing, Elements, Error, PairedMapView, Result, SequenceView, SplittableCursor};

/// A borrowed window `[begin, end)` over backing storage.
///
/// Positions inside the view are called *thumbs* and run from `0` to [`len()`][Self::len].
/// Positions inside the backing storage are called *indexes*. A thumb maps to the index
/// `begin + thumb`.
///
/// The view never copies its storage. Any number of views can borrow the same storage with
/// overlapping or disjoint ranges, and a write through one of them is visible through all the
/// others. The range of a view never changes after construction; narrower views are derived
/// with [`sub()`][Self::sub].
///
/// `BoundedView` is `Copy`, as it is just a reference and two positions.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
///
/// use array_views::BoundedView;
///
/// let storage: Vec<Cell<u32>> = (0..10).map(Cell::new).collect();
/// let whole = BoundedView::new(&storage[..]);
/// let middle = whole.sub(3, 6)?;
///
/// middle.sequence().set(0, 99)?;
///
/// assert_eq!(whole.sequence().get(3)?, 99);
/// assert_eq!(middle.len(), 3);
/// # Ok::<(), array_views::Error>(())
/// ```
pub struct BoundedView<'a, S: ?Sized> {
    storage: &'a S,
    begin: usize,
    end: usize,
}

impl<S: ?Sized> Clone for BoundedView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for BoundedView<'_, S> {}

impl<S: ?Sized> Debug for BoundedView<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedView")
            .field("begin", &self.begin)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

impl<'a, S: ?Sized + Backing> BoundedView<'a, S> {
    /// Creates a view over all of `storage`.
    #[must_use]
    pub fn new(storage: &'a S) -> Self {
        Self {
            storage,
            begin: 0,
            end: storage.len(),
        }
    }

    /// Creates a view over the indexes `[begin, end)` of `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if `begin > end` or
    /// `end` exceeds the length of the storage.
    pub fn with_range(storage: &'a S, begin: usize, end: usize) -> Result<Self> {
        let len = storage.len();

        if begin > end || end > len {
            return Err(Error::invalid_range(begin, end, len));
        }

        Ok(Self { storage, begin, end })
    }

    /// Creates a view over all of `storage`, failing if there is no storage.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingStorage`][crate::ErrorKind::MissingStorage] if `storage` is `None`.
    pub fn from_optional(storage: Option<&'a S>) -> Result<Self> {
        storage.map(Self::new).ok_or_else(Error::missing_storage)
    }

    /// The number of elements in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the view covers no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Translates a thumb into an index of the backing storage.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`][crate::ErrorKind::IndexOutOfRange] unless
    /// `thumb < self.len()`.
    pub fn to_index(&self, thumb: usize) -> Result<usize> {
        if thumb >= self.len() {
            return Err(Error::index_out_of_range(thumb, self.len()));
        }

        Ok(self.begin + thumb)
    }

    /// Translates an index of the backing storage into a thumb of this view.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`][crate::ErrorKind::IndexOutOfRange] unless the
    /// index falls inside the view.
    pub fn to_thumb(&self, index: usize) -> Result<usize> {
        if index < self.begin || index >= self.end {
            return Err(Error::index_out_of_range(index, self.storage.len()));
        }

        Ok(index - self.begin)
    }

    /// Validates that `begin_thumb` starts a range inside the view and returns the number of
    /// elements from there to the end of the view.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if `begin_thumb`
    /// exceeds the length of the view.
    pub fn check_range(&self, begin_thumb: usize) -> Result<usize> {
        self.check_range_between(begin_thumb, self.len())
    }

    /// Validates the thumb range `[begin_thumb, end_thumb)` and returns its length.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if the range is
    /// reversed or extends past the end of the view.
    pub fn check_range_between(&self, begin_thumb: usize, end_thumb: usize) -> Result<usize> {
        if begin_thumb > end_thumb || end_thumb > self.len() {
            return Err(Error::invalid_range(begin_thumb, end_thumb, self.len()));
        }

        Ok(end_thumb - begin_thumb)
    }

    /// Returns a view over the thumbs `[begin_thumb, end_thumb)` of this view.
    ///
    /// The new view borrows the same storage. Nothing is copied.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if the range is
    /// reversed or extends past the end of the view.
    pub fn sub(&self, begin_thumb: usize, end_thumb: usize) -> Result<Self> {
        self.check_range_between(begin_thumb, end_thumb)?;

        Ok(Self {
            storage: self.storage,
            begin: self.begin + begin_thumb,
            end: self.begin + end_thumb,
        })
    }

    /// Divides the view into `[0, thumb)` and `[thumb, len)`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRange`][crate::ErrorKind::InvalidRange] if `thumb` exceeds
    /// the length of the view.
    pub fn split_at(&self, thumb: usize) -> Result<(Self, Self)> {
        self.check_range(thumb)?;

        Ok((self.sub(0, thumb)?, self.sub(thumb, self.len())?))
    }

    /// Copies the elements of the view into newly allocated storage of the same kind.
    ///
    /// This is the only operation of a view that allocates.
    #[must_use]
    pub fn snapshot(&self) -> S::Owned {
        self.storage.allocate(self.to_vec())
    }

    /// Copies the elements of the view into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<S::Item> {
        (self.begin..self.end).map(|index| self.storage.load(index)).collect()
    }

    /// Whether the view covers exactly all of its backing storage.
    #[must_use]
    pub fn exposes_full_backing(&self) -> bool {
        self.begin == 0 && self.end == self.storage.len()
    }

    /// The backing storage, if the view covers all of it.
    ///
    /// Returns `None` for views over a strict sub-range, so that the storage handle cannot be
    /// used to reach elements outside the view.
    #[must_use]
    pub fn backing(&self) -> Option<&'a S> {
        self.exposes_full_backing().then_some(self.storage)
    }

    /// Whether `other` borrows storage that shares elements with this view's storage.
    ///
    /// Storages borrowed through different slice handles of one allocation count as the same
    /// storage when their elements overlap in memory.
    #[must_use]
    pub fn same_storage(&self, other: &BoundedView<'_, S>) -> bool {
        let (mine, theirs) = (self.storage, other.storage);
        if mine.is_empty() || theirs.is_empty() {
            return ptr::addr_eq(mine, theirs);
        }

        let mine_first = mine.element_address(0);
        let mine_last = mine.element_address(mine.len() - 1);
        let theirs_first = theirs.element_address(0);
        let theirs_last = theirs.element_address(theirs.len() - 1);

        mine_first <= theirs_last && theirs_first <= mine_last
    }

    /// A list-shaped view of the same range.
    #[must_use]
    pub fn sequence(self) -> SequenceView<'a, S> {
        SequenceView::new(self)
    }

    /// A map-shaped view of the same range, reading elements as alternating keys and values.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OddLength`][crate::ErrorKind::OddLength] if the view has an odd
    /// number of elements.
    pub fn paired(self) -> Result<PairedMapView<'a, S>> {
        PairedMapView::new(self)
    }

    /// A cursor over the elements of the view.
    #[must_use]
    pub fn cursor(self) -> SplittableCursor<'a, S, Elements> {
        SplittableCursor::new(self)
    }

    pub(crate) const fn storage(&self) -> &'a S {
        self.storage
    }

    pub(crate) const fn begin_index(&self) -> usize {
        self.begin
    }

    pub(crate) const fn end_index(&self) -> usize {
        self.end
    }

    pub(crate) fn load_index(&self, index: usize) -> S::Item {
        debug_assert!(index >= self.begin && index < self.end);

        self.storage.load(index)
    }

    pub(crate) fn store_index(&self, index: usize, item: S::Item) {
        debug_assert!(index >= self.begin && index < self.end);

        self.storage.store(index, item);
    }

    /// Fails unless the storage admits `item`.
    pub(crate) fn check_admits(&self, item: &S::Item) -> Result<()> {
        if self.storage.admits(item) {
            Ok(())
        } else {
            Err(Error::store_type(self.storage.kind()))
        }
    }

    /// A view over `[index, index + len)` of the storage, where the range is already known to
    /// lie within this view.
    pub(crate) fn window(&self, index: usize, len: usize) -> Self {
        debug_assert!(index >= self.begin && index + len <= self.end);

        Self {
            storage: self.storage,
            begin: index,
            end: index + len,
        }
    }
}
