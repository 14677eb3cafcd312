// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use nm::{Event, Magnitude};
use tracing::{Level, event};

use crate::{Backing, BoundedView, Entry, Error, Result};

/// Selects what a [`SplittableCursor`] yields at each position, and how far it steps.
pub trait Projection<'a, S: ?Sized + Backing> {
    /// The number of storage elements consumed per step.
    const STRIDE: usize;

    /// The value yielded per step.
    type Item;

    /// Produces the value for the step starting at `index` of the storage.
    fn project(view: BoundedView<'a, S>, index: usize) -> Self::Item;
}

/// Yields every element. Stride 1.
#[derive(Debug)]
pub struct Elements;

/// Yields the keys of a paired view. Stride 2.
#[derive(Debug)]
pub struct Keys;

/// Yields the values of a paired view. Stride 2.
#[derive(Debug)]
pub struct Values;

/// Yields the entries of a paired view. Stride 2.
#[derive(Debug)]
pub struct Entries;

impl<'a, S: ?Sized + Backing> Projection<'a, S> for Elements {
    const STRIDE: usize = 1;
    type Item = S::Item;

    fn project(view: BoundedView<'a, S>, index: usize) -> S::Item {
        view.load_index(index)
    }
}

impl<'a, S: ?Sized + Backing> Projection<'a, S> for Keys {
    const STRIDE: usize = 2;
    type Item = S::Item;

    fn project(view: BoundedView<'a, S>, index: usize) -> S::Item {
        view.load_index(index)
    }
}

impl<'a, S: ?Sized + Backing> Projection<'a, S> for Values {
    const STRIDE: usize = 2;
    type Item = S::Item;

    fn project(view: BoundedView<'a, S>, index: usize) -> S::Item {
        view.load_index(index + 1)
    }
}

impl<'a, S: ?Sized + Backing + 'a> Projection<'a, S> for Entries {
    const STRIDE: usize = 2;
    type Item = Entry<'a, S>;

    fn project(view: BoundedView<'a, S>, index: usize) -> Entry<'a, S> {
        Entry::new(view.window(index, 2))
    }
}

/// A traversal over a view that can hand off half of its remaining range.
///
/// The cursor moves from the start of its range to the end in increasing index order. At any
/// point, [`try_split()`][Self::try_split] divides the remaining range into two halves that
/// differ in size by at most one step: the returned cursor takes the earlier half and this
/// cursor keeps the later half. Draining the earlier half and then the later half yields
/// exactly what draining the undivided cursor would have yielded.
///
/// Each half can be consumed on a different thread if the backing storage allows it (see
/// [`Backing`]); the cursor itself does no synchronization. With the `rayon` feature, cursors
/// are parallel iterators.
///
/// # Examples
///
/// ```
/// use array_views::{BoundedView, as_cells};
///
/// let mut data = [1, 2, 3, 4, 5];
/// let mut later = BoundedView::new(as_cells(&mut data)).cursor();
///
/// let earlier = later.try_split().unwrap();
///
/// assert_eq!(earlier.collect::<Vec<_>>(), vec![1, 2]);
/// assert_eq!(later.collect::<Vec<_>>(), vec![3, 4, 5]);
/// ```
pub struct SplittableCursor<'a, S: ?Sized, P> {
    view: BoundedView<'a, S>,
    cursor: usize,
    _projection: PhantomData<fn() -> P>,
}

impl<S: ?Sized, P> Clone for SplittableCursor<'_, S, P> {
    fn clone(&self) -> Self {
        Self {
            view: self.view,
            cursor: self.cursor,
            _projection: PhantomData,
        }
    }
}

impl<S: ?Sized + Backing, P> Debug for SplittableCursor<'_, S, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplittableCursor")
            .field("cursor", &self.cursor)
            .field("end", &self.view.end_index())
            .finish_non_exhaustive()
    }
}

impl<'a, S, P> SplittableCursor<'a, S, P>
where
    S: ?Sized + Backing,
    P: Projection<'a, S>,
{
    pub(crate) fn new(view: BoundedView<'a, S>) -> Self {
        debug_assert_eq!(view.len() % P::STRIDE, 0);

        Self {
            view,
            cursor: view.begin_index(),
            _projection: PhantomData,
        }
    }

    /// The exact number of steps left.
    #[must_use]
    pub fn estimate_remaining(&self) -> usize {
        (self.view.end_index() - self.cursor) / P::STRIDE
    }

    /// Whether every step has been taken.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.view.end_index()
    }

    /// Yields the value at the cursor and advances past it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Exhausted`][crate::ErrorKind::Exhausted] once no steps are left.
    pub fn try_next(&mut self) -> Result<P::Item> {
        if self.is_exhausted() {
            return Err(Error::exhausted());
        }

        let item = P::project(self.view, self.cursor);
        self.cursor += P::STRIDE;
        Ok(item)
    }

    /// Passes the value at the cursor to `visitor` and advances past it.
    ///
    /// Returns `false` without calling `visitor` once no steps are left.
    pub fn try_advance(&mut self, visitor: impl FnOnce(P::Item)) -> bool {
        match self.try_next() {
            Ok(item) => {
                visitor(item);
                true
            }
            Err(_) => false,
        }
    }

    /// Passes every remaining value to `visitor`, leaving the cursor exhausted.
    pub fn for_each_remaining(&mut self, mut visitor: impl FnMut(P::Item)) {
        let end = self.view.end_index();

        for index in (self.cursor..end).step_by(P::STRIDE) {
            visitor(P::project(self.view, index));
        }

        self.cursor = end;
    }

    /// Splits off the earlier half of the remaining range into a new cursor.
    ///
    /// This cursor keeps the later half. Returns `None` if fewer than two steps are left.
    #[must_use]
    pub fn try_split(&mut self) -> Option<Self> {
        let half = self.estimate_remaining() / 2;

        if half == 0 {
            return None;
        }

        let mid = self.cursor + half * P::STRIDE;

        event!(
            Level::TRACE,
            message = "cursor split",
            begin = self.cursor,
            mid,
            end = self.view.end_index()
        );
        CURSOR_SPLITS.with(|x| x.observe(half));

        let earlier = Self {
            view: self.view.window(self.cursor, mid - self.cursor),
            cursor: self.cursor,
            _projection: PhantomData,
        };

        self.cursor = mid;
        Some(earlier)
    }
}

impl<'a, S, P> Iterator for SplittableCursor<'a, S, P>
where
    S: ?Sized + Backing,
    P: Projection<'a, S>,
{
    type Item = P::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().ok()
    }

    #[cfg_attr(test, mutants::skip)] // Wrong hints only change allocation sizes, not results.
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.estimate_remaining();
        (remaining, Some(remaining))
    }

    fn count(self) -> usize {
        self.estimate_remaining()
    }

    fn for_each<F>(mut self, visitor: F)
    where
        F: FnMut(Self::Item),
    {
        self.for_each_remaining(visitor);
    }
}

impl<'a, S, P> ExactSizeIterator for SplittableCursor<'a, S, P>
where
    S: ?Sized + Backing,
    P: Projection<'a, S>,
{
}

impl<'a, S, P> FusedIterator for SplittableCursor<'a, S, P>
where
    S: ?Sized + Backing,
    P: Projection<'a, S>,
{
}

const SPLIT_HALF_BUCKETS: &[Magnitude] = &[1, 2, 8, 64, 512, 4096, 32768];

thread_local! {
    static CURSOR_SPLITS: Event = Event::builder()
        .name("array_views_cursor_splits")
        .histogram(SPLIT_HALF_BUCKETS)
        .build();
}
