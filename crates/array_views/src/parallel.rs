// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parallel traversal of cursors with `rayon`.

use std::fmt::{self, Debug, Formatter};

use rayon::iter::plumbing::{Folder, UnindexedConsumer, UnindexedProducer, bridge_unindexed};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{Backing, Projection, SplittableCursor};

/// A parallel iterator over the remaining range of a [`SplittableCursor`].
///
/// Work is divided with [`SplittableCursor::try_split()`], so every worker walks a contiguous
/// run of the storage. Results that rayon collects in order (such as with `collect()`) come out
/// in storage order.
///
/// The storage must be `Sync`, which in practice means the atomic storage kinds.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::AtomicU64;
///
/// use array_views::BoundedView;
/// use rayon::prelude::*;
///
/// let storage: Vec<AtomicU64> = (1..=100).map(AtomicU64::new).collect();
/// let view = BoundedView::new(&storage[..]);
///
/// let sum: u64 = view.cursor().into_par_iter().sum();
///
/// assert_eq!(sum, 5050);
/// ```
pub struct ParCursor<'a, S: ?Sized, P> {
    cursor: SplittableCursor<'a, S, P>,
}

impl<S: ?Sized + Backing, P> Debug for ParCursor<'_, S, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParCursor").field("cursor", &self.cursor).finish()
    }
}

impl<'a, S, P> IntoParallelIterator for SplittableCursor<'a, S, P>
where
    S: ?Sized + Backing + Sync,
    P: Projection<'a, S>,
    P::Item: Send,
{
    type Iter = ParCursor<'a, S, P>;
    type Item = P::Item;

    fn into_par_iter(self) -> Self::Iter {
        ParCursor { cursor: self }
    }
}

impl<'a, S, P> ParallelIterator for ParCursor<'a, S, P>
where
    S: ?Sized + Backing + Sync,
    P: Projection<'a, S>,
    P::Item: Send,
{
    type Item = P::Item;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge_unindexed(CursorProducer(self.cursor), consumer)
    }
}

struct CursorProducer<'a, S: ?Sized, P>(SplittableCursor<'a, S, P>);

impl<'a, S, P> UnindexedProducer for CursorProducer<'a, S, P>
where
    S: ?Sized + Backing + Sync,
    P: Projection<'a, S>,
    P::Item: Send,
{
    type Item = P::Item;

    fn split(mut self) -> (Self, Option<Self>) {
        match self.0.try_split() {
            // The split-off cursor covers the earlier half, which rayon expects on the left.
            Some(earlier) => (Self(earlier), Some(self)),
            None => (self, None),
        }
    }

    fn fold_with<F>(self, folder: F) -> F
    where
        F: Folder<Self::Item>,
    {
        folder.consume_iter(self.0)
    }
}
