// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;

/// The outcome of a binary search over a sorted sequence view.
///
/// Missing elements are an expected outcome of a search, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchResult {
    /// An element equal to the target sits at this thumb.
    ///
    /// If several elements are equal to the target, any one of them may be reported.
    Found(usize),

    /// No element is equal to the target; inserting it at this thumb would keep the
    /// sequence sorted.
    Vacant(usize),
}

impl SearchResult {
    /// The thumb of the matching element, if one was found.
    #[must_use]
    pub const fn found(self) -> Option<usize> {
        match self {
            Self::Found(thumb) => Some(thumb),
            Self::Vacant(_) => None,
        }
    }

    /// The thumb of the match, or where the target would be inserted.
    #[must_use]
    pub const fn thumb(self) -> usize {
        match self {
            Self::Found(thumb) | Self::Vacant(thumb) => thumb,
        }
    }

    /// Converts into the shape returned by [`slice::binary_search`].
    ///
    /// # Errors
    ///
    /// Returns the insertion point as the error value when nothing matched.
    pub const fn into_result(self) -> Result<usize, usize> {
        match self {
            Self::Found(thumb) => Ok(thumb),
            Self::Vacant(insertion_point) => Err(insertion_point),
        }
    }

    /// The result as a single signed integer.
    ///
    /// A match encodes as its thumb. A miss encodes as `-(insertion_point) - 1`, which is
    /// always negative. Values that do not fit in an `isize` are clamped to `isize::MAX` and
    /// `isize::MIN` respectively.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_views::SearchResult;
    ///
    /// assert_eq!(SearchResult::Found(2).encoded(), 2);
    /// assert_eq!(SearchResult::Vacant(2).encoded(), -3);
    /// assert_eq!(SearchResult::Vacant(usize::MAX).encoded(), isize::MIN);
    /// ```
    #[must_use]
    pub fn encoded(self) -> isize {
        match self {
            Self::Found(thumb) => isize::try_from(thumb).unwrap_or(isize::MAX),
            Self::Vacant(insertion_point) => isize::try_from(insertion_point)
                .ok()
                .and_then(|point| point.checked_neg())
                .and_then(|negated| negated.checked_sub(1))
                .unwrap_or(isize::MIN),
        }
    }
}

/// Binary search over `[low, high)` of some indexed collection.
///
/// `compare` orders the element at an index relative to the target.
pub(crate) fn binary_search(mut low: usize, mut high: usize, mut compare: impl FnMut(usize) -> Ordering) -> SearchResult {
    let base = low;

    while low < high {
        let mid = low + (high - low) / 2;

        match compare(mid) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return SearchResult::Found(mid - base),
        }
    }

    SearchResult::Vacant(low - base)
}
