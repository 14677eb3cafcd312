// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The result for fallible operations on array views.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by an array view operation.
///
/// Every error signals caller misuse of a fixed-size view: a position outside the view, a
/// mapping operation that would change the number of pairs, a value the storage cannot hold.
/// Operations that fail leave the backing storage untouched.
///
/// Use [`Error::kind()`] to find out what went wrong.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
///
/// use array_views::{BoundedView, ErrorKind};
///
/// let storage = [Cell::new(1), Cell::new(2), Cell::new(3)];
/// let error = BoundedView::with_range(&storage[..], 2, 1).unwrap_err();
///
/// assert!(matches!(error.kind(), ErrorKind::InvalidRange { begin: 2, end: 1, len: 3 }));
/// ```
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] ErrorKind);

/// The kinds of [`Error`] an array view operation can raise.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A position does not fall inside the view.
    #[error("position {thumb} is out of range for a view of length {len}")]
    IndexOutOfRange {
        /// The offending position.
        thumb: usize,
        /// The length of the coordinate space the position was checked against.
        len: usize,
    },

    /// A `[begin, end)` pair is reversed or extends past the end of its coordinate space.
    #[error("range {begin}..{end} is invalid for a length of {len}")]
    InvalidRange {
        /// Start of the requested range.
        begin: usize,
        /// End of the requested range (exclusive).
        end: usize,
        /// The length of the coordinate space the range was checked against.
        len: usize,
    },

    /// A paired map view was requested over a view of odd length.
    #[error("a paired view needs an even number of elements but the view has {len}")]
    OddLength {
        /// The length of the rejected view.
        len: usize,
    },

    /// A paired map view was asked to act on a key it does not contain.
    ///
    /// Paired views cannot grow, so keys are never inserted.
    #[error("key not found and a paired view cannot insert new keys")]
    KeyNotFound,

    /// A value was rejected by type-narrowed backing storage.
    #[error("value cannot be stored in backing storage of kind {kind}")]
    StoreType {
        /// The element kind the storage accepts.
        kind: &'static str,
    },

    /// An operation would change the number of elements of a fixed-size view.
    #[error("{operation} is not supported because the view has a fixed size")]
    UnsupportedStructuralChange {
        /// The rejected operation.
        operation: &'static str,
    },

    /// A cursor was advanced after it ran out of elements.
    #[error("cursor has no remaining elements")]
    Exhausted,

    /// A view was constructed without backing storage.
    #[error("backing storage is required")]
    MissingStorage,
}

impl Error {
    /// What went wrong.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub(crate) const fn index_out_of_range(thumb: usize, len: usize) -> Self {
        Self(ErrorKind::IndexOutOfRange { thumb, len })
    }

    pub(crate) const fn invalid_range(begin: usize, end: usize, len: usize) -> Self {
        Self(ErrorKind::InvalidRange { begin, end, len })
    }

    pub(crate) const fn odd_length(len: usize) -> Self {
        Self(ErrorKind::OddLength { len })
    }

    pub(crate) const fn key_not_found() -> Self {
        Self(ErrorKind::KeyNotFound)
    }

    pub(crate) const fn store_type(kind: &'static str) -> Self {
        Self(ErrorKind::StoreType { kind })
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        Self(ErrorKind::UnsupportedStructuralChange { operation })
    }

    pub(crate) const fn exhausted() -> Self {
        Self(ErrorKind::Exhausted)
    }

    pub(crate) const fn missing_storage() -> Self {
        Self(ErrorKind::MissingStorage)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);
    }

    #[test]
    fn kind_is_preserved() {
        let error = Error::odd_length(5);

        assert_eq!(error.kind(), &ErrorKind::OddLength { len: 5 });
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::index_out_of_range(7, 3).to_string(),
            "position 7 is out of range for a view of length 3"
        );
        assert_eq!(Error::invalid_range(4, 2, 10).to_string(), "range 4..2 is invalid for a length of 10");
        assert_eq!(
            Error::store_type("finite f64").to_string(),
            "value cannot be stored in backing storage of kind finite f64"
        );
        assert_eq!(
            Error::unsupported("clear").to_string(),
            "clear is not supported because the view has a fixed size"
        );
        assert_eq!(Error::exhausted().to_string(), "cursor has no remaining elements");
        assert_eq!(Error::missing_storage().to_string(), "backing storage is required");
        assert_eq!(
            Error::key_not_found().to_string(),
            "key not found and a paired view cannot insert new keys"
        );
    }

    #[test]
    fn converts_from_kind() {
        let error: Error = ErrorKind::Exhausted.into();

        assert_eq!(error.kind(), &ErrorKind::Exhausted);
    }
}
