// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Error, Result};

/// Operations that would change the number of elements of a collection.
///
/// Views cover a range of storage fixed at construction, so none of these operations can
/// succeed. They exist so that code written against growable collections gets a clear
/// [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange]
/// instead of silently doing nothing.
pub trait FixedCardinality {
    /// The element type the operations would add or remove.
    type Item;

    /// Appends an element. Always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange].
    fn push(&self, item: Self::Item) -> Result<()> {
        drop(item);
        Err(Error::unsupported("push"))
    }

    /// Inserts an element at a position. Always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange].
    fn insert_at(&self, thumb: usize, item: Self::Item) -> Result<()> {
        _ = thumb;
        drop(item);
        Err(Error::unsupported("insert"))
    }

    /// Removes the element at a position. Always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange].
    fn remove_at(&self, thumb: usize) -> Result<Self::Item> {
        _ = thumb;
        Err(Error::unsupported("remove"))
    }

    /// Removes all elements. Always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`ErrorKind::UnsupportedStructuralChange`][crate::ErrorKind::UnsupportedStructuralChange].
    fn clear(&self) -> Result<()> {
        Err(Error::unsupported("clear"))
    }
}
