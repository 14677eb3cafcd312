// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Zero-copy, fixed-size views over shared contiguous storage.
//!
//! A view is a window `[begin, end)` over storage that somebody else owns. Any number of views
//! can look at the same storage at once, with ranges that overlap or not, and a write through
//! one view is immediately visible through all the others. No view ever copies or reallocates
//! its storage, and no view can change how many elements it covers.
//!
//! Everything starts from a [`BoundedView`], which owns nothing but a reference to the storage
//! and two positions. From it you derive one of three façades:
//!
//! * [`SequenceView`] - list-shaped access: get, set, search, sort, fill, and copies between
//!   views that stay correct when source and destination overlap.
//! * [`PairedMapView`] - map-shaped access over an even-length range, where the element at
//!   thumb `2i` is a key and the element at thumb `2i + 1` is its value. Values of existing
//!   keys can change, but keys can never be added or removed.
//! * [`SplittableCursor`] - a traversal that can hand off half of its remaining range to
//!   another cursor, for divide-and-conquer and parallel processing.
//!
//! # Storage
//!
//! Views borrow storage through the [`Backing`] trait, which reads and writes one element at a
//! time through a shared reference. The storage kind decides what the views can do:
//!
//! * `[Cell<T>]` and `[RefCell<T>]` for single-threaded use. [`as_cells()`] turns any
//!   `&mut [T]` into cells without copying.
//! * Slices of the standard atomic types, which make views `Send` and `Sync` so that cursors
//!   can be consumed on many threads.
//! * [`Narrowed`] storage, which rejects values that fail an admission check. Bulk writes check
//!   every value before writing any, so a rejected write leaves the storage untouched.
//!
//! # Positions
//!
//! Positions relative to the start of a view are *thumbs*; positions in the storage are
//! *indexes*. Every public operation takes thumbs and validates them, returning an [`Error`]
//! rather than panicking when a thumb or range falls outside the view.
//!
//! # Example
//!
//! ```
//! use array_views::{BoundedView, as_cells};
//!
//! let mut data = [5, 50, 1, 10, 9, 3, 7];
//! let storage = as_cells(&mut data);
//!
//! let pairs = BoundedView::with_range(storage, 0, 4)?.paired()?;
//! let numbers = BoundedView::with_range(storage, 4, 7)?.sequence();
//!
//! numbers.sort();
//! pairs.put(1, 11)?;
//!
//! assert_eq!(numbers, [3, 7, 9]);
//! assert_eq!(pairs.get(&5), Some(50));
//! assert_eq!(data, [5, 50, 1, 11, 3, 7, 9]);
//! # Ok::<(), array_views::Error>(())
//! ```
//!
//! # Features
//!
//! * `rayon` - cursors over `Sync` storage implement `rayon::iter::IntoParallelIterator`.

#![doc(html_logo_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/array_views/logo.png")]
#![doc(html_favicon_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/array_views/favicon.ico")]

mod backing;
mod bounded;
mod cursor;
mod entry;
mod error;
mod fixed;
mod hash;
mod paired;
#[cfg(feature = "rayon")]
mod parallel;
mod search;
mod sequence;

pub use backing::{Backing, Narrowed, as_cells};
pub use bounded::BoundedView;
pub use cursor::{Elements, Entries, Keys, Projection, SplittableCursor, Values};
pub use entry::Entry;
pub use error::{Error, ErrorKind, Result};
pub use fixed::FixedCardinality;
pub use hash::{mapping_hash, pair_hash};
pub use paired::PairedMapView;
#[cfg(feature = "rayon")]
pub use parallel::ParCursor;
pub use search::SearchResult;
pub use sequence::SequenceView;
