// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Backing storage kinds.
//!
//! A view never owns its storage. It borrows something that implements [`Backing`], which
//! describes how to read and write one element at a time through a shared reference. Writes
//! through one view are therefore immediately visible through every other view of the same
//! storage.

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug, Formatter};
use std::ptr;
use std::sync::atomic::{
    AtomicBool, AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicIsize, AtomicU8, AtomicU16, AtomicU32, AtomicU64,
    AtomicUsize, Ordering,
};

/// Contiguous storage that views can borrow and mutate through a shared reference.
///
/// Implementations exist for:
///
/// * `[Cell<T>]` where `T: Copy` - single-threaded storage of plain values.
/// * `[RefCell<T>]` where `T: Clone` - single-threaded storage of values that are not `Copy`.
/// * Slices of the standard atomic integer and boolean types - storage that can be shared
///   between threads, so views over it can be consumed in parallel.
/// * [`Narrowed`] - any of the above, restricted to values that pass an admission check.
///
/// Views validate every index before calling [`load()`][Backing::load] or
/// [`store()`][Backing::store], so implementations may panic on out-of-bounds access.
pub trait Backing {
    /// The value read from and written to each element.
    type Item;

    /// Owned storage of the same representation, produced by [`allocate()`][Backing::allocate].
    type Owned;

    /// The number of elements in the storage.
    fn len(&self) -> usize;

    /// Whether the storage holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the element at `index`.
    fn load(&self, index: usize) -> Self::Item;

    /// Overwrites the element at `index`.
    fn store(&self, index: usize, item: Self::Item);

    /// Whether `item` may be stored in this storage.
    ///
    /// Views check every value with this before writing anything.
    fn admits(&self, item: &Self::Item) -> bool {
        _ = item;
        true
    }

    /// Whether [`admits()`][Backing::admits] can reject values.
    fn is_narrowed(&self) -> bool {
        false
    }

    /// A human-readable name of the element kind this storage accepts.
    fn kind(&self) -> &'static str {
        type_name::<Self::Item>()
    }

    /// Allocates new storage of the same representation holding `items`.
    fn allocate(&self, items: Vec<Self::Item>) -> Self::Owned;

    /// The memory address of the element at `index`.
    ///
    /// Two storages alias each other exactly when some of their element addresses coincide,
    /// even when they were borrowed through different slice handles.
    fn element_address(&self, index: usize) -> usize;
}

/// Reinterprets a mutable slice as a slice of cells that views can share.
///
/// No elements are copied. The exclusive borrow of `slice` lasts as long as the returned cells.
///
/// # Examples
///
/// ```
/// use array_views::{BoundedView, as_cells};
///
/// let mut numbers = [3, 1, 2];
/// let view = BoundedView::new(as_cells(&mut numbers));
///
/// view.sequence().sort();
///
/// assert_eq!(numbers, [1, 2, 3]);
/// ```
pub fn as_cells<T>(slice: &mut [T]) -> &[Cell<T>] {
    Cell::from_mut(slice).as_slice_of_cells()
}

impl<T: Copy> Backing for [Cell<T>] {
    type Item = T;
    type Owned = Box<[Cell<T>]>;

    fn len(&self) -> usize {
        <[Cell<T>]>::len(self)
    }

    fn load(&self, index: usize) -> T {
        self[index].get()
    }

    fn store(&self, index: usize, item: T) {
        self[index].set(item);
    }

    fn allocate(&self, items: Vec<T>) -> Self::Owned {
        items.into_iter().map(Cell::new).collect()
    }

    fn element_address(&self, index: usize) -> usize {
        ptr::from_ref(&self[index]).addr()
    }
}

impl<T: Clone> Backing for [RefCell<T>] {
    type Item = T;
    type Owned = Box<[RefCell<T>]>;

    fn len(&self) -> usize {
        <[RefCell<T>]>::len(self)
    }

    fn load(&self, index: usize) -> T {
        self[index].borrow().clone()
    }

    fn store(&self, index: usize, item: T) {
        drop(self[index].replace(item));
    }

    fn allocate(&self, items: Vec<T>) -> Self::Owned {
        items.into_iter().map(RefCell::new).collect()
    }

    fn element_address(&self, index: usize) -> usize {
        ptr::from_ref(&self[index]).addr()
    }
}

macro_rules! atomic_backing {
    ($($atomic:ty => $scalar:ty),* $(,)?) => {
        $(
            impl Backing for [$atomic] {
                type Item = $scalar;
                type Owned = Box<[$atomic]>;

                fn len(&self) -> usize {
                    <[$atomic]>::len(self)
                }

                fn load(&self, index: usize) -> $scalar {
                    self[index].load(Ordering::Relaxed)
                }

                fn store(&self, index: usize, item: $scalar) {
                    self[index].store(item, Ordering::Relaxed);
                }

                fn allocate(&self, items: Vec<$scalar>) -> Self::Owned {
                    items.into_iter().map(<$atomic>::new).collect()
                }

                fn element_address(&self, index: usize) -> usize {
                    ptr::from_ref(&self[index]).addr()
                }
            }
        )*
    };
}

atomic_backing! {
    AtomicBool => bool,
    AtomicI8 => i8,
    AtomicI16 => i16,
    AtomicI32 => i32,
    AtomicI64 => i64,
    AtomicIsize => isize,
    AtomicU8 => u8,
    AtomicU16 => u16,
    AtomicU32 => u32,
    AtomicU64 => u64,
    AtomicUsize => usize,
}

/// Backing storage restricted to the values an admission check accepts.
///
/// Reads behave exactly like the wrapped storage. Writes of values the check rejects fail with
/// [`ErrorKind::StoreType`][crate::ErrorKind::StoreType] before anything is written.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
///
/// use array_views::{BoundedView, ErrorKind, Narrowed};
///
/// let storage = [Cell::new(1.0_f64), Cell::new(2.0)];
/// let finite = Narrowed::new(&storage[..], "finite f64", |x: &f64| x.is_finite());
/// let sequence = BoundedView::new(&finite).sequence();
///
/// let error = sequence.set(0, f64::NAN).unwrap_err();
/// assert!(matches!(error.kind(), ErrorKind::StoreType { kind: "finite f64" }));
/// assert_eq!(storage[0].get(), 1.0);
/// ```
pub struct Narrowed<'a, S: ?Sized, F> {
    inner: &'a S,
    kind: &'static str,
    admit: F,
}

impl<'a, S, F> Narrowed<'a, S, F>
where
    S: ?Sized + Backing,
    F: Fn(&S::Item) -> bool,
{
    /// Wraps `inner`, admitting only values for which `admit` returns `true`.
    ///
    /// `kind` names the admitted values in errors.
    pub const fn new(inner: &'a S, kind: &'static str, admit: F) -> Self {
        Self { inner, kind, admit }
    }

    /// The wrapped storage.
    #[must_use]
    pub const fn inner(&self) -> &'a S {
        self.inner
    }
}

impl<S: ?Sized, F> Debug for Narrowed<'_, S, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Narrowed").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl<S, F> Backing for Narrowed<'_, S, F>
where
    S: ?Sized + Backing,
    F: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Owned = S::Owned;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn load(&self, index: usize) -> Self::Item {
        self.inner.load(index)
    }

    fn store(&self, index: usize, item: Self::Item) {
        self.inner.store(index, item);
    }

    fn admits(&self, item: &Self::Item) -> bool {
        self.inner.admits(item) && (self.admit)(item)
    }

    fn is_narrowed(&self) -> bool {
        true
    }

    fn kind(&self) -> &'static str {
        self.kind
    }

    fn allocate(&self, items: Vec<Self::Item>) -> Self::Owned {
        self.inner.allocate(items)
    }

    fn element_address(&self, index: usize) -> usize {
        self.inner.element_address(index)
    }
}
