// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "test code")]

//! Property tests comparing views against plain `Vec` operations.

use std::cell::Cell;

use array_views::{BoundedView, Elements, SearchResult, SplittableCursor};
use proptest::prelude::*;

fn cells(values: &[i32]) -> Vec<Cell<i32>> {
    values.iter().copied().map(Cell::new).collect()
}

/// Interleaves splits and single steps as `choices` dictates, then drains every piece from
/// earliest to latest.
fn drain_split(cursor: SplittableCursor<'_, [Cell<i32>], Elements>, choices: &[bool]) -> Vec<i32> {
    let Some((&split_here, rest)) = choices.split_first() else {
        return cursor.collect();
    };

    let mut later = cursor;
    if split_here {
        if let Some(earlier) = later.try_split() {
            let mut items = drain_split(earlier, rest);
            items.extend(drain_split(later, rest));
            return items;
        }
    }

    let mut items = Vec::new();
    if let Some(first) = later.next() {
        items.push(first);
    }
    items.extend(drain_split(later, rest));
    items
}

fn range_of(len: usize, a: usize, b: usize) -> (usize, usize) {
    let (a, b) = (a % (len + 1), b % (len + 1));
    (a.min(b), a.max(b))
}

proptest! {
    #[test]
    fn prop_split_pieces_concatenate_to_sequential_order(
        values in prop::collection::vec(any::<i32>(), 0..64),
        a in any::<usize>(),
        b in any::<usize>(),
        choices in prop::collection::vec(any::<bool>(), 0..8),
    ) {
        let storage = cells(&values);
        let (begin, end) = range_of(values.len(), a, b);
        let view = BoundedView::with_range(&storage[..], begin, end).unwrap();

        prop_assert_eq!(drain_split(view.cursor(), &choices), values[begin..end].to_vec());
    }

    #[test]
    fn prop_split_halves_are_balanced(
        len in 0_usize..200,
        consumed in 0_usize..200,
    ) {
        let storage: Vec<Cell<usize>> = (0..len).map(Cell::new).collect();
        let mut later = BoundedView::new(&storage[..]).cursor();
        for _ in 0..consumed.min(len) {
            _ = later.next();
        }

        let remaining = later.estimate_remaining();
        match later.try_split() {
            Some(earlier) => {
                prop_assert!(remaining >= 2);
                prop_assert_eq!(earlier.estimate_remaining() + later.estimate_remaining(), remaining);
                prop_assert!(later.estimate_remaining() - earlier.estimate_remaining() <= 1);
            }
            None => prop_assert!(remaining < 2),
        }
    }

    #[test]
    fn prop_copy_matches_copy_within(
        values in prop::collection::vec(any::<i32>(), 1..48),
        source in any::<usize>(),
        target in any::<usize>(),
        count in any::<usize>(),
    ) {
        let len = values.len();
        let source = source % len;
        let target = target % len;
        let count = count % (len - source.max(target) + 1);

        let mut expected = values.clone();
        expected.copy_within(source..source + count, target);

        let storage = cells(&values);
        let whole = BoundedView::new(&storage[..]).sequence();
        let from = whole.sub_sequence(source, len).unwrap();

        from.copy_into(&whole, target, count).unwrap();

        prop_assert_eq!(whole.to_vec(), expected);
    }

    #[test]
    fn prop_copy_between_slice_handles_matches_copy_within(
        values in prop::collection::vec(any::<i32>(), 1..48),
        source in any::<usize>(),
        target in any::<usize>(),
        count in any::<usize>(),
    ) {
        let len = values.len();
        let source = source % len;
        let target = target % len;
        let count = count % (len - source.max(target) + 1);

        let mut expected = values.clone();
        expected.copy_within(source..source + count, target);

        let storage = cells(&values);
        let from = BoundedView::new(&storage[source..]).sequence();
        let to = BoundedView::new(&storage[target..]).sequence();

        from.copy_into(&to, 0, count).unwrap();

        prop_assert_eq!(BoundedView::new(&storage[..]).to_vec(), expected);
    }

    #[test]
    fn prop_sort_then_search_agrees_with_slices(
        mut values in prop::collection::vec(-50_i32..50, 0..40),
        needle in -60_i32..60,
    ) {
        let storage = cells(&values);
        let sequence = BoundedView::new(&storage[..]).sequence();

        sequence.sort();
        values.sort_unstable();

        prop_assert_eq!(sequence.to_vec(), values.clone());

        match sequence.search(&needle) {
            SearchResult::Found(thumb) => prop_assert_eq!(values[thumb], needle),
            SearchResult::Vacant(thumb) => {
                prop_assert!(!values.contains(&needle));
                prop_assert_eq!(thumb, values.partition_point(|x| *x < needle));
            }
        }
    }

    #[test]
    fn prop_paired_view_equals_equivalent_map(
        values in prop::collection::btree_map(any::<i32>(), any::<i32>(), 0..20),
    ) {
        let flat: Vec<i32> = values.iter().flat_map(|(k, v)| [*k, *v]).collect();
        let storage = cells(&flat);
        let paired = BoundedView::new(&storage[..]).paired().unwrap();

        prop_assert_eq!(paired.len(), values.len());
        prop_assert!(paired == values);
        prop_assert_eq!(paired.mapping_hash(), array_views::mapping_hash(&values));
    }
}
