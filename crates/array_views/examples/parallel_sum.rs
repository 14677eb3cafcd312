// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Summing and rewriting shared atomic storage on many threads through splittable cursors.

use std::sync::atomic::AtomicU64;

use array_views::BoundedView;
use rayon::prelude::*;

fn main() {
    let storage: Vec<AtomicU64> = (1..=1_000_000).map(AtomicU64::new).collect();
    let view = BoundedView::new(&storage[..]);

    let sum: u64 = view.cursor().into_par_iter().sum();
    println!("sum of all elements: {sum}");

    // Treat the second half as key/value pairs and double every value in parallel.
    let (_, tail) = view.split_at(view.len() / 2).expect("the split point lies inside the view");
    let paired = tail.paired().expect("the tail has an even length");

    paired.entries().into_par_iter().for_each(|entry| {
        entry
            .set_value(entry.value() * 2)
            .expect("atomic storage admits every u64");
    });

    let doubled: u64 = paired.values().into_par_iter().sum();
    println!("sum of doubled values: {doubled}");

    // Work can also be divided by hand.
    let mut later = view.cursor();
    let earlier = later.try_split().expect("a million elements can be split");
    let (a, b) = rayon::join(|| earlier.sum::<u64>(), || later.sum::<u64>());
    println!("halves: {a} + {b} = {}", a + b);
}
