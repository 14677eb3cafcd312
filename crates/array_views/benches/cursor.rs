// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![expect(missing_docs, reason = "Benchmark code")]

use std::alloc::System;
use std::cell::Cell;
use std::hint::black_box;

use alloc_tracker::{Allocator, Session};
use array_views::BoundedView;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<System> = Allocator::system();

const LEN: u64 = 4096;

fn entrypoint(c: &mut Criterion) {
    let allocs = Session::new();

    let storage: Vec<Cell<u64>> = (0..LEN).map(Cell::new).collect();
    let view = BoundedView::new(&storage[..]);
    let sequence = view.sequence();
    let paired = view.paired().unwrap();

    let mut group = c.benchmark_group("SplittableCursor");

    let allocs_op = allocs.operation("drain");
    group.bench_function("drain", |b| {
        b.iter(|| {
            let _span = allocs_op.measure_thread();
            black_box(view).cursor().fold(0_u64, u64::wrapping_add)
        });
    });

    let allocs_op = allocs.operation("split_recursively");
    group.bench_function("split_recursively", |b| {
        b.iter(|| {
            let _span = allocs_op.measure_thread();
            let mut pending = vec![black_box(view).cursor()];
            let mut pieces = 0_usize;

            while let Some(mut later) = pending.pop() {
                match later.try_split() {
                    Some(earlier) => {
                        pending.push(later);
                        pending.push(earlier);
                    }
                    None => pieces += 1,
                }
            }

            pieces
        });
    });

    let allocs_op = allocs.operation("paired_values");
    group.bench_function("paired_values", |b| {
        b.iter(|| {
            let _span = allocs_op.measure_thread();
            black_box(paired).values().fold(0_u64, u64::wrapping_add)
        });
    });

    group.finish();

    let mut group = c.benchmark_group("SequenceView");

    let allocs_op = allocs.operation("copy_into_overlapping");
    group.bench_function("copy_into_overlapping", |b| {
        b.iter(|| {
            let _span = allocs_op.measure_thread();
            sequence.copy_into(black_box(&sequence), 1, sequence.len() - 1).unwrap();
        });
    });

    let allocs_op = allocs.operation("copy_into_disjoint");
    let (front, back) = view.split_at(view.len() / 2).unwrap();
    group.bench_function("copy_into_disjoint", |b| {
        b.iter(|| {
            let _span = allocs_op.measure_thread();
            front.sequence().copy_into(black_box(&back.sequence()), 0, front.len()).unwrap();
        });
    });

    let allocs_op = allocs.operation("sort");
    group.bench_function("sort", |b| {
        b.iter_batched(
            || sequence.set_all(|thumb| (thumb as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)).unwrap(),
            |()| {
                let _span = allocs_op.measure_thread();
                sequence.sort();
            },
            BatchSize::SmallInput,
        );
    });

    let allocs_op = allocs.operation("search");
    group.bench_function("search", |b| {
        b.iter_batched(
            || sequence.set_all(|thumb| thumb as u64).unwrap(),
            |()| {
                let _span = allocs_op.measure_thread();
                sequence.search(black_box(&(LEN / 3)))
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();

    allocs.print_to_stdout();
}
