// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow] (attributes on macro invocations are ignored). Crate-level
// suppress is required for benchmark binaries using Criterion.
#![allow(missing_docs)]
//! Pair generation throughput.
//!
//! # Running
//!
//! ```sh
//! cargo bench --package upf-benches --bench pair_generation
//! ```
//!
//! # What This Measures
//!
//! - `random_N`: fresh random positions every iteration (worst case for bucket reuse)
//! - `moving_N`: objects step 0.2 units per iteration; cells mostly stay put
//! - `lattice`: dense n×n grid with a known pair count
//! - `worker_scaling`: one scene, sequential vs 1, 2, 4, 8 workers
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use upf_core::{DivisionState, HVSize, ParallelPhase, Series, SpatialDivision};
use upf_dry_tests::{move_objects, random_objects, uniform_lattice, TestObject, XorShift64};

const SEED: u64 = 0x0005_EED0_F0B1_EC75;

/// Runs one update and returns the number of callback invocations.
fn update_once(
    division: &mut SpatialDivision,
    objects: &mut [TestObject],
    cell: HVSize,
    pool: Option<&ParallelPhase>,
) -> u64 {
    let seen = AtomicU64::new(0);
    let mut series = Series::new(objects, cell);
    if division.state() == DivisionState::Uninitialized || division.len() != series.len() {
        division
            .initialize(&series, false)
            .expect("initialize succeeds");
    }
    division
        .update(&mut series, pool, |_, _| {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .expect("update succeeds");
    seen.into_inner()
}

fn pool_label(pool: Option<&ParallelPhase>) -> String {
    pool.map_or_else(|| "inline".to_owned(), |p| format!("{}w", p.num_jobs()))
}

fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("random");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(30);

    let cell = HVSize::new(3.0, 2.0);
    let pool = ParallelPhase::available();
    for &n in &[1_000usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        for pool in [None, Some(&pool)] {
            group.bench_with_input(BenchmarkId::new(pool_label(pool), n), &n, |b, &n| {
                let mut rng = XorShift64::new(SEED);
                let mut division = SpatialDivision::new();
                b.iter_batched(
                    || random_objects(&mut rng, n, 0.0..100.0, 0.0..100.0),
                    |mut objects| {
                        criterion::black_box(update_once(&mut division, &mut objects, cell, pool))
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_moving(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(30);

    let cell = HVSize::new(3.0, 2.0);
    let pool = ParallelPhase::available();
    for &n in &[10_000usize, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        for pool in [None, Some(&pool)] {
            group.bench_with_input(BenchmarkId::new(pool_label(pool), n), &n, |b, &n| {
                let mut rng = XorShift64::new(SEED);
                let mut objects = random_objects(&mut rng, n, 0.0..100.0, 0.0..100.0);
                let mut division = SpatialDivision::new();
                b.iter(|| {
                    let pairs = update_once(&mut division, &mut objects, cell, pool);
                    move_objects(&mut objects, &mut rng, 0.2);
                    criterion::black_box(pairs)
                });
            });
        }
    }
    group.finish();
}

fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice");
    group.sample_size(30);

    let cell = HVSize::uniform(2.0);
    let pool = ParallelPhase::available();
    for &per_line in &[100usize, 300] {
        let n = per_line * per_line;
        group.throughput(Throughput::Elements(n as u64));
        for pool in [None, Some(&pool)] {
            group.bench_with_input(
                BenchmarkId::new(pool_label(pool), per_line),
                &per_line,
                |b, &per_line| {
                    let mut objects = uniform_lattice(per_line, cell);
                    let mut division = SpatialDivision::new();
                    b.iter(|| {
                        criterion::black_box(update_once(&mut division, &mut objects, cell, pool))
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_scaling_100k");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(30)
        .throughput(Throughput::Elements(100_000));

    let cell = HVSize::new(3.0, 2.0);
    let mut rng = XorShift64::new(SEED);
    let scene = random_objects(&mut rng, 100_000, 0.0..100.0, 0.0..100.0);
    for &workers in &[1usize, 2, 4, 8] {
        let pool = ParallelPhase::new(workers);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &pool, |b, pool| {
            let mut objects = scene.clone();
            let mut division = SpatialDivision::new();
            b.iter(|| {
                criterion::black_box(update_once(&mut division, &mut objects, cell, Some(pool)))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_random,
    bench_moving,
    bench_lattice,
    bench_worker_scaling
);
criterion_main!(benches);
