//! Criterion benchmarks for distance matrices and nearest queries.
//! Focus sizes: n in {10, 100, 500}.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use pointfield::prelude::*;

fn uniform(n: usize, index: u64) -> PointSet {
    Layout::Uniform(UniformParams {
        count: PointCount(n),
        ..UniformParams::default()
    })
    .sample(ReplayToken::new(43, index))
    .unwrap()
}

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance");
    for &n in &[10usize, 100, 500] {
        group.bench_with_input(BenchmarkId::new("pairwise", n), &n, |b, &n| {
            b.iter_batched(
                || uniform(n, 0),
                |s| {
                    let _m = pairwise(&s);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("cross", n), &n, |b, &n| {
            b.iter_batched(
                || (uniform(n, 1), uniform(n, 2)),
                |(a, s)| {
                    let _m = cross(&a, &s);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("column_minima", n), &n, |b, &n| {
            b.iter_batched(
                || cross(&uniform(n, 3), &uniform(n, 4)),
                |m| {
                    let _v = minima(&m, Axis::Column).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");
    let extent = Extent::square(-1.0, 11.0).unwrap();
    let reference = uniform(10, 5);
    for &res in &[50usize, 100] {
        group.bench_with_input(BenchmarkId::new("to_set", res), &res, |b, &res| {
            b.iter(|| DistanceField::to_set(extent, GridShape::new(res, res), &reference).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_distance, bench_field);
criterion_main!(benches);
