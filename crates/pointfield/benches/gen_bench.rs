//! Criterion microbenches for the point layouts.
//!
//! - random layouts: uniform, annulus band, line (1000 points per draw);
//! - grid: 100 × 100.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use pointfield::prelude::*;

fn bench_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("layouts");
    let n = PointCount(1000);
    let layouts = [
        Layout::Uniform(UniformParams {
            count: n,
            ..UniformParams::default()
        }),
        Layout::Annulus(AnnulusParams::band(n)),
        Layout::Line(LineParams {
            count: n,
            ..LineParams::default()
        }),
        Layout::Grid(GridParams {
            shape: GridShape::new(100, 100),
            x_max: 10.0,
            y_max: 10.0,
        }),
    ];
    for layout in layouts {
        group.bench_function(BenchmarkId::new("generate_next", layout.kind()), |b| {
            b.iter_batched(
                || LayoutGenerator::new(layout, 2025).unwrap(),
                |mut gen| {
                    let _s = gen.generate_next();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layouts);
criterion_main!(benches);
