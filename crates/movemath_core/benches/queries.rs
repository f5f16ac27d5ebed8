//! Query benchmarks for movemath_core.
//!
//! Run with: `cargo bench -p movemath_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use movemath_core::prelude::*;
use movemath_test_utils::fixtures::{coast_terrain, sample_registry, square_center, TestWorld};

fn bench_world() -> TestWorld {
    let mut world = TestWorld::with_terrain(coast_terrain(256, 256, -60.0));
    for i in 0..64 {
        let x = (i * 37) % 256;
        let z = (i * 91) % 256;
        world.add_structure(CellRect::around(Cell::new(x, z), 2, 2));
        world.add_unit((x + 5) % 256, z, Motion::Moving);
    }
    world
}

/// Long diagonal line walks for every sample move def.
pub fn raw_search_benchmark(c: &mut Criterion) {
    let registry = sample_registry();
    let world = bench_world();
    let query = LineQuery::new(square_center(4, 4), square_center(250, 200));
    let mut group = c.benchmark_group("raw_search");

    for def in registry.all() {
        let collider = Collider::new(None, if def.follow_ground { 20.0 } else { -10.0 }, 20.0);
        group.bench_with_input(BenchmarkId::from_parameter(&def.name), def, |b, def| {
            let mut scratch = QueryScratch::new();
            b.iter(|| raw_search(&world.ctx(), def, &collider, black_box(&query), &mut scratch));
        });
    }
    group.finish();
}

/// Box queries of growing size.
pub fn range_benchmark(c: &mut Criterion) {
    let registry = sample_registry();
    let world = bench_world();
    let Ok(def) = registry.find("tank3") else {
        return;
    };
    let collider = Collider::new(None, 20.0, 20.0);
    let mut group = c.benchmark_group("test_move_square_range");

    for size in [1, 4, 16] {
        let query = RangeQuery::new(square_center(10, 10), square_center(10 + size, 10 + size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &query, |b, query| {
            b.iter(|| test_move_square_range(&world.ctx(), def, &collider, black_box(query)));
        });
    }
    group.finish();
}

criterion_group!(benches, raw_search_benchmark, range_benchmark);
criterion_main!(benches);
