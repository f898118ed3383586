//! Benchmarks for per-frame field updates, neighbor queries and culling.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vecflow::prelude::*;

fn full_hd_grid() -> Vec<VectorItem> {
    vecflow::demo_grid(1920.0, 1080.0, 20.0)
}

fn bench_update_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_frame");
    let vectors = full_hd_grid();

    for field in [
        FieldType::SmoothWaves,
        FieldType::Vortex,
        FieldType::PerlinFlow,
        FieldType::RandomLoop,
        FieldType::Flocking,
    ] {
        let settings = AnimationSettings::new(field, 1920.0, 1080.0);
        group.bench_with_input(BenchmarkId::from_parameter(field), &settings, |b, settings| {
            let mut animator = Animator::new();
            let mut time = 0.0;
            b.iter(|| {
                time += 16.0;
                black_box(animator.update_frame(&vectors, time, settings))
            })
        });
    }

    group.finish();
}

fn bench_spatial_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_query");
    let vectors = full_hd_grid();

    for radius in [30.0, 60.0, 120.0] {
        let mut grid = SpatialGrid::new(radius, 1920.0, 1080.0);
        for v in &vectors {
            grid.insert(v.id, v.position());
        }
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| black_box(grid.query(DVec2::new(960.0, 540.0), radius)))
        });
    }

    group.bench_function("rebuild", |b| {
        b.iter(|| {
            let mut grid = SpatialGrid::new(60.0, 1920.0, 1080.0);
            for v in &vectors {
                grid.insert(v.id, v.position());
            }
            black_box(grid.len())
        })
    });

    group.finish();
}

fn bench_culling(c: &mut Criterion) {
    let mut group = c.benchmark_group("culling");
    let vectors = full_hd_grid();

    // Viewport smaller than the grid so culling rejects a real share.
    for (label, lod) in [("cull_only", false), ("cull_and_lod", true)] {
        let opts = CullingOptions {
            lod,
            ..Default::default()
        };
        group.bench_function(label, |b| {
            b.iter(|| black_box(apply_culling(&vectors, 1280.0, 720.0, &opts)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update_frame, bench_spatial_query, bench_culling);
criterion_main!(benches);
