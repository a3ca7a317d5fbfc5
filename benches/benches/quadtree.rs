// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for quadtree insertion, per-frame updates, and overlap queries.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_benches::{WORLD, grid_units, populated};
use understory_quadtree::{Config, ItemId, region};

const SIZES: [u32; 3] = [1_000, 5_000, 20_000];

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_insert");
    for n in SIZES {
        let units = grid_units(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &units, |b, units| {
            b.iter(|| black_box(populated(units, Config::default())));
        });
    }
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_update_all");
    for n in SIZES {
        let units = grid_units(n);
        let mut tree = populated(&units, Config::default());
        let ids: Vec<ItemId> = tree.iter().map(|(id, _)| id).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let jitter: Vec<Vec2> = (0..ids.len())
            .map(|_| Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
            .collect();
        let mut sign = 1.0;
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                // Alternate direction so units wander but stay inside the world.
                sign = -sign;
                for (&id, &d) in ids.iter().zip(&jitter) {
                    tree.update_with(id, |(r, _)| *r = *r + d * sign)
                        .expect("bench units stay inside the world");
                }
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let units = grid_units(20_000);
    let tree = populated(&units, Config::default());
    let ids: Vec<ItemId> = tree.iter().map(|(id, _)| id).take(256).collect();

    c.bench_function("quadtree_find_intersecting_region", |b| {
        let query = region(WORLD.0 * 0.25, WORLD.1 * 0.25, WORLD.0 * 0.1, WORLD.1 * 0.1);
        b.iter(|| black_box(tree.find_intersecting(black_box(query)).count()));
    });

    c.bench_function("quadtree_find_intersecting_item_256", |b| {
        b.iter(|| {
            let mut hits = 0;
            for &id in &ids {
                hits += tree.find_intersecting_item(id).count();
            }
            black_box(hits)
        });
    });

    c.bench_function("quadtree_find_within_radius", |b| {
        let center = Point::new(WORLD.0 * 0.5, WORLD.1 * 0.5);
        b.iter(|| black_box(tree.find_within_radius(center, black_box(25.0)).count()));
    });
}

fn bench_brute_force_baseline(c: &mut Criterion) {
    use understory_quadtree::Region;

    let units = grid_units(20_000);
    let query = region(WORLD.0 * 0.25, WORLD.1 * 0.25, WORLD.0 * 0.1, WORLD.1 * 0.1);
    c.bench_function("brute_force_find_intersecting_region", |b| {
        b.iter(|| {
            black_box(
                units
                    .iter()
                    .filter(|(r, _)| r.overlaps_strictly(black_box(&query)))
                    .count(),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_update,
    bench_query,
    bench_brute_force_baseline
);
criterion_main!(benches);
