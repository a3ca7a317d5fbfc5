// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the quadtree benchmarks.

use kurbo::Rect;
use understory_quadtree::{Config, QuadTree, region};

/// Side lengths of the benchmark world.
pub const WORLD: (f64, f64) = (1000.0, 750.0);

/// A unit in the benchmark world: its bounds and a payload index.
pub type Unit = (Rect, u32);

/// Distance kept between every unit and the world edge.
const MARGIN: f64 = 5.0;

/// Lay `n` small squares out on a staggered grid covering the world.
///
/// Units stay a few units away from the world edge, so small per-frame moves never evict them.
pub fn grid_units(n: u32) -> Vec<Unit> {
    let cols = 100_u32;
    let pitch = (WORLD.0 - 4.0 * MARGIN) / f64::from(cols);
    (0..n)
        .map(|i| {
            let x = MARGIN + f64::from(i % cols) * pitch + f64::from(i % 3);
            let y = MARGIN + (f64::from(i / cols) * 7.0) % (WORLD.1 - 4.0 * MARGIN);
            (region(x, y, 4.0, 4.0), i)
        })
        .collect()
}

/// A tree over the benchmark world holding `units`.
pub fn populated(units: &[Unit], config: Config) -> QuadTree<Unit> {
    let mut tree = QuadTree::with_config(region(0.0, 0.0, WORLD.0, WORLD.1), config);
    tree.reserve(units.len());
    for &unit in units {
        tree.insert(unit)
            .expect("bench units stay inside the world");
    }
    tree
}
