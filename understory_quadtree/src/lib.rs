// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a dynamic 2D quadtree for broad-phase overlap queries.
//!
//! Understory Quadtree indexes items that move every frame, such as units in a simulation,
//! projectiles, or selection targets, and answers "what overlaps this region?" without
//! scanning every item.
//!
//! - Insert items once, then [`QuadTree::update`] them after they move or resize.
//! - Query by rectangle, by another item ("who overlaps me?"), by circle, or by any
//!   [`QueryShape`].
//! - Remove items in constant time through stable generational [`ItemId`] handles.
//!
//! Items only need to expose their axis-aligned rough bounds through [`RoughBounds`].
//! Overlap is *strict*: rectangles that merely share an edge or a corner do not overlap.
//! The tree is a broad phase only; exact shape tests on the returned candidates are up to
//! the caller.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_quadtree::{Config, QuadTree, region};
//!
//! #[derive(Debug)]
//! struct Unit {
//!     name: &'static str,
//!     bounds: Rect,
//! }
//!
//! impl understory_quadtree::RoughBounds for Unit {
//!     fn rough_bounds(&self) -> Rect {
//!         self.bounds
//!     }
//! }
//!
//! let config = Config::default().with_max_items_per_node(4);
//! let mut tree = QuadTree::with_config(region(0.0, 0.0, 200.0, 150.0), config);
//!
//! let tank = tree
//!     .insert(Unit { name: "tank", bounds: region(10.0, 10.0, 4.0, 4.0) })
//!     .unwrap();
//! let jeep = tree
//!     .insert(Unit { name: "jeep", bounds: region(20.0, 10.0, 2.0, 2.0) })
//!     .unwrap();
//!
//! // Nothing overlaps the tank yet.
//! assert_eq!(tree.find_intersecting_item(tank).count(), 0);
//!
//! // Drive the jeep into the tank and tell the tree about it.
//! tree.update_with(jeep, |u| u.bounds = region(12.0, 11.0, 2.0, 2.0)).unwrap();
//! let hits: Vec<_> = tree.find_intersecting_item(tank).map(|(_, u)| u.name).collect();
//! assert_eq!(hits, ["jeep"]);
//!
//! // Items outside the world are rejected and handed back.
//! let err = tree
//!     .insert(Unit { name: "plane", bounds: region(199.0, 0.0, 4.0, 4.0) })
//!     .unwrap_err();
//! assert_eq!(err.into_item().name, "plane");
//! ```
//!
//! ## Subdivision
//!
//! A node holds the items that do not fit entirely inside any single one of its four
//! quadrants. A leaf splits into quadrants the first time its bucket would exceed
//! [`Config::max_items_per_node`], unless it is already at [`Config::max_depth`]. Nodes
//! never merge back, so a tree that was busy once keeps its shape.
//!
//! ## Logging
//!
//! Subdivisions, rejections, and evictions are reported through [`tracing`] at `debug`
//! level, relocations on update at `trace` level. The crate never installs a subscriber.
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.
//!
//! ### Float semantics
//!
//! This crate assumes normalized rectangles and no NaNs. Debug builds may assert.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod node;
mod query;
mod tree;
mod types;

pub use config::{Config, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ITEMS_PER_NODE};
pub use error::{OutOfBounds, UpdateError};
pub use query::Intersecting;
pub use tree::{ItemId, QuadTree};
pub use types::{QueryShape, Region, RoughBounds, region};
