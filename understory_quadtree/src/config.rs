// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subdivision thresholds.

/// Default bucket capacity of a leaf before it subdivides.
pub const DEFAULT_MAX_ITEMS_PER_NODE: usize = 8;

/// Default maximum node depth. The root has depth 0.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Subdivision policy of a [`QuadTree`][crate::QuadTree].
///
/// A leaf subdivides the first time its bucket would grow past `max_items_per_node`,
/// unless it already sits at `max_depth`. Leaves at `max_depth` grow without bound.
///
/// ```
/// use understory_quadtree::Config;
///
/// let config = Config::default().with_max_items_per_node(2).with_max_depth(4);
/// assert_eq!(config.max_items_per_node, 2);
/// assert_eq!(config.max_depth, 4);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of items a leaf holds before the next insert subdivides it.
    pub max_items_per_node: usize,
    /// Deepest level at which nodes are created.
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items_per_node: DEFAULT_MAX_ITEMS_PER_NODE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Set the leaf capacity.
    pub const fn with_max_items_per_node(mut self, max_items_per_node: usize) -> Self {
        self.max_items_per_node = max_items_per_node;
        self
    }

    /// Set the maximum depth.
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}
