// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree nodes stored in a flat arena.
//!
//! A node owns a region, a bucket of item slots, and either no children or exactly
//! four. Children are allocated as four consecutive arena entries (NW, NE, SW, SE), so a
//! node only records the index of the first one.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::types::Region;

/// Arena index of the root node.
pub(crate) const ROOT: usize = 0;

/// Inline capacity of a bucket; matches the default leaf capacity.
pub(crate) type Bucket = SmallVec<[usize; 8]>;

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) region: Rect,
    pub(crate) depth: u32,
    /// `None` only for the root.
    pub(crate) parent: Option<usize>,
    /// Index of the NW child; NE, SW and SE follow it.
    pub(crate) first_child: Option<usize>,
    /// Item slots owned by this node.
    pub(crate) items: Bucket,
}

impl Debug for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("region", &self.region)
            .field("depth", &self.depth)
            .field("parent", &self.parent)
            .field("first_child", &self.first_child)
            .field("items", &self.items.len())
            .finish()
    }
}

impl Node {
    pub(crate) fn new(region: Rect, depth: u32, parent: Option<usize>) -> Self {
        Self {
            region,
            depth,
            parent,
            first_child: None,
            items: Bucket::new(),
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    /// Arena indices of the children, or an empty range for a leaf.
    #[inline]
    pub(crate) fn children(&self) -> core::ops::Range<usize> {
        match self.first_child {
            Some(first) => first..first + 4,
            None => 0..0,
        }
    }
}

/// Append the four children of `parent` to the arena and link them.
///
/// The parent's bucket is left untouched; re-homing its items is the caller's job since
/// the items' bounds live outside the arena.
pub(crate) fn split(nodes: &mut Vec<Node>, parent: usize) {
    debug_assert!(
        nodes[parent].is_leaf(),
        "quadtree invariant violated: splitting a node that already has children"
    );
    let first = nodes.len();
    let depth = nodes[parent].depth + 1;
    let quads = nodes[parent].region.quadrants();
    nodes.extend(
        quads
            .into_iter()
            .map(|quad| Node::new(quad, depth, Some(parent))),
    );
    nodes[parent].first_child = Some(first);
}

/// The child of `node` that alone encloses `bounds`.
///
/// Returns `None` for a leaf, for bounds that straddle a child boundary, and for
/// degenerate bounds lying on a shared edge (enclosed by more than one child).
pub(crate) fn fitting_child(nodes: &[Node], node: usize, bounds: &Rect) -> Option<usize> {
    let mut found = None;
    for child in nodes[node].children() {
        if nodes[child].region.encloses(bounds) {
            if found.is_some() {
                return None;
            }
            found = Some(child);
        }
    }
    found
}
