// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy overlap queries.

use core::fmt::Debug;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::node::ROOT;
use crate::tree::{ItemId, QuadTree};
use crate::types::{QueryShape, RoughBounds};

/// Iterator over the items overlapping a query shape.
///
/// Returned by the `find_*` methods of [`QuadTree`]. Nodes whose region the shape does
/// not overlap are skipped together with their whole subtree. Within a visited node the
/// bucket is scanned before any child is entered; callers must not rely on that order.
///
/// The iterator borrows the tree, so the tree cannot change while a query is alive.
/// Collect the results first if you need to mutate based on them.
pub struct Intersecting<'a, I, S> {
    tree: &'a QuadTree<I>,
    shape: S,
    /// Slot never reported (the searcher of an item-relative query).
    exclude: Option<usize>,
    /// Nodes still to visit.
    stack: SmallVec<[usize; 32]>,
    /// Unscanned rest of the current node's bucket.
    bucket: &'a [usize],
}

impl<I, S: Debug> Debug for Intersecting<'_, I, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Intersecting")
            .field("shape", &self.shape)
            .field("exclude", &self.exclude)
            .field("pending_nodes", &self.stack.len())
            .field("pending_items", &self.bucket.len())
            .finish_non_exhaustive()
    }
}

impl<'a, I, S: QueryShape> Intersecting<'a, I, S> {
    pub(crate) fn new(tree: &'a QuadTree<I>, shape: S, exclude: Option<usize>) -> Self {
        let mut stack = SmallVec::new();
        if shape.overlaps_rect(&tree.bounds()) {
            stack.push(ROOT);
        }
        Self {
            tree,
            shape,
            exclude,
            stack,
            bucket: &[],
        }
    }

    /// A query that yields nothing.
    pub(crate) fn empty(tree: &'a QuadTree<I>, shape: S) -> Self {
        Self {
            tree,
            shape,
            exclude: None,
            stack: SmallVec::new(),
            bucket: &[],
        }
    }
}

impl<'a, I: RoughBounds, S: QueryShape> Iterator for Intersecting<'a, I, S> {
    type Item = (ItemId, &'a I);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            while let Some((&slot, rest)) = self.bucket.split_first() {
                self.bucket = rest;
                if self.exclude == Some(slot) {
                    continue;
                }
                let (id, item) = tree.slot(slot);
                if self.shape.overlaps_rect(&item.rough_bounds()) {
                    return Some((id, item));
                }
            }

            let node = tree.node(self.stack.pop()?);
            self.bucket = node.items.as_slice();
            // Reversed so the NW child is visited first.
            for child in node.children().rev() {
                if self.shape.overlaps_rect(&tree.node(child).region) {
                    self.stack.push(child);
                }
            }
        }
    }
}

impl<I: RoughBounds, S: QueryShape> FusedIterator for Intersecting<'_, I, S> {}
