// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `QuadTree` container: item arena, placement, and mutation.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Circle, Point, Rect};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{OutOfBounds, UpdateError};
use crate::node::{Node, ROOT, fitting_child, split};
use crate::query::Intersecting;
use crate::types::{QueryShape, Region, RoughBounds};

/// Generational handle for items.
///
/// Handles are issued by [`QuadTree::insert`]. A handle goes stale once its item is
/// removed or evicted, and stays stale even after the slot is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(u32, u32);

impl ItemId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Item handles are 32-bit; slot counts beyond u32::MAX are not supported."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<I> {
    item: I,
    /// Node whose bucket holds this slot.
    node: usize,
    /// Position of this slot inside that bucket.
    pos: usize,
}

/// A dynamic quadtree over items with axis-aligned rough bounds.
///
/// Items live in a flat arena and are addressed by [`ItemId`]. Each item is stored in
/// exactly one node: the shallowest node for which no single child encloses the item's
/// bounds. Items straddling a child boundary stay at the parent instead of being split
/// or duplicated, so every query reports each item at most once.
///
/// Nodes subdivide once their bucket would exceed [`Config::max_items_per_node`] and
/// never merge back.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use understory_quadtree::{QuadTree, region};
///
/// let mut tree: QuadTree<Rect> = QuadTree::new(region(0.0, 0.0, 100.0, 100.0));
/// let a = tree.insert(region(60.0, 60.0, 2.0, 2.0)).unwrap();
/// let b = tree.insert(region(60.0, 59.0, 2.0, 2.0)).unwrap();
///
/// // `b` overlaps `a` by one unit; `a` never reports itself.
/// let hits: Vec<_> = tree.find_intersecting_item(a).map(|(id, _)| id).collect();
/// assert_eq!(hits, [b]);
///
/// // Move `b` so it only touches `a` along y = 60.
/// tree.update_with(b, |r| *r = region(60.0, 58.0, 2.0, 2.0)).unwrap();
/// assert_eq!(tree.find_intersecting_item(a).count(), 0);
/// ```
pub struct QuadTree<I> {
    config: Config,
    nodes: Vec<Node>,
    /// slots
    entries: Vec<Option<Entry<I>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    len: usize,
}

impl<I> Debug for QuadTree<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.bounds())
            .field("config", &self.config)
            .field("items", &self.len)
            .field("slots", &self.entries.len())
            .field("free_list", &self.free_list.len())
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl<I> QuadTree<I> {
    /// Create an empty tree covering `bounds` with the default [`Config`].
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, Config::default())
    }

    /// Create an empty tree covering `bounds` with explicit subdivision thresholds.
    pub fn with_config(bounds: Rect, config: Config) -> Self {
        debug_assert!(
            bounds.x0 < bounds.x1 && bounds.y0 < bounds.y1,
            "tree bounds must be normalized and have positive area"
        );
        debug_assert!(
            config.max_items_per_node > 0,
            "max_items_per_node must be at least 1"
        );
        Self {
            config,
            nodes: vec![Node::new(bounds, 0, None)],
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// The root region. Only items enclosed by it can be inserted.
    pub fn bounds(&self) -> Rect {
        self.nodes[ROOT].region
    }

    /// The subdivision thresholds this tree was created with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Number of tracked items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree tracks no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, including the root. Never shrinks except through [`clear`][Self::clear].
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node created so far. A tree that never subdivided reports 0.
    pub fn max_depth_reached(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Reserve space for at least `n` more items.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
        self.generations.reserve(n);
    }

    /// Whether `id` names a live item of this tree.
    pub fn contains(&self, id: ItemId) -> bool {
        self.live_slot(id).is_some()
    }

    /// The item behind `id`, if it is still tracked.
    pub fn get(&self, id: ItemId) -> Option<&I> {
        let slot = self.live_slot(id)?;
        Some(&self.entry(slot).item)
    }

    /// Mutable access to the item behind `id`.
    ///
    /// Changing the item's rough bounds through this reference does not move it inside
    /// the tree; call [`update`][Self::update] before the next query, or use
    /// [`update_with`][Self::update_with] which does both.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut I> {
        let slot = self.live_slot(id)?;
        Some(&mut self.entry_mut(slot).item)
    }

    /// Iterate over all tracked items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &I)> + '_ {
        self.entries.iter().enumerate().filter_map(|(idx, e)| {
            e.as_ref()
                .map(|e| (ItemId::new(idx, self.generations[idx]), &e.item))
        })
    }

    /// Drop every item and collapse the hierarchy back to a single root node.
    ///
    /// Outstanding handles become stale.
    pub fn clear(&mut self) {
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            if entry.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.first_child = None;
        root.items.clear();
        self.len = 0;
    }

    pub(crate) fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Handle and item stored in `slot`, which must be live.
    pub(crate) fn slot(&self, slot: usize) -> (ItemId, &I) {
        (
            ItemId::new(slot, self.generations[slot]),
            &self.entry(slot).item,
        )
    }

    fn live_slot(&self, id: ItemId) -> Option<usize> {
        let idx = id.idx();
        let live = self.generations.get(idx) == Some(&id.1)
            && self.entries.get(idx).is_some_and(Option::is_some);
        live.then_some(idx)
    }

    fn entry(&self, slot: usize) -> &Entry<I> {
        self.entries[slot]
            .as_ref()
            .expect("quadtree invariant violated: node references vacant slot")
    }

    fn entry_mut(&mut self, slot: usize) -> &mut Entry<I> {
        self.entries[slot]
            .as_mut()
            .expect("quadtree invariant violated: node references vacant slot")
    }

    /// Append `slot` to the bucket of `node` and record where it went.
    fn attach(&mut self, slot: usize, node: usize) {
        let items = &mut self.nodes[node].items;
        let pos = items.len();
        items.push(slot);
        let entry = self.entry_mut(slot);
        entry.node = node;
        entry.pos = pos;
    }

    /// Take `slot` out of its owning bucket in constant time.
    fn detach(&mut self, slot: usize) {
        let (node, pos) = {
            let entry = self.entry(slot);
            (entry.node, entry.pos)
        };
        let items = &mut self.nodes[node].items;
        debug_assert_eq!(
            items.get(pos),
            Some(&slot),
            "quadtree invariant violated: slot not found at its recorded bucket position"
        );
        items.swap_remove(pos);
        let moved = items.get(pos).copied();
        if let Some(moved) = moved {
            self.entry_mut(moved).pos = pos;
        }
    }

    /// Free a detached slot and hand back its item.
    fn release(&mut self, slot: usize) -> I {
        let entry = self.entries[slot]
            .take()
            .expect("quadtree invariant violated: releasing a vacant slot");
        self.free_list.push(slot);
        self.len -= 1;
        entry.item
    }
}

impl<I: RoughBounds> QuadTree<I> {
    /// Whether an item with these bounds would be accepted by [`insert`][Self::insert].
    pub fn fits(&self, bounds: &Rect) -> bool {
        self.bounds().encloses(bounds)
    }

    /// Insert an item. Returns a stable handle.
    ///
    /// Fails only when the item's rough bounds are not enclosed by the root region; the
    /// item is then returned inside the error.
    pub fn insert(&mut self, item: I) -> Result<ItemId, OutOfBounds<I>> {
        let bounds = item.rough_bounds();
        let root = self.bounds();
        if !root.encloses(&bounds) {
            debug!(?bounds, ?root, "rejecting item outside the tree bounds");
            return Err(OutOfBounds::new(item, bounds, root));
        }

        let entry = Entry {
            item,
            node: ROOT,
            pos: 0,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(entry);
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(entry));
            self.generations.push(generation);
            (self.entries.len() - 1, generation)
        };
        self.len += 1;
        self.place(idx, &bounds);
        Ok(ItemId::new(idx, generation))
    }

    /// Remove an item and hand it back.
    ///
    /// Removing an item that is not tracked (never inserted, already removed, or a stale
    /// handle) is a no-op and returns `None`.
    pub fn remove(&mut self, id: ItemId) -> Option<I> {
        let slot = self.live_slot(id)?;
        self.detach(slot);
        Some(self.release(slot))
    }

    /// Reposition an item after its rough bounds changed.
    ///
    /// If placing the new bounds from scratch would pick the item's current node, it
    /// stays put. Otherwise it is re-placed from the root.
    ///
    /// An item whose new bounds leave the root region is evicted and returned inside
    /// [`UpdateError::OutOfBounds`]. An untracked handle yields
    /// [`UpdateError::NotTracked`]; it is never silently inserted.
    pub fn update(&mut self, id: ItemId) -> Result<(), UpdateError<I>> {
        let Some(slot) = self.live_slot(id) else {
            return Err(UpdateError::NotTracked(id));
        };
        let entry = self.entry(slot);
        let bounds = entry.item.rough_bounds();
        let node = entry.node;
        if self.is_home(node, &bounds) {
            return Ok(());
        }

        self.detach(slot);
        let root = self.bounds();
        if !root.encloses(&bounds) {
            debug!(?id, ?bounds, ?root, "evicting item that left the tree bounds");
            let item = self.release(slot);
            return Err(OutOfBounds::new(item, bounds, root).into());
        }
        let target = self.place(slot, &bounds);
        trace!(?id, from = node, to = target, "relocated item");
        Ok(())
    }

    /// Mutate an item in place, then [`update`][Self::update] its position.
    pub fn update_with<F: FnOnce(&mut I)>(
        &mut self,
        id: ItemId,
        f: F,
    ) -> Result<(), UpdateError<I>> {
        let Some(item) = self.get_mut(id) else {
            return Err(UpdateError::NotTracked(id));
        };
        f(item);
        self.update(id)
    }

    /// Items whose rough bounds strictly overlap `region`.
    ///
    /// Touching along an edge or at a corner does not count. The order of results is
    /// unspecified.
    pub fn find_intersecting(&self, region: Rect) -> Intersecting<'_, I, Rect> {
        Intersecting::new(self, region, None)
    }

    /// Items whose rough bounds strictly overlap those of `id`, excluding `id` itself.
    ///
    /// An untracked handle yields nothing.
    pub fn find_intersecting_item(&self, id: ItemId) -> Intersecting<'_, I, Rect> {
        match self.live_slot(id) {
            Some(slot) => {
                let bounds = self.entry(slot).item.rough_bounds();
                Intersecting::new(self, bounds, Some(slot))
            }
            None => Intersecting::empty(self, Rect::ZERO),
        }
    }

    /// Items whose rough bounds strictly overlap an arbitrary query shape.
    ///
    /// The shape is not a tree member, so nothing is excluded.
    pub fn find_intersecting_shape<S: QueryShape>(&self, shape: S) -> Intersecting<'_, I, S> {
        Intersecting::new(self, shape, None)
    }

    /// Items whose rough bounds come strictly closer than `radius` to `center`.
    pub fn find_within_radius(&self, center: Point, radius: f64) -> Intersecting<'_, I, Circle> {
        Intersecting::new(self, Circle::new(center, radius), None)
    }

    /// Items within `radius` of the centre of `id`'s rough bounds, excluding `id` itself.
    ///
    /// An untracked handle yields nothing.
    pub fn find_nearby(&self, id: ItemId, radius: f64) -> Intersecting<'_, I, Circle> {
        match self.live_slot(id) {
            Some(slot) => {
                let center = self.entry(slot).item.rough_bounds().center();
                Intersecting::new(self, Circle::new(center, radius), Some(slot))
            }
            None => Intersecting::empty(self, Circle::new(Point::ZERO, 0.0)),
        }
    }

    /// Descend from the root to the node that should own `bounds`, subdividing full
    /// leaves on the way, and attach `slot` there.
    fn place(&mut self, slot: usize, bounds: &Rect) -> usize {
        let mut node = ROOT;
        loop {
            if self.nodes[node].is_leaf() {
                if !self.is_full(node) {
                    break;
                }
                self.subdivide(node);
            }
            match fitting_child(&self.nodes, node, bounds) {
                Some(child) => node = child,
                None => break,
            }
        }
        self.attach(slot, node);
        node
    }

    /// Whether `node` is where placement would put `bounds` in the current hierarchy.
    ///
    /// That holds when no child of `node` alone encloses the bounds and every ancestor
    /// hands them down to exactly the next node on the path.
    fn is_home(&self, node: usize, bounds: &Rect) -> bool {
        if !self.nodes[node].region.encloses(bounds)
            || fitting_child(&self.nodes, node, bounds).is_some()
        {
            return false;
        }
        let mut child = node;
        while let Some(parent) = self.nodes[child].parent {
            if fitting_child(&self.nodes, parent, bounds) != Some(child) {
                return false;
            }
            child = parent;
        }
        true
    }

    fn is_full(&self, node: usize) -> bool {
        let n = &self.nodes[node];
        n.items.len() >= self.config.max_items_per_node && n.depth < self.config.max_depth
    }

    /// Split a leaf and push every item that fits a single quadrant down into it.
    fn subdivide(&mut self, node: usize) {
        debug!(
            depth = self.nodes[node].depth,
            region = ?self.nodes[node].region,
            items = self.nodes[node].items.len(),
            "subdividing quadtree node"
        );
        split(&mut self.nodes, node);
        let bucket = core::mem::take(&mut self.nodes[node].items);
        for slot in bucket {
            let bounds = self.entry(slot).item.rough_bounds();
            let target = fitting_child(&self.nodes, node, &bounds).unwrap_or(node);
            self.attach(slot, target);
        }
    }
}

#[cfg(test)]
impl<I: RoughBounds> QuadTree<I> {
    /// Walk the whole hierarchy and assert every structural invariant.
    pub(crate) fn check_invariants(&self) {
        let mut seen = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() && node.depth < self.config.max_depth {
                assert!(
                    node.items.len() <= self.config.max_items_per_node,
                    "leaf {idx} holds {} items",
                    node.items.len()
                );
            }
            for child in node.children() {
                assert_eq!(self.nodes[child].depth, node.depth + 1, "child depth");
                assert_eq!(self.nodes[child].parent, Some(idx), "child parent link");
                assert!(node.region.encloses(&self.nodes[child].region), "child region");
            }
            for (pos, &slot) in node.items.iter().enumerate() {
                let entry = self.entry(slot);
                assert_eq!((entry.node, entry.pos), (idx, pos), "recorded position");
                let bounds = entry.item.rough_bounds();
                assert!(node.region.encloses(&bounds), "item {slot} escapes node {idx}");
                assert_eq!(
                    fitting_child(&self.nodes, idx, &bounds),
                    None,
                    "item {slot} at {bounds:?} belongs in a child of node {idx}"
                );
                let mut child = idx;
                while let Some(parent) = self.nodes[child].parent {
                    assert_eq!(
                        fitting_child(&self.nodes, parent, &bounds),
                        Some(child),
                        "item {slot} at {bounds:?} should live above node {idx}"
                    );
                    child = parent;
                }
                seen += 1;
            }
        }
        assert_eq!(seen, self.len, "every tracked item lives in exactly one bucket");
    }
}
