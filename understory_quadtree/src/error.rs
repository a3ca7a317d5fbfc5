// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree mutations.

use kurbo::Rect;
use thiserror::Error;

use crate::tree::ItemId;

/// An item whose rough bounds are not enclosed by the tree's root region.
///
/// The rejected item is handed back so the caller keeps ownership of it.
#[derive(Debug, Error)]
#[error("item bounds {bounds:?} are not enclosed by the tree bounds {root:?}")]
pub struct OutOfBounds<I> {
    item: I,
    bounds: Rect,
    root: Rect,
}

impl<I> OutOfBounds<I> {
    pub(crate) const fn new(item: I, bounds: Rect, root: Rect) -> Self {
        Self { item, bounds, root }
    }

    /// The rejected item.
    pub fn item(&self) -> &I {
        &self.item
    }

    /// Take back the rejected item.
    pub fn into_item(self) -> I {
        self.item
    }

    /// The item's rough bounds at the time it was rejected.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The root region of the tree that rejected it.
    pub fn root(&self) -> Rect {
        self.root
    }
}

/// Failure of [`QuadTree::update`][crate::QuadTree::update].
#[derive(Debug, Error)]
pub enum UpdateError<I> {
    /// The handle does not name a live item of this tree.
    #[error("item {0:?} is not tracked by this tree")]
    NotTracked(ItemId),
    /// The item moved outside the root region and was evicted from the tree.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds<I>),
}
