// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry glue over `kurbo`: strict overlap, containment, and the item/query capabilities.

use kurbo::{Circle, Point, Rect};

/// Create a region from its origin and size.
///
/// Shorthand for [`Rect::from_origin_size`] with the width and height given as scalars.
#[inline]
pub fn region(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

/// Overlap and containment predicates used for every placement and pruning decision.
///
/// Rectangles are expected to be normalized (`x0 <= x1`, `y0 <= y1`) and free of NaNs.
pub trait Region {
    /// Whether the two rectangles share an area of positive extent on both axes.
    ///
    /// Boundary-only contact (a shared edge or corner) is not an overlap.
    ///
    /// ```
    /// use understory_quadtree::{Region, region};
    ///
    /// let a = region(60.0, 60.0, 2.0, 2.0);
    /// assert!(a.overlaps_strictly(&region(60.0, 59.0, 2.0, 2.0)));
    /// // Touching along y = 60.
    /// assert!(!a.overlaps_strictly(&region(60.0, 58.0, 2.0, 2.0)));
    /// // Touching at the corner (60, 60).
    /// assert!(!a.overlaps_strictly(&region(58.0, 58.0, 2.0, 2.0)));
    /// ```
    fn overlaps_strictly(&self, other: &Rect) -> bool;

    /// Whether `other` lies entirely inside this rectangle, edges included.
    fn encloses(&self, other: &Rect) -> bool;

    /// The four equal quadrants of this rectangle, ordered NW, NE, SW, SE.
    ///
    /// `y0` is the top edge. The quadrants share their inner edges exactly, so their
    /// union is the parent rectangle.
    fn quadrants(&self) -> [Rect; 4];
}

impl Region for Rect {
    #[inline]
    fn overlaps_strictly(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    #[inline]
    fn encloses(&self, other: &Rect) -> bool {
        self.x0 <= other.x0 && other.x1 <= self.x1 && self.y0 <= other.y0 && other.y1 <= self.y1
    }

    fn quadrants(&self) -> [Rect; 4] {
        let mx = 0.5 * (self.x0 + self.x1);
        let my = 0.5 * (self.y0 + self.y1);
        [
            Self::new(self.x0, self.y0, mx, my),
            Self::new(mx, self.y0, self.x1, my),
            Self::new(self.x0, my, mx, self.y1),
            Self::new(mx, my, self.x1, self.y1),
        ]
    }
}

/// A shape a query can be issued with.
///
/// Implementations must be monotone under containment: if rectangle `a` is enclosed by
/// rectangle `n` and the shape overlaps `a`, it must also overlap `n`. The tree relies on
/// this to skip whole nodes whose region the shape does not overlap.
pub trait QueryShape {
    /// Whether the shape strictly overlaps the rectangle.
    fn overlaps_rect(&self, rect: &Rect) -> bool;
}

impl QueryShape for Rect {
    #[inline]
    fn overlaps_rect(&self, rect: &Rect) -> bool {
        self.overlaps_strictly(rect)
    }
}

impl QueryShape for Circle {
    /// True when the closest point of `rect` lies strictly inside the circle.
    #[inline]
    fn overlaps_rect(&self, rect: &Rect) -> bool {
        let c = self.center;
        let dx = (rect.x0 - c.x).max(0.0).max(c.x - rect.x1);
        let dy = (rect.y0 - c.y).max(0.0).max(c.y - rect.y1);
        dx * dx + dy * dy < self.radius * self.radius
    }
}

impl QueryShape for Point {
    /// True when the point lies strictly inside `rect`.
    #[inline]
    fn overlaps_rect(&self, rect: &Rect) -> bool {
        rect.x0 < self.x && self.x < rect.x1 && rect.y0 < self.y && self.y < rect.y1
    }
}

impl<S: QueryShape + ?Sized> QueryShape for &S {
    #[inline]
    fn overlaps_rect(&self, rect: &Rect) -> bool {
        (**self).overlaps_rect(rect)
    }
}

/// The one capability the tree needs from a stored item: its broad-phase bounding box.
///
/// The tree reads this on every insert, update, and query and never writes it. Richer
/// item types (game objects with exact collision shapes, payload-carrying handles)
/// implement it alongside whatever else they do.
pub trait RoughBounds {
    /// The axis-aligned rectangle used for all broad-phase decisions.
    fn rough_bounds(&self) -> Rect;
}

impl RoughBounds for Rect {
    #[inline]
    fn rough_bounds(&self) -> Rect {
        *self
    }
}

impl<P> RoughBounds for (Rect, P) {
    #[inline]
    fn rough_bounds(&self) -> Rect {
        self.0
    }
}
