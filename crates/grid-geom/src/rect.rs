//! Rectangle algebra shared by every structural layer: containers, block
//! bounds, border/frame rings, and the +2/+4 perimeter/buffer rectangles.

use grid_core::{Coord, Point};

/// An axis-aligned rectangle over 1-indexed coordinates. `top <= bottom` and
/// `left <= right` is an invariant of every constructor below; rectangles
/// produced by expansion are allowed to dip to zero or negative coordinates
/// (border/frame rings are conceptual outlines that may extend beyond grid
/// bounds) and are only clamped where a caller actually needs grid-local
/// points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub top: Coord,
    pub left: Coord,
    pub bottom: Coord,
    pub right: Coord,
}

impl Rect {
    pub fn new(top: Coord, left: Coord, bottom: Coord, right: Coord) -> Self {
        debug_assert!(top <= bottom && left <= right, "degenerate rect");
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn from_point(p: Point) -> Self {
        Self::new(p.row, p.col, p.row, p.col)
    }

    /// Smallest rect covering every point; panics on an empty slice (callers
    /// always have at least the seed point).
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut r = Self::from_point(first);
        for p in iter {
            r.top = r.top.min(p.row);
            r.left = r.left.min(p.col);
            r.bottom = r.bottom.max(p.row);
            r.right = r.right.max(p.col);
        }
        Some(r)
    }

    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top + 1
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.row >= self.top && p.row <= self.bottom && p.col >= self.left && p.col <= self.right
    }

    /// Two rectangles intersect iff they share at least one cell. Inclusive
    /// on both ends, not a half-open test.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || other.right < self.left
            || self.bottom < other.top
            || other.bottom < self.top)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.top.min(other.top),
            self.left.min(other.left),
            self.bottom.max(other.bottom),
            self.right.max(other.right),
        )
    }

    /// Expand every side by `k`, without clamping. May produce coordinates
    /// `<= 0`.
    pub fn expand(&self, k: i64) -> Rect {
        Rect::new(self.top - k, self.left - k, self.bottom + k, self.right + k)
    }

    /// Expand by `k` and clamp to the grid `[1, rows] x [1, cols]`.
    pub fn expand_clamped(&self, k: i64, rows: Coord, cols: Coord) -> Rect {
        self.expand(k).clamp_to_grid(rows, cols)
    }

    /// Clamp to `[1, rows] x [1, cols]`. If the rectangle lies entirely
    /// outside the grid the result is a degenerate (empty) rect; callers
    /// that iterate points should check `is_empty_after_clamp` style via
    /// `top > bottom || left > right` — deliberately not hidden behind
    /// `Option` since every caller in this crate already holds a rect that
    /// overlaps the grid by construction.
    pub fn clamp_to_grid(&self, rows: Coord, cols: Coord) -> Rect {
        Rect {
            top: self.top.max(1),
            left: self.left.max(1),
            bottom: self.bottom.min(rows),
            right: self.right.min(cols),
        }
    }

    /// Iterate every point in the rectangle, row-major.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (self.top..=self.bottom)
            .flat_map(move |r| (self.left..=self.right).map(move |c| Point::new(r, c)))
    }

    /// Points of `self` that are not in `inner`, dropping any point with a
    /// non-positive coordinate. Used to build border/frame rings from a pair
    /// of nested expansions.
    pub fn ring_minus(&self, inner: &Rect) -> Vec<Point> {
        self.points()
            .filter(|p| !inner.contains_point(*p) && p.in_bounds())
            .collect()
    }
}
