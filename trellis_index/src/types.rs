// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and lookup policies.

/// Integer axis-aligned rectangle stored as origin and size.
///
/// Containment is half-open: a rectangle covers `left <= x < right` and
/// `top <= y < bottom`, so two rectangles that only share an edge do not
/// intersect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Rect {
    /// The zero-size rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle from origin and size.
    #[inline(always)]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its left/top/right/bottom edges.
    #[inline]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// The smallest rectangle enclosing every point, or `None` for an empty set.
    ///
    /// Points are treated as unit cells, so the enclosing rectangle of a single
    /// point `(3, 4)` is `Rect::new(3, 4, 1, 1)` and contains that point.
    ///
    /// ```
    /// use trellis_index::Rect;
    ///
    /// let r = Rect::from_points([(1, 1), (4, 2), (2, 6)]).unwrap();
    /// assert_eq!(r, Rect::new(1, 1, 4, 6));
    /// assert!(Rect::from_points(Vec::<(i32, i32)>::new()).is_none());
    /// ```
    pub fn from_points<I: IntoIterator<Item = (i32, i32)>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let (mut l, mut t, mut r, mut b) = (x0, y0, x0, y0);
        for (x, y) in it {
            l = l.min(x);
            t = t.min(y);
            r = r.max(x);
            b = b.max(y);
        }
        Some(Self::from_edges(l, t, r + 1, b + 1))
    }

    /// Left edge (same as `x`).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (same as `y`).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Midpoint, rounded towards the origin corner.
    #[inline]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Return true if the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the point lies inside the rectangle.
    #[inline]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two rectangles share any area.
    #[inline]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// The overlapping region, or `None` if the rectangles do not intersect.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// The smallest rectangle enclosing both rectangles.
    ///
    /// Zero-size rectangles still contribute their origin.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Return the rectangle moved by `(dx, dy)`.
    #[inline]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// What a lookup-and-remove call does when the key is not present.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Treat the miss as a no-op.
    #[default]
    Ignore,
    /// Report the miss as an error.
    Error,
}

impl MissingPolicy {
    /// Whether a miss under this policy must be reported.
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}
