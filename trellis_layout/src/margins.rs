// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-side margin specs resolved against leftover space.

use crate::length::{Margin, percent_of};
use crate::types::Axis;

/// Per-side pixel values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sides {
    /// Left side.
    pub left: i32,
    /// Right side.
    pub right: i32,
    /// Top side.
    pub top: i32,
    /// Bottom side.
    pub bottom: i32,
}

impl Sides {
    /// The same value on every side.
    pub const fn all(v: i32) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }
}

/// Margin specification of a container-relative position.
///
/// Each side resolves in order:
/// 1. its own spec, against the leftover `space` handed to the child;
/// 2. when unset and the opposite side is `Percent(q)`, `(100 - q)%` of `space`,
///    so a pinned side and a percentage side together absorb all of it;
/// 3. the shared [`margin`](Self::margin);
/// 4. the per-side [`min`](Self::min).
///
/// ```
/// use trellis_layout::{Margin, Margins};
///
/// let m = Margins {
///     left: Some(Margin::Percent(25.0)),
///     ..Margins::default()
/// };
/// assert_eq!(m.margin_left(200), 50);
/// assert_eq!(m.margin_right(200), 150);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Margins {
    /// Left side.
    pub left: Option<Margin>,
    /// Right side.
    pub right: Option<Margin>,
    /// Top side.
    pub top: Option<Margin>,
    /// Bottom side.
    pub bottom: Option<Margin>,
    /// Fallback for every unset side.
    pub margin: Option<Margin>,
    /// Last-resort per-side values.
    pub min: Sides,
}

impl Margins {
    /// The same spec on every side.
    pub fn uniform(margin: Margin) -> Self {
        Self {
            margin: Some(margin),
            ..Self::default()
        }
    }

    /// Left margin given `space` leftover pixels on the horizontal axis.
    pub fn margin_left(&self, space: i32) -> i32 {
        self.side(self.left, self.right, self.min.left, space)
    }

    /// Right margin given `space` leftover pixels on the horizontal axis.
    pub fn margin_right(&self, space: i32) -> i32 {
        self.side(self.right, self.left, self.min.right, space)
    }

    /// Top margin given `space` leftover pixels on the vertical axis.
    pub fn margin_top(&self, space: i32) -> i32 {
        self.side(self.top, self.bottom, self.min.top, space)
    }

    /// Bottom margin given `space` leftover pixels on the vertical axis.
    pub fn margin_bottom(&self, space: i32) -> i32 {
        self.side(self.bottom, self.top, self.min.bottom, space)
    }

    /// Whether any margin on `axis` takes a share of leftover space.
    ///
    /// Stretch ratios only count on relative axes.
    pub fn is_relative(&self, axis: Axis) -> bool {
        let (a, b) = match axis {
            Axis::Horizontal => (self.left, self.right),
            Axis::Vertical => (self.top, self.bottom),
        };
        [a, b, self.margin]
            .into_iter()
            .flatten()
            .any(|m| m.is_percent())
    }

    pub(crate) fn check(&self) -> Result<(), crate::LayoutError> {
        [self.left, self.right, self.top, self.bottom, self.margin]
            .into_iter()
            .flatten()
            .try_for_each(|m| m.check())
    }

    fn side(&self, own: Option<Margin>, opposite: Option<Margin>, min: i32, space: i32) -> i32 {
        match (own, opposite) {
            (Some(m), _) => m.resolve(space),
            (None, Some(Margin::Percent(q))) => percent_of(100.0 - q, space),
            (None, _) => self.margin.map_or(min, |m| m.resolve(space)),
        }
    }
}
