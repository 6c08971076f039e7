// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position nodes: literal geometry plus one resolution strategy.
//!
//! Every layout-participating element holds a [`Position`]. Its `x`, `y`,
//! `w`, `h` fields are plain mutable literals; the attached [`Strategy`]
//! decides which of them are reported as-is and which are derived from a
//! [`ResolveContext`] (parent box and window size).
//!
//! Resolution is side-effect free. Before a node is attached, percentages
//! resolve to 0 and `auto` reports the stored literal.

use trellis_index::Rect;

use crate::error::LayoutError;
use crate::length::{Length, percent_of};
use crate::margins::Margins;
use crate::types::{Axis, Size};

/// Size and margin spec of a child packed by a container.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContainerRelative {
    /// Width spec; percentages refer to the container width.
    pub width: Length,
    /// Height spec; percentages refer to the container height.
    pub height: Length,
    /// Lower clamp applied to a percentage width.
    pub min_width: Option<i32>,
    /// Upper clamp applied to a percentage width.
    pub max_width: Option<i32>,
    /// Lower clamp applied to a percentage height.
    pub min_height: Option<i32>,
    /// Upper clamp applied to a percentage height.
    pub max_height: Option<i32>,
    /// Margin spec.
    pub margins: Margins,
    /// Weight of this child's share of horizontal leftover space.
    pub width_stretch_ratio: f32,
    /// Weight of this child's share of vertical leftover space.
    pub height_stretch_ratio: f32,
}

impl Default for ContainerRelative {
    fn default() -> Self {
        Self {
            width: Length::Auto,
            height: Length::Auto,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            margins: Margins::default(),
            width_stretch_ratio: 1.0,
            height_stretch_ratio: 1.0,
        }
    }
}

impl ContainerRelative {
    /// Spec with the given size and default margins.
    pub fn sized(width: impl Into<Length>, height: impl Into<Length>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
            ..Self::default()
        }
    }

    /// Replace the margins.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Stretch ratio on `axis`.
    pub fn stretch_ratio(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width_stretch_ratio,
            Axis::Vertical => self.height_stretch_ratio,
        }
    }

    fn check(&self) -> Result<(), LayoutError> {
        check_lengths(self.width, self.height)?;
        for (lo, hi) in [
            (self.min_width, self.max_width),
            (self.min_height, self.max_height),
        ] {
            if let (Some(lo), Some(hi)) = (lo, hi)
                && lo > hi
            {
                return Err(LayoutError::MalformedPosition("minimum exceeds maximum"));
            }
        }
        if !(self.width_stretch_ratio.is_finite() && self.width_stretch_ratio >= 0.0)
            || !(self.height_stretch_ratio.is_finite() && self.height_stretch_ratio >= 0.0)
        {
            return Err(LayoutError::MalformedPosition(
                "stretch ratios must be finite and non-negative",
            ));
        }
        self.margins.check()
    }

    fn clamp(&self, axis: Axis, v: i32) -> i32 {
        let (lo, hi) = match axis {
            Axis::Horizontal => (self.min_width, self.max_width),
            Axis::Vertical => (self.min_height, self.max_height),
        };
        let v = hi.map_or(v, |hi| v.min(hi));
        lo.map_or(v, |lo| v.max(lo))
    }
}

/// Size spec of a child stacked in a multi-layer.
///
/// A pixel length of zero or less inherits the parent's full extent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerRelative {
    /// Width spec.
    pub width: Length,
    /// Height spec.
    pub height: Length,
}

impl Default for LayerRelative {
    fn default() -> Self {
        Self {
            width: Length::Px(0),
            height: Length::Px(0),
        }
    }
}

/// How a position derives its geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Strategy {
    /// All four literals are reported as-is.
    Fixed,
    /// Packed by a parent container.
    Container(ContainerRelative),
    /// Stacked in a parent multi-layer; literal x/y are offsets into its box.
    MultiLayer(LayerRelative),
    /// Always the whole window.
    Window,
    /// Sized to one tile of a world grid; x/y are set when placed on a cell.
    GridCell {
        /// Tile width in pixels.
        tile_width: i32,
        /// Tile height in pixels.
        tile_height: i32,
    },
}

/// Inputs a strategy may resolve against.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// Resolved box of the parent, `None` while unattached.
    pub parent: Option<Rect>,
    /// Window size.
    pub window: Size,
}

/// A mutable rectangle with exactly one resolution strategy.
///
/// The strategy is chosen at construction and cannot be swapped; build a new
/// position instead.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    strategy: Strategy,
    pub(crate) cell_width_limit: Option<i32>,
}

impl Position {
    fn with_strategy(strategy: Strategy) -> Self {
        Self {
            x: 0,
            y: 0,
            w: 0,
            h: 0,
            strategy,
            cell_width_limit: None,
        }
    }

    /// Position reporting `rect` verbatim.
    pub fn fixed(rect: Rect) -> Self {
        let mut p = Self::with_strategy(Strategy::Fixed);
        p.x = rect.x;
        p.y = rect.y;
        p.w = rect.width;
        p.h = rect.height;
        p
    }

    /// Position packed by a container.
    ///
    /// Rejects square on both axes, unusable percentages, inverted clamps, and
    /// negative stretch ratios.
    ///
    /// ```
    /// use trellis_layout::{ContainerRelative, Length, Position};
    ///
    /// assert!(Position::container(ContainerRelative::sized(40, Length::Square)).is_ok());
    /// assert!(Position::container(ContainerRelative::sized(Length::Square, Length::Square)).is_err());
    /// ```
    pub fn container(spec: ContainerRelative) -> Result<Self, LayoutError> {
        if let Err(e) = spec.check() {
            log::warn!("rejected container position {spec:?}: {e}");
            return Err(e);
        }
        let mut p = Self::with_strategy(Strategy::Container(spec));
        // Auto axes start from their pixel fallback of zero; fixed axes seed the literal.
        if let Length::Px(w) = spec.width {
            p.w = w;
        }
        if let Length::Px(h) = spec.height {
            p.h = h;
        }
        Ok(p)
    }

    /// Position stacked in a multi-layer, offset by `(x, y)` into its box.
    pub fn multi_layer(spec: LayerRelative, x: i32, y: i32) -> Result<Self, LayoutError> {
        if let Err(e) = check_lengths(spec.width, spec.height) {
            log::warn!("rejected multi-layer position {spec:?}: {e}");
            return Err(e);
        }
        let mut p = Self::with_strategy(Strategy::MultiLayer(spec));
        p.x = x;
        p.y = y;
        Ok(p)
    }

    /// Position covering the whole window.
    pub fn window() -> Self {
        Self::with_strategy(Strategy::Window)
    }

    /// Position sized to one world-grid tile.
    pub fn grid_cell(tile_width: i32, tile_height: i32) -> Self {
        Self::with_strategy(Strategy::GridCell {
            tile_width,
            tile_height,
        })
    }

    /// The attached strategy.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Container-relative spec, if that is the strategy.
    pub fn container_spec(&self) -> Option<&ContainerRelative> {
        match &self.strategy {
            Strategy::Container(spec) => Some(spec),
            _ => None,
        }
    }

    /// Literal fields, ignoring the strategy.
    pub fn literal(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Write the literal x.
    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    /// Write the literal y.
    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    /// Write the literal width.
    pub fn set_w(&mut self, w: i32) {
        self.w = w;
    }

    /// Write the literal height.
    pub fn set_h(&mut self, h: i32) {
        self.h = h;
    }

    /// Move to absolute `(x, y)` inside `parent`.
    ///
    /// Multi-layer positions store the offset into the parent box.
    pub(crate) fn place_at(&mut self, x: i32, y: i32, parent: Rect) {
        if matches!(self.strategy, Strategy::MultiLayer(_)) {
            self.x = x - parent.x;
            self.y = y - parent.y;
        } else {
            self.x = x;
            self.y = y;
        }
    }

    /// Whether `axis` is content-driven.
    pub fn is_auto(&self, axis: Axis) -> bool {
        let (w, h) = match &self.strategy {
            Strategy::Container(spec) => (spec.width, spec.height),
            Strategy::MultiLayer(spec) => (spec.width, spec.height),
            _ => return false,
        };
        match axis {
            Axis::Horizontal => w.is_auto(),
            Axis::Vertical => h.is_auto(),
        }
    }

    /// Resolved x.
    pub fn resolve_x(&self, cx: &ResolveContext) -> i32 {
        match self.strategy {
            Strategy::Window => 0,
            Strategy::MultiLayer(_) => cx.parent.map_or(0, |p| p.x) + self.x,
            _ => self.x,
        }
    }

    /// Resolved y.
    pub fn resolve_y(&self, cx: &ResolveContext) -> i32 {
        match self.strategy {
            Strategy::Window => 0,
            Strategy::MultiLayer(_) => cx.parent.map_or(0, |p| p.y) + self.y,
            _ => self.y,
        }
    }

    /// Resolved width.
    pub fn resolve_width(&self, cx: &ResolveContext) -> i32 {
        let w = self.resolve_extent(Axis::Horizontal, cx, true);
        self.cell_width_limit.map_or(w, |limit| w.min(limit))
    }

    /// Resolved height.
    pub fn resolve_height(&self, cx: &ResolveContext) -> i32 {
        self.resolve_extent(Axis::Vertical, cx, true)
    }

    /// Resolved rectangle.
    pub fn resolve(&self, cx: &ResolveContext) -> Rect {
        Rect::new(
            self.resolve_x(cx),
            self.resolve_y(cx),
            self.resolve_width(cx),
            self.resolve_height(cx),
        )
    }

    fn literal_extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    fn resolve_extent(&self, axis: Axis, cx: &ResolveContext, mirror: bool) -> i32 {
        let parent_extent = cx.parent.map(|p| match axis {
            Axis::Horizontal => p.width,
            Axis::Vertical => p.height,
        });
        let pick = |w: Length, h: Length| match axis {
            Axis::Horizontal => w,
            Axis::Vertical => h,
        };
        match self.strategy {
            Strategy::Fixed => self.literal_extent(axis),
            Strategy::Window => match axis {
                Axis::Horizontal => cx.window.width,
                Axis::Vertical => cx.window.height,
            },
            Strategy::GridCell {
                tile_width,
                tile_height,
            } => match axis {
                Axis::Horizontal => tile_width,
                Axis::Vertical => tile_height,
            },
            Strategy::Container(spec) => match pick(spec.width, spec.height) {
                Length::Px(px) => px,
                Length::Percent(p) => {
                    parent_extent.map_or(0, |basis| spec.clamp(axis, percent_of(p, basis)))
                }
                Length::Auto => self.literal_extent(axis),
                Length::Square if mirror => self.resolve_extent(axis.cross(), cx, false),
                Length::Square => 0,
            },
            Strategy::MultiLayer(spec) => match pick(spec.width, spec.height) {
                Length::Px(px) if px > 0 => px,
                Length::Px(_) => parent_extent.unwrap_or(0),
                Length::Percent(p) => parent_extent.map_or(0, |basis| percent_of(p, basis)),
                Length::Auto => self.literal_extent(axis),
                Length::Square if mirror => self.resolve_extent(axis.cross(), cx, false),
                Length::Square => 0,
            },
        }
    }
}

fn check_lengths(width: Length, height: Length) -> Result<(), LayoutError> {
    if matches!((width, height), (Length::Square, Length::Square)) {
        return Err(LayoutError::MalformedPosition(
            "width and height cannot both be square",
        ));
    }
    width.check()?;
    height.check()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::Margin;

    fn attached(parent: Rect) -> ResolveContext {
        ResolveContext {
            parent: Some(parent),
            window: Size::new(800, 600),
        }
    }

    #[test]
    fn fixed_reports_literals() {
        let p = Position::fixed(Rect::new(3, 4, 5, 6));
        assert_eq!(p.resolve(&ResolveContext::default()), Rect::new(3, 4, 5, 6));
    }

    #[test]
    fn window_ignores_literals() {
        let mut p = Position::window();
        p.set_x(50);
        p.set_w(1);
        let cx = attached(Rect::new(10, 10, 20, 20));
        assert_eq!(p.resolve(&cx), Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn percent_against_parent_and_clamped() {
        let spec = ContainerRelative {
            width: Length::Percent(50.0),
            height: Length::Percent(50.0),
            max_width: Some(80),
            min_height: Some(40),
            ..ContainerRelative::default()
        };
        let p = Position::container(spec).unwrap();
        let cx = attached(Rect::new(0, 0, 300, 60));
        assert_eq!(p.resolve_width(&cx), 80);
        assert_eq!(p.resolve_height(&cx), 40);
    }

    #[test]
    fn unattached_percent_is_zero_and_auto_is_literal() {
        let spec = ContainerRelative::sized(Length::Percent(50.0), Length::Auto);
        let mut p = Position::container(spec).unwrap();
        p.set_h(17);
        let cx = ResolveContext::default();
        assert_eq!(p.resolve_width(&cx), 0);
        assert_eq!(p.resolve_height(&cx), 17);
        assert!(p.is_auto(Axis::Vertical));
        assert!(!p.is_auto(Axis::Horizontal));
    }

    #[test]
    fn square_mirrors_other_axis() {
        let spec = ContainerRelative::sized(Length::Square, Length::Percent(10.0));
        let p = Position::container(spec).unwrap();
        let cx = attached(Rect::new(0, 0, 100, 300));
        assert_eq!(p.resolve_width(&cx), 30);
        assert_eq!(p.resolve_height(&cx), 30);
    }

    #[test]
    fn malformed_specs_are_rejected() {
        let both_square = ContainerRelative::sized(Length::Square, Length::Square);
        assert_eq!(
            Position::container(both_square),
            Err(LayoutError::MalformedPosition(
                "width and height cannot both be square"
            ))
        );
        let inverted = ContainerRelative {
            min_width: Some(10),
            max_width: Some(5),
            ..ContainerRelative::default()
        };
        assert!(Position::container(inverted).is_err());
        let bad_margin = ContainerRelative::default()
            .with_margins(Margins::uniform(Margin::Percent(150.0)));
        assert!(Position::container(bad_margin).is_err());
        let layer = LayerRelative {
            width: Length::Square,
            height: Length::Square,
        };
        assert!(Position::multi_layer(layer, 0, 0).is_err());
    }

    #[test]
    fn multi_layer_inherits_non_positive_sizes() {
        let spec = LayerRelative {
            width: Length::Px(-1),
            height: Length::Px(25),
        };
        let p = Position::multi_layer(spec, 5, 6).unwrap();
        let cx = attached(Rect::new(100, 200, 40, 50));
        assert_eq!(p.resolve(&cx), Rect::new(105, 206, 40, 25));
        assert_eq!(
            p.resolve(&ResolveContext::default()),
            Rect::new(5, 6, 0, 25)
        );
    }

    #[test]
    fn grid_cell_uses_tile_size() {
        let mut p = Position::grid_cell(16, 8);
        p.set_x(32);
        p.set_y(8);
        p.set_w(999);
        assert_eq!(p.resolve(&ResolveContext::default()), Rect::new(32, 8, 16, 8));
    }

    #[test]
    fn cell_limit_caps_width() {
        let mut p = Position::container(ContainerRelative::sized(120, 10)).unwrap();
        p.cell_width_limit = Some(50);
        assert_eq!(p.resolve_width(&ResolveContext::default()), 50);
    }
}
