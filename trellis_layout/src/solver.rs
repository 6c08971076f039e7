// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container packing algorithms.
//!
//! These are pure functions over a slice of [`Packable`] children and the
//! container's [`Frame`]. They return one placement per child, in order, plus
//! the measured content size. The [`Layout`](crate::Layout) arena measures its
//! children into [`Measured`] values, runs one of these, and writes the
//! placements back.
//!
//! Line modes make two passes per line. The first sums sizes plus margins
//! resolved against zero leftover space and accumulates stretch ratios. The
//! second hands each child `leftover * ratio / total_ratio` pixels and resolves
//! its margins against that share.

use alloc::vec::Vec;
use core::ops::Range;

use smallvec::SmallVec;
use trellis_index::Rect;

use crate::margins::Margins;
use crate::position::ContainerRelative;
use crate::types::{Axis, GridConfig, Size};

/// What a container needs to know about a child to pack it.
///
/// Margins take the leftover space on their axis. Children without margins
/// or stretch keep the zero defaults and are packed flush.
pub trait Packable {
    /// Resolved width.
    fn width(&self) -> i32;
    /// Resolved height.
    fn height(&self) -> i32;
    /// Left margin for `space` leftover pixels.
    fn margin_left(&self, _space: i32) -> i32 {
        0
    }
    /// Right margin for `space` leftover pixels.
    fn margin_right(&self, _space: i32) -> i32 {
        0
    }
    /// Top margin for `space` leftover pixels.
    fn margin_top(&self, _space: i32) -> i32 {
        0
    }
    /// Bottom margin for `space` leftover pixels.
    fn margin_bottom(&self, _space: i32) -> i32 {
        0
    }
    /// Weight of this child's share of horizontal leftover space.
    fn width_stretch_ratio(&self) -> f32 {
        0.0
    }
    /// Weight of this child's share of vertical leftover space.
    fn height_stretch_ratio(&self) -> f32 {
        0.0
    }
}

/// A child measured for packing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Measured {
    /// Resolved size.
    pub size: Size,
    /// Margin spec.
    pub margins: Margins,
    /// Effective horizontal stretch ratio.
    pub width_stretch_ratio: f32,
    /// Effective vertical stretch ratio.
    pub height_stretch_ratio: f32,
}

impl Measured {
    /// A child with no margins and no share of leftover space.
    pub fn flush(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// A container-relative child.
    ///
    /// Its stretch ratio only applies on axes where its margins are relative.
    pub fn relative(size: Size, spec: &ContainerRelative) -> Self {
        let ratio = |axis| {
            if spec.margins.is_relative(axis) {
                spec.stretch_ratio(axis)
            } else {
                0.0
            }
        };
        Self {
            size,
            margins: spec.margins,
            width_stretch_ratio: ratio(Axis::Horizontal),
            height_stretch_ratio: ratio(Axis::Vertical),
        }
    }
}

impl Packable for Measured {
    fn width(&self) -> i32 {
        self.size.width
    }
    fn height(&self) -> i32 {
        self.size.height
    }
    fn margin_left(&self, space: i32) -> i32 {
        self.margins.margin_left(space)
    }
    fn margin_right(&self, space: i32) -> i32 {
        self.margins.margin_right(space)
    }
    fn margin_top(&self, space: i32) -> i32 {
        self.margins.margin_top(space)
    }
    fn margin_bottom(&self, space: i32) -> i32 {
        self.margins.margin_bottom(space)
    }
    fn width_stretch_ratio(&self) -> f32 {
        self.width_stretch_ratio
    }
    fn height_stretch_ratio(&self) -> f32 {
        self.height_stretch_ratio
    }
}

/// The container box children are packed into.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Origin (scroll offset applied) and extent.
    pub rect: Rect,
    /// The container's width follows its content.
    pub fit_width: bool,
    /// The container's height follows its content.
    pub fit_height: bool,
}

impl Frame {
    /// A frame whose extent is authoritative on both axes.
    pub fn fixed(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    fn fits(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.fit_width,
            Axis::Vertical => self.fit_height,
        }
    }
}

/// Output of a packing pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arrangement {
    /// One rectangle per child, in input order.
    pub placements: Vec<Rect>,
    /// Measured content extent.
    pub content: Size,
}

fn extent<C: Packable>(c: &C, axis: Axis) -> i32 {
    match axis {
        Axis::Horizontal => c.width(),
        Axis::Vertical => c.height(),
    }
}

fn margins<C: Packable>(c: &C, axis: Axis, space: i32) -> (i32, i32) {
    match axis {
        Axis::Horizontal => (c.margin_left(space), c.margin_right(space)),
        Axis::Vertical => (c.margin_top(space), c.margin_bottom(space)),
    }
}

fn ratio<C: Packable>(c: &C, axis: Axis) -> f32 {
    match axis {
        Axis::Horizontal => c.width_stretch_ratio(),
        Axis::Vertical => c.height_stretch_ratio(),
    }
}

/// Size plus margins at zero leftover space.
fn span<C: Packable>(c: &C, axis: Axis) -> i32 {
    let (lead, trail) = margins(c, axis, 0);
    lead + extent(c, axis) + trail
}

fn origin(rect: Rect, axis: Axis) -> i32 {
    match axis {
        Axis::Horizontal => rect.x,
        Axis::Vertical => rect.y,
    }
}

fn length(rect: Rect, axis: Axis) -> i32 {
    match axis {
        Axis::Horizontal => rect.width,
        Axis::Vertical => rect.height,
    }
}

fn place(axis: Axis, main: i32, cross: i32, w: i32, h: i32) -> Rect {
    match axis {
        Axis::Horizontal => Rect::new(main, cross, w, h),
        Axis::Vertical => Rect::new(cross, main, w, h),
    }
}

fn size_of(axis: Axis, main: i32, cross: i32) -> Size {
    match axis {
        Axis::Horizontal => Size::new(main, cross),
        Axis::Vertical => Size::new(cross, main),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Shares are truncated to whole pixels."
)]
fn share(leftover: i32, ratio: f32, total_ratio: f32) -> i32 {
    if total_ratio > 0.0 {
        (leftover as f32 * (ratio / total_ratio)) as i32
    } else {
        0
    }
}

/// Pack `children` on one line along `axis`.
///
/// ```
/// use trellis_index::Rect;
/// use trellis_layout::{Axis, Frame, Measured, Size, pack_line};
///
/// let kids = [Measured::flush(Size::new(10, 5)), Measured::flush(Size::new(20, 8))];
/// let out = pack_line(&kids, Axis::Horizontal, Frame::fixed(Rect::new(0, 0, 100, 50)));
/// assert_eq!(out.placements[1], Rect::new(10, 0, 20, 8));
/// assert_eq!(out.content, Size::new(30, 8));
/// ```
pub fn pack_line<C: Packable>(children: &[C], axis: Axis, frame: Frame) -> Arrangement {
    let mut placements = Vec::with_capacity(children.len());
    let content = pack_line_into(children, axis, frame, &mut placements);
    Arrangement {
        placements,
        content,
    }
}

fn pack_line_into<C: Packable>(
    children: &[C],
    axis: Axis,
    frame: Frame,
    out: &mut Vec<Rect>,
) -> Size {
    let cross = axis.cross();

    let mut total = 0;
    let mut total_ratio = 0.0_f32;
    let mut cross_max = 0;
    for c in children {
        total += span(c, axis);
        total_ratio += ratio(c, axis);
        cross_max = cross_max.max(span(c, cross));
    }

    let leftover = if frame.fits(axis) {
        0
    } else {
        (length(frame.rect, axis) - total).max(0)
    };
    let cross_basis = if frame.fits(cross) {
        cross_max
    } else {
        length(frame.rect, cross)
    };

    let start = origin(frame.rect, axis);
    let cross_start = origin(frame.rect, cross);
    let mut cursor = start;
    for c in children {
        let own = share(leftover, ratio(c, axis), total_ratio);
        let (lead, trail) = margins(c, axis, own);
        let main = cursor + lead;
        let cross_space = (cross_basis - extent(c, cross)).max(0);
        let (cross_lead, _) = margins(c, cross, cross_space);
        out.push(place(
            axis,
            main,
            cross_start + cross_lead,
            c.width(),
            c.height(),
        ));
        cursor = main + extent(c, axis) + trail;
    }
    log::trace!(
        "packed {} children along {axis:?}: total {total}, leftover {leftover}",
        children.len()
    );
    size_of(axis, cursor - start, cross_max)
}

/// Greedy line breaking along `axis`.
///
/// A new line starts when the next child would bring the current line to
/// the frame's extent or past it. A child wider than the frame gets its own
/// line. Frames that fit their content on `axis` never break.
pub fn break_lines<C: Packable>(children: &[C], axis: Axis, frame: Frame) -> Vec<Range<usize>> {
    let limit = length(frame.rect, axis);
    let mut lines = Vec::new();
    let mut start = 0;
    let mut line_len = 0;
    for (i, c) in children.iter().enumerate() {
        let len = span(c, axis);
        if i > start && !frame.fits(axis) && line_len + len >= limit {
            lines.push(start..i);
            start = i;
            line_len = 0;
        }
        line_len += len;
    }
    if start < children.len() {
        lines.push(start..children.len());
    }
    lines
}

/// Pack `children` into lines along `axis`, stacking lines along the cross axis.
///
/// Each line repeats the [`pack_line`] distribution with its own total, and
/// its cross thickness is its thickest child.
pub fn pack_wrapped<C: Packable>(children: &[C], axis: Axis, frame: Frame) -> Arrangement {
    let cross = axis.cross();
    let lines = break_lines(children, axis, frame);
    let mut placements = Vec::with_capacity(children.len());
    let mut longest = 0;
    let mut stacked = 0;
    for line in lines {
        let kids = &children[line];
        let thickness = kids.iter().map(|c| span(c, cross)).max().unwrap_or(0);
        let rect = match axis {
            Axis::Horizontal => Rect::new(
                frame.rect.x,
                frame.rect.y + stacked,
                frame.rect.width,
                thickness,
            ),
            Axis::Vertical => Rect::new(
                frame.rect.x + stacked,
                frame.rect.y,
                thickness,
                frame.rect.height,
            ),
        };
        let line_frame = Frame {
            rect,
            fit_width: axis == Axis::Horizontal && frame.fit_width,
            fit_height: axis == Axis::Vertical && frame.fit_height,
        };
        let used = pack_line_into(kids, axis, line_frame, &mut placements);
        longest = longest.max(match axis {
            Axis::Horizontal => used.width,
            Axis::Vertical => used.height,
        });
        stacked += thickness;
    }
    Arrangement {
        placements,
        content: size_of(axis, longest, stacked),
    }
}

/// Width of one grid cell inside a container `width` pixels wide.
pub fn grid_cell_width(grid: &GridConfig, width: i32) -> i32 {
    let cols = column_count(grid);
    let gaps = grid.col_spacing.saturating_mul(cols - 1);
    ((width - gaps) / cols).max(0)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    reason = "Column counts beyond i32::MAX are clamped."
)]
fn column_count(grid: &GridConfig) -> i32 {
    grid.cols.clamp(1, i32::MAX as usize) as i32
}

/// Pack `children` left to right, top to bottom into `grid.cols` columns.
///
/// Widths are capped at the cell width; each row is as tall as its tallest
/// child. Margins and stretch ratios are not used. A frame that fits its
/// width uses the widest child as the cell width.
pub fn pack_grid<C: Packable>(children: &[C], grid: &GridConfig, frame: Frame) -> Arrangement {
    let cols = column_count(grid);
    let cell_w = if frame.fit_width {
        children.iter().map(Packable::width).max().unwrap_or(0)
    } else {
        grid_cell_width(grid, frame.rect.width)
    };
    let mut placements = Vec::with_capacity(children.len());
    let mut row_y = frame.rect.y;
    let mut rows = 0;
    let mut height = 0;
    let mut used_cols = 0;
    #[allow(clippy::cast_sign_loss, reason = "`cols` is at least 1.")]
    let per_row = cols as usize;
    for row in children.chunks(per_row) {
        let row_h = row.iter().map(Packable::height).max().unwrap_or(0);
        let mut x = frame.rect.x;
        let mut cells: SmallVec<[Rect; 8]> = SmallVec::new();
        for c in row {
            cells.push(Rect::new(x, row_y, c.width().min(cell_w), c.height()));
            x += cell_w + grid.col_spacing;
        }
        placements.extend(cells);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_possible_wrap,
            reason = "A row never holds more than `cols` children."
        )]
        let in_row = row.len() as i32;
        used_cols = used_cols.max(in_row);
        if rows > 0 {
            height += grid.row_spacing;
        }
        height += row_h;
        row_y += row_h + grid.row_spacing;
        rows += 1;
    }
    let width = if used_cols > 0 {
        used_cols * cell_w + (used_cols - 1) * grid.col_spacing
    } else {
        0
    };
    Arrangement {
        placements,
        content: Size::new(width, height),
    }
}
