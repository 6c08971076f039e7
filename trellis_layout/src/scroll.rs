// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollbars derived from a container's box and content size.

use trellis_index::Rect;

use crate::types::{Axis, ScrollAxes, Size};

/// A scrollbar owned by an overflowing container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scrollbar {
    /// Scrolling axis.
    pub axis: Axis,
    /// Track rectangle, along the container's bottom or right edge.
    pub rect: Rect,
    /// Visible extent of the container on `axis`.
    pub viewport_extent: i32,
    /// Content extent on `axis`.
    pub content_extent: i32,
    /// Scroll offset on `axis`; negative values scroll content backward.
    pub offset: i32,
}

impl Scrollbar {
    /// Maximum distance content can be scrolled.
    pub fn range(&self) -> i32 {
        (self.content_extent - self.viewport_extent).max(0)
    }

    /// Thumb rectangle inside the track.
    ///
    /// The thumb length is proportional to the visible fraction of the
    /// content and its position to the scrolled distance.
    pub fn thumb_rect(&self) -> Rect {
        let track = match self.axis {
            Axis::Horizontal => self.rect.width,
            Axis::Vertical => self.rect.height,
        };
        let content = i64::from(self.content_extent.max(1));
        let len = (i64::from(track) * i64::from(self.viewport_extent.max(0)) / content)
            .clamp(0, i64::from(track));
        let range = i64::from(self.range());
        let scrolled = (-i64::from(self.offset)).clamp(0, range);
        let pos = if range > 0 {
            (i64::from(track) - len) * scrolled / range
        } else {
            0
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Both values are bounded by the i32 track length."
        )]
        let (pos, len) = (pos as i32, len as i32);
        match self.axis {
            Axis::Horizontal => Rect::new(self.rect.x + pos, self.rect.y, len, self.rect.height),
            Axis::Vertical => Rect::new(self.rect.x, self.rect.y + pos, self.rect.width, len),
        }
    }
}

/// Scrollbars of one container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Scrollbars {
    /// Bar along the bottom edge.
    pub horizontal: Option<Scrollbar>,
    /// Bar along the right edge.
    pub vertical: Option<Scrollbar>,
}

impl Scrollbars {
    /// Whether neither bar exists.
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }

    /// Create, reposition, or tear down bars after a layout pass.
    pub(crate) fn sync(
        &mut self,
        overflow: ScrollAxes,
        bounds: Rect,
        content: Size,
        (dx, dy): (i32, i32),
        thickness: i32,
    ) {
        let horizontal = (overflow.contains(ScrollAxes::HORIZONTAL) && content.width > bounds.width)
            .then(|| Scrollbar {
                axis: Axis::Horizontal,
                rect: Rect::new(
                    bounds.x,
                    bounds.bottom() - thickness,
                    bounds.width,
                    thickness,
                ),
                viewport_extent: bounds.width,
                content_extent: content.width,
                offset: dx,
            });
        let vertical = (overflow.contains(ScrollAxes::VERTICAL) && content.height > bounds.height)
            .then(|| Scrollbar {
                axis: Axis::Vertical,
                rect: Rect::new(
                    bounds.right() - thickness,
                    bounds.y,
                    thickness,
                    bounds.height,
                ),
                viewport_extent: bounds.height,
                content_extent: content.height,
                offset: dy,
            });
        note_change(Axis::Horizontal, self.horizontal.is_some(), horizontal.is_some());
        note_change(Axis::Vertical, self.vertical.is_some(), vertical.is_some());
        self.horizontal = horizontal;
        self.vertical = vertical;
    }
}

fn note_change(axis: Axis, had: bool, has: bool) {
    match (had, has) {
        (false, true) => log::debug!("{axis:?} scrollbar created"),
        (true, false) => log::debug!("{axis:?} scrollbar removed"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(offset: i32) -> Scrollbar {
        Scrollbar {
            axis: Axis::Vertical,
            rect: Rect::new(90, 0, 10, 100),
            viewport_extent: 100,
            content_extent: 400,
            offset,
        }
    }

    #[test]
    fn thumb_tracks_offset() {
        assert_eq!(bar(0).thumb_rect(), Rect::new(90, 0, 10, 25));
        assert_eq!(bar(-150).thumb_rect(), Rect::new(90, 37, 10, 25));
        assert_eq!(bar(-300).thumb_rect(), Rect::new(90, 75, 10, 25));
        assert_eq!(bar(-9999).thumb_rect(), Rect::new(90, 75, 10, 25));
        assert_eq!(bar(40).thumb_rect(), Rect::new(90, 0, 10, 25));
    }

    #[test]
    fn bars_follow_overflow() {
        let mut bars = Scrollbars::default();
        let bounds = Rect::new(0, 0, 100, 50);
        bars.sync(ScrollAxes::all(), bounds, Size::new(100, 80), (0, -5), 8);
        assert!(bars.horizontal.is_none(), "width does not overflow");
        let v = bars.vertical.unwrap();
        assert_eq!(v.rect, Rect::new(92, 0, 8, 50));
        assert_eq!(v.offset, -5);

        bars.sync(ScrollAxes::HORIZONTAL, bounds, Size::new(300, 80), (0, 0), 8);
        assert!(bars.vertical.is_none(), "vertical scrolling is disabled");
        assert_eq!(bars.horizontal.unwrap().rect, Rect::new(0, 42, 100, 8));

        bars.sync(ScrollAxes::all(), bounds, Size::new(10, 10), (0, 0), 8);
        assert!(bars.is_empty());
    }
}
