// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary returned from [`Scene::commit`](crate::Scene::commit).

use alloc::vec::Vec;

use kurbo::Rect;

/// Regions whose pixels changed since the previous commit.
///
/// Added and removed nodes contribute their rectangle. Moved or resized
/// nodes contribute both their old and new rectangles. Rectangles may
/// overlap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// Rectangles to repaint, in window pixels.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Smallest rectangle covering every dirty rect, `None` when clean.
    pub fn union_rect(&self) -> Option<Rect> {
        self.dirty_rects.iter().copied().reduce(|acc, r| acc.union(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_all_rects() {
        let damage = Damage {
            dirty_rects: alloc::vec![
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rect::new(20.0, 5.0, 30.0, 40.0),
            ],
        };
        assert_eq!(damage.union_rect(), Some(Rect::new(0.0, 0.0, 30.0, 40.0)));
        assert_eq!(Damage::default().union_rect(), None);
        assert!(Damage::default().is_empty());
    }
}
