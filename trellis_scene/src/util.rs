// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use trellis_index::Rect;

pub(crate) fn to_kurbo(r: Rect) -> kurbo::Rect {
    kurbo::Rect::new(
        f64::from(r.left()),
        f64::from(r.top()),
        f64::from(r.right()),
        f64::from(r.bottom()),
    )
}

/// Pixel containing `pt`, or `None` when it lies outside the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "The floored value is range-checked first."
)]
pub(crate) fn pixel_of(pt: Point) -> Option<(i32, i32)> {
    let p = pt.floor();
    let lo = f64::from(i32::MIN);
    let hi = f64::from(i32::MAX);
    ((lo..=hi).contains(&p.x) && (lo..=hi).contains(&p.y)).then(|| (p.x as i32, p.y as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_floor_toward_negative_infinity() {
        assert_eq!(pixel_of(Point::new(3.7, 0.0)), Some((3, 0)));
        assert_eq!(pixel_of(Point::new(-0.5, -1.0)), Some((-1, -1)));
        assert_eq!(pixel_of(Point::new(f64::NAN, 0.0)), None);
        assert_eq!(pixel_of(Point::new(1e12, 0.0)), None);
    }

    #[test]
    fn rect_edges_carry_over() {
        assert_eq!(
            to_kurbo(Rect::new(-2, 3, 10, 4)),
            kurbo::Rect::new(-2.0, 3.0, 8.0, 7.0)
        );
    }
}
