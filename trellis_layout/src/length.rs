// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative size and margin literals.
//!
//! Both types parse from the strings used in scene descriptions:
//! `"120"` (pixels), `"50%"`, `"auto"`, and `"square"`.

use alloc::string::ToString;
use core::str::FromStr;

use crate::error::LayoutError;

/// Size of one axis of a position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    /// Fixed pixels.
    Px(i32),
    /// Percentage of the parent's extent on the same axis.
    Percent(f32),
    /// Driven by content: the stored literal, overwritten by the owning layout.
    Auto,
    /// Mirrors the other axis.
    Square,
}

impl Length {
    /// Whether the value is content-driven.
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    pub(crate) fn check(&self) -> Result<(), LayoutError> {
        match self {
            Self::Percent(p) if !p.is_finite() || *p < 0.0 => {
                Err(LayoutError::MalformedPosition("percentage must be finite and non-negative"))
            }
            _ => Ok(()),
        }
    }
}

impl From<i32> for Length {
    fn from(px: i32) -> Self {
        Self::Px(px)
    }
}

impl FromStr for Length {
    type Err = LayoutError;

    /// ```
    /// use trellis_layout::Length;
    ///
    /// assert_eq!("auto".parse::<Length>(), Ok(Length::Auto));
    /// assert_eq!(" 40% ".parse::<Length>(), Ok(Length::Percent(40.0)));
    /// assert_eq!("-3".parse::<Length>(), Ok(Length::Px(-3)));
    /// assert!("wide".parse::<Length>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match t {
            "auto" => Ok(Self::Auto),
            "square" => Ok(Self::Square),
            _ => match parse_percent(t) {
                Some(p) => p.map(Self::Percent),
                None => t.parse::<i32>().map(Self::Px).map_err(|_| ()),
            }
            .map_err(|()| LayoutError::InvalidLength(s.to_string())),
        }
    }
}

/// One margin side (or the shared margin) of a position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Margin {
    /// Fixed pixels, independent of leftover space.
    Px(i32),
    /// Percentage of the leftover space handed to the child.
    Percent(f32),
}

impl Margin {
    /// Resolve against `space` pixels of leftover space.
    pub fn resolve(self, space: i32) -> i32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(p) => percent_of(p, space),
        }
    }

    /// Whether the margin depends on leftover space.
    pub const fn is_percent(&self) -> bool {
        matches!(self, Self::Percent(_))
    }

    pub(crate) fn check(&self) -> Result<(), LayoutError> {
        match self {
            Self::Percent(p) if !p.is_finite() || !(0.0..=100.0).contains(p) => Err(
                LayoutError::MalformedPosition("margin percentage must lie in 0..=100"),
            ),
            _ => Ok(()),
        }
    }
}

impl From<i32> for Margin {
    fn from(px: i32) -> Self {
        Self::Px(px)
    }
}

impl FromStr for Margin {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match parse_percent(t) {
            Some(p) => p.map(Self::Percent),
            None => t.parse::<i32>().map(Self::Px).map_err(|_| ()),
        }
        .map_err(|()| LayoutError::InvalidLength(s.to_string()))
    }
}

/// `Some(Ok)` for a well-formed `"N%"`, `Some(Err)` for a malformed one,
/// `None` when there is no `%` suffix.
fn parse_percent(t: &str) -> Option<Result<f32, ()>> {
    let digits = t.strip_suffix('%')?;
    Some(
        digits
            .trim_end()
            .parse::<f32>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or(()),
    )
}

/// `p` percent of `basis`, truncated toward zero.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Pixel results are truncated to whole pixels."
)]
pub(crate) fn percent_of(p: f32, basis: i32) -> i32 {
    (basis as f32 * p / 100.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lengths() {
        assert_eq!("120".parse::<Length>(), Ok(Length::Px(120)));
        assert_eq!("12.5%".parse::<Length>(), Ok(Length::Percent(12.5)));
        assert_eq!("square".parse::<Length>(), Ok(Length::Square));
        assert_eq!(
            "%".parse::<Length>(),
            Err(LayoutError::InvalidLength("%".into()))
        );
        assert!("nan%".parse::<Length>().is_err());
        assert!("1.5".parse::<Length>().is_err(), "pixel lengths are integers");
    }

    #[test]
    fn parse_margins() {
        assert_eq!("8".parse::<Margin>(), Ok(Margin::Px(8)));
        assert_eq!("50%".parse::<Margin>(), Ok(Margin::Percent(50.0)));
        assert!("auto".parse::<Margin>().is_err());
    }

    #[test]
    fn margin_resolution() {
        assert_eq!(Margin::Px(7).resolve(1000), 7);
        assert_eq!(Margin::Percent(25.0).resolve(200), 50);
        assert_eq!(Margin::Percent(33.0).resolve(10), 3);
        assert_eq!(Margin::Percent(50.0).resolve(0), 0);
    }

    #[test]
    fn checks_reject_out_of_range_percentages() {
        assert!(Length::Percent(-1.0).check().is_err());
        assert!(Length::Percent(250.0).check().is_ok());
        assert!(Margin::Percent(101.0).check().is_err());
        assert!(Margin::Px(-4).check().is_ok());
    }
}
