// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the world grid: coordinates, ids, and the cell overlay.

/// Integer cell coordinate: `x` is the column, `y` the row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridPos {
    /// Create a coordinate.
    #[inline(always)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return the coordinate moved by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for GridPos {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Grid-local identifier of an occupant.
///
/// Ids are handed out by [`WorldGrid::add_element_to_grid`][crate::WorldGrid::add_element_to_grid]
/// the first time an element is seen and are never reused within one grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    /// Raw numeric value, stable for the life of the grid.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Quarter-turn rotation of a cell's contents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    #[default]
    R0,
    /// 90 degrees clockwise.
    R90,
    /// 180 degrees.
    R180,
    /// 270 degrees clockwise.
    R270,
}

impl Rotation {
    /// Rotation in degrees.
    pub const fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// Rotation one quarter-turn clockwise from this one.
    pub const fn clockwise(self) -> Self {
        match self {
            Self::R0 => Self::R90,
            Self::R90 => Self::R180,
            Self::R180 => Self::R270,
            Self::R270 => Self::R0,
        }
    }
}

bitflags::bitflags! {
    /// Mirroring applied to a cell's contents.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CellFlip: u8 {
        /// Mirror horizontally.
        const X = 0b0000_0001;
        /// Mirror vertically.
        const Y = 0b0000_0010;
    }
}

/// Per-cell presentation overlay, independent of occupancy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellTransform {
    /// Quarter-turn rotation.
    pub rotation: Rotation,
    /// Mirroring.
    pub flip: CellFlip,
    /// Optional RGBA tint.
    pub tint: Option<[u8; 4]>,
}

impl CellTransform {
    /// Whether this overlay changes nothing.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}
