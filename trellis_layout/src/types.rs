// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout arena: identifiers, flags, and container styles.

use alloc::string::String;

use crate::position::Position;

/// Identifier for a node in the layout arena (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Width and height pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Layout axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// The other axis.
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (painted and indexed for hit testing).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

bitflags::bitflags! {
    /// Axes on which a container scrolls when its content overflows.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScrollAxes: u8 {
        /// Horizontal scrolling (a horizontal scrollbar along the bottom edge).
        const HORIZONTAL = 0b0000_0001;
        /// Vertical scrolling (a vertical scrollbar along the right edge).
        const VERTICAL   = 0b0000_0010;
    }
}

/// Packing algorithm of a container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Single horizontal line.
    #[default]
    Row,
    /// Single vertical line.
    Column,
    /// Horizontal lines stacked top to bottom.
    RowWrap,
    /// Vertical lines stacked left to right.
    ColumnWrap,
    /// Fixed number of columns, rows grow downward.
    Grid,
}

/// Grid mode parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridConfig {
    /// Number of columns (a value of 0 is treated as 1).
    pub cols: usize,
    /// Vertical gap between rows.
    pub row_spacing: i32,
    /// Horizontal gap between columns.
    pub col_spacing: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 3,
            row_spacing: 0,
            col_spacing: 0,
        }
    }
}

/// Container configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContainerStyle {
    /// Packing algorithm.
    pub align: Align,
    /// Axes that get a scrollbar when content overflows.
    pub overflow: ScrollAxes,
    /// Parameters used when `align` is [`Align::Grid`].
    pub grid: GridConfig,
    /// Thickness of generated scrollbars.
    pub scrollbar_thickness: i32,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            align: Align::Row,
            overflow: ScrollAxes::empty(),
            grid: GridConfig::default(),
            scrollbar_thickness: 10,
        }
    }
}

impl ContainerStyle {
    /// Style with the given packing algorithm and defaults elsewhere.
    pub fn aligned(align: Align) -> Self {
        Self {
            align,
            ..Self::default()
        }
    }
}

/// What a node does with children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// No children.
    Leaf,
    /// Ordered children packed by a [`ContainerStyle`].
    Container(ContainerStyle),
    /// Children stacked in the same box, each positioned against it.
    MultiLayer,
}

impl Role {
    /// Whether this role accepts children.
    pub const fn holds_children(&self) -> bool {
        !matches!(self, Self::Leaf)
    }
}

/// Everything needed to create a node.
#[derive(Clone, Debug)]
pub struct Element {
    /// Name, unique among siblings of a container or multi-layer.
    pub name: String,
    /// Geometry and its resolution strategy.
    pub position: Position,
    /// Child-handling role.
    pub role: Role,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl Element {
    /// A leaf element.
    pub fn leaf(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            role: Role::Leaf,
            flags: NodeFlags::default(),
        }
    }

    /// A container element.
    pub fn container(name: impl Into<String>, position: Position, style: ContainerStyle) -> Self {
        Self {
            name: name.into(),
            position,
            role: Role::Container(style),
            flags: NodeFlags::default(),
        }
    }

    /// A multi-layer element.
    pub fn multi_layer(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            role: Role::MultiLayer,
            flags: NodeFlags::default(),
        }
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }
}
