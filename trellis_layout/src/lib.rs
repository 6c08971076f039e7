// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layout: declarative position nodes and container packing.
//!
//! Elements describe their geometry abstractly (fixed pixels, a percentage
//! of the parent, `auto`, `square`, stretch margins) and a [`Layout`] arena
//! turns that into concrete integer rectangles.
//!
//! - [`Position`]: literal `x`, `y`, `w`, `h` plus one [`Strategy`]
//!   (fixed, container-relative, multi-layer-relative, full window, or grid
//!   cell). Resolution is pure and safe before a node is attached.
//! - [`Margins`]: per-side specs resolved against the leftover space a
//!   container hands each child.
//! - [`pack_line`], [`pack_wrapped`], [`pack_grid`]: the packing algorithms,
//!   usable on anything implementing [`Packable`].
//! - [`Layout`]: generational arena of nodes with named children. Its
//!   [`update_layout`](Layout::update_layout) is the single recompute entry
//!   point; [`ContainerStyle`] picks the algorithm per container and
//!   [`Scrollbars`] appear when content overflows an axis that scrolls.
//!
//! Child insertion order is layout order and paint order.
//!
//! # Example
//!
//! ```rust
//! use trellis_index::Rect;
//! use trellis_layout::{
//!     Align, ContainerRelative, ContainerStyle, Element, Layout, Margin, Margins, Position,
//! };
//!
//! let mut layout = Layout::default();
//! let bar = layout.insert_root(Element::container(
//!     "toolbar",
//!     Position::fixed(Rect::new(0, 0, 300, 40)),
//!     ContainerStyle::aligned(Align::Row),
//! ));
//! // A 100% left margin takes all leftover space, pinning the button right.
//! let pinned = ContainerRelative::sized(60, 40).with_margins(Margins {
//!     left: Some(Margin::Percent(100.0)),
//!     ..Margins::default()
//! });
//! let ok = layout
//!     .add_child(bar, Element::leaf("ok", Position::container(pinned).unwrap()))
//!     .unwrap();
//!
//! layout.update_layout(bar);
//! assert_eq!(layout.rect(ok), Some(Rect::new(240, 0, 60, 40)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod length;
mod margins;
mod position;
mod scroll;
mod solver;
mod tree;
mod types;

pub use error::LayoutError;
pub use length::{Length, Margin};
pub use margins::{Margins, Sides};
pub use position::{ContainerRelative, LayerRelative, Position, ResolveContext, Strategy};
pub use scroll::{Scrollbar, Scrollbars};
pub use solver::{
    Arrangement, Frame, Measured, Packable, break_lines, grid_cell_width, pack_grid, pack_line,
    pack_wrapped,
};
pub use tree::Layout;
pub use types::{
    Align, Axis, ContainerStyle, Element, GridConfig, NodeFlags, NodeId, Role, ScrollAxes, Size,
};
