// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis World: a sparse integer tile grid.
//!
//! [`WorldGrid`] maps `(column, row)` cells to occupant ids for tile-world
//! queries such as collision, pathing, and render lookups.
//!
//! - Each distinct element gets a fresh [`ElementId`] the first time it is added
//!   and keeps it afterwards; the grid tracks which cells every id occupies.
//! - The grid does not own domain objects. Elements are cheap handles that are
//!   hashed to find their id again.
//! - A per-cell [`CellTransform`] overlay (rotation, flip, tint) lives alongside
//!   occupancy and is not affected by it.
//! - [`WorldGrid::rasterize`] materializes a dense [`Raster`] over a window for
//!   numeric consumers.
//!
//! # Example
//!
//! ```rust
//! use trellis_index::MissingPolicy;
//! use trellis_world::{GridPos, WorldGrid};
//!
//! let mut grid = WorldGrid::new(16, 16);
//! let snake = grid.add_element_to_grid("snake", [GridPos::new(0, 0), GridPos::new(1, 0)]);
//!
//! // One step to the right: claim the new head, drop the tail.
//! grid.add_element_position(snake, GridPos::new(2, 0)).unwrap();
//! grid.remove_at_position(GridPos::new(0, 0), MissingPolicy::Error).unwrap();
//!
//! assert_eq!(grid.get_element_at_grid_case(GridPos::new(2, 0)), Some(snake));
//! assert_eq!(grid.get_element_at_grid_case(GridPos::new(0, 0)), None);
//!
//! // Somewhere to drop an apple.
//! let free = grid.get_empty_case_in_range(0, 10, 0, 10).unwrap();
//! assert!(!grid.is_occupied(free));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod grid;
mod raster;
mod types;
mod util;

pub use error::GridError;
pub use grid::WorldGrid;
pub use raster::Raster;
pub use types::{CellFlip, CellTransform, ElementId, GridPos, Rotation};
