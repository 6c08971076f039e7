// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for world grid operations.

use crate::types::{ElementId, GridPos};

/// Failures reported by [`WorldGrid`][crate::WorldGrid].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum GridError {
    /// The id was never handed out by this grid, or its element was removed.
    #[error("unknown element id {0:?}")]
    UnknownElement(ElementId),
    /// No occupant sits on the cell.
    #[error("no element at cell ({}, {})", .0.x, .0.y)]
    EmptyCell(GridPos),
    /// The element is not registered in the grid.
    #[error("element is not on the grid")]
    MissingElement,
    /// The cell is not one of the positions held by the id.
    #[error("element {id:?} does not occupy ({}, {})", .pos.x, .pos.y)]
    NotOccupying {
        /// Element that was expected on the cell.
        id: ElementId,
        /// Cell that was checked.
        pos: GridPos,
    },
    /// A window or range with negative size, or one too large to materialize.
    #[error("invalid range x {x_min}..{x_max}, y {y_min}..{y_max}")]
    InvalidRange {
        /// Inclusive lower column.
        x_min: i32,
        /// Exclusive upper column.
        x_max: i32,
        /// Inclusive lower row.
        y_min: i32,
        /// Exclusive upper row.
        y_max: i32,
    },
}
