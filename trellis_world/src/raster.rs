// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense row-major buffer produced by [`WorldGrid::rasterize`][crate::WorldGrid::rasterize].

use alloc::vec::Vec;

/// A dense `width × height` window of per-cell values in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster<V> {
    width: usize,
    height: usize,
    data: Vec<V>,
}

impl<V> Raster<V> {
    pub(crate) fn from_vec(width: usize, height: usize, data: Vec<V>) -> Self {
        debug_assert_eq!(data.len(), width * height, "raster size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    /// Number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Value at `(col, row)` relative to the window origin.
    pub fn get(&self, col: usize, row: usize) -> Option<&V> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col)
    }

    /// Iterate rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[V]> + '_ {
        // `chunks` rejects a zero chunk size; an empty raster has no rows anyway.
        self.data.chunks(self.width.max(1)).take(self.height)
    }

    /// Flat row-major view.
    pub fn as_slice(&self) -> &[V] {
        &self.data
    }

    /// Consume the raster and return the flat row-major buffer.
    pub fn into_vec(self) -> Vec<V> {
        self.data
    }
}
