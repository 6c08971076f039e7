// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse world grid: integer cells mapped to occupant ids.
//!
//! The grid owns only the id ↔ cell associations. Elements are small handles
//! (entity keys, indices, interned names) cloned into the grid so it can hand
//! back the same id the next time the same element is added.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use trellis_index::{MissingPolicy, Rect};

use crate::error::GridError;
use crate::raster::Raster;
use crate::types::{CellTransform, ElementId, GridPos};
use crate::util::{SampleRng, isqrt_ceil};

/// Sparse tile grid keyed by [`GridPos`].
pub struct WorldGrid<E> {
    tile_width: i32,
    tile_height: i32,
    cells: HashMap<GridPos, ElementId>,
    positions: HashMap<ElementId, HashSet<GridPos>>,
    elements: HashMap<ElementId, E>,
    ids: HashMap<E, ElementId>,
    transforms: HashMap<GridPos, CellTransform>,
    next_id: u32,
    rng: SampleRng,
}

impl<E> Debug for WorldGrid<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorldGrid")
            .field("tile_width", &self.tile_width)
            .field("tile_height", &self.tile_height)
            .field("occupied_cells", &self.cells.len())
            .field("elements", &self.elements.len())
            .field("transforms", &self.transforms.len())
            .finish_non_exhaustive()
    }
}

impl<E: Clone + Eq + Hash> WorldGrid<E> {
    /// Create an empty grid whose cells are `tile_width × tile_height` pixels.
    pub fn new(tile_width: i32, tile_height: i32) -> Self {
        Self::with_seed(tile_width, tile_height, SampleRng::DEFAULT_SEED)
    }

    /// Create an empty grid with an explicit seed for empty-cell sampling.
    pub fn with_seed(tile_width: i32, tile_height: i32, seed: u64) -> Self {
        debug_assert!(
            tile_width > 0 && tile_height > 0,
            "tile size must be strictly positive"
        );
        Self {
            tile_width,
            tile_height,
            cells: HashMap::new(),
            positions: HashMap::new(),
            elements: HashMap::new(),
            ids: HashMap::new(),
            transforms: HashMap::new(),
            next_id: 0,
            rng: SampleRng::new(seed),
        }
    }

    /// Pixel size of one cell.
    pub fn tile_size(&self) -> (i32, i32) {
        (self.tile_width, self.tile_height)
    }

    /// Register `element` (if new) and place it on every position.
    ///
    /// An element seen before keeps its id; the positions are added to the
    /// ones it already holds.
    pub fn add_element_to_grid<I>(&mut self, element: E, positions: I) -> ElementId
    where
        I: IntoIterator<Item = GridPos>,
    {
        let id = match self.ids.get(&element) {
            Some(&id) => id,
            None => {
                let id = ElementId(self.next_id);
                self.next_id += 1;
                self.ids.insert(element.clone(), id);
                self.elements.insert(id, element);
                self.positions.insert(id, HashSet::new());
                id
            }
        };
        for pos in positions {
            self.occupy(id, pos);
        }
        id
    }

    /// Place a registered element on one more cell.
    pub fn add_element_position(&mut self, id: ElementId, pos: GridPos) -> Result<(), GridError> {
        if !self.elements.contains_key(&id) {
            return Err(GridError::UnknownElement(id));
        }
        self.occupy(id, pos);
        Ok(())
    }

    /// Place a registered element on several cells.
    pub fn add_element_positions<I>(&mut self, id: ElementId, positions: I) -> Result<(), GridError>
    where
        I: IntoIterator<Item = GridPos>,
    {
        if !self.elements.contains_key(&id) {
            return Err(GridError::UnknownElement(id));
        }
        for pos in positions {
            self.occupy(id, pos);
        }
        Ok(())
    }

    /// Clear one cell and return the id that was on it.
    ///
    /// The occupant stays registered even when this was its last cell.
    pub fn remove_at_position(
        &mut self,
        pos: GridPos,
        policy: MissingPolicy,
    ) -> Result<Option<ElementId>, GridError> {
        match self.cells.remove(&pos) {
            Some(id) => {
                if let Some(held) = self.positions.get_mut(&id) {
                    held.remove(&pos);
                }
                Ok(Some(id))
            }
            None if policy.is_error() => Err(GridError::EmptyCell(pos)),
            None => Ok(None),
        }
    }

    /// Clear every cell held by `element` and forget it.
    pub fn remove_element_of_grid(
        &mut self,
        element: &E,
        policy: MissingPolicy,
    ) -> Result<Option<ElementId>, GridError> {
        let Some(id) = self.ids.remove(element) else {
            return if policy.is_error() {
                Err(GridError::MissingElement)
            } else {
                Ok(None)
            };
        };
        if let Some(held) = self.positions.remove(&id) {
            for pos in held {
                if self.cells.get(&pos) == Some(&id) {
                    self.cells.remove(&pos);
                }
            }
        }
        self.elements.remove(&id);
        Ok(Some(id))
    }

    /// Id of the occupant on `pos`, if any.
    pub fn get_element_at_grid_case(&self, pos: GridPos) -> Option<ElementId> {
        self.cells.get(&pos).copied()
    }

    /// Occupant element on `pos`, if any.
    pub fn element_at(&self, pos: GridPos) -> Option<&E> {
        self.cells.get(&pos).and_then(|id| self.elements.get(id))
    }

    /// Element registered under `id`.
    pub fn element(&self, id: ElementId) -> Option<&E> {
        self.elements.get(&id)
    }

    /// Id assigned to `element`, if it is registered.
    pub fn id_of(&self, element: &E) -> Option<ElementId> {
        self.ids.get(element).copied()
    }

    /// Cells held by `id`, in no particular order.
    pub fn positions_of(&self, id: ElementId) -> impl Iterator<Item = GridPos> + '_ {
        self.positions.get(&id).into_iter().flatten().copied()
    }

    /// Whether any occupant sits on `pos`.
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of registered elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Move `id` from `from` to `to`: the step a moving occupant takes when it
    /// drops its tail cell and claims a new head cell.
    pub fn move_element(
        &mut self,
        id: ElementId,
        from: GridPos,
        to: GridPos,
    ) -> Result<(), GridError> {
        if !self.elements.contains_key(&id) {
            return Err(GridError::UnknownElement(id));
        }
        if self.cells.get(&from) != Some(&id) {
            return Err(GridError::NotOccupying { id, pos: from });
        }
        self.cells.remove(&from);
        if let Some(held) = self.positions.get_mut(&id) {
            held.remove(&from);
        }
        self.occupy(id, to);
        Ok(())
    }

    /// A free cell in `x_min..x_max × y_min..y_max`, or `None` if every cell
    /// of the range is occupied (or the range is empty).
    ///
    /// Random probing runs first, with a budget equal to the diagonal of the
    /// range; an exhaustive row-major scan follows if probing finds nothing.
    pub fn get_empty_case_in_range(
        &mut self,
        x_min: i32,
        x_max: i32,
        y_min: i32,
        y_max: i32,
    ) -> Option<GridPos> {
        if x_max <= x_min || y_max <= y_min {
            return None;
        }
        let dx = u64::from(x_max.abs_diff(x_min));
        let dy = u64::from(y_max.abs_diff(y_min));
        let budget = isqrt_ceil(dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)));
        for _ in 0..budget {
            let pos = GridPos::new(self.rng.range(x_min, x_max), self.rng.range(y_min, y_max));
            if !self.cells.contains_key(&pos) {
                return Some(pos);
            }
        }
        log::debug!(
            "no free cell after {budget} samples in x {x_min}..{x_max}, y {y_min}..{y_max}; scanning"
        );
        (y_min..y_max)
            .flat_map(|y| (x_min..x_max).map(move |x| GridPos::new(x, y)))
            .find(|pos| !self.cells.contains_key(pos))
    }

    /// Materialize a dense window of the grid.
    ///
    /// `window` is expressed in cells. Empty cells get a clone of `empty`;
    /// occupied cells get `map(element, id)`.
    pub fn rasterize<V, F>(&self, window: Rect, empty: V, mut map: F) -> Result<Raster<V>, GridError>
    where
        V: Clone,
        F: FnMut(&E, ElementId) -> V,
    {
        let invalid = || GridError::InvalidRange {
            x_min: window.x,
            x_max: window.x.saturating_add(window.width),
            y_min: window.y,
            y_max: window.y.saturating_add(window.height),
        };
        if window.width < 0 || window.height < 0 {
            return Err(invalid());
        }
        let (Some(right), Some(bottom)) = (
            window.x.checked_add(window.width),
            window.y.checked_add(window.height),
        ) else {
            return Err(invalid());
        };
        let width = window.width.unsigned_abs() as usize;
        let height = window.height.unsigned_abs() as usize;
        let mut data = Vec::new();
        width
            .checked_mul(height)
            .and_then(|cells| data.try_reserve_exact(cells).ok())
            .ok_or_else(invalid)?;
        for y in window.y..bottom {
            for x in window.x..right {
                let value = self
                    .cells
                    .get(&GridPos::new(x, y))
                    .and_then(|id| self.elements.get(id).map(|e| map(e, *id)));
                data.push(value.unwrap_or_else(|| empty.clone()));
            }
        }
        Ok(Raster::from_vec(width, height, data))
    }

    /// Pixel rectangle covered by `pos`.
    pub fn cell_rect(&self, pos: GridPos) -> Rect {
        Rect::new(
            pos.x * self.tile_width,
            pos.y * self.tile_height,
            self.tile_width,
            self.tile_height,
        )
    }

    /// Cell containing the pixel `(px, py)`.
    pub fn cell_at_pixel(&self, px: i32, py: i32) -> GridPos {
        // Euclidean division rounds toward -∞, so negative pixels land in negative cells.
        GridPos::new(px.div_euclid(self.tile_width), py.div_euclid(self.tile_height))
    }

    /// Set the presentation overlay of a cell. An identity transform clears it.
    pub fn set_transform(&mut self, pos: GridPos, transform: CellTransform) {
        if transform.is_identity() {
            self.transforms.remove(&pos);
        } else {
            self.transforms.insert(pos, transform);
        }
    }

    /// Overlay of a cell, if one is set.
    pub fn transform_at(&self, pos: GridPos) -> Option<&CellTransform> {
        self.transforms.get(&pos)
    }

    /// Remove and return the overlay of a cell.
    pub fn clear_transform(&mut self, pos: GridPos) -> Option<CellTransform> {
        self.transforms.remove(&pos)
    }

    /// Drop every occupant, registration, and overlay. Ids are not reused.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.positions.clear();
        self.elements.clear();
        self.ids.clear();
        self.transforms.clear();
    }

    fn occupy(&mut self, id: ElementId, pos: GridPos) {
        if let Some(prev) = self.cells.insert(pos, id)
            && prev != id
        {
            log::debug!("cell ({}, {}) taken from {prev:?} by {id:?}", pos.x, pos.y);
            if let Some(held) = self.positions.get_mut(&prev) {
                held.remove(&pos);
            }
        }
        self.positions.entry(id).or_default().insert(pos);
    }
}
