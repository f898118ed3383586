//! Uniform-grid spatial hash for neighbor queries.
//!
//! The canvas is divided into square cells of `cell_size` pixels. Each
//! vector id lives in exactly one cell, and a parallel id map makes removal
//! and moves O(1). Positions outside the canvas are clamped into the edge
//! cells, so every id stays queryable.
//!
//! With `cell_size` equal to the query radius, a radius query touches at
//! most the 3x3 block of cells around the query point.
//!
//! ```
//! use vecflow::{SpatialGrid, VectorId, DVec2};
//!
//! let mut grid = SpatialGrid::new(50.0, 800.0, 600.0);
//! grid.insert(VectorId(1), DVec2::new(100.0, 100.0));
//! grid.insert(VectorId(2), DVec2::new(130.0, 100.0));
//! grid.insert(VectorId(3), DVec2::new(700.0, 500.0));
//!
//! let near = grid.query(DVec2::new(100.0, 100.0), 50.0);
//! assert_eq!(near, vec![VectorId(1), VectorId(2)]);
//! ```

use crate::vector::VectorId;
use glam::DVec2;
use std::collections::HashMap;

/// Quantized `(col, row)` cell coordinates.
pub type CellKey = (i32, i32);

#[derive(Clone, Copy, Debug)]
struct Entry {
    cell: CellKey,
    position: DVec2,
}

/// Spatial hash over canvas pixel coordinates.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    cols: i32,
    rows: i32,
    cells: HashMap<CellKey, Vec<VectorId>>,
    entries: HashMap<VectorId, Entry>,
}

impl SpatialGrid {
    /// Create an empty grid covering a `width` x `height` canvas.
    ///
    /// Non-positive or non-finite sizes fall back to a single cell.
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let span = |extent: f64| {
            if extent.is_finite() && extent > 0.0 {
                ((extent / cell_size).ceil() as i32).max(1)
            } else {
                1
            }
        };
        Self {
            cell_size,
            cols: span(width),
            rows: span(height),
            cells: HashMap::new(),
            entries: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Grid dimensions as `(cols, rows)`.
    pub fn dims(&self) -> (i32, i32) {
        (self.cols, self.rows)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: VectorId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Last recorded position of `id`.
    pub fn position(&self, id: VectorId) -> Option<DVec2> {
        self.entries.get(&id).map(|e| e.position)
    }

    /// Cell holding `position`, clamped to the grid.
    pub fn cell_of(&self, position: DVec2) -> CellKey {
        let quantize = |v: f64, max: i32| {
            let c = (v / self.cell_size).floor();
            if c.is_finite() {
                (c as i64).clamp(0, (max - 1) as i64) as i32
            } else {
                0
            }
        };
        (quantize(position.x, self.cols), quantize(position.y, self.rows))
    }

    /// Insert `id` at `position`. Inserting an id that is already present
    /// moves it instead.
    pub fn insert(&mut self, id: VectorId, position: DVec2) {
        if self.entries.contains_key(&id) {
            self.update(id, position);
            return;
        }
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(id);
        self.entries.insert(id, Entry { cell, position });
    }

    /// Remove `id`. Returns whether it was present.
    pub fn remove(&mut self, id: VectorId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        self.detach(id, entry.cell);
        true
    }

    /// Move `id` to `position`, inserting it if absent.
    ///
    /// Moves within the same cell only refresh the stored position.
    pub fn update(&mut self, id: VectorId, position: DVec2) {
        let cell = self.cell_of(position);
        match self.entries.get_mut(&id) {
            Some(entry) if entry.cell == cell => {
                entry.position = position;
            }
            Some(entry) => {
                let old = entry.cell;
                entry.cell = cell;
                entry.position = position;
                self.detach(id, old);
                self.cells.entry(cell).or_default().push(id);
            }
            None => self.insert(id, position),
        }
    }

    fn detach(&mut self, id: VectorId, cell: CellKey) {
        if let Some(ids) = self.cells.get_mut(&cell) {
            if let Some(i) = ids.iter().position(|&other| other == id) {
                ids.swap_remove(i);
            }
            if ids.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Ids within `radius` of `center` (inclusive), the query point's own
    /// id included if it is in the grid.
    ///
    /// Results are ordered by cell, then by insertion within a cell, and are
    /// identical for identical grid contents.
    pub fn query(&self, center: DVec2, radius: f64) -> Vec<VectorId> {
        let mut found = Vec::new();
        if !(radius.is_finite() && radius >= 0.0) {
            return found;
        }
        let (cx, cy) = self.cell_of(center);
        // Past the grid extent every cell is already in the window
        let span = self.cols.max(self.rows) as f64;
        let reach = (radius / self.cell_size).ceil().min(span) as i32;
        let (x0, x1) = ((cx - reach).max(0), (cx + reach).min(self.cols - 1));
        let (y0, y1) = ((cy - reach).max(0), (cy + reach).min(self.rows - 1));
        let r2 = radius * radius;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let Some(ids) = self.cells.get(&(x, y)) else {
                    continue;
                };
                for id in ids {
                    if let Some(entry) = self.entries.get(id) {
                        if entry.position.distance_squared(center) <= r2 {
                            found.push(*id);
                        }
                    }
                }
            }
        }
        found
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
    }

    /// Iterate over every `(id, position)` in the grid.
    pub fn iter(&self) -> impl Iterator<Item = (VectorId, DVec2)> + '_ {
        self.entries.iter().map(|(id, e)| (*id, e.position))
    }
}
