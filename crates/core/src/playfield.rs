//! Continuous playfield geometry and its mapping onto the grid.

use crate::error::EngineError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A `width x height` rectangle of continuous space divided into
/// `cols x rows` equal cells.
///
/// Positions use canvas convention: origin at the top-left, `y` grows
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    width: f64,
    height: f64,
    cols: usize,
    rows: usize,
}

impl Playfield {
    /// Creates a playfield with an explicit grid resolution.
    pub fn new(width: f64, height: f64, cols: usize, rows: usize) -> Result<Self, EngineError> {
        let finite_positive = |v: f64| v.is_finite() && v > 0.0;
        if !finite_positive(width) || !finite_positive(height) {
            return Err(EngineError::InvalidExtent { width, height });
        }
        if cols == 0 || rows == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        cols.checked_mul(rows)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            cols,
            rows,
        })
    }

    /// Creates a playfield whose grid resolution follows from a square cell size.
    ///
    /// Column and row counts are floored, with a minimum of one cell per axis.
    pub fn with_cell_size(width: f64, height: f64, cell_size: f64) -> Result<Self, EngineError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(EngineError::InvalidDimensions);
        }
        let cols = (width / cell_size).floor().max(1.0) as usize;
        let rows = (height / cell_size).floor().max(1.0) as usize;
        Self::new(width, height, cols, rows)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of one cell in playfield units.
    pub fn cell_width(&self) -> f64 {
        self.width / self.cols as f64
    }

    /// Height of one cell in playfield units.
    pub fn cell_height(&self) -> f64 {
        self.height / self.rows as f64
    }

    /// Center of the playfield.
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Center of cell `(col, row)` in playfield units.
    pub fn cell_center(&self, col: usize, row: usize) -> DVec2 {
        DVec2::new(
            (col as f64 + 0.5) * self.cell_width(),
            (row as f64 + 0.5) * self.cell_height(),
        )
    }

    /// True when `p` lies in the half-open rectangle `[0, w) x [0, h)`.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.width && p.y < self.height
    }

    /// Cell containing `p`, or `None` outside the playfield.
    ///
    /// Indices are floored and then pinned to the last column/row so
    /// rounding at the far edge never escapes the grid.
    pub fn cell_of(&self, p: DVec2) -> Option<(usize, usize)> {
        if !self.contains(p) {
            return None;
        }
        let col = ((p.x / self.cell_width()).floor() as usize).min(self.cols - 1);
        let row = ((p.y / self.cell_height()).floor() as usize).min(self.rows - 1);
        Some((col, row))
    }

    /// True when `p` has reached `margin` units or more past any edge.
    pub fn beyond_margin(&self, p: DVec2, margin: f64) -> bool {
        p.x <= -margin
            || p.y <= -margin
            || p.x >= self.width + margin
            || p.y >= self.height + margin
    }
}
