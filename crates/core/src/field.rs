//! Two-dimensional scalar grid with values clamped to [0, 1].
//!
//! A `Field` stores `width * height` f64 values in row-major layout. The
//! comfort grid has hard edges: [`Field::get`] returns `None` past them.

use crate::error::EngineError;

/// A 2D scalar grid with values clamped to [0, 1].
#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

/// Checks that `width * height` is non-zero and representable.
fn cell_count(width: usize, height: usize) -> Result<usize, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(EngineError::InvalidDimensions)
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a field filled with `value`, clamped to [0, 1].
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, EngineError> {
        let len = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value.clamp(0.0, 1.0); len],
        })
    }

    /// Creates a field from a row-major vector, clamping every value to [0, 1].
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, EngineError> {
        let expected = cell_count(width, height)?;
        if data.len() != expected {
            return Err(EngineError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data: data.into_iter().map(|v| v.clamp(0.0, 1.0)).collect(),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    ///
    /// Values written here bypass clamping; callers that fill the whole grid
    /// in one pass clamp as they go.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }

    /// Largest value in the field.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_zero_filled_field() {
        let field = Field::new(4, 3).unwrap();
        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        assert_eq!(field.data().len(), 12);
        assert!(field.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            Field::new(0, 5),
            Err(EngineError::InvalidDimensions)
        ));
        assert!(matches!(
            Field::new(5, 0),
            Err(EngineError::InvalidDimensions)
        ));
        assert!(Field::filled(0, 0, 0.5).is_err());
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        assert!(Field::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn filled_clamps_value() {
        let hi = Field::filled(2, 2, 1.5).unwrap();
        assert!(hi.data().iter().all(|&v| v == 1.0));
        let lo = Field::filled(2, 2, -0.3).unwrap();
        assert!(lo.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn get_reads_row_major() {
        let field = Field::from_data(3, 2, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
        assert_eq!(field.get(2, 0), Some(0.3));
        assert_eq!(field.get(0, 1), Some(0.4));
    }

    #[test]
    fn get_outside_grid_is_none() {
        let field = Field::new(3, 3).unwrap();
        assert_eq!(field.get(3, 0), None);
        assert_eq!(field.get(0, 3), None);
    }

    #[test]
    fn from_data_validates_length_and_clamps() {
        assert!(Field::from_data(2, 2, vec![0.1, 0.2, 0.3]).is_err());
        let field = Field::from_data(2, 1, vec![-1.0, 3.0]).unwrap();
        assert_eq!(field.data(), &[0.0, 1.0]);
    }

    #[test]
    fn iter_yields_row_major_triples() {
        let field = Field::from_data(3, 2, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
        let triples: Vec<_> = field.iter().collect();
        assert_eq!(triples[0], (0, 0, 0.1));
        assert_eq!(triples[2], (2, 0, 0.3));
        assert_eq!(triples[3], (0, 1, 0.4));
        assert_eq!(triples[5], (2, 1, 0.6));
    }

    #[test]
    fn summary_statistics() {
        let field = Field::from_data(2, 2, vec![0.0, 0.5, 0.25, 1.0]).unwrap();
        assert_eq!(field.max(), 1.0);
        assert!((field.mean() - 0.4375).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn from_data_keeps_every_cell_in_range(
                w in 1_usize..=16,
                h in 1_usize..=16,
                v in -10.0_f64..10.0,
            ) {
                let field = Field::from_data(w, h, vec![v; w * h]).unwrap();
                for (x, y, got) in field.iter() {
                    prop_assert!((0.0..=1.0).contains(&got));
                    prop_assert_eq!(field.get(x, y), Some(got));
                }
                prop_assert_eq!(field.get(w, 0), None);
            }
        }
    }
}
