//! basis::params — the `2 × (2 + D)` FPCA coefficient matrix.
//!
//! Row `b` holds `[offset_b, scale_b, score_b_1, …, score_b_D]` for segment
//! `b` (0 = blue, 1 = red). The flattened, row-major form is what the
//! sequence model consumes and emits.
use ndarray::{Array1, Array2, ArrayView1, s};

use crate::basis::{
    basis_set::{N_COMPONENTS, N_SEGMENTS},
    errors::{BasisError, BasisResult},
};

/// Columns per segment row: offset, scale, then `N_COMPONENTS` scores.
pub const PARAM_COLS: usize = 2 + N_COMPONENTS;

/// Length of a flattened parameterization.
pub const PARAM_LEN: usize = N_SEGMENTS * PARAM_COLS;

/// BasisParams — validated FPCA coefficient matrix.
///
/// Invariants
/// ----------
/// - Shape is exactly `(N_SEGMENTS, PARAM_COLS)` = `(2, 92)`.
/// - Every entry is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisParams {
    values: Array2<f64>,
}

impl BasisParams {
    /// Wrap a coefficient matrix after checking shape and finiteness.
    ///
    /// Errors
    /// ------
    /// - [`BasisError::ParamsShape`] for any shape other than `(2, 92)`.
    /// - [`BasisError::NonFiniteParam`] on the first NaN/∞ entry.
    pub fn new(values: Array2<f64>) -> BasisResult<Self> {
        if values.dim() != (N_SEGMENTS, PARAM_COLS) {
            return Err(BasisError::ParamsShape {
                expected: (N_SEGMENTS, PARAM_COLS),
                found: values.dim(),
            });
        }
        if let Some(((row, col), &value)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(BasisError::NonFiniteParam { row, col, value });
        }
        Ok(Self { values })
    }

    /// Rebuild from a row-major flat slice of length [`PARAM_LEN`].
    pub fn from_flat(flat: &[f64]) -> BasisResult<Self> {
        if flat.len() != PARAM_LEN {
            return Err(BasisError::FlatLength { expected: PARAM_LEN, found: flat.len() });
        }
        let values =
            Array2::from_shape_fn((N_SEGMENTS, PARAM_COLS), |(r, c)| flat[r * PARAM_COLS + c]);
        Self::new(values)
    }

    /// Row-major flattening: blue row first, then red.
    pub fn flatten(&self) -> Array1<f64> {
        self.values.iter().copied().collect()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn offset(&self, segment: usize) -> f64 {
        self.values[[segment, 0]]
    }

    pub fn scale(&self, segment: usize) -> f64 {
        self.values[[segment, 1]]
    }

    pub fn scores(&self, segment: usize) -> ArrayView1<'_, f64> {
        self.values.slice(s![segment, 2..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shape and finiteness validation.
    // - Row-major flattening and its inverse.
    // - Accessors for offset/scale/scores.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Flattening walks the blue row before the red row and `from_flat`
    // restores the same matrix.
    //
    // Given
    // -----
    // - Matrix with entry (r, c) = 1000 r + c.
    //
    // Expect
    // ------
    // - flat[92] is the red offset; accessors return the right entries.
    fn flatten_is_row_major_and_invertible() {
        // Arrange
        let values =
            Array2::from_shape_fn((N_SEGMENTS, PARAM_COLS), |(r, c)| (1000 * r + c) as f64);
        let params = BasisParams::new(values).unwrap();

        // Act
        let flat = params.flatten();
        let back = BasisParams::from_flat(flat.as_slice().unwrap()).unwrap();

        // Assert
        assert_eq!(flat.len(), PARAM_LEN);
        assert_eq!(flat[PARAM_COLS], 1000.0);
        assert_eq!(back, params);
        assert_eq!(params.offset(1), 1000.0);
        assert_eq!(params.scale(0), 1.0);
        assert_eq!(params.scores(1)[0], 1002.0);
        assert_eq!(params.scores(0).len(), N_COMPONENTS);
    }

    #[test]
    // Purpose
    // -------
    // Wrong shapes, wrong flat lengths and NaNs are rejected.
    //
    // Given
    // -----
    // - A (2, 91) matrix, a 10-element slice, and a matrix with one NaN.
    //
    // Expect
    // ------
    // - `ParamsShape`, `FlatLength`, `NonFiniteParam`.
    fn new_rejects_bad_shapes_and_nan() {
        // Arrange
        let mut nan = Array2::zeros((N_SEGMENTS, PARAM_COLS));
        nan[[1, 5]] = f64::NAN;

        // Act
        let shape = BasisParams::new(Array2::zeros((2, 91)));
        let flat = BasisParams::from_flat(&[0.0; 10]);
        let non_finite = BasisParams::new(nan);

        // Assert
        assert!(matches!(shape, Err(BasisError::ParamsShape { .. })));
        assert!(matches!(flat, Err(BasisError::FlatLength { expected: 184, found: 10 })));
        assert!(matches!(non_finite, Err(BasisError::NonFiniteParam { row: 1, col: 5, .. })));
    }
}
