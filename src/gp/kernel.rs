//! gp::kernel — constant × RBF covariance and hyperparameter bounds.
//!
//! `k(a, b) = σ² · exp(-(a - b)² / (2ℓ²))`
//!
//! Hyperparameters are optimized as `θ = (ln σ², ln ℓ)`; [`ParamBounds`]
//! owns the clamped log map between `θ` and `[lower, upper]` and the penalty
//! charged outside the box.
use nalgebra::DMatrix;
use ndarray::ArrayView1;

use crate::{
    gp::errors::{GpError, GpResult},
    optimization::numerical_stability::{bounded_from_log, log_box_penalty, log_from_bounded},
};

/// Closed positive interval for one hyperparameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamBounds {
    pub lower: f64,
    pub upper: f64,
}

impl ParamBounds {
    /// Errors
    /// ------
    /// - [`GpError::InvalidBounds`] unless `0 < lower <= upper`, both finite.
    pub fn new(name: &'static str, lower: f64, upper: f64) -> GpResult<Self> {
        let valid = lower.is_finite() && upper.is_finite() && lower > 0.0 && lower <= upper;
        if !valid {
            return Err(GpError::InvalidBounds { name, lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// `ln value`, with `value` first clamped into the bounds.
    pub fn to_log(&self, value: f64) -> f64 {
        log_from_bounded(value, self.lower, self.upper)
    }

    /// `exp theta` projected onto the bounds.
    pub fn from_log(&self, theta: f64) -> f64 {
        bounded_from_log(theta, self.lower, self.upper)
    }

    /// Penalty for `theta` outside `[ln lower, ln upper]`; zero inside.
    pub fn penalty(&self, theta: f64) -> f64 {
        log_box_penalty(theta, self.lower, self.upper)
    }

    /// Log coordinate at fraction `u` of the log interval. `u ~ U(0, 1)`
    /// gives a log-uniform draw.
    pub fn log_uniform_theta(&self, u: f64) -> f64 {
        let (ln_lo, ln_hi) = (self.lower.ln(), self.upper.ln());
        ln_lo + u * (ln_hi - ln_lo)
    }
}

/// Constant-amplitude squared-exponential kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRbf {
    pub amplitude: f64,
    pub length_scale: f64,
}

impl ConstantRbf {
    pub fn eval(&self, a: f64, b: f64) -> f64 {
        let d = (a - b) / self.length_scale;
        self.amplitude * (-0.5 * d * d).exp()
    }

    /// `K(x, x) + diag(noise)`.
    pub fn gram(&self, x: ArrayView1<f64>, noise: ArrayView1<f64>) -> DMatrix<f64> {
        let n = x.len();
        DMatrix::from_fn(n, n, |i, j| {
            let k = self.eval(x[i], x[j]);
            if i == j { k + noise[i] } else { k }
        })
    }

    /// `K(x_train, x_query)` with shape `(n_train, n_query)`.
    pub fn cross(&self, x_train: ArrayView1<f64>, x_query: ArrayView1<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(x_train.len(), x_query.len(), |i, j| self.eval(x_train[i], x_query[j]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Bounds validation, the log round trip and the box penalty.
    // - Kernel symmetry, diagonal and noise placement.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Bounds reject malformed intervals and map values both ways.
    //
    // Given
    // -----
    // - [0, 1], [2, 1], [1e-2, 1e2]; value 10; draw fractions 0 and 1;
    //   θ = ln 1e3 beyond the upper bound.
    //
    // Expect
    // ------
    // - First two rejected; 10 survives the round trip; the draws hit the
    //   endpoints; θ past the bound maps to the bound and is penalized.
    fn bounds_validate_and_round_trip() {
        // Arrange
        let b = ParamBounds::new("length_scale", 1e-2, 1e2).unwrap();

        // Act / Assert
        assert!(matches!(ParamBounds::new("x", 0.0, 1.0), Err(GpError::InvalidBounds { .. })));
        assert!(matches!(ParamBounds::new("x", 2.0, 1.0), Err(GpError::InvalidBounds { .. })));
        assert!((b.from_log(b.to_log(10.0)) - 10.0).abs() < 1e-9);
        assert!((b.log_uniform_theta(0.5) - 0.0).abs() < 1e-12);
        assert!((b.from_log(b.log_uniform_theta(0.0)) - 1e-2).abs() < 1e-12);
        assert!((b.from_log(b.log_uniform_theta(1.0)) - 1e2).abs() < 1e-9);
        assert_eq!(b.from_log(1e3f64.ln()), 1e2);
        assert_eq!(b.penalty(0.0), 0.0);
        assert!(b.penalty(1e3f64.ln()) > 0.0);
        assert!(b.contains(1e2) && !b.contains(1e3));
    }

    #[test]
    // Purpose
    // -------
    // The Gram matrix is symmetric with amplitude plus noise on the diagonal.
    //
    // Given
    // -----
    // - σ² = 2, ℓ = 1, x = [0, 1, 3], noise = [0.1, 0.2, 0.3].
    //
    // Expect
    // ------
    // - K[i,i] = 2 + noise[i]; K[0,1] = 2 e^{-1/2} = K[1,0].
    fn gram_is_symmetric_with_noise_on_diagonal() {
        // Arrange
        let k = ConstantRbf { amplitude: 2.0, length_scale: 1.0 };
        let x = array![0.0, 1.0, 3.0];
        let noise = array![0.1, 0.2, 0.3];

        // Act
        let gram = k.gram(x.view(), noise.view());
        let cross = k.cross(x.view(), array![0.0].view());

        // Assert
        for i in 0..3 {
            assert!((gram[(i, i)] - 2.0 - noise[i]).abs() < 1e-12);
        }
        assert!((gram[(0, 1)] - 2.0 * (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(gram[(0, 1)], gram[(1, 0)]);
        assert_eq!(cross.shape(), (3, 1));
        assert!((cross[(0, 0)] - 2.0).abs() < 1e-12);
    }
}
