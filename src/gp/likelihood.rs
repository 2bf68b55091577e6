//! gp::likelihood — log marginal likelihood of a zero-mean GP.
//!
//! For training inputs `x`, targets `y`, per-point noise variances `α` and
//! kernel `K_θ`:
//!
//! `ℓ(θ) = -½ yᵀ (K_θ + diag α)⁻¹ y - Σ ln L_ii - (n/2) ln 2π`
//!
//! where `L` is the Cholesky factor of `K_θ + diag α`. `θ` holds the two
//! log coordinates `(ln σ², ln ℓ)`. Outside the bounds the kernel is taken
//! at the projected point and the box penalty is subtracted from `ℓ`.
use std::f64::consts::PI;

use nalgebra::{Cholesky, DVector, Dyn};
use ndarray::Array1;

use crate::{
    gp::kernel::{ConstantRbf, ParamBounds},
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{LogLikelihood, Theta, validation::validate_theta},
    },
};

/// Number of log coordinates in `θ`.
pub const N_HYPERPARAMS: usize = 2;

/// Training payload for the marginal likelihood.
#[derive(Debug, Clone, PartialEq)]
pub struct GpData {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    /// Per-point noise variance added to the kernel diagonal.
    pub noise: Array1<f64>,
}

/// Log marginal likelihood over bounded `(σ², ℓ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginalLikelihood {
    pub amplitude_bounds: ParamBounds,
    pub length_scale_bounds: ParamBounds,
}

impl MarginalLikelihood {
    /// Kernel at the log coordinates `theta`, projected onto the bounds.
    pub fn kernel(&self, theta: &Theta) -> ConstantRbf {
        ConstantRbf {
            amplitude: self.amplitude_bounds.from_log(theta[0]),
            length_scale: self.length_scale_bounds.from_log(theta[1]),
        }
    }

    /// Log coordinates of `kernel`.
    pub fn theta(&self, kernel: &ConstantRbf) -> Theta {
        Theta::from(vec![
            self.amplitude_bounds.to_log(kernel.amplitude),
            self.length_scale_bounds.to_log(kernel.length_scale),
        ])
    }

    /// Box penalty of `theta`; zero when both coordinates are in bounds.
    pub fn penalty(&self, theta: &Theta) -> f64 {
        self.amplitude_bounds.penalty(theta[0]) + self.length_scale_bounds.penalty(theta[1])
    }
}

/// Cholesky factor of `K + diag(noise)`, or `NotPositiveDefinite`.
pub fn factor(kernel: &ConstantRbf, data: &GpData) -> OptResult<Cholesky<f64, Dyn>> {
    kernel
        .gram(data.x.view(), data.noise.view())
        .cholesky()
        .ok_or(OptError::NotPositiveDefinite { context: "GP training covariance" })
}

/// `ℓ` from an existing factorization; also returns `(K + diag α)⁻¹ y`.
pub fn lml_from_factor(chol: &Cholesky<f64, Dyn>, y: &Array1<f64>) -> (f64, DVector<f64>) {
    let y = DVector::from_iterator(y.len(), y.iter().copied());
    let weights = chol.solve(&y);
    let half_log_det: f64 = chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    let n = y.len() as f64;
    let lml = -0.5 * y.dot(&weights) - half_log_det - 0.5 * n * (2.0 * PI).ln();
    (lml, weights)
}

impl LogLikelihood for MarginalLikelihood {
    type Data = GpData;

    fn value(&self, theta: &Theta, data: &GpData) -> OptResult<f64> {
        let kernel = self.kernel(theta);
        let chol = factor(&kernel, data)?;
        Ok(lml_from_factor(&chol, &data.y).0 - self.penalty(theta))
    }

    fn check(&self, theta: &Theta, _data: &GpData) -> OptResult<()> {
        validate_theta(theta, N_HYPERPARAMS)
    }
}
