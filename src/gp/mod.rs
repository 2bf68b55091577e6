//! gp — one-dimensional Gaussian-process smoother.
//!
//! Purpose
//! -------
//! Turn a sparse, noisy curve of `(phase, error)` samples into a smooth
//! curve with uncertainty on a dense grid. The phase estimator uses it to
//! smooth its hypothesis scores.
//!
//! Key behaviors
//! -------------
//! - Kernel `C(σ²) × RBF(ℓ)` plus per-point noise `y_err²` on the diagonal.
//! - Zero prior mean; targets are not normalized.
//! - Hyperparameters maximize the log marginal likelihood with the crate's
//!   L-BFGS optimizer, from the initial kernel and seeded log-uniform
//!   restarts. The search runs on `(ln σ², ln ℓ)`; bounds hold by projection
//!   plus a quadratic penalty outside the box.
//! - NaN targets are dropped; NaN errors take a caller-provided fill value.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fits are deterministic for a fixed seed.
//! - Predictive variances are clamped at zero before the square root.
//!
//! Conventions
//! -----------
//! - `amplitude` is the variance `σ²`, not `σ`.
//! - Linear algebra on the training covariance uses `nalgebra` Cholesky.
//!
//! Testing notes
//! -------------
//! - Unit tests cover closed-form likelihood values, bound mappings, NaN
//!   handling and recovery of a smooth bowl's minimum.

pub mod errors;
pub mod kernel;
pub mod likelihood;
pub mod options;
pub mod smoother;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{GpError, GpResult};
pub use self::kernel::{ConstantRbf, ParamBounds};
pub use self::options::GpOptions;
pub use self::smoother::{FittedGp, GpPrediction, smooth};
