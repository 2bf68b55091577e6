//! optimization — L-BFGS log-likelihood maximization and log-scale box constraints.
//!
//! Purpose
//! -------
//! Provide the fitting machinery behind the GP smoother: an argmin-backed
//! maximizer for log-likelihoods (`loglik_optimizer`), clamped log maps and
//! box penalties for bounded positive parameters (`numerical_stability`),
//! and a single error surface (`errors`).
//!
//! Key behaviors
//! -------------
//! - Maximize `ℓ(θ)` from one or many starting points with L-BFGS.
//! - Fall back to finite-difference gradients when no analytic gradient is
//!   provided.
//! - Normalize argmin failures and objective failures into `OptError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers see only unconstrained `θ`; bounded model parameters are
//!   recovered inside the objective by projection, and the objective pays a
//!   penalty for the distance projected away.
//! - Invalid states are reported as `OptError`, never panics.
//!
//! Conventions
//! -----------
//! - Internally the cost is `-ℓ(θ)`; all public results are in terms of `ℓ`.
//! - Entry points that can fail return `OptResult<T>`.
//!
//! Downstream usage
//! ----------------
//! - `gp::likelihood` implements `LogLikelihood` for the log marginal
//!   likelihood and calls `maximize_multistart` with seeded restarts.
//! - `gp::kernel` uses the clamped log map and box penalty for `(σ², ℓ)`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the GP tests exercise the
//!   whole stack end to end on small synthetic data.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::{bounded_from_log, log_box_penalty, log_from_bounded};
}
