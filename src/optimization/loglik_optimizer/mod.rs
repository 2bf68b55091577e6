//! loglik_optimizer — argmin-backed L-BFGS maximizer for log-likelihoods.
//!
//! Purpose
//! -------
//! Maximize a log-likelihood `ℓ(θ)` over an unconstrained parameter vector.
//! The GP smoother uses it to fit kernel hyperparameters by log marginal
//! likelihood; callers implement [`LogLikelihood`] and call [`maximize`] or
//! [`maximize_multistart`].
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost `-ℓ(θ)`,
//!   with a finite-difference gradient fallback.
//! - [`solver`] builds L-BFGS with More–Thuente or Hager–Zhang line search.
//! - [`api`] runs the executor and normalizes results into [`OptimOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives report invalid states as [`OptError`](crate::optimization::errors::OptError),
//!   never panics.
//! - Options are validated on construction ([`Tolerances::new`],
//!   [`MLEOptions::new`]).
//!
//! Conventions
//! -----------
//! - Everything user-facing (including [`OptimOutcome::value`]) is in terms
//!   of `ℓ`, not the internal cost.
//! - Any constrained ↔ unconstrained mapping happens in the objective, see
//!   `numerical_stability`.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions, FD fallback, solver wiring,
//!   validation and multi-start selection on toy objectives.

pub mod adapter;
pub mod api;
pub mod solver;
pub mod traits;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{maximize, maximize_multistart};
pub use self::solver::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};

pub mod prelude {
    pub use super::api::{maximize, maximize_multistart};
    pub use super::solver::{Cost, Grad, Theta};
    pub use super::traits::{LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
}
