//! numerical_stability — log-scale box constraints for the optimizer.
//!
//! Purpose
//! -------
//! Let objectives accept any `θ ∈ ℝⁿ` while their positive model parameters
//! respect box constraints. Coordinates are logs of the parameters; points
//! outside the box are projected and penalized rather than squashed, so
//! gradients keep their scale near the bounds.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; bounds satisfy `0 < lower <= upper`. Bound validation
//!   belongs to the caller (see `gp::kernel`).
//! - Pure functions: no logging, no I/O.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover projection, the log map's
//!   bounds and slope, and the penalty's shape.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    BOX_PENALTY, bounded_from_log, interval_excess, log_box_penalty, log_from_bounded,
    project_onto_interval,
};
