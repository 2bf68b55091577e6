//! Log-scale box constraints for optimizer coordinates.
//!
//! The GP hyperparameters live on closed positive intervals `[lo, hi]`. The
//! optimizer works on `θ = ln p` directly, so the gradient keeps its scale
//! all the way to the bounds:
//!
//! `p(θ) = exp(clamp(θ, ln lo, ln hi))`
//!
//! Outside `[ln lo, ln hi]` the parameter sticks to the bound and the
//! objective subtracts [`log_box_penalty`], a quadratic in the distance to
//! the box. The penalized objective is continuous and pulls line searches
//! that overshoot back inside; a final projection lands any converged point
//! on the box.
//!
//! # Provided items
//! - [`BOX_PENALTY`]: curvature of the penalty outside the box.
//! - [`project_onto_interval`] / [`interval_excess`]: projection onto
//!   `[lo, hi]` and the distance to it.
//! - [`bounded_from_log`] / [`log_from_bounded`]: the clamped log map and
//!   its inverse.
//! - [`log_box_penalty`]: `½ · BOX_PENALTY · excess²` on the log scale.

/// Curvature of the quadratic penalty outside the log box.
pub const BOX_PENALTY: f64 = 1e4;

/// Nearest point of `[lo, hi]` to `x`. Assumes `lo <= hi`.
pub fn project_onto_interval(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Distance from `x` to `[lo, hi]`; zero inside.
pub fn interval_excess(x: f64, lo: f64, hi: f64) -> f64 {
    (lo - x).max(0.0) + (x - hi).max(0.0)
}

/// Parameter value at log coordinate `theta`, projected onto
/// `[lower, upper]`.
///
/// Parameters
/// ----------
/// - `lower`, `upper`: finite bounds with `0 < lower <= upper`.
///
/// Notes
/// -----
/// The final clamp keeps `exp(ln x)` round-off from stepping outside the
/// bounds.
pub fn bounded_from_log(theta: f64, lower: f64, upper: f64) -> f64 {
    project_onto_interval(theta, lower.ln(), upper.ln()).exp().max(lower).min(upper)
}

/// Inverse of [`bounded_from_log`]; values outside the bounds map to the
/// nearest bound's log.
pub fn log_from_bounded(value: f64, lower: f64, upper: f64) -> f64 {
    project_onto_interval(value, lower, upper).ln()
}

/// Quadratic penalty for `theta` outside `[ln lower, ln upper]`.
pub fn log_box_penalty(theta: f64, lower: f64, upper: f64) -> f64 {
    let excess = interval_excess(theta, lower.ln(), upper.ln());
    0.5 * BOX_PENALTY * excess * excess
}
