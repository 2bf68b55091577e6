//! phase::grid — endpoint-inclusive phase ranges.
use crate::{
    phase::errors::{PhaseError, PhaseResult},
    spectrum::isclose,
};

/// Relative tolerance for deciding whether the stop value is already present.
pub const RANGE_RTOL: f64 = 1e-5;

/// Absolute tolerance (days, ≈ 1.4 min) for the same decision.
pub const RANGE_ATOL: f64 = 1e-3;

/// [`inclusive_range_with_tol`] with the default tolerances.
pub fn inclusive_range(start: f64, stop: f64, step: f64) -> PhaseResult<Vec<f64>> {
    inclusive_range_with_tol(start, stop, step, RANGE_RTOL, RANGE_ATOL)
}

/// Points `start, start + step, …` below `stop`, plus `stop` itself.
///
/// The half-open part has `ceil((stop - start) / step)` points at
/// `start + i·step`. `stop` is appended unless the last point is
/// already within `atol + rtol·|stop|` of it. `start == stop` yields
/// `[stop]`.
///
/// Errors
/// ------
/// - [`PhaseError::InvalidRange`] for non-finite inputs, `step <= 0` or
///   `stop < start`.
pub fn inclusive_range_with_tol(
    start: f64, stop: f64, step: f64, rtol: f64, atol: f64,
) -> PhaseResult<Vec<f64>> {
    let finite = start.is_finite() && stop.is_finite() && step.is_finite();
    if !finite || step <= 0.0 || stop < start {
        return Err(PhaseError::InvalidRange { start, stop, step });
    }
    let n = ((stop - start) / step).ceil() as usize;
    let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    match points.last() {
        Some(&last) if isclose(last, stop, rtol, atol) => {}
        _ => points.push(stop),
    }
    Ok(points)
}
