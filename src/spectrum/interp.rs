//! spectrum::interp — piecewise-linear resampling with edge extrapolation.
//!
//! Used to move reconstructed spectra (1001 points per segment) onto the
//! fixed 1700-point grid and to resample standardized segments onto the
//! basis grid. Queries outside the knot range extrapolate linearly from the
//! first/last interval.
use ndarray::{Array1, ArrayView1};

use crate::spectrum::errors::{SpectrumError, SpectrumResult};

/// Linear interpolation of `(x, y)` at `x_query`, extrapolating past the ends.
///
/// Parameters
/// ----------
/// - `x`: knot positions, strictly increasing, length ≥ 2, finite.
/// - `y`: knot values, same length as `x`.
/// - `x_query`: arbitrary (finite) query positions; need not be sorted.
///
/// Returns
/// -------
/// `SpectrumResult<Array1<f64>>` with one value per query point.
///
/// Errors
/// ------
/// - [`SpectrumError::TooFewKnots`], [`SpectrumError::LengthMismatch`],
///   [`SpectrumError::NotIncreasing`], [`SpectrumError::NonFinite`].
///
/// Notes
/// -----
/// - Sorted queries are walked with a moving cursor; unsorted queries fall
///   back to a binary search per point.
pub fn interp_linear(
    x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, x_query: ArrayView1<'_, f64>,
) -> SpectrumResult<Array1<f64>> {
    let n = x.len();
    if n < 2 {
        return Err(SpectrumError::TooFewKnots { found: n });
    }
    if y.len() != n {
        return Err(SpectrumError::LengthMismatch { expected: n, found: y.len() });
    }
    for (i, (&xi, &yi)) in x.iter().zip(y.iter()).enumerate() {
        if !xi.is_finite() {
            return Err(SpectrumError::NonFinite { index: i, value: xi, field: "knot" });
        }
        if !yi.is_finite() {
            return Err(SpectrumError::NonFinite { index: i, value: yi, field: "value" });
        }
        if i > 0 && xi <= x[i - 1] {
            return Err(SpectrumError::NotIncreasing { index: i });
        }
    }

    let mut out = Array1::zeros(x_query.len());
    let mut cursor = 0usize;
    for (k, &q) in x_query.iter().enumerate() {
        if !q.is_finite() {
            return Err(SpectrumError::NonFinite { index: k, value: q, field: "query" });
        }
        // Interval index j such that x[j] <= q < x[j + 1], clamped to [0, n - 2].
        let j = if cursor < n - 1 && q >= x[cursor] {
            while cursor < n - 2 && q >= x[cursor + 1] {
                cursor += 1;
            }
            cursor
        } else {
            let pos = x.as_slice().map_or_else(
                || x.iter().position(|&v| v > q).unwrap_or(n),
                |s| s.partition_point(|&v| v <= q),
            );
            cursor = pos.saturating_sub(1).min(n - 2);
            cursor
        };
        let (x0, x1) = (x[j], x[j + 1]);
        let (y0, y1) = (y[j], y[j + 1]);
        out[k] = y0 + (y1 - y0) * (q - x0) / (x1 - x0);
    }
    Ok(out)
}
