//! phase::cost — masked mean absolute percentage error.
use ndarray::ArrayView1;

use crate::phase::errors::{PhaseError, PhaseResult};

/// Denominator floor for observed fluxes near zero.
pub const MAPE_FLOOR: f64 = 1e-7;

/// `100 · mean(|o − p| / max(|o|, 1e-7))` over unmasked wavelengths.
///
/// `mask[i] == true` excludes wavelength `i`. An all-`false` mask gives the
/// same value, bit for bit, as no mask.
///
/// Errors
/// ------
/// - [`PhaseError::LengthMismatch`] if `predicted` or `mask` differ in
///   length from `observed`.
/// - [`PhaseError::AllWavelengthsMasked`] if nothing is left to score.
pub fn masked_mape(
    observed: ArrayView1<f64>, predicted: ArrayView1<f64>, mask: Option<&[bool]>,
) -> PhaseResult<f64> {
    if predicted.len() != observed.len() {
        return Err(PhaseError::LengthMismatch { expected: observed.len(), found: predicted.len() });
    }
    if let Some(m) = mask
        && m.len() != observed.len()
    {
        return Err(PhaseError::LengthMismatch { expected: observed.len(), found: m.len() });
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for (i, (&o, &p)) in observed.iter().zip(predicted.iter()).enumerate() {
        if mask.is_some_and(|m| m[i]) {
            continue;
        }
        total += (o - p).abs() / o.abs().max(MAPE_FLOOR);
        count += 1;
    }
    if count == 0 {
        return Err(PhaseError::AllWavelengthsMasked);
    }
    Ok(100.0 * total / count as f64)
}
