//! basis::transform — forward parameterization and inverse reconstruction.
//!
//! Purpose
//! -------
//! Implement the two halves of the FPCA transform pair:
//!
//! - [`parameterize`]: normalized spectrum on the fixed grid →
//!   [`BasisParams`] (`[offset, scale, scores…]` per segment).
//! - [`reconstruct`]: [`BasisParams`] → continuous `(wavelength, flux)` curve
//!   sampled at 1001 points per segment.
//!
//! Key behaviors
//! -------------
//! - Segments are standardized independently (`offset = mean`,
//!   `scale = population std` of the residual) before projection.
//! - The standardized residual is resampled from the 850 fixed-grid points
//!   onto the 1001-point basis grid, the mean template is subtracted, and the
//!   precomputed projector produces the scores.
//! - Reconstruction adds the mean template back into a fresh buffer; the
//!   shared [`BasisSet`] is never mutated.
//!
//! Invariants & assumptions
//! ------------------------
//! - `parameterize` is pure: identical inputs give bit-identical outputs.
//! - For spectra whose standardized residual lies in the span of the basis
//!   (plus the mean template), `reconstruct ∘ parameterize` reproduces the
//!   input up to linear-resampling error.
//!
//! Testing notes
//! -------------
//! - Round-trip accuracy and determinism are checked against the cosine
//!   basis fixture; degenerate segments and contract violations are
//!   checked directly.
use ndarray::{Array1, Array2, s};

use crate::{
    basis::{
        basis_set::{
            BasisSet, N_SEGMENTS, RECON_RESOLUTION, SEGMENT_LEN, recon_wavelengths,
            segment_wavelengths,
        },
        errors::{BasisError, BasisResult},
        params::{BasisParams, PARAM_COLS},
    },
    spectrum::{Spectrum, interp_linear, standard_wavelengths},
};

/// Segment scales at or below this value cannot be standardized.
pub const SCALE_FLOOR: f64 = 1e-12;

/// Reconstructed curve: both segments concatenated in wavelength order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub wavelength: Array1<f64>,
    pub flux: Array1<f64>,
}

/// parameterize — project a normalized spectrum onto the FPCA basis.
///
/// Parameters
/// ----------
/// - `basis`: `&BasisSet`
///   Shared immutable basis with precomputed projectors.
/// - `spectrum`: `&Spectrum`
///   Spectrum on the fixed 1700-point grid with mean flux 1.0.
///
/// Returns
/// -------
/// `BasisResult<BasisParams>`
///   `[[offset_0, scale_0, scores_0…], [offset_1, scale_1, scores_1…]]`.
///
/// Errors
/// ------
/// - `BasisError::Spectrum(GridMismatch | NotNormalized | …)`
///   Input contract violations.
/// - [`BasisError::DegenerateSegment`]
///   A segment's residual standard deviation is at or below [`SCALE_FLOOR`].
///
/// Notes
/// -----
/// - Uses population standard deviation (divide by `n`).
pub fn parameterize(basis: &BasisSet, spectrum: &Spectrum) -> BasisResult<BasisParams> {
    spectrum.validate_standard()?;

    let mut values = Array2::zeros((N_SEGMENTS, PARAM_COLS));
    for segment in 0..N_SEGMENTS {
        let flux = spectrum.flux.slice(s![segment * SEGMENT_LEN..(segment + 1) * SEGMENT_LEN]);
        let n = flux.len() as f64;
        let offset = flux.sum() / n;
        let residual = flux.mapv(|v| v - offset);
        let scale = (residual.mapv(|v| v * v).sum() / n).sqrt();
        if !scale.is_finite() || scale <= SCALE_FLOOR {
            return Err(BasisError::DegenerateSegment { segment, scale });
        }
        let standardized = residual / scale;

        let on_basis_grid = interp_linear(
            segment_wavelengths(segment).view(),
            standardized.view(),
            recon_wavelengths(segment).view(),
        )?;
        let centered = on_basis_grid - &basis.mean(segment);
        let scores = basis.projector(segment).dot(&centered);

        values[[segment, 0]] = offset;
        values[[segment, 1]] = scale;
        values.slice_mut(s![segment, 2..]).assign(&scores);
    }
    BasisParams::new(values)
}

/// reconstruct — rebuild the continuous curve encoded by `params`.
///
/// For each segment `b`:
/// `flux_b = (mean_b + Σ_i score_b,i · φ_b,i) · scale_b + offset_b`
/// on `linspace(B0, B0 + 1698, 1001)`. Segments are concatenated blue then
/// red, so the result has `2 × 1001` samples.
pub fn reconstruct(basis: &BasisSet, params: &BasisParams) -> Reconstruction {
    let total = N_SEGMENTS * RECON_RESOLUTION;
    let mut wavelength = Array1::zeros(total);
    let mut flux = Array1::zeros(total);
    for segment in 0..N_SEGMENTS {
        let residual =
            basis.components(segment).t().dot(&params.scores(segment)) + &basis.mean(segment);
        let curve = residual * params.scale(segment) + params.offset(segment);
        let (lo, hi) = (segment * RECON_RESOLUTION, (segment + 1) * RECON_RESOLUTION);
        wavelength.slice_mut(s![lo..hi]).assign(&recon_wavelengths(segment));
        flux.slice_mut(s![lo..hi]).assign(&curve);
    }
    Reconstruction { wavelength, flux }
}

/// Reconstruct and resample onto the fixed 1700-point grid.
///
/// Edges extrapolate linearly; in practice the fixed grid lies inside the
/// reconstruction span so only interpolation occurs.
pub fn reconstruct_on_grid(basis: &BasisSet, params: &BasisParams) -> BasisResult<Array1<f64>> {
    let rec = reconstruct(basis, params);
    let grid = standard_wavelengths();
    Ok(interp_linear(rec.wavelength.view(), rec.flux.view(), grid.view())?)
}
