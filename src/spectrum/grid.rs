//! spectrum::grid — the fixed wavelength grid and the `Spectrum` container.
//!
//! Purpose
//! -------
//! Pin down the single wavelength grid every component works on
//! (`3800, 3802, …, 7198`, 1700 points) and provide a validated
//! `(wavelength, flux)` container with the normalization checks the
//! parameterizer and phase estimator rely on.
//!
//! Invariants & assumptions
//! ------------------------
//! - A [`Spectrum`] always has equal-length, non-empty, finite wavelength and
//!   flux arrays.
//! - "On the standard grid" and "normalized" are checked elementwise with
//!   `|a - b| <= atol + rtol·|b|` (`rtol = 1e-5`, `atol = 1e-8`); upstream
//!   resampling leaves float noise.
//!
//! Conventions
//! -----------
//! - Bad-wavelength masks are `&[bool]` where `true` flags an *invalid*
//!   wavelength that must be excluded from scoring.
use ndarray::Array1;

use crate::spectrum::errors::{SpectrumError, SpectrumResult};

/// First wavelength of the fixed grid.
pub const GRID_START: f64 = 3800.0;

/// Exclusive upper edge of the fixed grid.
pub const GRID_STOP: f64 = 7200.0;

/// Spacing between consecutive grid points.
pub const GRID_STEP: f64 = 2.0;

/// Number of points on the fixed grid.
pub const GRID_LEN: usize = 1700;

/// Relative tolerance of the grid and normalization checks.
pub const CLOSE_RTOL: f64 = 1e-5;

/// Absolute tolerance of the grid and normalization checks.
pub const CLOSE_ATOL: f64 = 1e-8;

/// The fixed wavelength grid: 3800, 3802, …, 7198.
pub fn standard_wavelengths() -> Array1<f64> {
    Array1::from_shape_fn(GRID_LEN, |i| GRID_START + GRID_STEP * i as f64)
}

/// `|a - b| <= atol + rtol * |b|` (asymmetric in `b`).
#[inline]
pub fn isclose(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    (a - b).abs() <= atol + rtol * b.abs()
}

/// First index where `a` and `b` disagree under the default tolerances.
fn first_mismatch(a: &Array1<f64>, b: &Array1<f64>) -> Option<usize> {
    a.iter().zip(b.iter()).position(|(&x, &y)| !isclose(x, y, CLOSE_RTOL, CLOSE_ATOL))
}

/// Spectrum — ordered `(wavelength, flux)` pair.
///
/// Fields
/// ------
/// - `wavelength`: `Array1<f64>`, monotonically increasing for any spectrum
///   that passes [`Spectrum::validate_standard`].
/// - `flux`: `Array1<f64>`, same length as `wavelength`.
///
/// Invariants
/// ----------
/// - Equal, non-zero lengths; all values finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub wavelength: Array1<f64>,
    pub flux: Array1<f64>,
}

impl Spectrum {
    /// Build a spectrum from arbitrary wavelength/flux arrays.
    ///
    /// Errors
    /// ------
    /// - [`SpectrumError::Empty`] when no samples are given.
    /// - [`SpectrumError::LengthMismatch`] when the arrays differ in length.
    /// - [`SpectrumError::NonFinite`] on the first NaN/∞ entry.
    pub fn new(wavelength: Array1<f64>, flux: Array1<f64>) -> SpectrumResult<Self> {
        if wavelength.is_empty() {
            return Err(SpectrumError::Empty);
        }
        if wavelength.len() != flux.len() {
            return Err(SpectrumError::LengthMismatch {
                expected: wavelength.len(),
                found: flux.len(),
            });
        }
        check_finite(&wavelength, "wavelength")?;
        check_finite(&flux, "flux")?;
        Ok(Self { wavelength, flux })
    }

    /// Build a spectrum on the fixed grid from a flux array.
    pub fn on_standard_grid(flux: Array1<f64>) -> SpectrumResult<Self> {
        Self::new(standard_wavelengths(), flux)
    }

    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// Arithmetic mean of the flux.
    pub fn mean_flux(&self) -> f64 {
        self.flux.sum() / self.flux.len() as f64
    }

    /// Check the component contract: fixed grid and mean flux ≈ 1.0.
    ///
    /// Errors
    /// ------
    /// - [`SpectrumError::LengthMismatch`] / [`SpectrumError::GridMismatch`]
    ///   when the wavelengths are not the fixed grid.
    /// - [`SpectrumError::NotNormalized`] when `mean(flux)` is not close to 1.
    pub fn validate_standard(&self) -> SpectrumResult<()> {
        let grid = standard_wavelengths();
        if self.wavelength.len() != grid.len() {
            return Err(SpectrumError::LengthMismatch {
                expected: grid.len(),
                found: self.wavelength.len(),
            });
        }
        if let Some(index) = first_mismatch(&self.wavelength, &grid) {
            return Err(SpectrumError::GridMismatch {
                index,
                expected: grid[index],
                found: self.wavelength[index],
            });
        }
        let mean = self.mean_flux();
        if !isclose(mean, 1.0, CLOSE_RTOL, CLOSE_ATOL) {
            return Err(SpectrumError::NotNormalized { mean });
        }
        Ok(())
    }

    /// Return a copy with flux divided by its mean.
    ///
    /// Errors
    /// ------
    /// - [`SpectrumError::DegenerateMean`] when the mean is zero or not finite.
    pub fn normalized(&self) -> SpectrumResult<Self> {
        let mean = self.mean_flux();
        if !mean.is_finite() || mean.abs() < f64::EPSILON {
            return Err(SpectrumError::DegenerateMean { mean });
        }
        Ok(Self { wavelength: self.wavelength.clone(), flux: &self.flux / mean })
    }
}

/// Check that an optional bad-wavelength mask matches a spectrum length.
pub fn validate_mask(mask: Option<&[bool]>, len: usize) -> SpectrumResult<()> {
    match mask {
        Some(m) if m.len() != len => {
            Err(SpectrumError::MaskLengthMismatch { expected: len, found: m.len() })
        }
        _ => Ok(()),
    }
}

fn check_finite(values: &Array1<f64>, field: &'static str) -> SpectrumResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SpectrumError::NonFinite { index, value: values[index], field }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Layout of the fixed wavelength grid.
    // - `Spectrum::new` shape/finiteness checks.
    // - `validate_standard` grid and normalization contract.
    // - `normalized` and mask length validation.
    // -------------------------------------------------------------------------

    fn flat_spectrum() -> Spectrum {
        Spectrum::on_standard_grid(Array1::from_elem(GRID_LEN, 1.0)).expect("valid spectrum")
    }

    #[test]
    // Purpose
    // -------
    // Confirm the grid is 3800..7200 in steps of 2, stop excluded.
    //
    // Given
    // -----
    // - The standard grid.
    //
    // Expect
    // ------
    // - 1700 points, first 3800, last 7198, constant step 2.
    fn standard_wavelengths_layout() {
        // Act
        let grid = standard_wavelengths();

        // Assert
        assert_eq!(grid.len(), 1700);
        assert_eq!(grid[0], 3800.0);
        assert_eq!(grid[GRID_LEN - 1], 7198.0);
        assert!(grid.windows(2).into_iter().all(|w| (w[1] - w[0] - 2.0).abs() < 1e-12));
    }

    #[test]
    // Purpose
    // -------
    // A flat unit spectrum on the grid satisfies the component contract.
    //
    // Given
    // -----
    // - Flux identically 1.0 on the standard grid.
    //
    // Expect
    // ------
    // - `validate_standard` returns `Ok(())`.
    fn validate_standard_accepts_normalized_grid_spectrum() {
        // Arrange
        let spec = flat_spectrum();

        // Act / Assert
        assert!(spec.validate_standard().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Shifted wavelengths are a grid mismatch.
    //
    // Given
    // -----
    // - Standard grid shifted by one unit.
    //
    // Expect
    // ------
    // - `GridMismatch` at index 0, classified as an input contract violation.
    fn validate_standard_rejects_shifted_grid() {
        // Arrange
        let wave = standard_wavelengths() + 1.0;
        let spec = Spectrum::new(wave, Array1::from_elem(GRID_LEN, 1.0)).unwrap();

        // Act
        let err = spec.validate_standard().unwrap_err();

        // Assert
        assert!(matches!(err, SpectrumError::GridMismatch { index: 0, .. }));
        assert_eq!(err.kind(), crate::errors::ErrorKind::InputContractViolation);
    }

    #[test]
    // Purpose
    // -------
    // Flux with mean 2.0 is rejected, and normalizing it fixes the contract.
    //
    // Given
    // -----
    // - Flux identically 2.0.
    //
    // Expect
    // ------
    // - `NotNormalized`, then `normalized()` passes validation.
    fn validate_standard_rejects_unnormalized_flux() {
        // Arrange
        let spec = Spectrum::on_standard_grid(Array1::from_elem(GRID_LEN, 2.0)).unwrap();

        // Act
        let err = spec.validate_standard().unwrap_err();
        let fixed = spec.normalized().unwrap();

        // Assert
        assert!(matches!(err, SpectrumError::NotNormalized { .. }));
        assert!(fixed.validate_standard().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects NaN flux and mismatched lengths.
    //
    // Given
    // -----
    // - A NaN in the flux; a short flux array.
    //
    // Expect
    // ------
    // - `NonFinite` and `LengthMismatch` respectively.
    fn new_rejects_non_finite_and_mismatched_lengths() {
        // Arrange
        let mut flux = Array1::from_elem(GRID_LEN, 1.0);
        flux[10] = f64::NAN;

        // Act
        let nan_err = Spectrum::on_standard_grid(flux).unwrap_err();
        let len_err = Spectrum::on_standard_grid(Array1::from_elem(10, 1.0)).unwrap_err();

        // Assert
        assert!(matches!(nan_err, SpectrumError::NonFinite { index: 10, field: "flux", .. }));
        assert!(matches!(len_err, SpectrumError::LengthMismatch { expected: 1700, found: 10 }));
    }

    #[test]
    // Purpose
    // -------
    // Zero-mean flux cannot be normalized.
    //
    // Given
    // -----
    // - Flux identically 0.
    //
    // Expect
    // ------
    // - `DegenerateMean`, classified as numerical degeneracy.
    fn normalized_rejects_zero_mean() {
        // Arrange
        let spec = Spectrum::on_standard_grid(Array1::zeros(GRID_LEN)).unwrap();

        // Act
        let err = spec.normalized().unwrap_err();

        // Assert
        assert_eq!(err.kind(), crate::errors::ErrorKind::NumericalDegeneracy);
    }

    #[test]
    // Purpose
    // -------
    // Masks must match the spectrum length; `None` is always fine.
    //
    // Given
    // -----
    // - A 3-element mask against length 1700.
    //
    // Expect
    // ------
    // - `MaskLengthMismatch` for the short mask, `Ok` for `None`.
    fn validate_mask_checks_length() {
        // Arrange
        let mask = [false, true, false];

        // Act / Assert
        assert!(matches!(
            validate_mask(Some(&mask), GRID_LEN),
            Err(SpectrumError::MaskLengthMismatch { expected: 1700, found: 3 })
        ));
        assert!(validate_mask(None, GRID_LEN).is_ok());
    }
}
