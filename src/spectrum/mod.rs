//! spectrum — fixed wavelength grid, spectrum container, and resampling.
//!
//! Purpose
//! -------
//! Hold the data-model leaf shared by every other component: the fixed
//! 1700-point wavelength grid, a validated [`Spectrum`] container with the
//! "on-grid and mean-normalized" contract, and the linear interpolation
//! primitive used to move between the fixed grid and the basis grids.
//!
//! Key behaviors
//! -------------
//! - [`standard_wavelengths`] builds 3800..7200 in steps of 2 (stop excluded).
//! - [`Spectrum::validate_standard`] enforces the component contract and
//!   reports violations as [`SpectrumError`] (input contract violations).
//! - [`interp_linear`] interpolates linearly and extrapolates the end
//!   segments past both edges.
//!
//! Invariants & assumptions
//! ------------------------
//! - Homogenization (resampling raw data, gap filling, color correction) is
//!   done upstream; this module only checks the result.
//! - Spectra that do not cover the fixed grid fail validation; nothing is
//!   silently truncated or extrapolated at this boundary.
//!
//! Downstream usage
//! ----------------
//! - `basis` validates inputs and resamples segments via this module.
//! - `surface` resamples reconstructions onto the fixed grid.
//! - `phase` validates observed spectra and masks.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule.

pub mod errors;
pub mod grid;
pub mod interp;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{SpectrumError, SpectrumResult};
pub use self::grid::{
    GRID_LEN, GRID_START, GRID_STEP, GRID_STOP, Spectrum, isclose, standard_wavelengths,
    validate_mask,
};
pub use self::interp::interp_linear;
