//! basis — FPCA Basis Parameterizer (forward) and Reconstructor (inverse).
//!
//! Purpose
//! -------
//! Encode a normalized spectrum on the fixed grid as a compact `2 × 92`
//! coefficient matrix and decode such matrices back into continuous flux
//! curves. This is the representation the sequence model consumes and
//! emits, so its accuracy bounds everything downstream.
//!
//! Key behaviors
//! -------------
//! - [`BasisSet`] holds the immutable basis (2 segments × 90 functions + 2
//!   mean templates at 1001 samples) and precomputes a least-squares
//!   projector per segment at construction.
//! - [`parameterize`] splits the spectrum into blue/red halves (850 points
//!   each), standardizes each half, and projects it with one matrix–vector
//!   product. No helper processes or temp files are involved.
//! - [`reconstruct`] inverts the encoding on the 1001-point-per-segment
//!   reconstruction grid; [`reconstruct_on_grid`] additionally resamples
//!   onto the fixed 1700-point grid.
//! - [`BasisSet::from_csv_dir`] loads the static resource files once at
//!   start-up.
//!
//! Invariants & assumptions
//! ------------------------
//! - The basis set is shared read-only state, passed explicitly by
//!   reference; tests substitute synthetic fixtures.
//! - [`BasisParams`] always has shape `(2, 92)` with finite entries.
//!
//! Conventions
//! -----------
//! - Segment 0 is blue (3800–5498), segment 1 is red (5500–7198).
//! - Standard deviations are population (divide by `n`).
//!
//! Downstream usage
//! ----------------
//! - `surface` reshapes model outputs into [`BasisParams`] and calls
//!   [`reconstruct`].
//! - `phase` parameterizes observed spectra once per estimation.
//!
//! Testing notes
//! -------------
//! - Round-trip (< 1% MAPE), determinism, degenerate segments, projector
//!   exactness and resource loading are covered by unit tests.

pub mod basis_set;
pub mod errors;
pub mod loader;
pub mod params;
pub mod transform;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::basis_set::{
    BasisSet, N_COMPONENTS, N_SEGMENTS, RECON_RESOLUTION, SEGMENT_LEN, SEGMENT_SPAN,
};
pub use self::errors::{BasisError, BasisResult};
pub use self::params::{BasisParams, PARAM_COLS, PARAM_LEN};
pub use self::transform::{Reconstruction, parameterize, reconstruct, reconstruct_on_grid};
