//! basis::basis_set — immutable FPCA basis and precomputed projectors.
//!
//! Purpose
//! -------
//! Own the fixed functional basis (per segment: `D = 90` basis functions
//! and one mean template, each sampled at 1001 points) and the linear
//! operators derived from it once at construction. The set is loaded once
//! per process and passed by reference to every component; nothing mutates
//! it afterwards.
//!
//! Key behaviors
//! -------------
//! - Validate component/mean shapes and finiteness on construction.
//! - Precompute, per segment, the least-squares projector
//!   `P = (Φ W Φᵀ)⁻¹ Φ W` where `W` holds trapezoid weights on the
//!   normalized segment coordinate `t ∈ [0.001, 0.999]`. Scoring a
//!   standardized residual is then a single matrix–vector product.
//! - Expose the per-segment wavelength layouts: 850 fixed-grid points for
//!   parameterization and 1001 linearly spaced points for reconstruction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Segment `b` spans wavelengths `[3800 + 1700 b, 3800 + 1700 b + 1698]`
//!   in both layouts, so resampling between them never extrapolates.
//! - For an orthonormal basis `P` reduces to the plain weighted inner
//!   product; near-orthonormal bases are handled exactly by the Gram solve.
//!
//! Testing notes
//! -------------
//! - A cosine basis fixture checks projector exactness on functions in the
//!   span and rejection of singular bases.
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{
    basis::errors::{BasisError, BasisResult},
    spectrum::grid::{GRID_START, GRID_STEP},
};

/// Number of wavelength segments (blue, red).
pub const N_SEGMENTS: usize = 2;

/// Fixed-grid points per segment.
pub const SEGMENT_LEN: usize = 850;

/// Basis functions per segment.
pub const N_COMPONENTS: usize = 90;

/// Samples per basis function / reconstructed segment.
pub const RECON_RESOLUTION: usize = 1001;

/// Wavelength span of one segment (first to last sample).
pub const SEGMENT_SPAN: f64 = 1698.0;

/// Lower end of the normalized coordinate the basis is defined on.
pub const COORD_START: f64 = 0.001;

/// Upper end of the normalized coordinate the basis is defined on.
pub const COORD_STOP: f64 = 0.999;

/// Smallest admissible ratio between the extreme Cholesky pivots.
const PIVOT_RATIO_FLOOR: f64 = 1e-10;

/// First wavelength of segment `b`.
pub fn segment_start(segment: usize) -> f64 {
    GRID_START + (SEGMENT_LEN as f64) * GRID_STEP * segment as f64
}

/// The 1001 reconstruction wavelengths of segment `b`.
pub fn recon_wavelengths(segment: usize) -> Array1<f64> {
    let b0 = segment_start(segment);
    Array1::linspace(b0, b0 + SEGMENT_SPAN, RECON_RESOLUTION)
}

/// The 850 fixed-grid wavelengths of segment `b`.
pub fn segment_wavelengths(segment: usize) -> Array1<f64> {
    let b0 = segment_start(segment);
    Array1::from_shape_fn(SEGMENT_LEN, |i| b0 + GRID_STEP * i as f64)
}

#[derive(Debug, Clone, PartialEq)]
struct SegmentBasis {
    components: Array2<f64>,
    mean: Array1<f64>,
    projector: Array2<f64>,
}

/// BasisSet — per-segment basis functions, mean templates and projectors.
///
/// Fields
/// ------
/// Private; build with [`BasisSet::new`] or
/// [`BasisSet::from_csv_dir`](crate::basis::loader).
///
/// Invariants
/// ----------
/// - Exactly [`N_SEGMENTS`] segments.
/// - Each segment has a `(N_COMPONENTS, RECON_RESOLUTION)` component matrix,
///   a `RECON_RESOLUTION` mean template, and a matching projector.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisSet {
    segments: Vec<SegmentBasis>,
}

impl BasisSet {
    /// Validate a basis and precompute its projectors.
    ///
    /// Parameters
    /// ----------
    /// - `components`: one `(90, 1001)` matrix per segment; row `i` is
    ///   basis function `i` sampled on the segment's reconstruction grid.
    /// - `means`: one 1001-sample mean template per segment.
    ///
    /// Errors
    /// ------
    /// - [`BasisError::SegmentCount`], [`BasisError::ComponentShape`],
    ///   [`BasisError::MeanLength`], [`BasisError::NonFiniteBasis`] for
    ///   malformed inputs.
    /// - [`BasisError::IllConditionedBasis`] when the weighted Gram matrix is
    ///   not safely positive definite (linearly dependent basis functions).
    pub fn new(components: Vec<Array2<f64>>, means: Vec<Array1<f64>>) -> BasisResult<Self> {
        if components.len() != N_SEGMENTS {
            return Err(BasisError::SegmentCount { expected: N_SEGMENTS, found: components.len() });
        }
        if means.len() != N_SEGMENTS {
            return Err(BasisError::SegmentCount { expected: N_SEGMENTS, found: means.len() });
        }

        for (segment, (components, mean)) in components.iter().zip(&means).enumerate() {
            validate_segment(segment, components, mean)?;
        }

        let weights = trapezoid_weights();
        let mut segments = Vec::with_capacity(N_SEGMENTS);
        for (segment, (components, mean)) in components.into_iter().zip(means).enumerate() {
            let projector = build_projector(segment, &components, &weights)?;
            segments.push(SegmentBasis { components, mean, projector });
        }
        Ok(Self { segments })
    }

    /// Basis functions of `segment` as a `(90, 1001)` matrix.
    pub fn components(&self, segment: usize) -> &Array2<f64> {
        &self.segments[segment].components
    }

    /// Mean template of `segment`.
    pub fn mean(&self, segment: usize) -> ArrayView1<'_, f64> {
        self.segments[segment].mean.view()
    }

    /// Least-squares projector of `segment` as a `(90, 1001)` matrix.
    pub fn projector(&self, segment: usize) -> &Array2<f64> {
        &self.segments[segment].projector
    }
}

/// Trapezoid weights on the normalized coordinate grid.
fn trapezoid_weights() -> Array1<f64> {
    let dt = (COORD_STOP - COORD_START) / (RECON_RESOLUTION - 1) as f64;
    let mut w = Array1::from_elem(RECON_RESOLUTION, dt);
    w[0] = 0.5 * dt;
    w[RECON_RESOLUTION - 1] = 0.5 * dt;
    w
}

/// Shape and finiteness checks for one segment.
fn validate_segment(
    segment: usize, components: &Array2<f64>, mean: &Array1<f64>,
) -> BasisResult<()> {
    if components.dim() != (N_COMPONENTS, RECON_RESOLUTION) {
        return Err(BasisError::ComponentShape {
            segment,
            expected: (N_COMPONENTS, RECON_RESOLUTION),
            found: components.dim(),
        });
    }
    if mean.len() != RECON_RESOLUTION {
        return Err(BasisError::MeanLength {
            segment,
            expected: RECON_RESOLUTION,
            found: mean.len(),
        });
    }
    if components.iter().any(|v| !v.is_finite()) {
        return Err(BasisError::NonFiniteBasis { segment, field: "basis functions" });
    }
    if mean.iter().any(|v| !v.is_finite()) {
        return Err(BasisError::NonFiniteBasis { segment, field: "mean template" });
    }
    Ok(())
}

fn build_projector(
    segment: usize, components: &Array2<f64>, weights: &Array1<f64>,
) -> BasisResult<Array2<f64>> {
    let weighted = components * &weights.view().insert_axis(Axis(0));
    let gram = weighted.dot(&components.t());

    let k = components.nrows();
    let gram = DMatrix::from_fn(k, k, |i, j| gram[[i, j]]);
    let chol = gram.cholesky().ok_or(BasisError::IllConditionedBasis { segment })?;

    let pivots = chol.l_dirty().diagonal();
    let (min_pivot, max_pivot) =
        pivots.iter().fold((f64::INFINITY, 0.0_f64), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    if min_pivot.is_nan() || min_pivot <= 0.0 || min_pivot < PIVOT_RATIO_FLOOR * max_pivot {
        return Err(BasisError::IllConditionedBasis { segment });
    }

    let rhs = DMatrix::from_fn(k, RECON_RESOLUTION, |i, j| weighted[[i, j]]);
    let solved = chol.solve(&rhs);
    Ok(Array2::from_shape_fn((k, RECON_RESOLUTION), |(i, j)| solved[(i, j)]))
}
