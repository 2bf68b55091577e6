//! surface::predictor — Monte-Carlo dropout surface prediction.
//!
//! Purpose
//! -------
//! Given one or two reference spectra (as basis parameterizations with their
//! phases) predict the spectrum at each query phase, with an uncertainty
//! estimate from an ensemble of stochastic forward passes.
//!
//! Key behaviors
//! -------------
//! - All queries go to the model in one `(Q, 2, 186)` batch per pass.
//!   Timestep 0 is `[q, origin_phase, origin…]`, timestep 1 is
//!   `[q, target_phase, target…]`.
//! - Each pass averages the two output timesteps, reconstructs the spectrum,
//!   resamples it onto the fixed grid and divides by its mean.
//! - The reported flux is the ensemble mean; the reported error is the
//!   population standard deviation across passes.
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly `n_passes` passes contribute; a failing or non-finite pass
//!   fails the whole prediction.
//! - Results are stochastic when the model is; callers compare them with
//!   statistical tolerances.
//! - With the `parallel` feature passes run on the rayon pool. Pass results
//!   are collected in pass order, so statistics match the sequential path.
//!
//! Downstream usage
//! ----------------
//! - `phase::search` calls [`predict_surface`] once per hypothesis.
use ndarray::{Array1, Array2, Array3, ArrayView3, s};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    basis::{BasisParams, BasisSet, parameterize, reconstruct_on_grid},
    spectrum::{GRID_LEN, Spectrum},
    surface::{
        errors::{SurfaceError, SurfaceResult},
        model::{INPUT_WIDTH, N_TIMESTEPS, OUTPUT_WIDTH, Regularization, SequenceModel},
        options::SurfaceOptions,
    },
};

/// Phase tolerance (days) for [`PredictedSurface::get`].
pub const PHASE_LOOKUP_TOL: f64 = 1e-6;

/// Reference spectra, already parameterized, with their phases.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePair {
    pub origin: BasisParams,
    pub origin_phase: f64,
    pub target: BasisParams,
    pub target_phase: f64,
}

impl ReferencePair {
    /// One spectrum used as both references.
    pub fn single(params: BasisParams, phase: f64) -> Self {
        Self { origin: params.clone(), origin_phase: phase, target: params, target_phase: phase }
    }
}

/// Predicted spectrum on the fixed grid at one query phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedSpectrum {
    pub phase: f64,
    pub flux: Array1<f64>,
    pub flux_err: Array1<f64>,
}

/// Predictions for every query phase, in query order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedSurface {
    spectra: Vec<PredictedSpectrum>,
}

impl PredictedSurface {
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    pub fn spectra(&self) -> &[PredictedSpectrum] {
        &self.spectra
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictedSpectrum> {
        self.spectra.iter()
    }

    /// First prediction whose phase is within [`PHASE_LOOKUP_TOL`] of `phase`.
    pub fn get(&self, phase: f64) -> Option<&PredictedSpectrum> {
        self.spectra.iter().find(|p| (p.phase - phase).abs() <= PHASE_LOOKUP_TOL)
    }
}

/// predict_surface — ensemble prediction at each query phase.
///
/// Parameters
/// ----------
/// - `basis`: FPCA basis used to reconstruct model outputs.
/// - `model`: trained sequence model; always called with
///   [`Regularization::Stochastic`].
/// - `reference`: origin/target parameterizations and phases.
/// - `query_phases`: non-empty, finite phases (days).
/// - `opts`: ensemble size.
///
/// Returns
/// -------
/// A [`PredictedSurface`] with one record per query, in query order.
///
/// Errors
/// ------
/// - [`SurfaceError::EmptyQuery`], [`SurfaceError::NonFinitePhase`],
///   [`SurfaceError::InvalidPassCount`]: contract violations.
/// - [`SurfaceError::ModelFailure`], [`SurfaceError::ModelOutputShape`]:
///   the model misbehaved.
/// - [`SurfaceError::NonFinitePass`], [`SurfaceError::DegenerateFlux`]:
///   numerical failures inside a pass.
pub fn predict_surface<M: SequenceModel + ?Sized>(
    basis: &BasisSet, model: &M, reference: &ReferencePair, query_phases: &[f64],
    opts: &SurfaceOptions,
) -> SurfaceResult<PredictedSurface> {
    if query_phases.is_empty() {
        return Err(SurfaceError::EmptyQuery);
    }
    if opts.n_passes == 0 {
        return Err(SurfaceError::InvalidPassCount { n_passes: 0 });
    }
    check_phases("query", query_phases)?;
    check_phases("reference", &[reference.origin_phase, reference.target_phase])?;

    let batch = build_batch(reference, query_phases);
    debug!(n_queries = query_phases.len(), n_passes = opts.n_passes, "running dropout ensemble");

    #[cfg(feature = "parallel")]
    let passes = (0..opts.n_passes)
        .into_par_iter()
        .map(|pass| run_pass(basis, model, batch.view(), pass))
        .collect::<SurfaceResult<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let passes = (0..opts.n_passes)
        .map(|pass| run_pass(basis, model, batch.view(), pass))
        .collect::<SurfaceResult<Vec<_>>>()?;

    let (mean, std) = ensemble_moments(&passes, query_phases.len());
    let spectra = query_phases
        .iter()
        .enumerate()
        .map(|(q, &phase)| PredictedSpectrum {
            phase,
            flux: mean.row(q).to_owned(),
            flux_err: std.row(q).to_owned(),
        })
        .collect();
    Ok(PredictedSurface { spectra })
}

/// predict_from_spectra — parameterize observed spectra and predict.
///
/// `first` is the origin reference and `second` the target. When both
/// fluxes are identical the first parameterization is reused.
///
/// Errors
/// ------
/// - [`SurfaceError::PhaseOrdering`] when `first_phase > second_phase`.
/// - [`SurfaceError::Basis`] when either spectrum fails validation or is
///   degenerate.
/// - Everything [`predict_surface`] reports.
#[allow(clippy::too_many_arguments)]
pub fn predict_from_spectra<M: SequenceModel + ?Sized>(
    basis: &BasisSet, model: &M, first: &Spectrum, first_phase: f64, second: &Spectrum,
    second_phase: f64, query_phases: &[f64], opts: &SurfaceOptions,
) -> SurfaceResult<PredictedSurface> {
    check_phases("reference", &[first_phase, second_phase])?;
    if first_phase > second_phase {
        return Err(SurfaceError::PhaseOrdering { first: first_phase, second: second_phase });
    }
    let origin = parameterize(basis, first)?;
    let target = if first == second { origin.clone() } else { parameterize(basis, second)? };
    let reference =
        ReferencePair { origin, origin_phase: first_phase, target, target_phase: second_phase };
    predict_surface(basis, model, &reference, query_phases, opts)
}

fn check_phases(field: &'static str, phases: &[f64]) -> SurfaceResult<()> {
    match phases.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(SurfaceError::NonFinitePhase { field, index, value: phases[index] }),
        None => Ok(()),
    }
}

fn build_batch(reference: &ReferencePair, query_phases: &[f64]) -> Array3<f64> {
    let origin = reference.origin.flatten();
    let target = reference.target.flatten();
    let timesteps = [(reference.origin_phase, &origin), (reference.target_phase, &target)];

    let mut batch = Array3::zeros((query_phases.len(), N_TIMESTEPS, INPUT_WIDTH));
    for (q, &phase) in query_phases.iter().enumerate() {
        for (t, (ref_phase, flat)) in timesteps.iter().enumerate() {
            let mut row = batch.slice_mut(s![q, t, ..]);
            row[0] = phase;
            row[1] = *ref_phase;
            row.slice_mut(s![2..]).assign(*flat);
        }
    }
    batch
}

/// One stochastic pass: `(Q, GRID_LEN)` mean-normalized fluxes.
fn run_pass<M: SequenceModel + ?Sized>(
    basis: &BasisSet, model: &M, batch: ArrayView3<f64>, pass: usize,
) -> SurfaceResult<Array2<f64>> {
    let n_queries = batch.dim().0;
    let out = model
        .predict(batch, Regularization::Stochastic)
        .map_err(|e| SurfaceError::ModelFailure { pass, text: format!("{e:#}") })?;

    let expected = [n_queries, N_TIMESTEPS, OUTPUT_WIDTH];
    if out.shape() != expected {
        return Err(SurfaceError::ModelOutputShape { expected, found: out.shape().to_vec() });
    }
    if let Some(((query, timestep, feature), _)) = out.indexed_iter().find(|(_, v)| !v.is_finite())
    {
        return Err(SurfaceError::NonFinitePass { pass, query, timestep, feature });
    }

    let mut fluxes = Array2::zeros((n_queries, GRID_LEN));
    for q in 0..n_queries {
        let averaged = (&out.slice(s![q, 0, ..]) + &out.slice(s![q, 1, ..])) * 0.5;
        let params = BasisParams::from_flat(&averaged.to_vec())?;
        let flux = reconstruct_on_grid(basis, &params)?;
        let mean = flux.sum() / flux.len() as f64;
        if !mean.is_finite() || mean.abs() < f64::EPSILON {
            return Err(SurfaceError::DegenerateFlux { pass, query: q, mean });
        }
        fluxes.row_mut(q).assign(&(flux / mean));
    }
    trace!(pass, "ensemble pass complete");
    Ok(fluxes)
}

/// Element-wise mean and population std across passes.
fn ensemble_moments(passes: &[Array2<f64>], n_queries: usize) -> (Array2<f64>, Array2<f64>) {
    let n = passes.len() as f64;
    let mut mean = Array2::<f64>::zeros((n_queries, GRID_LEN));
    for p in passes {
        mean += p;
    }
    mean /= n;
    let mut var = Array2::<f64>::zeros((n_queries, GRID_LEN));
    for p in passes {
        let d = p - &mean;
        var += &(&d * &d);
    }
    let std = (var / n).mapv(f64::sqrt);
    (mean, std)
}
