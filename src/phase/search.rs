//! phase::search — coarse-to-fine phase search and curve smoothing.
//!
//! Purpose
//! -------
//! Score phase hypotheses for one spectrum, or for a pair with a known
//! separation, by predicting the spectrum at each hypothesis and comparing
//! it with the observation. The scored samples are then smoothed by the GP
//! onto a dense grid.
//!
//! Key behaviors
//! -------------
//! - Passes run strictly in sequence. Each pass windows its grid around the
//!   best hypothesis so far and scores only phases not already in the table.
//! - Any scoring failure aborts the whole estimate; no partial table is
//!   returned.
//! - The dense curve spans the admissible range (paired: shrunk by `Δ`).
//!
//! Conventions
//! -----------
//! - Phases are days relative to maximum light; errors are MAPE in percent.
//! - Masks use `true` for wavelengths to ignore.
//!
//! Downstream usage
//! ----------------
//! - [`PhaseEstimate::best_sample`] and [`SmoothedCurve::argmin`] are
//!   conveniences. Callers decide which one (if either) is the estimate.
use ndarray::Array1;
use tracing::debug;

use crate::{
    basis::{BasisSet, parameterize},
    gp::smooth,
    phase::{
        cost::masked_mape,
        errors::{PhaseError, PhaseResult},
        grid::inclusive_range_with_tol,
        options::PhaseSearchOptions,
        table::HypothesisTable,
    },
    spectrum::{Spectrum, validate_mask},
    surface::{ReferencePair, SequenceModel, predict_surface},
};

/// Scored hypotheses sorted by phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSamples {
    pub phases: Array1<f64>,
    pub errors: Array1<f64>,
}

/// GP-smoothed error curve on the dense grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedCurve {
    pub phases: Array1<f64>,
    pub errors: Array1<f64>,
    pub errors_std: Array1<f64>,
}

impl SmoothedCurve {
    /// `(phase, error)` at the smallest smoothed error.
    pub fn argmin(&self) -> Option<(f64, f64)> {
        lowest(&self.phases, &self.errors)
    }
}

/// Raw samples plus smoothed curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseEstimate {
    pub samples: PhaseSamples,
    pub curve: SmoothedCurve,
}

impl PhaseEstimate {
    /// `(phase, error)` of the lowest-error scored hypothesis.
    pub fn best_sample(&self) -> Option<(f64, f64)> {
        lowest(&self.samples.phases, &self.samples.errors)
    }
}

/// estimate_single_phase — phase of one observed spectrum.
///
/// For each hypothesis `h` the spectrum is its own origin and target
/// reference at phase `h`, the surface is predicted at `[h]`, and the
/// score is the masked MAPE against the observation.
///
/// Parameters
/// ----------
/// - `basis`, `model`: shared read-only collaborators.
/// - `spectrum`: normalized spectrum on the fixed grid.
/// - `mask`: optional bad-wavelength mask (`true` = ignore).
/// - `opts`: range, schedule and downstream settings.
///
/// Errors
/// ------
/// - Invalid options, mask length, spectrum grid or normalization.
/// - [`PhaseError::AllWavelengthsMasked`] for a full mask.
/// - Any surface prediction or smoothing failure.
pub fn estimate_single_phase<M: SequenceModel + ?Sized>(
    basis: &BasisSet, model: &M, spectrum: &Spectrum, mask: Option<&[bool]>,
    opts: &PhaseSearchOptions,
) -> PhaseResult<PhaseEstimate> {
    opts.validate()?;
    validate_mask(mask, spectrum.len())?;
    let params = parameterize(basis, spectrum)?;
    debug!(lower = opts.lower, upper = opts.upper, "single-spectrum phase search");

    let table = search(opts.lower, opts.upper, opts, |h| {
        let reference = ReferencePair::single(params.clone(), h);
        let surface = predict_surface(basis, model, &reference, &[h], &opts.surface)?;
        masked_mape(spectrum.flux.view(), surface.spectra()[0].flux.view(), mask)
    })?;
    smooth_samples(&table, opts.lower, opts.upper, opts)
}

/// estimate_paired_phase — phase of the earlier of two spectra taken
/// `delta_phase` days apart.
///
/// For each hypothesis `h` the references sit at `h` and `h + Δ`, the
/// surface is predicted at both, and the score is the mean of the two
/// masked MAPEs. The upper bound shrinks to `upper − Δ` so the later
/// spectrum stays in range. With `Δ = 0` and identical inputs this gives
/// exactly the single-spectrum result.
///
/// Errors
/// ------
/// - [`PhaseError::PhaseOrdering`] for `Δ < 0` or non-finite `Δ`.
/// - [`PhaseError::EmptyRange`] when `upper − Δ < lower`.
/// - Everything [`estimate_single_phase`] reports, for either spectrum.
pub fn estimate_paired_phase<M: SequenceModel + ?Sized>(
    basis: &BasisSet, model: &M, first: &Spectrum, second: &Spectrum, delta_phase: f64,
    masks: (Option<&[bool]>, Option<&[bool]>), opts: &PhaseSearchOptions,
) -> PhaseResult<PhaseEstimate> {
    opts.validate()?;
    if !delta_phase.is_finite() || delta_phase < 0.0 {
        return Err(PhaseError::PhaseOrdering { delta: delta_phase });
    }
    let (lower, upper) = (opts.lower, opts.upper - delta_phase);
    if upper < lower {
        return Err(PhaseError::EmptyRange { lower, upper });
    }
    let (first_mask, second_mask) = masks;
    validate_mask(first_mask, first.len())?;
    validate_mask(second_mask, second.len())?;

    let origin = parameterize(basis, first)?;
    let target = if first == second { origin.clone() } else { parameterize(basis, second)? };
    debug!(lower, upper, delta_phase, "paired phase search");

    let table = search(lower, upper, opts, |h| {
        let reference = ReferencePair {
            origin: origin.clone(),
            origin_phase: h,
            target: target.clone(),
            target_phase: h + delta_phase,
        };
        let surface =
            predict_surface(basis, model, &reference, &[h, h + delta_phase], &opts.surface)?;
        let predicted = surface.spectra();
        let e_first = masked_mape(first.flux.view(), predicted[0].flux.view(), first_mask)?;
        let e_second = masked_mape(second.flux.view(), predicted[1].flux.view(), second_mask)?;
        Ok((e_first + e_second) / 2.0)
    })?;
    smooth_samples(&table, lower, upper, opts)
}

/// Run the pass schedule over `[lower, upper]`, scoring each new phase once.
fn search<F>(
    lower: f64, upper: f64, opts: &PhaseSearchOptions, mut score: F,
) -> PhaseResult<HypothesisTable>
where
    F: FnMut(f64) -> PhaseResult<f64>,
{
    let mut table = HypothesisTable::with_tolerance(opts.duplicate_tol);
    for (pass, spec) in opts.schedule.passes().iter().enumerate() {
        let (lo, hi) = spec.window(lower, upper, table.best().map(|(phase, _)| phase));
        let grid = inclusive_range_with_tol(lo, hi, spec.step, opts.range_rtol, opts.range_atol)?;
        let mut evaluated = 0usize;
        for phase in grid {
            if table.contains(phase) {
                continue;
            }
            let error = score(phase)?;
            table.insert(phase, error);
            evaluated += 1;
        }
        if let Some((best_phase, best_error)) = table.best() {
            debug!(pass, lo, hi, step = spec.step, evaluated, best_phase, best_error, "pass done");
        }
    }
    Ok(table)
}

fn smooth_samples(
    table: &HypothesisTable, lower: f64, upper: f64, opts: &PhaseSearchOptions,
) -> PhaseResult<PhaseEstimate> {
    let (phases, errors) = table.samples();
    // Scores carry no uncertainty; the smoother fills it with `nan_fill`.
    let errors_err = Array1::from_elem(phases.len(), f64::NAN);
    let dense = Array1::from(inclusive_range_with_tol(
        lower,
        upper,
        opts.dense_step,
        opts.range_rtol,
        opts.range_atol,
    )?);
    let fit = smooth(
        phases.view(),
        errors.view(),
        errors_err.view(),
        dense.view(),
        opts.nan_fill,
        &opts.gp,
    )?;
    Ok(PhaseEstimate {
        samples: PhaseSamples { phases, errors },
        curve: SmoothedCurve { phases: dense, errors: fit.mean, errors_std: fit.std },
    })
}

fn lowest(phases: &Array1<f64>, errors: &Array1<f64>) -> Option<(f64, f64)> {
    phases
        .iter()
        .zip(errors.iter())
        .filter(|(_, e)| !e.is_nan())
        .fold(None, |best, (&p, &e)| match best {
            Some((_, be)) if be <= e => best,
            _ => Some((p, e)),
        })
}
