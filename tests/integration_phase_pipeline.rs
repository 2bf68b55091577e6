//! Integration tests for the phase-estimation pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path from a normalized spectrum, through the
//!   FPCA basis and the dropout ensemble, to a smoothed phase-error curve.
//! - Exercise the public API only, with a synthetic cosine basis and stub
//!   sequence models standing in for the resource files and trained network.
//!
//! Coverage
//! --------
//! - `basis`: round-trip accuracy and determinism of the parameterization.
//! - `surface`: ensemble statistics from a noisy model; NaN pass rejection.
//! - `phase`: single and paired estimates recovering a planted phase, and
//!   the `Δ = 0` reduction.
//!
//! Exclusions
//! ----------
//! - Loading real basis resource files and trained weights; those are
//!   external collaborators.
//! - Low-level building blocks (grids, MAPE, GP likelihood, L-BFGS
//!   plumbing); unit tests cover them.
use std::f64::consts::PI;

use ndarray::{Array1, Array2, Array3, ArrayView3};
use rand::Rng;
use snail::{
    basis::{
        BasisParams, BasisSet, N_COMPONENTS, N_SEGMENTS, PARAM_COLS, RECON_RESOLUTION,
        parameterize, reconstruct_on_grid,
    },
    errors::ErrorKind,
    gp::GpOptions,
    phase::{
        PhaseError, PhaseSearchOptions, estimate_paired_phase, estimate_single_phase, masked_mape,
    },
    spectrum::Spectrum,
    surface::{
        INPUT_WIDTH, N_TIMESTEPS, OUTPUT_WIDTH, Regularization, SequenceModel, SurfaceError,
        SurfaceOptions, predict_from_spectra,
    },
};
use tracing_subscriber::EnvFilter;

const TRUTH: f64 = -2.6;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Cosine basis `cos(kπt)` with a flat zero mean template.
fn cosine_basis() -> BasisSet {
    let t = Array1::linspace(0.0, 1.0, RECON_RESOLUTION);
    let comps = Array2::from_shape_fn((N_COMPONENTS, RECON_RESOLUTION), |(k, j)| {
        (k as f64 * PI * t[j]).cos()
    });
    let mean = Array1::zeros(RECON_RESOLUTION);
    BasisSet::new(vec![comps.clone(), comps], vec![mean.clone(), mean]).unwrap()
}

/// Normalized spectrum built from low-order harmonics in both segments.
fn observed_spectrum(basis: &BasisSet) -> Spectrum {
    let mut values = Array2::zeros((N_SEGMENTS, PARAM_COLS));
    values[[0, 0]] = 1.2;
    values[[0, 1]] = 0.15;
    values[[1, 0]] = 0.8;
    values[[1, 1]] = 0.1;
    for (k, amp) in [(1, -0.6), (3, 0.4), (4, 0.2)] {
        values[[0, 2 + k]] = amp;
        values[[1, 2 + k]] = 0.5 * amp;
    }
    let flux = reconstruct_on_grid(basis, &BasisParams::new(values).unwrap()).unwrap();
    let mean = flux.sum() / flux.len() as f64;
    Spectrum::on_standard_grid(flux / mean).unwrap()
}

/// Echoes the reference parameters with the first harmonic shifted by
/// `slope · (reference_phase − truth[t])`; optional uniform score noise
/// under stochastic regularization.
struct PlantedModel {
    truth: [f64; N_TIMESTEPS],
    slope: f64,
    noise: f64,
}

impl SequenceModel for PlantedModel {
    fn predict(
        &self, batch: ArrayView3<f64>, regularization: Regularization,
    ) -> anyhow::Result<Array3<f64>> {
        let (n, steps, width) = batch.dim();
        anyhow::ensure!(steps == N_TIMESTEPS && width == INPUT_WIDTH, "unexpected input shape");
        let stochastic = regularization == Regularization::Stochastic && self.noise > 0.0;
        let mut rng = rand::rng();
        let mut out = Array3::zeros((n, N_TIMESTEPS, OUTPUT_WIDTH));
        for i in 0..n {
            for t in 0..N_TIMESTEPS {
                let shift = self.slope * (batch[[i, t, 1]] - self.truth[t]);
                for f in 0..OUTPUT_WIDTH {
                    let col = f % PARAM_COLS;
                    let mut v = batch[[i, t, f + 2]];
                    if col == 3 {
                        v += shift;
                    }
                    if col >= 2 && stochastic {
                        v += rng.random_range(-self.noise..self.noise);
                    }
                    out[[i, t, f]] = v;
                }
            }
        }
        Ok(out)
    }
}

/// Returns NaN for the first output feature.
struct NanModel;

impl SequenceModel for NanModel {
    fn predict(&self, batch: ArrayView3<f64>, _: Regularization) -> anyhow::Result<Array3<f64>> {
        let mut out = Array3::from_elem((batch.dim().0, N_TIMESTEPS, OUTPUT_WIDTH), 1.0);
        out[[0, 0, 0]] = f64::NAN;
        Ok(out)
    }
}

/// One deterministic pass with the default GP restarts.
fn fast_opts() -> PhaseSearchOptions {
    PhaseSearchOptions { surface: SurfaceOptions::new(1).unwrap(), ..PhaseSearchOptions::default() }
}

/// [`fast_opts`] with the GP fitted from its initial kernel only.
fn single_start_opts() -> PhaseSearchOptions {
    PhaseSearchOptions { gp: GpOptions { n_restarts: 0, ..GpOptions::default() }, ..fast_opts() }
}

#[test]
// Purpose
// -------
// The basis round trip is accurate and deterministic.
//
// Given
// -----
// - A spectrum inside the span of the cosine basis.
//
// Expect
// ------
// - MAPE < 1% after parameterize → reconstruct; repeated calls agree.
fn basis_round_trip_is_accurate_and_deterministic() {
    // Arrange
    let basis = cosine_basis();
    let spectrum = observed_spectrum(&basis);

    // Act
    let first = parameterize(&basis, &spectrum).unwrap();
    let second = parameterize(&basis, &spectrum).unwrap();
    let flux = reconstruct_on_grid(&basis, &first).unwrap();
    let mape = masked_mape(spectrum.flux.view(), flux.view(), None).unwrap();

    // Assert
    assert_eq!(first, second);
    assert!(mape < 1.0, "round-trip MAPE {mape}%");
}

#[test]
// Purpose
// -------
// A noisy ensemble gives a nonzero spread and a mean close to the truth.
//
// Given
// -----
// - 32 stochastic passes with uniform score noise, references at the
//   planted phase, two query phases.
//
// Expect
// ------
// - One record per query; positive mean spread; mean within 2% MAPE of the
//   observation.
fn ensemble_surface_has_spread_and_peaks_at_truth() {
    // Arrange
    init_tracing();
    let basis = cosine_basis();
    let spectrum = observed_spectrum(&basis);
    let model = PlantedModel { truth: [TRUTH, TRUTH], slope: 0.2, noise: 0.02 };
    let opts = SurfaceOptions::new(32).unwrap();

    // Act
    let surface = predict_from_spectra(
        &basis,
        &model,
        &spectrum,
        TRUTH,
        &spectrum,
        TRUTH,
        &[TRUTH, TRUTH + 10.0],
        &opts,
    )
    .unwrap();

    // Assert
    let at_truth = surface.get(TRUTH).unwrap();
    let spread = at_truth.flux_err.mean().unwrap();
    assert!(spread > 0.0);
    let near = masked_mape(spectrum.flux.view(), at_truth.flux.view(), None).unwrap();
    assert!(near < 2.0, "MAPE at truth {near}%");
    assert_eq!(surface.len(), 2);
}

#[test]
// Purpose
// -------
// A NaN model output is rejected, never averaged.
//
// Given
// -----
// - A model returning NaN in one feature.
//
// Expect
// ------
// - `NonFinitePass`, classified as a numerical degeneracy, also when it
//   surfaces through the phase estimator.
fn nan_passes_are_rejected() {
    // Arrange
    let basis = cosine_basis();
    let spectrum = observed_spectrum(&basis);

    // Act
    let surface = predict_from_spectra(
        &basis,
        &NanModel,
        &spectrum,
        0.0,
        &spectrum,
        0.0,
        &[0.0],
        &SurfaceOptions::default(),
    );
    let phase = estimate_single_phase(&basis, &NanModel, &spectrum, None, &fast_opts());

    // Assert
    let err = surface.unwrap_err();
    assert!(matches!(err, SurfaceError::NonFinitePass { .. }));
    assert_eq!(err.kind(), ErrorKind::NumericalDegeneracy);
    let err = phase.unwrap_err();
    assert!(matches!(err, PhaseError::Surface(SurfaceError::NonFinitePass { .. })));
    assert_eq!(err.kind(), ErrorKind::NumericalDegeneracy);
}

#[test]
// Purpose
// -------
// The single-spectrum estimate recovers a planted phase end to end.
//
// Given
// -----
// - A deterministic planted model at -2.6 d; default GP restarts.
//
// Expect
// ------
// - Smoothed minimum within 0.1 d of the truth.
fn single_phase_estimate_recovers_planted_phase() {
    // Arrange
    init_tracing();
    let basis = cosine_basis();
    let spectrum = observed_spectrum(&basis);
    let model = PlantedModel { truth: [TRUTH, TRUTH], slope: 0.2, noise: 0.0 };

    // Act
    let est = estimate_single_phase(&basis, &model, &spectrum, None, &fast_opts()).unwrap();

    // Assert
    let (phase, _) = est.curve.argmin().unwrap();
    assert!((phase - TRUTH).abs() < 0.1, "smoothed minimum at {phase}");
    let (best, _) = est.best_sample().unwrap();
    assert!((best - TRUTH).abs() < 1e-6, "best sample at {best}");
}

#[test]
// Purpose
// -------
// Paired estimation recovers the earlier phase and reduces to the single
// estimate when Δ = 0.
//
// Given
// -----
// - Δ = 6 with planted phases -2.6 and 3.4; then Δ = 0 with one spectrum.
// - The GP fitted from its initial kernel only.
//
// Expect
// ------
// - Smoothed minimum within 0.1 d; exact equality for Δ = 0.
fn paired_phase_estimate_recovers_planted_phase() {
    // Arrange
    let basis = cosine_basis();
    let spectrum = observed_spectrum(&basis);
    let paired_model = PlantedModel { truth: [TRUTH, TRUTH + 6.0], slope: 0.2, noise: 0.0 };
    let single_model = PlantedModel { truth: [TRUTH, TRUTH], slope: 0.2, noise: 0.0 };
    let opts = single_start_opts();

    // Act
    let paired =
        estimate_paired_phase(&basis, &paired_model, &spectrum, &spectrum, 6.0, (None, None), &opts)
            .unwrap();
    let zero = estimate_paired_phase(
        &basis,
        &single_model,
        &spectrum,
        &spectrum,
        0.0,
        (None, None),
        &opts,
    )
    .unwrap();
    let single = estimate_single_phase(&basis, &single_model, &spectrum, None, &opts).unwrap();

    // Assert
    let (phase, _) = paired.curve.argmin().unwrap();
    assert!((phase - TRUTH).abs() < 0.1, "smoothed minimum at {phase}");
    assert_eq!(zero, single);
}
