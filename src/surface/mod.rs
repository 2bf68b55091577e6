//! surface — Surface Predictor backed by a trained sequence model.
//!
//! Purpose
//! -------
//! Predict normalized spectra at arbitrary phases from one or two reference
//! spectra, with Monte-Carlo dropout uncertainty.
//!
//! Key behaviors
//! -------------
//! - [`SequenceModel`] abstracts the trained network; dropout is requested
//!   explicitly through [`Regularization`].
//! - [`predict_surface`] runs the ensemble on parameterized references;
//!   [`predict_from_spectra`] parameterizes observed spectra first.
//!
//! Invariants & assumptions
//! ------------------------
//! - The basis set and model are shared read-only and passed by reference.
//! - Every prediction returns a fresh [`PredictedSurface`].
//!
//! Testing notes
//! -------------
//! - `model::fixtures` holds deterministic/noisy stub models reused by the
//!   phase-estimation tests.

pub mod errors;
pub mod model;
pub mod options;
pub mod predictor;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{SurfaceError, SurfaceResult};
pub use self::model::{INPUT_WIDTH, N_TIMESTEPS, OUTPUT_WIDTH, Regularization, SequenceModel};
pub use self::options::SurfaceOptions;
pub use self::predictor::{
    PHASE_LOOKUP_TOL, PredictedSpectrum, PredictedSurface, ReferencePair, predict_from_spectra,
    predict_surface,
};
