use crate::{
    basis::errors::BasisError, errors::ErrorKind, gp::errors::GpError,
    spectrum::errors::SpectrumError, surface::errors::SurfaceError,
};

/// Result alias for phase estimation.
pub type PhaseResult<T> = Result<T, PhaseError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseError {
    // ---- Ranges ----
    /// `step <= 0`, `stop < start`, or a non-finite bound.
    InvalidRange { start: f64, stop: f64, step: f64 },

    /// The admissible phase window is empty.
    EmptyRange { lower: f64, upper: f64 },

    /// Phase separation between paired spectra is negative or not finite.
    PhaseOrdering { delta: f64 },

    // ---- Scoring ----
    /// Observed and predicted spectra differ in length.
    LengthMismatch { expected: usize, found: usize },

    /// Every wavelength is masked; the error is undefined.
    AllWavelengthsMasked,

    // ---- Options ----
    /// An option value is out of its domain.
    InvalidOption { field: &'static str, value: f64, reason: &'static str },

    /// The pass schedule has no passes.
    EmptySchedule,

    // ---- Collaborators ----
    /// Input spectrum or mask failed validation.
    Spectrum(SpectrumError),

    /// Surface prediction failed for some hypothesis.
    Surface(SurfaceError),

    /// Smoothing the hypothesis curve failed.
    Gp(GpError),
}

impl PhaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PhaseError::Spectrum(err) => err.kind(),
            PhaseError::Surface(err) => err.kind(),
            PhaseError::Gp(err) => err.kind(),
            _ => ErrorKind::InputContractViolation,
        }
    }
}

impl std::error::Error for PhaseError {}

impl std::fmt::Display for PhaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Ranges ----
            PhaseError::InvalidRange { start, stop, step } => {
                write!(f, "Invalid phase range: start {start}, stop {stop}, step {step}")
            }
            PhaseError::EmptyRange { lower, upper } => {
                write!(f, "Admissible phase range [{lower}, {upper}] is empty")
            }
            PhaseError::PhaseOrdering { delta } => {
                write!(f, "Phase separation {delta} must be finite and non-negative")
            }

            // ---- Scoring ----
            PhaseError::LengthMismatch { expected, found } => {
                write!(f, "Predicted spectrum has {found} points, expected {expected}")
            }
            PhaseError::AllWavelengthsMasked => {
                write!(f, "All wavelengths are masked; prediction error is undefined")
            }

            // ---- Options ----
            PhaseError::InvalidOption { field, value, reason } => {
                write!(f, "Invalid option {field} = {value}: {reason}")
            }
            PhaseError::EmptySchedule => write!(f, "Phase search schedule has no passes"),

            // ---- Collaborators ----
            PhaseError::Spectrum(err) => write!(f, "Invalid spectrum: {err}"),
            PhaseError::Surface(err) => write!(f, "Surface prediction failed: {err}"),
            PhaseError::Gp(err) => write!(f, "Curve smoothing failed: {err}"),
        }
    }
}

impl From<SpectrumError> for PhaseError {
    fn from(err: SpectrumError) -> Self {
        PhaseError::Spectrum(err)
    }
}

impl From<BasisError> for PhaseError {
    fn from(err: BasisError) -> Self {
        PhaseError::Surface(SurfaceError::Basis(err))
    }
}

impl From<SurfaceError> for PhaseError {
    fn from(err: SurfaceError) -> Self {
        PhaseError::Surface(err)
    }
}

impl From<GpError> for PhaseError {
    fn from(err: GpError) -> Self {
        PhaseError::Gp(err)
    }
}
