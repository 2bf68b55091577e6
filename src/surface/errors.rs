use crate::{basis::errors::BasisError, errors::ErrorKind, spectrum::errors::SpectrumError};

/// Result alias for surface prediction.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    // ---- Inputs ----
    /// No query phases were given.
    EmptyQuery,

    /// A query or reference phase is NaN or infinite.
    NonFinitePhase { field: &'static str, index: usize, value: f64 },

    /// The first reference spectrum must not be later than the second.
    PhaseOrdering { first: f64, second: f64 },

    /// Ensemble size must be at least one.
    InvalidPassCount { n_passes: usize },

    /// Spectrum or parameterization failure.
    Basis(BasisError),

    // ---- Model ----
    /// The sequence model reported a failure.
    ModelFailure { pass: usize, text: String },

    /// The sequence model returned an array of unexpected shape.
    ModelOutputShape { expected: [usize; 3], found: Vec<usize> },

    // ---- Numerical ----
    /// A forward pass produced NaN/∞.
    NonFinitePass { pass: usize, query: usize, timestep: usize, feature: usize },

    /// A reconstructed spectrum has a mean too close to zero to normalize.
    DegenerateFlux { pass: usize, query: usize, mean: f64 },
}

impl SurfaceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SurfaceError::Basis(err) => err.kind(),
            SurfaceError::ModelFailure { .. } | SurfaceError::ModelOutputShape { .. } => {
                ErrorKind::ExternalDependencyFailure
            }
            SurfaceError::NonFinitePass { .. } | SurfaceError::DegenerateFlux { .. } => {
                ErrorKind::NumericalDegeneracy
            }
            _ => ErrorKind::InputContractViolation,
        }
    }
}

impl std::error::Error for SurfaceError {}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            SurfaceError::EmptyQuery => write!(f, "Surface prediction needs at least one phase"),
            SurfaceError::NonFinitePhase { field, index, value } => {
                write!(f, "Non-finite {field} phase at index {index}: {value}")
            }
            SurfaceError::PhaseOrdering { first, second } => {
                write!(f, "Reference phases out of order: first {first} > second {second}")
            }
            SurfaceError::InvalidPassCount { n_passes } => {
                write!(f, "Invalid ensemble size {n_passes}: must be at least 1")
            }
            SurfaceError::Basis(err) => write!(f, "Basis transform failed: {err}"),

            // ---- Model ----
            SurfaceError::ModelFailure { pass, text } => {
                write!(f, "Sequence model failed on pass {pass}: {text}")
            }
            SurfaceError::ModelOutputShape { expected, found } => {
                write!(f, "Sequence model output shape {found:?}, expected {expected:?}")
            }

            // ---- Numerical ----
            SurfaceError::NonFinitePass { pass, query, timestep, feature } => {
                write!(
                    f,
                    "Non-finite model output on pass {pass} at [{query}, {timestep}, {feature}]"
                )
            }
            SurfaceError::DegenerateFlux { pass, query, mean } => {
                write!(f, "Predicted flux for query {query} on pass {pass} has mean {mean}")
            }
        }
    }
}

impl From<BasisError> for SurfaceError {
    fn from(err: BasisError) -> Self {
        SurfaceError::Basis(err)
    }
}

impl From<SpectrumError> for SurfaceError {
    fn from(err: SpectrumError) -> Self {
        SurfaceError::Basis(BasisError::Spectrum(err))
    }
}
