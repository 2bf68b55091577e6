use crate::{errors::ErrorKind, optimization::errors::OptError};

/// Result alias for GP fitting and prediction.
pub type GpResult<T> = Result<T, GpError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GpError {
    // ---- Input ----
    /// Paired inputs (`x`, `y`, `y_err`) have different lengths.
    LengthMismatch { field: &'static str, expected: usize, found: usize },

    /// Input coordinate or error is NaN/∞ where that is not allowed.
    NonFiniteInput { field: &'static str, index: usize, value: f64 },

    /// Every `y` was NaN, nothing left to fit.
    NoFiniteSamples,

    /// No query points were given.
    EmptyQuery,

    /// Fill value for missing errors must be finite and positive.
    InvalidNanFill { value: f64 },

    // ---- Options ----
    /// Hyperparameter bounds must satisfy `0 < lower <= upper`, both finite.
    InvalidBounds { name: &'static str, lower: f64, upper: f64 },

    /// Initial hyperparameter lies outside its bounds.
    InitialOutsideBounds { name: &'static str, value: f64, lower: f64, upper: f64 },

    // ---- Numerical ----
    /// Kernel matrix at the selected hyperparameters failed Cholesky.
    IllConditioned { context: &'static str },

    /// Every hyperparameter optimization start failed.
    FitFailed(OptError),
}

impl GpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GpError::IllConditioned { .. } | GpError::FitFailed(_) => {
                ErrorKind::NumericalDegeneracy
            }
            _ => ErrorKind::InputContractViolation,
        }
    }
}

impl std::error::Error for GpError {}

impl std::fmt::Display for GpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input ----
            GpError::LengthMismatch { field, expected, found } => {
                write!(f, "GP input '{field}' has length {found}, expected {expected}")
            }
            GpError::NonFiniteInput { field, index, value } => {
                write!(f, "Non-finite GP input '{field}' at index {index}: {value}")
            }
            GpError::NoFiniteSamples => write!(f, "No finite samples to fit the GP"),
            GpError::EmptyQuery => write!(f, "GP prediction needs at least one query point"),
            GpError::InvalidNanFill { value } => {
                write!(f, "Invalid fill value for missing errors {value}: must be finite and > 0")
            }

            // ---- Options ----
            GpError::InvalidBounds { name, lower, upper } => {
                write!(f, "Invalid bounds for {name}: [{lower}, {upper}]")
            }
            GpError::InitialOutsideBounds { name, value, lower, upper } => {
                write!(f, "Initial {name} = {value} lies outside [{lower}, {upper}]")
            }

            // ---- Numerical ----
            GpError::IllConditioned { context } => {
                write!(f, "GP kernel matrix is not positive definite: {context}")
            }
            GpError::FitFailed(err) => write!(f, "GP hyperparameter fit failed: {err}"),
        }
    }
}

impl From<OptError> for GpError {
    fn from(err: OptError) -> Self {
        GpError::FitFailed(err)
    }
}
