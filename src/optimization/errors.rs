use argmin::core::{ArgminError, Error};

use crate::errors::ErrorKind;

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad { tol: f64, reason: &'static str },

    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost { tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// Parameter vector has the wrong number of entries for the objective.
    ThetaLengthMismatch { expected: usize, found: usize },

    /// Unconstrained parameter input must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// A covariance matrix built inside the objective is not positive definite.
    NotPositiveDefinite { context: &'static str },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing
    MissingThetaHat,

    /// Multi-start run was given no starting points.
    NoStartingPoints,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl OptError {
    /// Options and inputs are caller contracts; everything raised while the
    /// solver runs is numerical.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OptError::InvalidTolGrad { .. }
            | OptError::InvalidTolCost { .. }
            | OptError::InvalidMaxIter { .. }
            | OptError::NoTolerancesProvided
            | OptError::InvalidLBFGSMem { .. }
            | OptError::ThetaLengthMismatch { .. }
            | OptError::InvalidThetaInput { .. }
            | OptError::NoStartingPoints => ErrorKind::InputContractViolation,
            _ => ErrorKind::NumericalDegeneracy,
        }
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Objective ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::ThetaLengthMismatch { expected, found } => {
                write!(f, "Theta length mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::NotPositiveDefinite { context } => {
                write!(f, "Matrix is not positive definite: {context}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }
            OptError::NoStartingPoints => {
                write!(f, "Multi-start optimization needs at least one starting point")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Fallback ----
            OptError::UnknownError => write!(f, "Unknown error"),
        }
    }
}

impl From<Error> for OptError {
    /// Objective errors travel through argmin as `anyhow` values; recover
    /// them first, then map argmin's own error kinds.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of `OptError` values that travelled through `anyhow`.
    // - Mapping of argmin's own error kinds.
    // - Classification into the crate taxonomy.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Objective errors raised inside argmin come back unchanged.
    //
    // Given
    // -----
    // - `OptError::NotPositiveDefinite` boxed into an argmin `Error`.
    //
    // Expect
    // ------
    // - The conversion returns the original variant.
    fn from_argmin_error_recovers_objective_errors() {
        // Arrange
        let boxed: Error = OptError::NotPositiveDefinite { context: "kernel" }.into();

        // Act
        let back = OptError::from(boxed);

        // Assert
        assert_eq!(back, OptError::NotPositiveDefinite { context: "kernel" });
    }

    #[test]
    // Purpose
    // -------
    // argmin's structured errors map onto the wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::ConditionViolated` boxed into an argmin `Error`.
    //
    // Expect
    // ------
    // - `OptError::ConditionViolated` with the same text.
    fn from_argmin_error_maps_argmin_kinds() {
        // Arrange
        let boxed: Error = ArgminError::ConditionViolated { text: "wolfe".to_string() }.into();

        // Act
        let mapped = OptError::from(boxed);

        // Assert
        assert_eq!(mapped, OptError::ConditionViolated { text: "wolfe".to_string() });
        assert_eq!(mapped.kind(), ErrorKind::NumericalDegeneracy);
    }

    #[test]
    // Purpose
    // -------
    // Configuration errors are caller contract violations.
    //
    // Given
    // -----
    // - `NoTolerancesProvided`.
    //
    // Expect
    // ------
    // - Kind `InputContractViolation`.
    fn option_errors_are_contract_violations() {
        assert_eq!(OptError::NoTolerancesProvided.kind(), ErrorKind::InputContractViolation);
    }
}
