//! errors — crate-wide failure taxonomy shared by every module error.
//!
//! Purpose
//! -------
//! Give callers one coarse classification for every failure the crate can
//! report, independent of which component raised it. Each module keeps its
//! own rich error enum (`SpectrumError`, `BasisError`, `SurfaceError`,
//! `GpError`, `PhaseError`, `OptError`); all of them expose `.kind()` which
//! maps onto [`ErrorKind`].
//!
//! Key behaviors
//! -------------
//! - [`ErrorKind::InputContractViolation`]: grid mismatch, unnormalized flux,
//!   malformed phase ordering, bad masks, invalid options.
//! - [`ErrorKind::NumericalDegeneracy`]: zero-variance segments, NaN ensemble
//!   passes, ill-conditioned kernels or Gram matrices, failed GP fits.
//! - [`ErrorKind::ExternalDependencyFailure`]: the predictive model raised or
//!   returned a malformed batch, or basis resource files could not be read.
//!
//! Conventions
//! -----------
//! - Every failure is fatal to the current call; no partial surfaces,
//!   hypothesis tables, or curves are ever returned.
//! - Retrying with different inputs is a caller decision.

/// Coarse failure class shared by all module errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller handed in data or options that violate a documented contract.
    InputContractViolation,
    /// Arithmetic broke down (zero variance, NaN, non-PD matrices, failed fits).
    NumericalDegeneracy,
    /// A collaborator outside the crate (model, resource files) failed.
    ExternalDependencyFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InputContractViolation => write!(f, "input contract violation"),
            ErrorKind::NumericalDegeneracy => write!(f, "numerical degeneracy"),
            ErrorKind::ExternalDependencyFailure => write!(f, "external dependency failure"),
        }
    }
}
