use crate::{errors::ErrorKind, spectrum::errors::SpectrumError};

/// Result alias for basis loading, parameterization and reconstruction.
pub type BasisResult<T> = Result<T, BasisError>;

#[derive(Debug, Clone, PartialEq)]
pub enum BasisError {
    // ---- Input spectrum ----
    /// Spectrum failed grid/normalization validation or resampling.
    Spectrum(SpectrumError),

    // ---- Parameterization shape ----
    /// Parameter matrix does not have `2 × (2 + D)` entries.
    ParamsShape { expected: (usize, usize), found: (usize, usize) },

    /// Flattened parameter vector has the wrong length.
    FlatLength { expected: usize, found: usize },

    /// Parameter entry is NaN or infinite.
    NonFiniteParam { row: usize, col: usize, value: f64 },

    // ---- Basis set ----
    /// Wrong number of segments supplied to the basis set.
    SegmentCount { expected: usize, found: usize },

    /// Basis-function matrix for a segment has the wrong shape.
    ComponentShape { segment: usize, expected: (usize, usize), found: (usize, usize) },

    /// Mean template for a segment has the wrong length.
    MeanLength { segment: usize, expected: usize, found: usize },

    /// Basis functions or mean template contain NaN/∞.
    NonFiniteBasis { segment: usize, field: &'static str },

    // ---- Numerical ----
    /// Segment residual has (near-)zero standard deviation.
    DegenerateSegment { segment: usize, scale: f64 },

    /// Gram matrix of a segment's basis is not safely positive definite.
    IllConditionedBasis { segment: usize },

    // ---- Resources ----
    /// Basis resource file could not be read.
    ResourceIo { path: String, text: String },

    /// Basis resource file could not be parsed.
    ResourceParse { path: String, line: usize, text: String },
}

impl BasisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BasisError::Spectrum(err) => err.kind(),
            BasisError::DegenerateSegment { .. } | BasisError::IllConditionedBasis { .. } => {
                ErrorKind::NumericalDegeneracy
            }
            BasisError::ResourceIo { .. } | BasisError::ResourceParse { .. } => {
                ErrorKind::ExternalDependencyFailure
            }
            _ => ErrorKind::InputContractViolation,
        }
    }
}

impl std::error::Error for BasisError {}

impl std::fmt::Display for BasisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input spectrum ----
            BasisError::Spectrum(err) => write!(f, "Invalid input spectrum: {err}"),

            // ---- Parameterization shape ----
            BasisError::ParamsShape { expected, found } => {
                write!(f, "Basis parameter shape mismatch: expected {expected:?}, found {found:?}")
            }
            BasisError::FlatLength { expected, found } => {
                write!(f, "Flattened basis parameters: expected {expected} values, found {found}")
            }
            BasisError::NonFiniteParam { row, col, value } => {
                write!(f, "Non-finite basis parameter at ({row}, {col}): {value}")
            }

            // ---- Basis set ----
            BasisError::SegmentCount { expected, found } => {
                write!(f, "Basis set needs {expected} segments, found {found}")
            }
            BasisError::ComponentShape { segment, expected, found } => {
                write!(f, "Segment {segment} basis: expected shape {expected:?}, found {found:?}")
            }
            BasisError::MeanLength { segment, expected, found } => {
                write!(f, "Segment {segment} mean template: expected {expected}, found {found}")
            }
            BasisError::NonFiniteBasis { segment, field } => {
                write!(f, "Segment {segment} {field} contains non-finite values")
            }

            // ---- Numerical ----
            BasisError::DegenerateSegment { segment, scale } => {
                write!(f, "Segment {segment} has degenerate scale {scale}; cannot standardize")
            }
            BasisError::IllConditionedBasis { segment } => {
                write!(f, "Segment {segment} basis Gram matrix is not positive definite")
            }

            // ---- Resources ----
            BasisError::ResourceIo { path, text } => {
                write!(f, "Failed to read basis resource '{path}': {text}")
            }
            BasisError::ResourceParse { path, line, text } => {
                write!(f, "Failed to parse basis resource '{path}' at line {line}: {text}")
            }
        }
    }
}

impl From<SpectrumError> for BasisError {
    fn from(err: SpectrumError) -> Self {
        BasisError::Spectrum(err)
    }
}
