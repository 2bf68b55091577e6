use crate::errors::ErrorKind;

/// Result alias for spectrum construction, validation and interpolation.
pub type SpectrumResult<T> = Result<T, SpectrumError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SpectrumError {
    // ---- Shape ----
    /// Spectrum or interpolation input has no samples.
    Empty,

    /// Paired sequences have different lengths.
    LengthMismatch { expected: usize, found: usize },

    /// Interpolation needs at least two knots.
    TooFewKnots { found: usize },

    // ---- Values ----
    /// Wavelength or flux element is NaN or infinite.
    NonFinite { index: usize, value: f64, field: &'static str },

    /// Interpolation knots must be strictly increasing.
    NotIncreasing { index: usize },

    // ---- Contract ----
    /// Wavelengths are not the fixed 3800–7198 / step-2 grid.
    GridMismatch { index: usize, expected: f64, found: f64 },

    /// Flux is not mean-normalized to 1.0.
    NotNormalized { mean: f64 },

    /// Mask length does not match the spectrum.
    MaskLengthMismatch { expected: usize, found: usize },

    // ---- Numerical ----
    /// Flux mean is zero or non-finite so it cannot be normalized.
    DegenerateMean { mean: f64 },
}

impl SpectrumError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpectrumError::DegenerateMean { .. } => ErrorKind::NumericalDegeneracy,
            _ => ErrorKind::InputContractViolation,
        }
    }
}

impl std::error::Error for SpectrumError {}

impl std::fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            SpectrumError::Empty => write!(f, "Spectrum has no samples"),
            SpectrumError::LengthMismatch { expected, found } => {
                write!(f, "Length mismatch: expected {expected}, found {found}")
            }
            SpectrumError::TooFewKnots { found } => {
                write!(f, "Interpolation needs at least 2 knots, found {found}")
            }

            // ---- Values ----
            SpectrumError::NonFinite { index, value, field } => {
                write!(f, "Non-finite {field} at index {index}: {value}")
            }
            SpectrumError::NotIncreasing { index } => {
                write!(f, "Knots must be strictly increasing; violated at index {index}")
            }

            // ---- Contract ----
            SpectrumError::GridMismatch { index, expected, found } => {
                write!(
                    f,
                    "Wavelength grid mismatch at index {index}: expected {expected}, found {found}"
                )
            }
            SpectrumError::NotNormalized { mean } => {
                write!(f, "Flux is not mean-normalized: mean = {mean}, expected 1.0")
            }
            SpectrumError::MaskLengthMismatch { expected, found } => {
                write!(f, "Bad-wavelength mask length mismatch: expected {expected}, found {found}")
            }

            // ---- Numerical ----
            SpectrumError::DegenerateMean { mean } => {
                write!(f, "Cannot normalize flux with mean {mean}")
            }
        }
    }
}
