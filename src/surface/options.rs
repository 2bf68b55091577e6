use crate::surface::errors::{SurfaceError, SurfaceResult};

/// Default Monte-Carlo dropout ensemble size.
pub const DEFAULT_N_PASSES: usize = 64;

/// Surface predictor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Stochastic forward passes per prediction.
    pub n_passes: usize,
}

impl SurfaceOptions {
    /// Errors
    /// ------
    /// - [`SurfaceError::InvalidPassCount`] when `n_passes == 0`.
    pub fn new(n_passes: usize) -> SurfaceResult<Self> {
        if n_passes == 0 {
            return Err(SurfaceError::InvalidPassCount { n_passes });
        }
        Ok(Self { n_passes })
    }
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self { n_passes: DEFAULT_N_PASSES }
    }
}
