//! gp::options — hyperparameter search configuration for the smoother.
use crate::{
    gp::{
        errors::{GpError, GpResult},
        kernel::ParamBounds,
    },
    optimization::loglik_optimizer::MLEOptions,
};

/// Initial amplitude `σ²`.
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
/// Initial length scale `ℓ` (days).
pub const DEFAULT_LENGTH_SCALE: f64 = 10.0;
pub const DEFAULT_AMPLITUDE_BOUNDS: (f64, f64) = (1e-3, 1e3);
pub const DEFAULT_LENGTH_SCALE_BOUNDS: (f64, f64) = (1e-2, 1e2);
/// Random restarts in addition to the initial hyperparameters.
pub const DEFAULT_N_RESTARTS: usize = 10;
pub const DEFAULT_SEED: u64 = 0;

/// GP smoother configuration.
///
/// Fields
/// ------
/// - `amplitude`, `length_scale`: initial hyperparameters (first start).
/// - `amplitude_bounds`, `length_scale_bounds`: box constraints.
/// - `n_restarts`: extra log-uniform starts drawn inside the bounds.
/// - `seed`: RNG seed for those draws, so repeated fits agree.
/// - `mle`: L-BFGS settings for each start.
#[derive(Debug, Clone, PartialEq)]
pub struct GpOptions {
    pub amplitude: f64,
    pub amplitude_bounds: ParamBounds,
    pub length_scale: f64,
    pub length_scale_bounds: ParamBounds,
    pub n_restarts: usize,
    pub seed: u64,
    pub mle: MLEOptions,
}

impl GpOptions {
    /// Errors
    /// ------
    /// - [`GpError::InitialOutsideBounds`] if an initial value is not
    ///   inside its bounds.
    pub fn new(
        amplitude: f64, amplitude_bounds: ParamBounds, length_scale: f64,
        length_scale_bounds: ParamBounds, n_restarts: usize, seed: u64, mle: MLEOptions,
    ) -> GpResult<Self> {
        check_initial("amplitude", amplitude, &amplitude_bounds)?;
        check_initial("length_scale", length_scale, &length_scale_bounds)?;
        Ok(Self {
            amplitude,
            amplitude_bounds,
            length_scale,
            length_scale_bounds,
            n_restarts,
            seed,
            mle,
        })
    }
}

impl Default for GpOptions {
    fn default() -> Self {
        let (a_lo, a_hi) = DEFAULT_AMPLITUDE_BOUNDS;
        let (l_lo, l_hi) = DEFAULT_LENGTH_SCALE_BOUNDS;
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            amplitude_bounds: ParamBounds { lower: a_lo, upper: a_hi },
            length_scale: DEFAULT_LENGTH_SCALE,
            length_scale_bounds: ParamBounds { lower: l_lo, upper: l_hi },
            n_restarts: DEFAULT_N_RESTARTS,
            seed: DEFAULT_SEED,
            mle: MLEOptions::default(),
        }
    }
}

fn check_initial(name: &'static str, value: f64, bounds: &ParamBounds) -> GpResult<()> {
    if !bounds.contains(value) {
        return Err(GpError::InitialOutsideBounds {
            name,
            value,
            lower: bounds.lower,
            upper: bounds.upper,
        });
    }
    Ok(())
}
