//! surface::model — interface to the trained sequence model.
use ndarray::{Array3, ArrayView3};

use crate::basis::PARAM_LEN;

/// Features per input timestep: `[query_phase, reference_phase, params…]`.
pub const INPUT_WIDTH: usize = 2 + PARAM_LEN;

/// Features per output timestep: one flattened `2 × 92` parameterization.
pub const OUTPUT_WIDTH: usize = PARAM_LEN;

/// Timesteps per sequence (origin, target).
pub const N_TIMESTEPS: usize = 2;

/// Whether dropout stays active during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regularization {
    /// Dropout active; repeated calls give different outputs.
    Stochastic,
    /// Dropout disabled.
    Deterministic,
}

/// Opaque trained model mapping `(N, 2, 186)` inputs to `(N, 2, 184)`
/// outputs.
///
/// Implementations wrap whatever runtime hosts the trained network. They
/// must be shareable across threads because ensemble passes may run
/// concurrently; any internal RNG needs its own synchronization.
pub trait SequenceModel: Sync {
    fn predict(
        &self, batch: ArrayView3<f64>, regularization: Regularization,
    ) -> anyhow::Result<Array3<f64>>;
}
