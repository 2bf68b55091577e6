//! gp::smoother — fit a zero-mean GP to noisy 1-D samples and predict.
use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, ArrayView1};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    gp::{
        errors::{GpError, GpResult},
        kernel::ConstantRbf,
        likelihood::{GpData, MarginalLikelihood, factor, lml_from_factor},
        options::GpOptions,
    },
    optimization::loglik_optimizer::{Theta, maximize_multistart},
};

/// Posterior mean and standard deviation at the query points.
#[derive(Debug, Clone, PartialEq)]
pub struct GpPrediction {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

/// GP conditioned on training data at fitted hyperparameters.
#[derive(Debug, Clone)]
pub struct FittedGp {
    kernel: ConstantRbf,
    x_train: Array1<f64>,
    chol: Cholesky<f64, Dyn>,
    weights: DVector<f64>,
    log_marginal_likelihood: f64,
}

impl FittedGp {
    /// Fit hyperparameters by maximizing the log marginal likelihood.
    ///
    /// Parameters
    /// ----------
    /// - `data`: finite training inputs, targets and noise variances.
    /// - `opts`: initial values, bounds, restarts and L-BFGS settings.
    ///
    /// Notes
    /// -----
    /// The search runs on `(ln σ², ln ℓ)`. The first start is the initial
    /// kernel; `opts.n_restarts` more are drawn log-uniformly inside the
    /// bounds from `StdRng::seed_from_u64(seed)`. The selected point is
    /// projected onto the bounds.
    ///
    /// Errors
    /// ------
    /// - [`GpError::FitFailed`] when every start fails.
    /// - [`GpError::IllConditioned`] if the covariance at the selected
    ///   hyperparameters cannot be factored.
    pub fn fit(data: GpData, opts: &GpOptions) -> GpResult<Self> {
        let objective = MarginalLikelihood {
            amplitude_bounds: opts.amplitude_bounds,
            length_scale_bounds: opts.length_scale_bounds,
        };
        let initial = ConstantRbf { amplitude: opts.amplitude, length_scale: opts.length_scale };
        let starts = restart_thetas(&objective, &initial, opts);

        let outcome = maximize_multistart(&objective, starts, &data, &opts.mle)?;
        let kernel = objective.kernel(&outcome.theta_hat);
        let chol = factor(&kernel, &data)
            .map_err(|_| GpError::IllConditioned { context: "fitted training covariance" })?;
        let (log_marginal_likelihood, weights) = lml_from_factor(&chol, &data.y);
        debug!(
            amplitude = kernel.amplitude,
            length_scale = kernel.length_scale,
            log_marginal_likelihood,
            n_train = data.x.len(),
            "fitted GP hyperparameters"
        );
        Ok(Self { kernel, x_train: data.x, chol, weights, log_marginal_likelihood })
    }

    pub fn kernel(&self) -> ConstantRbf {
        self.kernel
    }

    pub fn log_marginal_likelihood(&self) -> f64 {
        self.log_marginal_likelihood
    }

    /// Posterior at `x_query`: `mean = K*ᵀ w`, `std = sqrt(max(k** - vᵀv, 0))`
    /// with `v = L⁻¹ K*`.
    ///
    /// Errors
    /// ------
    /// - [`GpError::EmptyQuery`], [`GpError::NonFiniteInput`].
    /// - [`GpError::IllConditioned`] if the triangular solve breaks down.
    pub fn predict(&self, x_query: ArrayView1<f64>) -> GpResult<GpPrediction> {
        if x_query.is_empty() {
            return Err(GpError::EmptyQuery);
        }
        check_finite("x_query", x_query)?;

        let k_star = self.kernel.cross(self.x_train.view(), x_query);
        let mean = k_star.tr_mul(&self.weights);
        let v: DMatrix<f64> = self
            .chol
            .l_dirty()
            .solve_lower_triangular(&k_star)
            .ok_or(GpError::IllConditioned { context: "predictive variance solve" })?;

        let prior = self.kernel.amplitude;
        let std = Array1::from_iter(
            v.column_iter().map(|col| (prior - col.norm_squared()).max(0.0).sqrt()),
        );
        Ok(GpPrediction { mean: Array1::from_iter(mean.iter().copied()), std })
    }
}

/// Smooth noisy samples `(x, y ± y_err)` and evaluate at `x_query`.
///
/// Parameters
/// ----------
/// - `x`: sample locations, finite.
/// - `y`: sample values; NaN entries are dropped together with their `x`
///   and `y_err`.
/// - `y_err`: 1σ errors; NaN entries become `nan_fill`. The noise variance
///   on the diagonal is `y_err²`.
/// - `x_query`: evaluation points, finite and non-empty.
/// - `nan_fill`: finite, positive replacement error.
///
/// Errors
/// ------
/// - [`GpError::LengthMismatch`], [`GpError::NonFiniteInput`],
///   [`GpError::NoFiniteSamples`], [`GpError::EmptyQuery`],
///   [`GpError::InvalidNanFill`] for malformed input.
/// - Fit and prediction failures from [`FittedGp`].
pub fn smooth(
    x: ArrayView1<f64>, y: ArrayView1<f64>, y_err: ArrayView1<f64>, x_query: ArrayView1<f64>,
    nan_fill: f64, opts: &GpOptions,
) -> GpResult<GpPrediction> {
    if !nan_fill.is_finite() || nan_fill <= 0.0 {
        return Err(GpError::InvalidNanFill { value: nan_fill });
    }
    if y.len() != x.len() {
        return Err(GpError::LengthMismatch { field: "y", expected: x.len(), found: y.len() });
    }
    if y_err.len() != x.len() {
        return Err(GpError::LengthMismatch {
            field: "y_err",
            expected: x.len(),
            found: y_err.len(),
        });
    }
    if x_query.is_empty() {
        return Err(GpError::EmptyQuery);
    }
    check_finite("x", x)?;

    let keep: Vec<usize> = (0..x.len()).filter(|&i| !y[i].is_nan()).collect();
    if keep.is_empty() {
        return Err(GpError::NoFiniteSamples);
    }
    let mut noise = Vec::with_capacity(keep.len());
    for &i in &keep {
        if y[i].is_infinite() {
            return Err(GpError::NonFiniteInput { field: "y", index: i, value: y[i] });
        }
        let err = if y_err[i].is_nan() { nan_fill } else { y_err[i] };
        if !err.is_finite() {
            return Err(GpError::NonFiniteInput { field: "y_err", index: i, value: err });
        }
        noise.push(err * err);
    }
    debug!(n_samples = x.len(), n_kept = keep.len(), "GP smoothing input");

    let data = GpData {
        x: keep.iter().map(|&i| x[i]).collect(),
        y: keep.iter().map(|&i| y[i]).collect(),
        noise: Array1::from(noise),
    };
    FittedGp::fit(data, opts)?.predict(x_query)
}

fn restart_thetas(
    objective: &MarginalLikelihood, initial: &ConstantRbf, opts: &GpOptions,
) -> Vec<Theta> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut starts = Vec::with_capacity(opts.n_restarts + 1);
    starts.push(objective.theta(initial));
    for _ in 0..opts.n_restarts {
        let amplitude = opts.amplitude_bounds.log_uniform_theta(rng.random::<f64>());
        let length_scale = opts.length_scale_bounds.log_uniform_theta(rng.random::<f64>());
        starts.push(Theta::from(vec![amplitude, length_scale]));
    }
    starts
}

fn check_finite(field: &'static str, values: ArrayView1<f64>) -> GpResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(GpError::NonFiniteInput { field, index, value: values[index] }),
        None => Ok(()),
    }
}
