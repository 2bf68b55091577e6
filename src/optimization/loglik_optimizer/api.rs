//! Entry points for maximizing a `LogLikelihood` with L-BFGS.
//!
//! - [`maximize`]: one run from one starting point.
//! - [`maximize_multistart`]: several runs, best successful value wins.
//! - [`run_lbfgs`]: shared executor wiring for both line-search flavors.
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;
use tracing::debug;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        solver::{Grad, Theta, build_optimizer_hager_zhang, build_optimizer_more_thuente},
        traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome},
    },
};

/// Maximize `ℓ(θ)` from `theta0` with L-BFGS.
///
/// Parameters
/// ----------
/// - `f`: objective implementing [`LogLikelihood`].
/// - `theta0`: starting point in unconstrained space.
/// - `data`: payload forwarded to `value` / `grad` / `check`.
/// - `opts`: tolerances, line search, verbosity, memory.
///
/// Returns
/// -------
/// [`OptimOutcome`] with `θ̂`, `ℓ(θ̂)`, termination status and counters.
///
/// Errors
/// ------
/// - Anything `f.check` rejects.
/// - Solver construction errors (invalid tolerances for argmin).
/// - Runtime failures (objective errors, line-search breakdowns) mapped
///   into [`OptError`].
///
/// Example
/// -------
/// ```
/// use ndarray::array;
/// use snail::optimization::errors::OptResult;
/// use snail::optimization::loglik_optimizer::{LogLikelihood, MLEOptions, Theta, maximize};
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.5, -0.3], &(), &MLEOptions::default()).unwrap();
/// assert!(out.theta_hat.iter().all(|t| t.abs() < 1e-3));
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Run [`maximize`] from every starting point and keep the best success.
///
/// Runs are independent; a failed run is logged at debug level and skipped.
/// Ties keep the earliest start.
///
/// Errors
/// ------
/// - [`OptError::NoStartingPoints`] for an empty `starts`.
/// - When every run fails, the error of the last run.
pub fn maximize_multistart<F: LogLikelihood>(
    f: &F, starts: impl IntoIterator<Item = Theta>, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    let mut best: Option<OptimOutcome> = None;
    let mut last_err: Option<OptError> = None;
    for (restart, theta0) in starts.into_iter().enumerate() {
        match maximize(f, theta0, data, opts) {
            Ok(outcome) => {
                let value = outcome.value;
                debug!(restart, value, status = %outcome.status, "restart finished");
                if best.as_ref().is_none_or(|b| outcome.value > b.value) {
                    best = Some(outcome);
                }
            }
            Err(err) => {
                debug!(restart, error = %err, "restart failed");
                last_err = Some(err);
            }
        }
    }
    match (best, last_err) {
        (Some(outcome), _) => Ok(outcome),
        (None, Some(err)) => Err(err),
        (None, None) => Err(OptError::NoStartingPoints),
    }
}

/// Execute `solver` on `problem` from `theta0` and normalize the result.
///
/// Sets the initial parameter and, when configured, `max_iters`. With the
/// `obs_slog` feature and `opts.verbose`, a terminal slog observer is
/// attached and `ℓ(θ₀)` is logged before the first iteration.
///
/// Errors
/// ------
/// - argmin runtime errors via `From<argmin::core::Error>`.
/// - Outcome validation errors (missing or non-finite `θ̂`).
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F: LogLikelihood>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<()> {
    let ll0 = -problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    tracing::info!(ll0, grad_norm, "starting L-BFGS");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::Tolerances;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Single-start convergence with both line searches.
    // - Multi-start selection of the best success, skipping failures.
    // - Empty and all-failing multi-start inputs.
    // -------------------------------------------------------------------------

    /// Double well: ℓ(θ) = -(θ² - 1)² + 0.3 θ, global max near θ = +1.
    struct DoubleWell;

    impl LogLikelihood for DoubleWell {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            let t = theta[0];
            Ok(-(t * t - 1.0).powi(2) + 0.3 * t)
        }

        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            if theta[0].abs() > 10.0 {
                return Err(OptError::InvalidThetaInput { index: 0, value: theta[0] });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches find the local maximum near the start.
    //
    // Given
    // -----
    // - The double well started at θ = 0.7.
    //
    // Expect
    // ------
    // - θ̂ ≈ 1.04 (root of 4θ³ - 4θ - 0.3 = 0 near 1).
    fn maximize_converges_with_both_line_searches() {
        // Arrange
        let tols = Tolerances::new(Some(1e-8), None, Some(200)).unwrap();
        let opts_hz = MLEOptions::new(tols, LineSearcher::HagerZhang, false, None).unwrap();
        let opts_mt = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        // Act
        let hz = maximize(&DoubleWell, array![0.7], &(), &opts_hz).unwrap();
        let mt = maximize(&DoubleWell, array![0.7], &(), &opts_mt).unwrap();

        // Assert
        for out in [hz, mt] {
            let t = out.theta_hat[0];
            assert!((4.0 * t.powi(3) - 4.0 * t - 0.3).abs() < 1e-4, "θ̂ = {t}");
            assert!(t > 0.9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Multi-start keeps the best successful run and ignores failures.
    //
    // Given
    // -----
    // - Starts at -0.8 (left well), 50.0 (rejected by `check`), 0.8 (right well).
    //
    // Expect
    // ------
    // - The returned optimum is in the right (higher) well.
    fn maximize_multistart_picks_best_success() {
        // Arrange
        let starts = vec![array![-0.8], array![50.0], array![0.8]];

        // Act
        let out = maximize_multistart(&DoubleWell, starts, &(), &MLEOptions::default()).unwrap();

        // Assert
        assert!(out.theta_hat[0] > 0.9);
    }

    #[test]
    // Purpose
    // -------
    // Empty and all-failing start sets surface errors.
    //
    // Given
    // -----
    // - No starts; only rejected starts.
    //
    // Expect
    // ------
    // - `NoStartingPoints`; the last `check` error.
    fn maximize_multistart_reports_empty_and_failed_inputs() {
        // Act
        let empty = maximize_multistart(&DoubleWell, Vec::new(), &(), &MLEOptions::default());
        let failed = maximize_multistart(
            &DoubleWell,
            vec![array![20.0], array![-30.0]],
            &(),
            &MLEOptions::default(),
        );

        // Assert
        assert_eq!(empty.unwrap_err(), OptError::NoStartingPoints);
        assert!(matches!(failed, Err(OptError::InvalidThetaInput { value, .. }) if value == -30.0));
    }
}
