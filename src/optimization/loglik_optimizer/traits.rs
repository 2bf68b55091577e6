//! Public configuration and result types for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: objective trait (the GP log marginal likelihood
//!   implements it).
//! - [`MLEOptions`] and [`Tolerances`]: solver configuration.
//! - [`LineSearcher`]: line search used inside L-BFGS.
//! - [`OptimOutcome`]: normalized result of a single run.
//!
//! Convention: we *maximize* `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`. Analytic
//! gradients, when provided, are gradients of `ℓ`; the adapter flips signs.
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        solver::{Cost, FnEvalMap, Grad, Theta},
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};

/// Objective interface for the L-BFGS maximizer.
///
/// - `type Data`: payload threaded through `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`. Invalid
///   states (e.g. a kernel matrix that fails Cholesky) are reported as
///   `OptError`, never panics.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject malformed starting
///   points before any solver work.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic `∇ℓ(θ)`. The default
///   returns `GradientNotImplemented`, which routes the adapter to finite
///   differences.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

/// Solver configuration.
///
/// Fields:
/// - `tols`: stopping rules.
/// - `line_searcher`: line search inside L-BFGS.
/// - `verbose`: attach the slog observer (`obs_slog` feature only).
/// - `lbfgs_mem`: history size; `None` means
///   [`DEFAULT_LBFGS_MEM`](crate::optimization::loglik_optimizer::solver::DEFAULT_LBFGS_MEM).
///
/// Default: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 200`,
/// More–Thuente, quiet, default memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Errors
    /// ------
    /// - [`OptError::InvalidLBFGSMem`] when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(200) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules. At least one field must be `Some`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Result of one L-BFGS run.
///
/// - `theta_hat`: best unconstrained parameters found.
/// - `value`: `ℓ(θ̂)` (not the cost).
/// - `converged` / `status`: argmin termination status.
/// - `iterations`, `fn_evals`: solver counters.
/// - `grad_norm`: norm of the last gradient, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// - Propagates `validate_theta_hat` / `validate_value` failures.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::TerminationReason;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Tolerances` and `MLEOptions` validation.
    // - `OptimOutcome` status mapping and validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances reject the empty configuration and invalid values.
    //
    // Given
    // -----
    // - All `None`; negative `tol_grad`; `max_iter = 0`.
    //
    // Expect
    // ------
    // - The matching `OptError` variant for each.
    fn tolerances_new_rejects_invalid_configurations() {
        // Act / Assert
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Zero L-BFGS memory is rejected, default options are consistent.
    //
    // Given
    // -----
    // - `lbfgs_mem = Some(0)`; `MLEOptions::default()`.
    //
    // Expect
    // ------
    // - `InvalidLBFGSMem`; default tolerances pass `Tolerances::new`.
    fn mle_options_validation_and_default() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).unwrap();
        let default = MLEOptions::default();

        // Act
        let zero = MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(0));

        // Assert
        assert!(matches!(zero, Err(OptError::InvalidLBFGSMem { mem: 0, .. })));
        assert!(
            Tolerances::new(default.tols.tol_grad, default.tols.tol_cost, default.tols.max_iter)
                .is_ok()
        );
    }

    #[test]
    // Purpose
    // -------
    // Outcomes map termination status and reject missing/non-finite theta.
    //
    // Given
    // -----
    // - A converged state with gradient [3, 4]; a `None` theta.
    //
    // Expect
    // ------
    // - `converged = true`, `grad_norm = 5`; `MissingThetaHat` for `None`.
    fn optim_outcome_new_maps_status_and_validates() {
        // Arrange
        let status = TerminationStatus::Terminated(TerminationReason::SolverConverged);

        // Act
        let ok = OptimOutcome::new(
            Some(array![0.5]),
            -1.0,
            status.clone(),
            4,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .unwrap();
        let missing = OptimOutcome::new(None, -1.0, status, 4, FnEvalMap::new(), None);

        // Assert
        assert!(ok.converged);
        assert!((ok.grad_norm.unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(missing, Err(OptError::MissingThetaHat));
    }
}
