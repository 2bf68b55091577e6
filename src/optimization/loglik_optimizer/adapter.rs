//! Adapter that exposes a `LogLikelihood` as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` becomes minimizing `c(θ) = -ℓ(θ)`. Analytic gradients
//! are negated; when none are provided the **cost** closure is
//! finite-differenced, so that branch needs no sign flip.
use std::cell::RefCell;

use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        solver::{Cost, Grad, Theta},
        traits::LogLikelihood,
        validation::validate_grad,
    },
};

/// Bridges a `LogLikelihood` and its data to `CostFunction` + `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(θ) = -ℓ(θ)`; non-finite `ℓ` is reported as `NonFiniteCost`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value }.into());
        }
        Ok(-value)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Gradient of the cost at `θ`.
    ///
    /// Behavior
    /// --------
    /// - Analytic `∇ℓ` available: validate and return `-∇ℓ`.
    /// - `GradientNotImplemented`: central differences of the cost. If a
    ///   cost evaluation failed during the stencil, or the result is not
    ///   finite, retry once with forward differences.
    /// - Any other objective error propagates.
    ///
    /// Notes
    /// -----
    /// The finite-difference closure must return `f64`, so the first error it
    /// hits is parked in a `RefCell` and `NaN` is returned in its place.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_fn = |t: &Theta| -> f64 {
                    match self.cost(t) {
                        Ok(c) => c,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let central = theta.central_diff(&cost_fn);
                let failed = closure_err.borrow().is_some();
                if !failed && validate_grad(&central, dim).is_ok() {
                    return Ok(central);
                }
                forward_fd(theta, &cost_fn, &closure_err)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Forward-difference retry with error capture.
///
/// Clears `closure_err`, runs `forward_diff`, and returns the captured
/// evaluation error if one occurred, else the validated gradient.
fn forward_fd<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&grad, theta.len())?;
    Ok(grad)
}
