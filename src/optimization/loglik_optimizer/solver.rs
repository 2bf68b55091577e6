//! loglik_optimizer::solver — numeric aliases and L-BFGS construction.
//!
//! Purpose
//! -------
//! Keep the ndarray/argmin generic wiring in one place: the canonical
//! parameter/gradient/cost aliases, the two line-search flavors, and the
//! builders that turn [`MLEOptions`] into a configured L-BFGS instance.
//!
//! Conventions
//! -----------
//! - Builders never set the initial point or `max_iters`; the runner in
//!   `api` applies those.
//! - Tolerances that argmin rejects surface as `OptError` through the
//!   `From<argmin::core::Error>` conversion.
use std::collections::HashMap;

use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;

use crate::optimization::{errors::OptResult, loglik_optimizer::traits::MLEOptions};

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector matching `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// argmin function-evaluation counters (`"cost_count"`, `"gradient_count"`, …).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// L-BFGS with Hager–Zhang line search, tolerances from `opts`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search, tolerances from `opts`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional gradient and cost-change tolerances.
///
/// `None` leaves argmin's default for that rule in place.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
