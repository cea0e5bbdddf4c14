//! High-level entry point for maximizing a mixture [`Objective`].
//!
//! This selects an L-BFGS solver with either Hager-Zhang or More-Thuente
//! line search, wraps the model in an `ArgMinAdapter` (which *minimizes*
//! `-B(θ)`), and delegates the run to `run_lbfgs`.
use crate::optimization::{
    bound_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, Objective, OptOptions},
        OptimOutcome, Theta,
    },
    errors::OptResult,
};

/// Maximize an objective `B(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0)`.
/// - Wraps `f` in an `ArgMinAdapter` that exposes a *minimization*
///   problem `c(θ) = -B(θ)` to `argmin`.
/// - Builds an L-BFGS solver with either **Hager-Zhang** or
///   **More-Thuente** line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, optional observers) and returns an `OptimOutcome`.
///
/// # Parameters
/// - `f`: Your model implementing [`Objective`].
/// - `theta0`: Initial parameter vector.
/// - `opts`: Optimizer options (tolerances, line search choice,
///   verbosity, L-BFGS memory).
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search
///   failures).
///
/// # Returns
/// An [`OptimOutcome`] containing `theta_hat`, best value `B(θ̂)`,
/// termination status, iteration counts, function evaluation counts, and
/// optionally the gradient norm.
///
/// # Example
/// ```ignore
/// let out = maximize(&model, theta0, &OptOptions::default())?;
/// println!("theta_hat = {:?}", out.theta_hat);
/// ```
pub fn maximize<F: Objective>(
    f: &F, theta0: Theta, opts: &OptOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0)?;
    let problem = ArgMinAdapter::new(f);
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
