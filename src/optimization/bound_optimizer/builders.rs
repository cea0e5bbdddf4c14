//! bound_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the L-BFGS solvers used by the
//! evidence-bound optimizer. These helpers hide Argmin's generic wiring
//! and apply crate-level options (tolerances, memory size) so that
//! higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS solvers with either Hager-Zhang or More-Thuente
//!   line search based on crate-level aliases.
//! - Apply optional gradient and cost-change tolerances from
//!   [`OptOptions`] via a shared configuration helper.
//! - Leave the initial parameter vector and maximum iterations to the
//!   runner layer, keeping these builders side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the canonical numeric types [`Theta`],
//!   [`Grad`], and [`Cost`].
//! - The L-BFGS memory (`m`) is either provided via `opts.lbfgs_mem` or
//!   defaults to [`DEFAULT_LBFGS_MEM`].
//! - Any invalid tolerance passed into Argmin's `with_tolerance_grad` /
//!   `with_tolerance_cost` surfaces as an `OptError` via the crate's
//!   `From<Error>` implementation.
//!
//! Conventions
//! -----------
//! - The builders do **not** set an initial parameter vector (`theta0`)
//!   or `max_iters`; these are runtime concerns applied by the runner.
//! - Errors are always reported via [`OptResult`]; raw
//!   `argmin::core::Error` values never leak across module boundaries.
//!
//! Downstream usage
//! ----------------
//! - The high-level entry point calls [`build_optimizer_hager_zhang`] or
//!   [`build_optimizer_more_thuente`] based on the configured
//!   `LineSearcher` in [`OptOptions`], then passes the solver to the
//!   runner together with an adapted problem and initial parameters.
//!
//! Testing notes
//! -------------
//! - Unit tests verify propagation of `lbfgs_mem` and tolerance settings
//!   into the solver configuration; full solves are exercised by the
//!   integration tests.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    bound_optimizer::{
        traits::OptOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
            DEFAULT_LBFGS_MEM,
        },
    },
    errors::OptResult,
};

/// build_optimizer_hager_zhang — construct L-BFGS with Hager-Zhang line
/// search.
///
/// Purpose
/// -------
/// Build an [`LbfgsHagerZhang`] solver configured with the crate's
/// standard numeric types and optional tolerances from [`OptOptions`],
/// leaving initial parameters and iteration limits to the caller.
///
/// Parameters
/// ----------
/// - `opts`: `&OptOptions`
///   Optimizer options. This builder consults `opts.lbfgs_mem` (falling
///   back to [`DEFAULT_LBFGS_MEM`]) and the optional
///   `opts.tols.tol_grad` / `opts.tols.tol_cost` thresholds.
///
/// Returns
/// -------
/// `OptResult<LbfgsHagerZhang>`
///   A configured solver, or the error Argmin raised while applying a
///   tolerance.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) when
///   `with_tolerance_grad` or `with_tolerance_cost` rejects a setting.
///
/// Notes
/// -----
/// - This function does not set `theta0` or `max_iters`; the runner does.
pub fn build_optimizer_hager_zhang(opts: &OptOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// build_optimizer_more_thuente — construct L-BFGS with More-Thuente line
/// search.
///
/// Purpose
/// -------
/// Build an [`LbfgsMoreThuente`] solver configured with the crate's
/// standard numeric types and optional tolerances from [`OptOptions`],
/// using the More-Thuente line-search strategy.
///
/// Parameters
/// ----------
/// - `opts`: `&OptOptions`
///   Optimizer options; consulted exactly as in
///   [`build_optimizer_hager_zhang`].
///
/// Returns
/// -------
/// `OptResult<LbfgsMoreThuente>`
///   A configured solver, or the error Argmin raised while applying a
///   tolerance.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) for rejected tolerance
///   settings.
pub fn build_optimizer_more_thuente(opts: &OptOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// Generic over the line-search type `L` so both builders share one
/// wiring path. When a tolerance is `None`, the corresponding
/// `with_tolerance_*` method is not called and Argmin's defaults remain
/// in effect.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance value.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &OptOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
