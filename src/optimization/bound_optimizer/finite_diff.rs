//! bound_optimizer::finite_diff — finite-difference gradient helper.
//!
//! Purpose
//! -------
//! Provide a finite-difference gradient approximation around a parameter
//! vector, together with error capture and validation, so the adapter can
//! request derivatives without depending directly on the `finitediff`
//! API.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and post-hoc
//!   validation via [`run_fd_diff`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter vectors and gradients are `ndarray` containers over `f64`
//!   (`Theta`, `Grad`).
//! - Any error raised by the objective during finite differencing is
//!   routed into the shared `closure_err` cell and treated as a hard
//!   failure for the gradient computation.
//! - Gradients returned from this module satisfy [`validate_grad`].
//!
//! Conventions
//! -----------
//! - Finite differences are taken with respect to the unconstrained
//!   assignment logits; no reparameterization happens here.
//! - Domain errors are surfaced as [`OptError`] via `OptResult<T>`;
//!   Argmin's [`Error`] is confined to the boundary where the
//!   finite-difference closures are invoked.
//!
//! Downstream usage
//! ----------------
//! - The adapter calls [`run_fd_diff`] when an [`Objective`]
//!   implementation does not provide an analytic gradient and the central
//!   difference either failed or produced an invalid result.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the successful quadratic path and the captured
//!   error path.
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`Objective`]: crate::optimization::bound_optimizer::traits::Objective
use crate::optimization::{
    bound_optimizer::{validation::validate_grad, Grad, Theta},
    errors::OptResult,
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// run_fd_diff — forward-difference gradient with error capture and
/// validation.
///
/// Purpose
/// -------
/// Compute a forward-difference approximation to the gradient of a scalar
/// objective at `theta`, while capturing any error raised inside the
/// evaluation closure and enforcing shape/finiteness invariants on the
/// resulting gradient.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point at which the gradient is approximated; its length defines the
///   expected gradient dimension.
/// - `func`: `&G`
///   Objective closure mapping `theta` to a scalar. It is assumed to
///   route any evaluation errors into `closure_err` and return `NaN` in
///   that case.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Shared cell used to capture an [`argmin::core::Error`] raised inside
///   `func` while the finite-difference routine runs. Cleared on entry,
///   inspected after the call.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   - `Ok(grad)` when finite differencing succeeds, no error was
///     captured, and the gradient passes [`validate_grad`].
///   - `Err(e)` when `func` signaled an error or validation fails.
///
/// Errors
/// ------
/// - `OptError` (via `impl From<Error> for OptError`) when `closure_err`
///   contains a captured error.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
///
/// Notes
/// -----
/// - The caller must wrap the original objective in a closure that writes
///   any runtime error into `closure_err` and returns `NaN`. If no error
///   is written, the finite-difference pass is assumed to have evaluated
///   successfully.
///
/// Examples
/// --------
/// ```rust
/// # use std::cell::RefCell;
/// # use argmin::core::Error;
/// # use ndarray::Array1;
/// # use rust_mixtures::optimization::bound_optimizer::Theta;
/// # use rust_mixtures::optimization::bound_optimizer::finite_diff::run_fd_diff;
/// let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
/// let closure_err: RefCell<Option<Error>> = RefCell::new(None);
///
/// // Simple quadratic objective with no internal error path.
/// let f = |x: &Theta| x.dot(x);
///
/// let grad = run_fd_diff(&theta, &f, &closure_err).unwrap();
/// assert_eq!(grad.len(), theta.len());
/// ```
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}
