//! Adapter that exposes a mixture [`Objective`] as an `argmin` problem.
//!
//! We convert a *maximization* of an evidence bound `B(θ)` into a
//! *minimization* problem by defining the cost as `c(θ) = -B(θ)`.
//! Analytic gradients (if provided by the model) are negated accordingly.
//! If a gradient is not provided, we finite-difference the **cost**
//! closure, so no sign flip is needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    bound_optimizer::{
        finite_diff::run_fd_diff,
        traits::Objective,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
    errors::OptError,
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges an [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-B(θ)` (negative bound).
/// - `Gradient::gradient` returns:
///   - `-∇B(θ)` if the model provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -B(θ)`.
    ///
    /// - Calls the model's `value(θ)` and checks the result is finite.
    /// - Returns `Error(NonFiniteCost)` if the value is not finite.
    ///
    /// # Errors
    /// Propagates any `OptError` from the model's `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the model implements `grad(θ)`, we validate it and return
    ///   `-grad` (because the cost is `-B`).
    /// - Otherwise, we compute a finite-difference gradient of the
    ///   **cost**:
    ///   - Try *central* differences first.
    ///   - If any evaluation of the `cost` closure failed (captured via
    ///     `closure_err`), retry with *forward* differences.
    ///   - Validate the FD gradient; if it fails (e.g., non-finite), retry
    ///     once with *forward* differences and validate again.
    ///
    /// Implementation notes:
    /// - The FD closure must return `f64`, so we can't use `?` inside it;
    ///   we capture the first error in `closure_err` and return `NaN` from
    ///   the closure. After FD, we turn that captured error back into a
    ///   real error (or switch to forward diff).
    ///
    /// # Errors
    /// - Propagates model errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during
    ///   FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(e) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                match e {
                    OptError::GradientNotImplemented => {
                        let cost_func = |theta: &Theta| -> f64 {
                            match self.cost(theta) {
                                Ok(val) => val,
                                Err(e) => {
                                    let mut slot = closure_err.borrow_mut();
                                    if slot.is_none() {
                                        *slot = Some(e);
                                    }
                                    f64::NAN
                                }
                            }
                        };
                        let fd_grad = theta.central_diff(&cost_func);
                        if closure_err.borrow().is_some() {
                            return Ok(run_fd_diff(theta, &cost_func, &closure_err)?);
                        }
                        match validate_grad(&fd_grad, dim) {
                            Ok(()) => Ok(fd_grad),
                            Err(_) => Ok(run_fd_diff(theta, &cost_func, &closure_err)?),
                        }
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a mixture objective.
    pub fn new(f: &'a F) -> Self {
        Self { f }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The cost sign convention for a maximized objective.
    // - The analytic gradient path with its sign flip.
    // - The finite-difference fallback when no gradient is implemented.
    //
    // They intentionally DO NOT cover:
    // - Full L-BFGS runs; those live in the runner and integration tests.
    // -------------------------------------------------------------------------

    struct Concave;

    impl Objective for Concave {
        fn value(&self, theta: &Theta) -> OptResult<Cost> {
            Ok(-theta.dot(theta))
        }
        fn check(&self, _theta: &Theta) -> OptResult<()> {
            Ok(())
        }
    }

    struct ConcaveWithGrad;

    impl Objective for ConcaveWithGrad {
        fn value(&self, theta: &Theta) -> OptResult<Cost> {
            Ok(-theta.dot(theta))
        }
        fn check(&self, _theta: &Theta) -> OptResult<()> {
            Ok(())
        }
        fn grad(&self, theta: &Theta) -> OptResult<Grad> {
            Ok(-2.0 * theta)
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the adapter exposes the negated objective as the cost.
    //
    // Given
    // -----
    // - B(θ) = -θ·θ at θ = (1, 2).
    //
    // Expect
    // ------
    // - cost = 5 (the negation of -5).
    fn cost_is_negated_objective() {
        // Arrange
        let model = Concave;
        let adapter = ArgMinAdapter::new(&model);

        // Act
        let cost = adapter.cost(&array![1.0, 2.0]).expect("finite objective");

        // Assert
        assert!((cost - 5.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the analytic gradient is negated to match the cost.
    //
    // Given
    // -----
    // - ∇B(θ) = -2θ at θ = (1, -3).
    //
    // Expect
    // ------
    // - Cost gradient is 2θ = (2, -6).
    fn analytic_gradient_is_sign_flipped() {
        // Arrange
        let model = ConcaveWithGrad;
        let adapter = ArgMinAdapter::new(&model);

        // Act
        let grad = adapter.gradient(&array![1.0, -3.0]).expect("valid gradient");

        // Assert
        assert!((grad[0] - 2.0).abs() < 1e-12);
        assert!((grad[1] + 6.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the finite-difference fallback approximates the cost
    // gradient when no analytic gradient exists.
    //
    // Given
    // -----
    // - B(θ) = -θ·θ at θ = (0.5, 1.5) without a `grad` implementation.
    //
    // Expect
    // ------
    // - Cost gradient close to 2θ = (1, 3).
    fn finite_difference_fallback_matches() {
        // Arrange
        let model = Concave;
        let adapter = ArgMinAdapter::new(&model);

        // Act
        let grad = adapter.gradient(&array![0.5, 1.5]).expect("fd gradient");

        // Assert
        assert!((grad[0] - 1.0).abs() < 1e-5);
        assert!((grad[1] - 3.0).abs() < 1e-5);
    }
}
