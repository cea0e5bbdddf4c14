//! Covariance kernels for the Gaussian-process variants.
//!
//! Purpose
//! -------
//! Define the [`Kernel`] seam both GP variants draw their covariance
//! structure through, plus the squared-exponential implementation used as
//! the default.
//!
//! Key behaviors
//! -------------
//! - `covariance` evaluates the cross-covariance between two sets of
//!   input rows; `symmetric` is the Gram-matrix shorthand.
//! - `diag` evaluates only the marginal variances, which the sparse
//!   predictive path needs without forming the full Gram matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are row-per-point matrices with a shared column dimension;
//!   kernels never validate shapes, that is the data layer's job.
//! - Kernel hyperparameters are fixed at construction; this crate
//!   optimizes assignments, not kernel parameters.
use crate::mixture::errors::{MixtureError, MixtureResult};
use ndarray::{Array1, Array2, ArrayView2};
use std::fmt;

/// Covariance function over rows of an input matrix.
pub trait Kernel: fmt::Debug {
    /// Cross-covariance matrix between the rows of `a` and the rows of
    /// `b`, with shape `a.nrows() × b.nrows()`.
    fn covariance(&self, a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64>;

    /// Marginal variances k(x, x) for each row of `a`.
    fn diag(&self, a: ArrayView2<f64>) -> Array1<f64>;

    /// Symmetric Gram matrix over the rows of `a`.
    fn symmetric(&self, a: ArrayView2<f64>) -> Array2<f64> {
        self.covariance(a, a)
    }
}

/// Rbf — squared-exponential kernel
/// `k(x, x') = σ²·exp(-‖x - x'‖² / (2ℓ²))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rbf {
    variance: f64,
    lengthscale: f64,
}

impl Rbf {
    /// Construct a validated squared-exponential kernel.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::InvalidKernelParam` when either hyperparameter is
    ///   not a finite positive number.
    pub fn new(variance: f64, lengthscale: f64) -> MixtureResult<Rbf> {
        if !variance.is_finite() || variance <= 0.0 {
            return Err(MixtureError::InvalidKernelParam { name: "variance", value: variance });
        }
        if !lengthscale.is_finite() || lengthscale <= 0.0 {
            return Err(MixtureError::InvalidKernelParam {
                name: "lengthscale",
                value: lengthscale,
            });
        }
        Ok(Rbf { variance, lengthscale })
    }

    /// Signal variance σ².
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Lengthscale ℓ.
    pub fn lengthscale(&self) -> f64 {
        self.lengthscale
    }
}

impl Default for Rbf {
    /// Unit signal variance and unit lengthscale.
    fn default() -> Rbf {
        Rbf { variance: 1.0, lengthscale: 1.0 }
    }
}

impl Kernel for Rbf {
    fn covariance(&self, a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
        let inv_two_ell_sq = 0.5 / (self.lengthscale * self.lengthscale);
        let mut k = Array2::<f64>::zeros((a.nrows(), b.nrows()));
        for (i, ai) in a.rows().into_iter().enumerate() {
            for (j, bj) in b.rows().into_iter().enumerate() {
                let sq_dist: f64 =
                    ai.iter().zip(bj.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
                k[[i, j]] = self.variance * (-sq_dist * inv_two_ell_sq).exp();
            }
        }
        k
    }

    fn diag(&self, a: ArrayView2<f64>) -> Array1<f64> {
        Array1::from_elem(a.nrows(), self.variance)
    }
}
