//! Observation likelihoods for the sparse-GP variant.
//!
//! Purpose
//! -------
//! Define the [`SeriesLikelihood`] seam between latent cluster functions
//! and observed series values, plus the Gaussian implementation used
//! throughout.
//!
//! Key behaviors
//! -------------
//! - `variational_expectation` integrates the log density against a
//!   Gaussian posterior over the latent function, which for the Gaussian
//!   likelihood has the closed form
//!   `-½ln(2πσ²) - ((y - μ)² + v) / (2σ²)` summed over entries.
//! - `predict_mean_and_var` maps a latent predictive distribution to the
//!   observation space by adding the noise variance.
//!
//! Invariants & assumptions
//! ------------------------
//! - All three input arrays share one length; callers guarantee this.
//! - The noise variance is fixed at construction and strictly positive.
use crate::mixture::errors::{MixtureError, MixtureResult};
use crate::numerics::LOG_2PI;
use ndarray::{Array1, ArrayView1};
use std::fmt;

/// Per-entry observation model linking latent functions to series values.
pub trait SeriesLikelihood: fmt::Debug {
    /// Expected log density `Σ_t E_q[ln p(y_t | f_t)]` under a Gaussian
    /// posterior with marginal means `mean` and variances `var`.
    fn variational_expectation(
        &self,
        y: ArrayView1<f64>,
        mean: ArrayView1<f64>,
        var: ArrayView1<f64>,
    ) -> f64;

    /// Map a latent predictive `(mean, var)` to observation space.
    fn predict_mean_and_var(
        &self,
        mean: ArrayView1<f64>,
        var: ArrayView1<f64>,
    ) -> (Array1<f64>, Array1<f64>);
}

/// GaussianLikelihood — homoscedastic Gaussian observation noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianLikelihood {
    variance: f64,
}

impl GaussianLikelihood {
    /// Construct a validated Gaussian likelihood.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::InvalidNoiseVariance` when `variance` is not a
    ///   finite positive number.
    pub fn new(variance: f64) -> MixtureResult<GaussianLikelihood> {
        if !variance.is_finite() || variance <= 0.0 {
            return Err(MixtureError::InvalidNoiseVariance { value: variance });
        }
        Ok(GaussianLikelihood { variance })
    }

    /// Noise variance σ².
    pub fn variance(&self) -> f64 {
        self.variance
    }
}

impl Default for GaussianLikelihood {
    /// Unit noise variance.
    fn default() -> GaussianLikelihood {
        GaussianLikelihood { variance: 1.0 }
    }
}

impl SeriesLikelihood for GaussianLikelihood {
    fn variational_expectation(
        &self,
        y: ArrayView1<f64>,
        mean: ArrayView1<f64>,
        var: ArrayView1<f64>,
    ) -> f64 {
        let half_log_norm = 0.5 * (LOG_2PI + self.variance.ln());
        let inv_two_var = 0.5 / self.variance;
        y.iter()
            .zip(mean.iter())
            .zip(var.iter())
            .map(|((&yt, &mu), &v)| {
                let resid = yt - mu;
                -half_log_norm - (resid * resid + v) * inv_two_var
            })
            .sum()
    }

    fn predict_mean_and_var(
        &self,
        mean: ArrayView1<f64>,
        var: ArrayView1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        (mean.to_owned(), var.map(|&v| v + self.variance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The closed-form variational expectation on hand-checked inputs.
    // - The observation-space variance shift.
    // - Noise-variance validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the variational expectation at a perfect, certain fit.
    //
    // Given
    // -----
    // - y = μ = (1, 2), v = 0, σ² = 1.
    //
    // Expect
    // ------
    // - Expectation equals -ln(2π) (two points at -½ln(2π) each).
    fn expectation_at_perfect_fit() {
        // Arrange
        let lik = GaussianLikelihood::new(1.0).expect("valid variance");
        let y = array![1.0, 2.0];
        let var = array![0.0, 0.0];

        // Act
        let e = lik.variational_expectation(y.view(), y.view(), var.view());

        // Assert
        assert!((e - (-LOG_2PI)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify residual and posterior-variance penalties enter as
    // -((y-μ)² + v) / (2σ²).
    //
    // Given
    // -----
    // - One point with y = 1, μ = 0, v = 3, σ² = 2.
    //
    // Expect
    // ------
    // - Expectation equals -½ln(4π) - 1.
    fn expectation_penalizes_residual_and_variance() {
        // Arrange
        let lik = GaussianLikelihood::new(2.0).expect("valid variance");

        // Act
        let e = lik.variational_expectation(
            array![1.0].view(),
            array![0.0].view(),
            array![3.0].view(),
        );

        // Assert
        let expected = -0.5 * (LOG_2PI + 2.0_f64.ln()) - (1.0 + 3.0) / 4.0;
        assert!((e - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the predictive map adds noise variance to the latent
    // variance and leaves the mean untouched.
    //
    // Given
    // -----
    // - Latent mean (0.5) and variance (0.25) with σ² = 0.1.
    //
    // Expect
    // ------
    // - Mean 0.5 and variance 0.35.
    fn prediction_adds_noise_variance() {
        // Arrange
        let lik = GaussianLikelihood::new(0.1).expect("valid variance");

        // Act
        let (mean, var) = lik.predict_mean_and_var(array![0.5].view(), array![0.25].view());

        // Assert
        assert!((mean[0] - 0.5).abs() < 1e-12);
        assert!((var[0] - 0.35).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify noise-variance validation.
    //
    // Given
    // -----
    // - Variances 0 and -1.
    //
    // Expect
    // ------
    // - Both rejected with `InvalidNoiseVariance`.
    fn rejects_non_positive_variance() {
        // Arrange + Act
        let zero = GaussianLikelihood::new(0.0);
        let negative = GaussianLikelihood::new(-1.0);

        // Assert
        assert!(matches!(zero, Err(MixtureError::InvalidNoiseVariance { .. })));
        assert!(matches!(negative, Err(MixtureError::InvalidNoiseVariance { .. })));
    }
}
