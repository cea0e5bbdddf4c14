//! Prior specifications for cluster assignments and Gaussian components.
//!
//! Purpose
//! -------
//! Hold the two prior families over the assignment variable that every
//! variant shares, plus the conjugate Normal-Wishart prior the Gaussian
//! variant marginalizes against.
//!
//! Key behaviors
//! -------------
//! - [`AssignmentPrior::Symmetric`] is a finite symmetric Dirichlet with
//!   concentration α; its marginal-likelihood bound is a ratio of
//!   Dirichlet normalizers.
//! - [`AssignmentPrior::StickBreaking`] is a truncated Dirichlet-process
//!   construction with Beta(1, α) sticks; its bound sums per-stick Beta
//!   normalizer ratios driven by the cluster mass and the mass in later
//!   clusters.
//! - Both modes share the predictive mixing-weight rule
//!   (φ̂ + α) / Σ(φ̂ + α).
//! - [`NormalWishartPrior`] validates its hyperparameters once and caches
//!   κ₀·m₀m₀ᵀ and ½log|S₀|, which the Gaussian bound reads on every
//!   evaluation.
//!
//! Invariants & assumptions
//! ------------------------
//! - α > 0 and finite for either assignment prior.
//! - The Wishart scale is symmetric positive definite and its degrees of
//!   freedom exceed D − 1, so every posterior scale stays well defined.
//!
//! Testing notes
//! -------------
//! - Bound values are pinned against hand-computed Gamma-function
//!   identities; the Kullback-Leibler term is checked to vanish in the
//!   flat-prior limit.
use crate::mixture::core::data::VectorData;
use crate::mixture::errors::{MixtureError, MixtureResult};
use crate::numerics::{ln_dirichlet_c, PdFactor};
use crate::optimization::numerical_stability::GENERAL_TOL;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use statrs::function::gamma::ln_gamma;

// ---- Assignment priors ----

/// Prior over the latent assignment variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignmentPrior {
    /// Finite symmetric Dirichlet with concentration `alpha`.
    Symmetric { alpha: f64 },
    /// Truncated stick-breaking Dirichlet process with concentration
    /// `alpha`. Empty sticks can be pruned during fitting.
    StickBreaking { alpha: f64 },
}

impl AssignmentPrior {
    /// Validated symmetric Dirichlet prior.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::InvalidConcentration` when `alpha` is not a
    ///   finite positive number.
    pub fn symmetric(alpha: f64) -> MixtureResult<AssignmentPrior> {
        check_concentration(alpha)?;
        Ok(AssignmentPrior::Symmetric { alpha })
    }

    /// Validated stick-breaking prior.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::InvalidConcentration` when `alpha` is not a
    ///   finite positive number.
    pub fn stick_breaking(alpha: f64) -> MixtureResult<AssignmentPrior> {
        check_concentration(alpha)?;
        Ok(AssignmentPrior::StickBreaking { alpha })
    }

    /// Concentration parameter α.
    pub fn alpha(&self) -> f64 {
        match self {
            AssignmentPrior::Symmetric { alpha } | AssignmentPrior::StickBreaking { alpha } => {
                *alpha
            }
        }
    }

    /// Whether empty clusters may be pruned under this prior.
    pub fn allows_pruning(&self) -> bool {
        matches!(self, AssignmentPrior::StickBreaking { .. })
    }

    /// Contribution of the mixing proportions to the evidence bound.
    ///
    /// For the symmetric mode this is the log ratio of Dirichlet
    /// normalizers C(α·1) / C(α·1 + φ̂). For the stick-breaking mode each
    /// stick contributes the log ratio of Beta normalizers
    /// B(1 + φ̂_k, α + b_k) / B(1, α), where b_k is the responsibility
    /// mass in clusters after k.
    pub fn mixing_prop_bound(&self, phi_hat: ArrayView1<f64>) -> f64 {
        match *self {
            AssignmentPrior::Symmetric { alpha } => {
                let k = phi_hat.len();
                let prior = Array1::from_elem(k, alpha);
                let posterior = phi_hat.map(|&m| m + alpha);
                ln_dirichlet_c(&prior) - ln_dirichlet_c(&posterior)
            }
            AssignmentPrior::StickBreaking { alpha } => {
                let k = phi_hat.len();
                let mut tail = 0.0;
                let mut sum = 0.0;
                for j in (0..k).rev() {
                    sum += ln_gamma(1.0 + phi_hat[j]) + ln_gamma(alpha + tail)
                        - ln_gamma(1.0 + alpha + phi_hat[j] + tail);
                    tail += phi_hat[j];
                }
                // ln B(1, α) = −ln α for each of the K prior sticks.
                sum + k as f64 * (ln_gamma(1.0 + alpha) - ln_gamma(alpha))
            }
        }
    }

    /// Kullback-Leibler divergence from the variational assignment
    /// distribution to the prior, KL(q(Z) ‖ p(Z)) = −H(Φ) − mixing bound.
    ///
    /// Vanishes for uniform responsibilities in the flat symmetric limit
    /// α → ∞.
    pub fn kl_z(&self, entropy: f64, phi_hat: ArrayView1<f64>) -> f64 {
        -entropy - self.mixing_prop_bound(phi_hat)
    }

    /// Predictive mixing weights (φ̂ + α) / Σ(φ̂ + α), shared by both
    /// prior modes.
    pub fn mixing_weights(&self, phi_hat: ArrayView1<f64>) -> Array1<f64> {
        let alpha = self.alpha();
        let raw = phi_hat.map(|&m| m + alpha);
        let total = raw.sum();
        raw / total
    }
}

fn check_concentration(alpha: f64) -> MixtureResult<()> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(MixtureError::InvalidConcentration { value: alpha });
    }
    Ok(())
}

// ---- Normal-Wishart prior ----

/// NormalWishartPrior — conjugate prior (m₀, κ₀, S₀, ν₀) for a Gaussian
/// component with unknown mean and precision.
///
/// Invariants
/// ----------
/// - κ₀ > 0, ν₀ > D − 1, S₀ symmetric positive definite of dimension D.
/// - `kappa_mean_outer` equals κ₀·m₀m₀ᵀ and `half_log_det_scale` equals
///   ½log|S₀|.
#[derive(Debug, Clone)]
pub struct NormalWishartPrior {
    mean: Array1<f64>,
    kappa: f64,
    scale: Array2<f64>,
    dof: f64,
    kappa_mean_outer: Array2<f64>,
    half_log_det_scale: f64,
}

impl NormalWishartPrior {
    /// Construct a validated prior.
    ///
    /// Parameters
    /// ----------
    /// - `mean`: `Array1<f64>`
    ///   Prior mean m₀ of dimension D.
    /// - `kappa`: `f64`
    ///   Prior mean strength κ₀; must be finite and positive.
    /// - `scale`: `Array2<f64>`
    ///   Wishart scale S₀; must be D×D symmetric positive definite.
    /// - `dof`: `f64`
    ///   Wishart degrees of freedom ν₀; must exceed D − 1.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::InvalidPriorKappa`, `InvalidPriorDof` or
    ///   `InvalidPriorScale` for hyperparameters outside their domains.
    /// - `MixtureError::NonFiniteData` for a non-finite prior mean entry.
    pub fn new(
        mean: Array1<f64>,
        kappa: f64,
        scale: Array2<f64>,
        dof: f64,
    ) -> MixtureResult<NormalWishartPrior> {
        let d = mean.len();
        if d == 0 {
            return Err(MixtureError::EmptyData { what: "prior mean" });
        }
        for (i, &v) in mean.iter().enumerate() {
            if !v.is_finite() {
                return Err(MixtureError::NonFiniteData { what: "prior mean", row: i, col: 0 });
            }
        }
        if !kappa.is_finite() || kappa <= 0.0 {
            return Err(MixtureError::InvalidPriorKappa { value: kappa });
        }
        let min_dof = (d as f64) - 1.0;
        if !dof.is_finite() || dof <= min_dof {
            return Err(MixtureError::InvalidPriorDof { value: dof, min: min_dof });
        }
        if scale.nrows() != d || scale.ncols() != d {
            return Err(MixtureError::InvalidPriorScale {
                reason: "scale must be square with the prior mean's dimension",
            });
        }
        for i in 0..d {
            for j in 0..i {
                if (scale[[i, j]] - scale[[j, i]]).abs() > GENERAL_TOL {
                    return Err(MixtureError::InvalidPriorScale {
                        reason: "scale must be symmetric",
                    });
                }
            }
        }
        let factor = PdFactor::new(&scale, 0.0).ok_or(MixtureError::InvalidPriorScale {
            reason: "scale must be positive definite",
        })?;
        let half_log_det_scale = factor.half_log_det();
        let mean_col = mean.view().insert_axis(Axis(1));
        let kappa_mean_outer = kappa * mean_col.dot(&mean_col.t());
        Ok(NormalWishartPrior { mean, kappa, scale, dof, kappa_mean_outer, half_log_det_scale })
    }

    /// Weakly informative default: mean at the data mean, κ₀ = 1e-6,
    /// S₀ = 1e-3·I and ν₀ = D + 1.
    pub fn default_for(data: &VectorData) -> MixtureResult<NormalWishartPrior> {
        let d = data.dim();
        NormalWishartPrior::new(
            data.column_means(),
            1e-6,
            Array2::<f64>::eye(d) * 1e-3,
            (d + 1) as f64,
        )
    }

    /// Prior mean m₀.
    pub fn mean(&self) -> ArrayView1<f64> {
        self.mean.view()
    }

    /// Prior mean strength κ₀.
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Wishart scale S₀.
    pub fn scale(&self) -> ArrayView2<f64> {
        self.scale.view()
    }

    /// Wishart degrees of freedom ν₀.
    pub fn dof(&self) -> f64 {
        self.dof
    }

    /// Cached κ₀·m₀m₀ᵀ.
    pub fn kappa_mean_outer(&self) -> &Array2<f64> {
        &self.kappa_mean_outer
    }

    /// Cached ½log|S₀|.
    pub fn half_log_det_scale(&self) -> f64 {
        self.half_log_det_scale
    }

    /// Observation dimension D.
    pub fn dim(&self) -> usize {
        self.mean.len()
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
    // - Hand-computed mixing bounds for both prior modes.
    // - The flat-limit and sharp-assignment behavior of the assignment KL
    //   term.
    // - The shared predictive weight rule.
    // - Normal-Wishart validation and its cached products.
    //
    // They intentionally DO NOT cover:
    // - Full bound assembly; that belongs to the engine and model tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the symmetric mixing bound against Gamma identities.
    //
    // Given
    // -----
    // - α = 1, φ̂ = (1, 1).
    //
    // Expect
    // ------
    // - ln C((1,1)) − ln C((2,2)) = 0 − ln 6 = −ln 6.
    fn symmetric_mixing_bound_matches_hand_value() {
        // Arrange
        let prior = AssignmentPrior::symmetric(1.0).expect("valid alpha");

        // Act
        let bound = prior.mixing_prop_bound(array![1.0, 1.0].view());

        // Assert
        assert!((bound - (-6.0_f64.ln())).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the assignment KL vanishes for uniform responsibilities as
    // the symmetric prior flattens.
    //
    // Given
    // -----
    // - N = 2, K = 2 uniform responsibilities (entropy 2·ln 2,
    //   φ̂ = (1, 1)) and α = 1e6.
    //
    // Expect
    // ------
    // - |KL| below 1e-5 (the exact value decays like 1/(2α)).
    fn symmetric_kl_vanishes_in_flat_limit() {
        // Arrange
        let prior = AssignmentPrior::symmetric(1e6).expect("valid alpha");
        let entropy = 2.0 * 2.0_f64.ln();

        // Act
        let kl = prior.kl_z(entropy, array![1.0, 1.0].view());

        // Assert
        assert!(kl.abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Verify the assignment KL is strictly positive for sharp
    // responsibilities at a moderate concentration.
    //
    // Given
    // -----
    // - α = 1, two points fully assigned to cluster 0: entropy 0,
    //   φ̂ = (2, 0).
    //
    // Expect
    // ------
    // - KL = −ln C((1,1)) + ln C((3,1)) = ln 3 > 0.
    fn symmetric_kl_positive_for_sharp_assignments() {
        // Arrange
        let prior = AssignmentPrior::symmetric(1.0).expect("valid alpha");

        // Act
        let kl = prior.kl_z(0.0, array![2.0, 0.0].view());

        // Assert
        assert!(kl > 0.0);
        assert!((kl - 3.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Pin the stick-breaking bound and its label-order preference.
    //
    // Given
    // -----
    // - α = 1 with masses (3, 1) and their reversal (1, 3).
    //
    // Expect
    // ------
    // - Bounds equal −ln 40 and −ln 80, so mass in earlier sticks is
    //   preferred.
    fn stick_breaking_bound_prefers_early_mass() {
        // Arrange
        let prior = AssignmentPrior::stick_breaking(1.0).expect("valid alpha");

        // Act
        let front_loaded = prior.mixing_prop_bound(array![3.0, 1.0].view());
        let back_loaded = prior.mixing_prop_bound(array![1.0, 3.0].view());

        // Assert
        assert!((front_loaded - (-40.0_f64.ln())).abs() < 1e-10);
        assert!((back_loaded - (-80.0_f64.ln())).abs() < 1e-10);
        assert!(front_loaded > back_loaded);
    }

    #[test]
    // Purpose
    // -------
    // Verify the shared predictive weight rule and the pruning flags.
    //
    // Given
    // -----
    // - φ̂ = (3, 1) and α = 1 under both prior modes.
    //
    // Expect
    // ------
    // - Weights (2/3, 1/3) from either mode; only the stick-breaking
    //   mode allows pruning.
    fn mixing_weights_shared_between_modes() {
        // Arrange
        let symmetric = AssignmentPrior::symmetric(1.0).expect("valid alpha");
        let dp = AssignmentPrior::stick_breaking(1.0).expect("valid alpha");
        let phi_hat = array![3.0, 1.0];

        // Act
        let w_sym = symmetric.mixing_weights(phi_hat.view());
        let w_dp = dp.mixing_weights(phi_hat.view());

        // Assert
        assert!((w_sym[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((w_sym[1] - 1.0 / 3.0).abs() < 1e-12);
        assert!((w_dp[0] - w_sym[0]).abs() < 1e-12);
        assert!(!symmetric.allows_pruning());
        assert!(dp.allows_pruning());
    }

    #[test]
    // Purpose
    // -------
    // Verify concentration validation for both constructors.
    //
    // Given
    // -----
    // - α values 0 and NaN.
    //
    // Expect
    // ------
    // - Both rejected with `InvalidConcentration`.
    fn concentration_must_be_positive_finite() {
        // Arrange + Act
        let zero = AssignmentPrior::symmetric(0.0);
        let nan = AssignmentPrior::stick_breaking(f64::NAN);

        // Assert
        assert!(matches!(zero, Err(MixtureError::InvalidConcentration { .. })));
        assert!(matches!(nan, Err(MixtureError::InvalidConcentration { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify the Normal-Wishart caches on a simple prior.
    //
    // Given
    // -----
    // - m₀ = (1, 2), κ₀ = 2, S₀ = 1e-3·I, ν₀ = 3.
    //
    // Expect
    // ------
    // - κ₀·m₀m₀ᵀ = [[2, 4], [4, 8]] and ½log|S₀| = ln(1e-3).
    fn normal_wishart_caches_products() {
        // Arrange + Act
        let prior = NormalWishartPrior::new(
            array![1.0, 2.0],
            2.0,
            Array2::<f64>::eye(2) * 1e-3,
            3.0,
        )
        .expect("valid prior");

        // Assert
        assert!((prior.kappa_mean_outer()[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((prior.kappa_mean_outer()[[0, 1]] - 4.0).abs() < 1e-12);
        assert!((prior.kappa_mean_outer()[[1, 1]] - 8.0).abs() < 1e-12);
        assert!((prior.half_log_det_scale() - 1e-3_f64.ln()).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Verify hyperparameter rejection paths.
    //
    // Given
    // -----
    // - κ₀ = 0, ν₀ = 1 in two dimensions, an asymmetric scale, and a
    //   negative-definite scale.
    //
    // Expect
    // ------
    // - Each constructor call fails with its documented error.
    fn normal_wishart_rejects_bad_hyperparameters() {
        // Arrange
        let mean = array![0.0, 0.0];
        let eye = Array2::<f64>::eye(2);

        // Act
        let bad_kappa = NormalWishartPrior::new(mean.clone(), 0.0, eye.clone(), 3.0);
        let bad_dof = NormalWishartPrior::new(mean.clone(), 1.0, eye.clone(), 1.0);
        let asymmetric =
            NormalWishartPrior::new(mean.clone(), 1.0, array![[1.0, 0.5], [0.0, 1.0]], 3.0);
        let indefinite = NormalWishartPrior::new(mean, 1.0, -eye, 3.0);

        // Assert
        assert!(matches!(bad_kappa, Err(MixtureError::InvalidPriorKappa { .. })));
        assert!(matches!(bad_dof, Err(MixtureError::InvalidPriorDof { .. })));
        assert!(matches!(asymmetric, Err(MixtureError::InvalidPriorScale { .. })));
        assert!(matches!(indefinite, Err(MixtureError::InvalidPriorScale { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify the data-derived default prior.
    //
    // Given
    // -----
    // - Observations [[0, 0], [2, 4]].
    //
    // Expect
    // ------
    // - Mean (1, 2), κ₀ = 1e-6, ν₀ = 3, scale 1e-3·I.
    fn default_prior_centers_on_data_mean() {
        // Arrange
        let data = VectorData::new(array![[0.0, 0.0], [2.0, 4.0]]).expect("valid data");

        // Act
        let prior = NormalWishartPrior::default_for(&data).expect("valid default");

        // Assert
        assert!((prior.mean()[0] - 1.0).abs() < 1e-12);
        assert!((prior.mean()[1] - 2.0).abs() < 1e-12);
        assert!((prior.kappa() - 1e-6).abs() < 1e-18);
        assert!((prior.dof() - 3.0).abs() < 1e-12);
        assert!((prior.scale()[[0, 0]] - 1e-3).abs() < 1e-15);
        assert!((prior.scale()[[0, 1]]).abs() < 1e-15);
    }
}
