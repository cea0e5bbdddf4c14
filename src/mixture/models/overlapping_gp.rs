//! Overlapping mixture of exact Gaussian processes.
//!
//! Purpose
//! -------
//! Implement the collapsed mixture variant for functions observed on one
//! shared input domain: every cluster owns a full GP over all N inputs,
//! and a point's responsibility row decides how much observation noise
//! each cluster sees at that point. A point with responsibility near one
//! for cluster k contributes to that cluster's fit at the base noise
//! level; a point with responsibility near zero is drowned in noise and
//! effectively ignored.
//!
//! Key behaviors
//! -------------
//! - Per cluster, the bound factors `K_k + B_k + jitter·I` once by
//!   Cholesky, where `B_k = diag(noise/(Φ[:,k] + RESP_FLOOR))`, and reuses
//!   the factor for the data-fit trace and the log-determinant.
//! - Prediction and posterior sampling run through the same reweighted
//!   factor; sampling adds the noise variance to the predictive diagonal
//!   only and takes a caller-supplied RNG.
//! - `drop_cluster` removes the pruned cluster's kernel together with its
//!   responsibility column.
//!
//! Invariants & assumptions
//! ------------------------
//! - One kernel per cluster at all times.
//! - The observation matrix Y may have any number of columns D; all
//!   columns share the kernel and the noise level.
//!
//! Testing notes
//! -------------
//! - The single-point single-cluster bound is pinned to its closed form;
//!   prediction tests check interpolation at training inputs and the
//!   separation of two interleaved constant functions.
use crate::mixture::core::data::check_finite;
use crate::mixture::core::{
    AssignmentPrior, FitOptions, Kernel, MixtureCore, PairedData, Rbf, Responsibilities,
};
use crate::mixture::errors::{MixtureError, MixtureResult};
use crate::mixture::models::collapsed::CollapsedModel;
use crate::numerics::linalg::PdFactor;
use crate::numerics::special::LOG_2PI;
use crate::optimization::numerical_stability::{CHOL_JITTER, RESP_FLOOR};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;

/// OverlappingGpMixture — K exact GPs over a shared input domain with
/// responsibility-reweighted noise.
///
/// Invariants
/// ----------
/// - `kernels.len()` always equals the core's cluster count.
/// - `noise_variance` is finite and strictly positive.
#[derive(Debug)]
pub struct OverlappingGpMixture {
    core: MixtureCore,
    data: PairedData,
    kernels: Vec<Box<dyn Kernel>>,
    noise_variance: f64,
}

impl OverlappingGpMixture {
    /// Construct with one default RBF kernel (unit variance and
    /// lengthscale) per cluster.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Array2<f64>`
    ///   N×P input locations shared by every cluster.
    /// - `y`: `Array2<f64>`
    ///   N×D observations, one row per input location.
    /// - `num_clusters`: `usize`
    ///   Initial cluster count K ≥ 1.
    /// - `assignment_prior`: `AssignmentPrior`
    ///   Symmetric Dirichlet or stick-breaking prior over assignments.
    /// - `noise_variance`: `f64`
    ///   Base observation noise σ²; must be finite and > 0.
    /// - `options`: `FitOptions`
    ///   Optimizer options and prune threshold.
    ///
    /// Errors
    /// ------
    /// - Data validation errors from [`PairedData::new`], plus
    ///   `MixtureError::InvalidNoiseVariance`.
    pub fn new(
        x: Array2<f64>,
        y: Array2<f64>,
        num_clusters: usize,
        assignment_prior: AssignmentPrior,
        noise_variance: f64,
        options: FitOptions,
    ) -> MixtureResult<OverlappingGpMixture> {
        let kernels: Vec<Box<dyn Kernel>> =
            (0..num_clusters).map(|_| Box::new(Rbf::default()) as Box<dyn Kernel>).collect();
        Self::with_kernels(x, y, num_clusters, assignment_prior, kernels, noise_variance, options)
    }

    /// Construct with explicit per-cluster kernels.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::KernelCountMismatch` when the kernel list does not
    ///   match `num_clusters`, plus the errors of
    ///   [`OverlappingGpMixture::new`].
    pub fn with_kernels(
        x: Array2<f64>,
        y: Array2<f64>,
        num_clusters: usize,
        assignment_prior: AssignmentPrior,
        kernels: Vec<Box<dyn Kernel>>,
        noise_variance: f64,
        options: FitOptions,
    ) -> MixtureResult<OverlappingGpMixture> {
        let data = PairedData::new(x, y)?;
        if kernels.len() != num_clusters {
            return Err(MixtureError::KernelCountMismatch {
                num_kernels: kernels.len(),
                num_clusters,
            });
        }
        if !noise_variance.is_finite() || noise_variance <= 0.0 {
            return Err(MixtureError::InvalidNoiseVariance { value: noise_variance });
        }
        let core = MixtureCore::new(data.num_points(), num_clusters, assignment_prior, options)?;
        Ok(OverlappingGpMixture { core, data, kernels, noise_variance })
    }

    /// Paired input/observation container.
    pub fn data(&self) -> &PairedData {
        &self.data
    }

    /// Per-cluster kernels, index-aligned with responsibility columns.
    pub fn kernels(&self) -> &[Box<dyn Kernel>] {
        &self.kernels
    }

    /// Base observation noise σ².
    pub fn noise_variance(&self) -> f64 {
        self.noise_variance
    }

    /// Factor `K_k + B_k + jitter·I` for one cluster and responsibility
    /// column.
    fn reweighted_factor(
        &self,
        cluster: usize,
        phi_col: ArrayView1<f64>,
    ) -> MixtureResult<PdFactor> {
        let mut cov = self.kernels[cluster].symmetric(self.data.x());
        for n in 0..self.data.num_points() {
            cov[[n, n]] += self.noise_variance / (phi_col[n] + RESP_FLOOR);
        }
        PdFactor::new(&cov, CHOL_JITTER)
            .ok_or(MixtureError::CholeskyFailure { cluster, matrix: "reweighted covariance" })
    }

    fn check_prediction_inputs(
        &self,
        xnew: &ArrayView2<f64>,
        cluster: usize,
    ) -> MixtureResult<()> {
        if cluster >= self.core.num_clusters() {
            return Err(MixtureError::ClusterIndexOutOfRange {
                index: cluster,
                num_clusters: self.core.num_clusters(),
            });
        }
        if xnew.ncols() != self.data.input_dim() {
            return Err(MixtureError::DimensionMismatch {
                what: "prediction inputs",
                expected: self.data.input_dim(),
                found: xnew.ncols(),
            });
        }
        check_finite(xnew, "prediction inputs")
    }

    /// Predictive mean and variance of one cluster's GP at new inputs.
    ///
    /// Purpose
    /// -------
    /// Standard GP regression against the reweighted covariance:
    /// μ = Kx*ᵀ·(K+B)⁻¹·Y and, per new point,
    /// var = σ² + diag(Kx*x*) − colsum(Kx* ∘ (K+B)⁻¹Kx*). Only the
    /// predictive diagonal is returned.
    ///
    /// Returns
    /// -------
    /// `(Array2<f64>, Array1<f64>)`
    ///   Means (N*×D) and noise-inclusive variances (N*).
    ///
    /// Errors
    /// ------
    /// - `MixtureError::ClusterIndexOutOfRange`, `DimensionMismatch`,
    ///   `NonFiniteData` for malformed requests; `CholeskyFailure` when
    ///   the reweighted covariance cannot be factored.
    pub fn predict(
        &self,
        xnew: ArrayView2<f64>,
        cluster: usize,
    ) -> MixtureResult<(Array2<f64>, Array1<f64>)> {
        self.check_prediction_inputs(&xnew, cluster)?;
        let phi = self.core.state().phi();
        let factor = self.reweighted_factor(cluster, phi.column(cluster))?;

        let kx = self.kernels[cluster].covariance(self.data.x(), xnew);
        let alpha = factor.solve_mat(&self.data.y().to_owned());
        let mean = kx.t().dot(&alpha);

        let solved_kx = factor.solve_mat(&kx);
        let kxx_diag = self.kernels[cluster].diag(xnew);
        let mut var = Array1::<f64>::zeros(xnew.nrows());
        for j in 0..xnew.nrows() {
            let explained: f64 = (0..self.data.num_points())
                .map(|i| kx[[i, j]] * solved_kx[[i, j]])
                .sum();
            var[j] = self.noise_variance + kxx_diag[j] - explained;
        }
        Ok((mean, var))
    }

    /// Predictive mean and variance of every cluster at new inputs, in
    /// cluster order.
    pub fn predict_components(
        &self,
        xnew: ArrayView2<f64>,
    ) -> MixtureResult<Vec<(Array2<f64>, Array1<f64>)>> {
        (0..self.core.num_clusters()).map(|k| self.predict(xnew, k)).collect()
    }

    /// Draw posterior samples from one cluster's predictive distribution.
    ///
    /// Purpose
    /// -------
    /// With `full_cov`, draws come from the joint predictive
    /// `N(μ, Kx*x* − Kx*ᵀ(K+B)⁻¹Kx* + σ²·I)` with the covariance factored
    /// once (jittered); otherwise each point is drawn independently from
    /// its marginal. The noise variance enters the diagonal only. One
    /// independent draw is made per output column.
    ///
    /// Parameters
    /// ----------
    /// - `xnew`: `ArrayView2<f64>`
    ///   New input locations (N*×P).
    /// - `cluster`: `usize`
    ///   Cluster whose posterior is sampled.
    /// - `size`: `usize`
    ///   Number of sample paths.
    /// - `full_cov`: `bool`
    ///   Joint draws when true, marginal draws when false.
    /// - `rng`: caller-supplied random source.
    ///
    /// Returns
    /// -------
    /// `Array3<f64>`
    ///   Samples with shape (size, N*, D).
    pub fn sample<R: Rng + ?Sized>(
        &self,
        xnew: ArrayView2<f64>,
        cluster: usize,
        size: usize,
        full_cov: bool,
        rng: &mut R,
    ) -> MixtureResult<Array3<f64>> {
        self.check_prediction_inputs(&xnew, cluster)?;
        let n_star = xnew.nrows();
        let dims_out = self.data.output_dim();
        let mut out = Array3::<f64>::zeros((size, n_star, dims_out));

        if full_cov {
            let phi = self.core.state().phi();
            let factor = self.reweighted_factor(cluster, phi.column(cluster))?;
            let kx = self.kernels[cluster].covariance(self.data.x(), xnew);
            let alpha = factor.solve_mat(&self.data.y().to_owned());
            let mean = kx.t().dot(&alpha);

            let solved_kx = factor.solve_mat(&kx);
            let mut cov = self.kernels[cluster].symmetric(xnew) - kx.t().dot(&solved_kx);
            for j in 0..n_star {
                cov[[j, j]] += self.noise_variance;
            }
            let predictive = PdFactor::new(&cov, CHOL_JITTER)
                .ok_or(MixtureError::CholeskyFailure { cluster, matrix: "predictive covariance" })?;
            let lower = predictive.lower();
            for s in 0..size {
                for d in 0..dims_out {
                    let z =
                        Array1::from_shape_fn(n_star, |_| rng.sample::<f64, _>(StandardNormal));
                    let draw = &mean.column(d) + &lower.dot(&z);
                    for j in 0..n_star {
                        out[[s, j, d]] = draw[j];
                    }
                }
            }
        } else {
            let (mean, var) = self.predict(xnew, cluster)?;
            let sd = var.mapv(f64::sqrt);
            for s in 0..size {
                for d in 0..dims_out {
                    for j in 0..n_star {
                        let z: f64 = rng.sample(StandardNormal);
                        out[[s, j, d]] = mean[[j, d]] + sd[j] * z;
                    }
                }
            }
        }
        Ok(out)
    }
}

impl CollapsedModel for OverlappingGpMixture {
    fn core(&self) -> &MixtureCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MixtureCore {
        &mut self.core
    }

    /// Sum over clusters of the reweighted GP marginal:
    ///
    /// ```text
    /// −½ tr((K_k+B_k)⁻¹ YYᵀ) − ½ log|K_k+B_k|
    /// −½ D Σ_n Φ[n,k]·log(2π·σ²)
    /// ```
    fn build_likelihood(&self, resp: &Responsibilities) -> MixtureResult<f64> {
        let dims_out = self.data.output_dim() as f64;
        let log_noise_norm = LOG_2PI + self.noise_variance.ln();
        let mut gp_bound = 0.0;
        for k in 0..self.kernels.len() {
            let factor = self.reweighted_factor(k, resp.phi.column(k))?;
            gp_bound -= 0.5 * factor.trace_solve(self.data.yyt());
            gp_bound -= 0.5 * factor.log_det();
            gp_bound -= 0.5 * dims_out * resp.phi_hat[k] * log_noise_norm;
        }
        Ok(gp_bound)
    }

    fn drop_cluster(&mut self, index: usize) -> MixtureResult<()> {
        self.core.state_mut().drop_cluster(index)?;
        self.kernels.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The single-point single-cluster bound against its closed form.
    // - GP interpolation at training inputs and separation of interleaved
    //   constant functions under hard responsibilities.
    // - The noise reweighting staying finite for a starved cluster.
    // - Posterior sampling shapes and RNG reproducibility.
    // - Construction and prediction validation, including kernel removal
    //   on cluster drop.
    //
    // They intentionally DO NOT cover:
    // - Full fits; the integration suite runs the optimizer end to end.
    // -------------------------------------------------------------------------

    fn line_inputs(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 1), |(i, _)| i as f64)
    }

    #[test]
    // Purpose
    // -------
    // Verify the reweighted GP bound against a closed form.
    //
    // Given
    // -----
    // - One input, one observation y = 2, K = 1, unit RBF and unit noise.
    //   The responsibility is 1, so the factored matrix is
    //   1 + 1/(1 + 1e-6) + 1e-6 ≈ 2.
    //
    // Expect
    // ------
    // - build_likelihood ≈ −4/(2·2) − ½ln 2 − ½ln 2π.
    fn single_point_bound_matches_closed_form() {
        // Arrange
        let model = OverlappingGpMixture::new(
            array![[0.0]],
            array![[2.0]],
            1,
            AssignmentPrior::symmetric(1.0).expect("valid alpha"),
            1.0,
            FitOptions::default(),
        )
        .expect("valid model");

        // Act
        let likelihood = model
            .build_likelihood(model.core().state().responsibilities())
            .expect("likelihood");

        // Assert
        let expected = -1.0 - 0.5 * 2.0_f64.ln() - 0.5 * LOG_2PI;
        assert!((likelihood - expected).abs() < 1e-6, "got {likelihood}, expected {expected}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that a single-cluster GP with small noise interpolates its
    // training data.
    //
    // Given
    // -----
    // - Five inputs 0..4, constant observations y = 3, noise 1e-4.
    //
    // Expect
    // ------
    // - The predictive mean at the training input x = 2 is within 0.01 of
    //   3 and the predictive variance is small but at least the noise.
    fn single_cluster_interpolates_training_data() {
        // Arrange
        let x = line_inputs(5);
        let y = Array2::from_elem((5, 1), 3.0);
        let model = OverlappingGpMixture::new(
            x,
            y,
            1,
            AssignmentPrior::symmetric(1.0).expect("valid alpha"),
            1e-4,
            FitOptions::default(),
        )
        .expect("valid model");

        // Act
        let (mean, var) = model.predict(array![[2.0]].view(), 0).expect("prediction");

        // Assert
        assert!((mean[[0, 0]] - 3.0).abs() < 0.01, "mean {}", mean[[0, 0]]);
        assert!(var[0] >= 1e-4);
        assert!(var[0] < 0.05, "variance {}", var[0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify a cluster whose responsibilities underflow to zero still
    // evaluates through the floored noise reweighting.
    //
    // Given
    // -----
    // - Three points, K = 2, logits sharp enough that cluster 1 holds
    //   exactly zero mass at every point.
    //
    // Expect
    // ------
    // - Likelihood, bound, and the starved cluster's prediction all
    //   finite.
    fn starved_cluster_reweighting_stays_finite() {
        // Arrange
        let x = line_inputs(3);
        let y = array![[2.0], [-2.0], [2.0]];
        let mut model = OverlappingGpMixture::new(
            x,
            y,
            2,
            AssignmentPrior::symmetric(1.0).expect("valid alpha"),
            1.0,
            FitOptions::default(),
        )
        .expect("valid model");
        model
            .core_mut()
            .state_mut()
            .set_lambda(array![[800.0, -800.0], [800.0, -800.0], [800.0, -800.0]])
            .expect("valid logits");

        // Act
        let likelihood = model
            .build_likelihood(model.core().state().responsibilities())
            .expect("likelihood");
        let bound = model.bound().expect("bound");
        let (mean, var) = model.predict(array![[1.0]].view(), 1).expect("prediction");

        // Assert
        assert!(likelihood.is_finite());
        assert!(bound.is_finite());
        assert!(mean[[0, 0]].is_finite());
        assert!(var[0].is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Verify that hard responsibilities separate two interleaved constant
    // functions.
    //
    // Given
    // -----
    // - Six inputs 0..5 with observations alternating +2 (even) and −2
    //   (odd); logits assigning even points to cluster 0 and odd points
    //   to cluster 1.
    //
    // Expect
    // ------
    // - At x = 2, cluster 0 predicts above 1.5 and cluster 1 predicts
    //   below −1; `predict_components` returns both in cluster order.
    fn hard_assignments_separate_interleaved_functions() {
        // Arrange
        let x = line_inputs(6);
        let y = Array2::from_shape_fn((6, 1), |(i, _)| if i % 2 == 0 { 2.0 } else { -2.0 });
        let mut model = OverlappingGpMixture::new(
            x,
            y,
            2,
            AssignmentPrior::symmetric(1.0).expect("valid alpha"),
            0.01,
            FitOptions::default(),
        )
        .expect("valid model");
        let lambda = Array2::from_shape_fn((6, 2), |(i, j)| {
            let own = if i % 2 == 0 { 0 } else { 1 };
            if j == own {
                8.0
            } else {
                -8.0
            }
        });
        model.core_mut().state_mut().set_lambda(lambda).expect("valid logits");

        // Act
        let components = model.predict_components(array![[2.0]].view()).expect("predictions");

        // Assert
        assert_eq!(components.len(), 2);
        assert!(components[0].0[[0, 0]] > 1.5, "cluster 0 mean {}", components[0].0[[0, 0]]);
        assert!(components[1].0[[0, 0]] < -1.0, "cluster 1 mean {}", components[1].0[[0, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // Verify sample shapes and that a seeded RNG reproduces draws.
    //
    // Given
    // -----
    // - A fitted-by-construction single-cluster model, three sample paths
    //   at two new inputs, both covariance modes.
    //
    // Expect
    // ------
    // - Shape (3, 2, 1), finite entries, and identical output for
    //   identical seeds.
    fn sampling_shapes_and_reproducibility() {
        // Arrange
        let model = OverlappingGpMixture::new(
            line_inputs(4),
            Array2::from_elem((4, 1), 1.0),
            1,
            AssignmentPrior::symmetric(1.0).expect("valid alpha"),
            0.1,
            FitOptions::default(),
        )
        .expect("valid model");
        let xnew = array![[0.5], [2.5]];

        // Act
        let mut rng_a = StdRng::seed_from_u64(11);
        let mut rng_b = StdRng::seed_from_u64(11);
        let joint = model.sample(xnew.view(), 0, 3, true, &mut rng_a).expect("samples");
        let joint_again = model.sample(xnew.view(), 0, 3, true, &mut rng_b).expect("samples");
        let mut rng_c = StdRng::seed_from_u64(7);
        let marginal = model.sample(xnew.view(), 0, 3, false, &mut rng_c).expect("samples");

        // Assert
        assert_eq!(joint.shape(), &[3, 2, 1]);
        assert_eq!(marginal.shape(), &[3, 2, 1]);
        assert!(joint.iter().all(|v| v.is_finite()));
        assert!(marginal.iter().all(|v| v.is_finite()));
        for (a, b) in joint.iter().zip(joint_again.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify construction and prediction validation.
    //
    // Given
    // -----
    // - A kernel list of the wrong length, a non-positive noise variance,
    //   and prediction requests with a bad cluster index and a bad input
    //   dimension.
    //
    // Expect
    // ------
    // - Each request fails with its specific error.
    fn invalid_requests_are_rejected() {
        // Arrange
        let kernels: Vec<Box<dyn Kernel>> = vec![Box::new(Rbf::default())];
        let prior = AssignmentPrior::symmetric(1.0).expect("valid alpha");
        let model = OverlappingGpMixture::new(
            line_inputs(3),
            Array2::from_elem((3, 1), 0.0),
            2,
            prior,
            1.0,
            FitOptions::default(),
        )
        .expect("valid model");

        // Act
        let mismatched = OverlappingGpMixture::with_kernels(
            line_inputs(3),
            Array2::from_elem((3, 1), 0.0),
            2,
            prior,
            kernels,
            1.0,
            FitOptions::default(),
        );
        let bad_noise = OverlappingGpMixture::new(
            line_inputs(3),
            Array2::from_elem((3, 1), 0.0),
            2,
            prior,
            0.0,
            FitOptions::default(),
        );
        let bad_cluster = model.predict(array![[0.0]].view(), 5);
        let bad_dim = model.predict(array![[0.0, 1.0]].view(), 0);

        // Assert
        assert!(matches!(mismatched, Err(MixtureError::KernelCountMismatch { .. })));
        assert!(matches!(bad_noise, Err(MixtureError::InvalidNoiseVariance { .. })));
        assert!(matches!(bad_cluster, Err(MixtureError::ClusterIndexOutOfRange { .. })));
        assert!(matches!(bad_dim, Err(MixtureError::DimensionMismatch { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Verify that dropping a cluster removes its kernel as well as its
    // responsibility column.
    //
    // Given
    // -----
    // - Two clusters with distinguishable lengthscales (1 and 2).
    //
    // Expect
    // ------
    // - After dropping cluster 0, one kernel remains and its covariance
    //   at distance 2 matches the lengthscale-2 kernel, e^(−1/2).
    fn drop_cluster_removes_kernel() {
        // Arrange
        let kernels: Vec<Box<dyn Kernel>> = vec![
            Box::new(Rbf::new(1.0, 1.0).expect("valid kernel")),
            Box::new(Rbf::new(1.0, 2.0).expect("valid kernel")),
        ];
        let mut model = OverlappingGpMixture::with_kernels(
            line_inputs(3),
            Array2::from_elem((3, 1), 0.0),
            2,
            AssignmentPrior::stick_breaking(1.0).expect("valid alpha"),
            kernels,
            1.0,
            FitOptions::default(),
        )
        .expect("valid model");

        // Act
        model.drop_cluster(0).expect("drop succeeds");

        // Assert
        assert_eq!(model.num_clusters(), 1);
        assert_eq!(model.kernels().len(), 1);
        let gram = model.kernels()[0].covariance(array![[0.0]].view(), array![[2.0]].view());
        assert!((gram[[0, 0]] - (-0.5_f64).exp()).abs() < 1e-12);
    }
}
