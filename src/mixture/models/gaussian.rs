//! Mixture of Gaussians with conjugate Normal-Inverse-Wishart clusters.
//!
//! Purpose
//! -------
//! Implement the collapsed mixture variant for dense vector data: cluster
//! means and covariances are integrated out against a shared
//! Normal-Inverse-Wishart prior, so the marginal likelihood of the data
//! given responsibilities is available in closed form and the only free
//! parameters are the assignment logits.
//!
//! Key behaviors
//! -------------
//! - One shared [`GaussianMixture::components`] derivation produces the
//!   per-cluster posterior blocks (κ_k, ν_k, μ_k, S_k) with their Cholesky
//!   factors; the bound, the Student-t predictive density, and the
//!   posterior-moment accessor all read from it, so they can never
//!   disagree.
//! - The predictive density under each cluster is a multivariate Student-t
//!   with ν_k − D + 1 degrees of freedom; `predict` mixes the component
//!   densities with the predictive weights (φ̂ + α)/Σ(φ̂ + α).
//! - A cluster that loses all its mass falls back to the prior blocks
//!   (κ0, ν0, m0, S0), which are valid by construction, so empty clusters
//!   never destabilize the bound.
//!
//! Invariants & assumptions
//! ------------------------
//! - S_k is factored exactly as assembled (no jitter); a failed
//!   factorization is a fatal evaluation error naming the cluster.
//! - Data and prior are immutable after construction; every evaluation
//!   recomputes the posterior blocks from the responsibilities it is
//!   handed.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the posterior blocks, the collapsed bound, and the
//!   Student-t density to hand-computed one-dimensional values where every
//!   quantity can be checked in closed form.
use crate::mixture::core::data::check_finite;
use crate::mixture::core::{
    AssignmentPrior, FitOptions, MixtureCore, NormalWishartPrior, Responsibilities, VectorData,
};
use crate::mixture::errors::{MixtureError, MixtureResult};
use crate::mixture::models::collapsed::CollapsedModel;
use crate::numerics::linalg::{factor_all, PdFactor};
use crate::numerics::special::{ln_gamma_d, LOG_PI};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use statrs::function::gamma::ln_gamma;

/// Per-cluster posterior blocks of the Normal-Inverse-Wishart model,
/// derived from one responsibility bundle.
///
/// `factors[k]` holds the Cholesky factorization of `scales[k]`; both the
/// bound and the predictive density consume the factors, never the raw
/// matrices.
#[derive(Debug, Clone)]
pub struct GaussianComponents {
    /// Posterior mean strengths κ_k = φ̂_k + κ0.
    pub kappa: Array1<f64>,
    /// Posterior degrees of freedom ν_k = φ̂_k + ν0.
    pub dof: Array1<f64>,
    /// Posterior means, one row per cluster (K×D).
    pub means: Array2<f64>,
    /// Posterior scale matrices S_k (D×D each).
    pub scales: Vec<Array2<f64>>,
    /// Cholesky factors of the scale matrices.
    pub factors: Vec<PdFactor>,
}

impl GaussianComponents {
    /// Number of clusters covered by the blocks.
    pub fn len(&self) -> usize {
        self.kappa.len()
    }

    /// True when no cluster blocks are present.
    pub fn is_empty(&self) -> bool {
        self.kappa.is_empty()
    }
}

/// GaussianMixture — collapsed Normal-Inverse-Wishart mixture over N×D
/// vector observations.
///
/// Invariants
/// ----------
/// - The prior's dimension always matches the data's.
/// - The embedded core's point count always matches the data's row count.
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    core: MixtureCore,
    data: VectorData,
    prior: NormalWishartPrior,
}

impl GaussianMixture {
    /// Construct with the weakly informative default prior: mean at the
    /// data mean, κ0 = 1e-6, S0 = 1e-3·I, ν0 = D + 1.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Array2<f64>`
    ///   N×D observations; validated to be non-empty and finite.
    /// - `num_clusters`: `usize`
    ///   Initial cluster count K ≥ 1.
    /// - `assignment_prior`: `AssignmentPrior`
    ///   Symmetric Dirichlet or stick-breaking prior over assignments.
    /// - `options`: `FitOptions`
    ///   Optimizer options and prune threshold.
    ///
    /// Errors
    /// ------
    /// - Data validation errors from [`VectorData::new`] and state errors
    ///   from the core constructor.
    pub fn new(
        x: Array2<f64>,
        num_clusters: usize,
        assignment_prior: AssignmentPrior,
        options: FitOptions,
    ) -> MixtureResult<GaussianMixture> {
        let data = VectorData::new(x)?;
        let prior = NormalWishartPrior::default_for(&data)?;
        Self::from_parts(data, num_clusters, assignment_prior, prior, options)
    }

    /// Construct with an explicit Normal-Inverse-Wishart prior.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::DimensionMismatch` when the prior's dimension does
    ///   not match the data's, plus the errors of [`GaussianMixture::new`].
    pub fn with_prior(
        x: Array2<f64>,
        num_clusters: usize,
        assignment_prior: AssignmentPrior,
        prior: NormalWishartPrior,
        options: FitOptions,
    ) -> MixtureResult<GaussianMixture> {
        let data = VectorData::new(x)?;
        Self::from_parts(data, num_clusters, assignment_prior, prior, options)
    }

    fn from_parts(
        data: VectorData,
        num_clusters: usize,
        assignment_prior: AssignmentPrior,
        prior: NormalWishartPrior,
        options: FitOptions,
    ) -> MixtureResult<GaussianMixture> {
        if prior.dim() != data.dim() {
            return Err(MixtureError::DimensionMismatch {
                what: "prior mean dimension",
                expected: data.dim(),
                found: prior.dim(),
            });
        }
        let core = MixtureCore::new(data.num_rows(), num_clusters, assignment_prior, options)?;
        Ok(GaussianMixture { core, data, prior })
    }

    /// Observation container.
    pub fn data(&self) -> &VectorData {
        &self.data
    }

    /// Normal-Inverse-Wishart prior in use.
    pub fn prior(&self) -> &NormalWishartPrior {
        &self.prior
    }

    /// Derive the per-cluster posterior blocks for an arbitrary
    /// responsibility bundle.
    ///
    /// Purpose
    /// -------
    /// This is the single source of (κ_k, ν_k, μ_k, S_k): the collapsed
    /// bound, the predictive density, and `get_means_and_covariances` all
    /// call it, so a responsibility state always maps to one consistent set
    /// of posterior blocks.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::CholeskyFailure` with matrix `"posterior scale"`
    ///   when some S_k is not positive definite.
    pub fn components(&self, resp: &Responsibilities) -> MixtureResult<GaussianComponents> {
        let d = self.data.dim();
        let k = resp.phi.ncols();
        let kappa = &resp.phi_hat + self.prior.kappa();
        let dof = &resp.phi_hat + self.prior.dof();

        // Xsum_k = Σ_n Φ[n,k]·x_n, one row per cluster.
        let weighted_sums = resp.phi.t().dot(&self.data.x());
        let prior_pull = self.prior.mean().to_owned() * self.prior.kappa();
        let mut means = Array2::<f64>::zeros((k, d));
        for kk in 0..k {
            let mu = (&prior_pull + &weighted_sums.row(kk)) / kappa[kk];
            means.row_mut(kk).assign(&mu);
        }

        let mut scales = Vec::with_capacity(k);
        for kk in 0..k {
            let scatter = self.data.weighted_scatter(resp.phi.column(kk));
            let mu_col = means.row(kk).insert_axis(Axis(1));
            let weighted_outer = mu_col.dot(&mu_col.t()) * kappa[kk];
            let s = self.prior.scale().to_owned()
                + self.prior.kappa_mean_outer()
                + scatter
                - weighted_outer;
            scales.push(s);
        }
        let factors = factor_all(&scales, 0.0)
            .map_err(|cluster| MixtureError::CholeskyFailure { cluster, matrix: "posterior scale" })?;

        Ok(GaussianComponents { kappa, dof, means, scales, factors })
    }

    /// Posterior blocks at the current assignment state.
    pub fn current_components(&self) -> MixtureResult<GaussianComponents> {
        self.components(self.core.state().responsibilities())
    }

    /// Per-cluster posterior means and scale matrices at the current
    /// state, exactly as the bound sees them.
    ///
    /// Returns
    /// -------
    /// `(Array2<f64>, Vec<Array2<f64>>)`
    ///   Means as a K×D matrix and the raw posterior scale matrices S_k.
    pub fn get_means_and_covariances(&self) -> MixtureResult<(Array2<f64>, Vec<Array2<f64>>)> {
        let comps = self.current_components()?;
        Ok((comps.means, comps.scales))
    }

    /// Predictive density of each cluster at new points.
    ///
    /// Purpose
    /// -------
    /// Each cluster's posterior predictive is a multivariate Student-t with
    /// ν_k − D + 1 degrees of freedom, location μ_k, and scale
    /// S_k·(κ_k + 1)/(κ_k·(ν_k − D + 1)). The Mahalanobis form goes through
    /// the cached Cholesky factor, never an explicit inverse.
    ///
    /// Parameters
    /// ----------
    /// - `xnew`: `ArrayView2<f64>`
    ///   New points, one per row, with the training dimension.
    ///
    /// Returns
    /// -------
    /// `Array2<f64>`
    ///   Densities with one row per new point and one column per cluster.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::DimensionMismatch` / `NonFiniteData` for malformed
    ///   inputs; `CholeskyFailure` from the shared derivation.
    pub fn predict_components(&self, xnew: ArrayView2<f64>) -> MixtureResult<Array2<f64>> {
        let log_densities = self.component_log_densities(xnew)?;
        Ok(log_densities.mapv(f64::exp))
    }

    /// Mixed predictive density at new points, weighting each cluster's
    /// Student-t density by (φ̂_k + α)/Σ(φ̂ + α).
    pub fn predict(&self, xnew: ArrayView2<f64>) -> MixtureResult<Array1<f64>> {
        let densities = self.predict_components(xnew)?;
        let weights = self.core.mixing_weights();
        Ok(densities.dot(&weights))
    }

    fn component_log_densities(&self, xnew: ArrayView2<f64>) -> MixtureResult<Array2<f64>> {
        let d = self.data.dim();
        if xnew.ncols() != d {
            return Err(MixtureError::DimensionMismatch {
                what: "prediction inputs",
                expected: d,
                found: xnew.ncols(),
            });
        }
        check_finite(&xnew, "prediction inputs")?;

        let comps = self.current_components()?;
        let dims = d as f64;
        let mut out = Array2::<f64>::zeros((xnew.nrows(), comps.len()));
        for kk in 0..comps.len() {
            let kappa = comps.kappa[kk];
            let dof = comps.dof[kk];
            // Degrees of freedom of the predictive Student-t.
            let t_dof = dof - dims + 1.0;
            let half_ln_det_sigma = comps.factors[kk].half_log_det()
                + 0.5 * dims * ((kappa + 1.0) / (kappa * t_dof)).ln();
            let ln_z = ln_gamma((dof + 1.0) / 2.0)
                - ln_gamma(t_dof / 2.0)
                - 0.5 * dims * (t_dof.ln() + LOG_PI)
                - half_ln_det_sigma;
            for (i, x) in xnew.rows().into_iter().enumerate() {
                let diff = &x - &comps.means.row(kk);
                let mahalanobis =
                    comps.factors[kk].quad_form(&diff) * kappa * t_dof / (kappa + 1.0);
                out[[i, kk]] = ln_z - 0.5 * (dof + 1.0) * (1.0 + mahalanobis / t_dof).ln();
            }
        }
        Ok(out)
    }
}

impl CollapsedModel for GaussianMixture {
    fn core(&self) -> &MixtureCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MixtureCore {
        &mut self.core
    }

    /// Collapsed Normal-Inverse-Wishart marginal of the data given the
    /// responsibilities:
    ///
    /// ```text
    /// −½D Σ_k log(κ_k/κ0) + K·ν0·½log|S0| − Σ_k ν_k·½log|S_k|
    /// + Σ_k lnΓ_D(ν_k) − K·lnΓ_D(ν0) − ½ND·log π
    /// ```
    fn build_likelihood(&self, resp: &Responsibilities) -> MixtureResult<f64> {
        let comps = self.components(resp)?;
        let d = self.data.dim();
        let dims = d as f64;
        let n = self.data.num_rows() as f64;
        let k = comps.len() as f64;
        let kappa0 = self.prior.kappa();
        let dof0 = self.prior.dof();

        let mut bound = -0.5 * n * dims * LOG_PI;
        bound += k * dof0 * self.prior.half_log_det_scale();
        bound -= k * ln_gamma_d(dof0, d);
        for kk in 0..comps.len() {
            bound -= 0.5 * dims * (comps.kappa[kk] / kappa0).ln();
            bound -= comps.dof[kk] * comps.factors[kk].half_log_det();
            bound += ln_gamma_d(comps.dof[kk], d);
        }
        Ok(bound)
    }
}
