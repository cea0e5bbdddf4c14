//! Shared collapsed-mixture machinery embedded by every variant.
//!
//! Purpose
//! -------
//! [`MixtureCore`] bundles the pieces all three variants carry: the
//! variational assignment state, the prior over assignments, and the fit
//! configuration. The variants add their own data and component
//! parameters on top and delegate every assignment-level question here.
//!
//! Key behaviors
//! -------------
//! - Assemble the evidence bound from a model likelihood:
//!   `B = likelihood - KL(q(Z) ‖ p(Z))`.
//! - Answer predictive mixing weights and hard assignments from the
//!   current responsibilities.
//! - Nominate the emptiest cluster for pruning under the stick-breaking
//!   prior.
//!
//! Invariants & assumptions
//! ------------------------
//! - The assignment state always has at least one cluster and one data
//!   point.
//! - Prune nominations are made only under the stick-breaking prior;
//!   the assignment state refuses to drop its last cluster, so K never
//!   reaches zero.
//!
//! Downstream usage
//! ----------------
//! - The model trait's provided `bound`, `fit`, and prune loops read
//!   through the accessors here; variants reach the state through
//!   `state_mut` when applying optimizer results or dropping their own
//!   per-cluster parameters.
use crate::mixture::core::assignments::AssignmentState;
use crate::mixture::core::options::FitOptions;
use crate::mixture::core::priors::AssignmentPrior;
use crate::mixture::errors::MixtureResult;
use ndarray::Array1;

/// MixtureCore — assignment state, assignment prior, and fit options.
#[derive(Debug, Clone)]
pub struct MixtureCore {
    state: AssignmentState,
    prior: AssignmentPrior,
    options: FitOptions,
}

impl MixtureCore {
    /// Create a core with uniform responsibilities.
    ///
    /// Errors
    /// ------
    /// - Propagates shape errors from [`AssignmentState::new`].
    pub fn new(
        num_points: usize,
        num_clusters: usize,
        prior: AssignmentPrior,
        options: FitOptions,
    ) -> MixtureResult<MixtureCore> {
        let state = AssignmentState::new(num_points, num_clusters)?;
        Ok(MixtureCore { state, prior, options })
    }

    // ---- Accessors ----

    /// Current assignment state.
    pub fn state(&self) -> &AssignmentState {
        &self.state
    }

    /// Mutable assignment state, for initialization and optimizer
    /// updates.
    pub fn state_mut(&mut self) -> &mut AssignmentState {
        &mut self.state
    }

    /// The assignment prior.
    pub fn prior(&self) -> AssignmentPrior {
        self.prior
    }

    /// Fit configuration.
    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Number of data points N.
    pub fn num_points(&self) -> usize {
        self.state.num_points()
    }

    /// Current number of clusters K.
    pub fn num_clusters(&self) -> usize {
        self.state.num_clusters()
    }

    // ---- Bound assembly ----

    /// Assignment-side Kullback-Leibler term at the current state.
    pub fn kl_z(&self) -> f64 {
        self.prior.kl_z(self.state.entropy(), self.state.phi_hat())
    }

    /// Evidence bound given the model likelihood at the current state.
    pub fn assemble_bound(&self, likelihood: f64) -> f64 {
        likelihood - self.kl_z()
    }

    // ---- Predictive summaries ----

    /// Predictive mixing weights (φ̂ + α) / Σ(φ̂ + α).
    pub fn mixing_weights(&self) -> Array1<f64> {
        self.prior.mixing_weights(self.state.phi_hat())
    }

    /// Most responsible cluster per data point.
    pub fn hard_assignments(&self) -> Array1<usize> {
        let phi = self.state.phi();
        Array1::from_iter(phi.rows().into_iter().map(|row| {
            let mut best = 0;
            let mut best_val = f64::NEG_INFINITY;
            for (k, &v) in row.iter().enumerate() {
                if v > best_val {
                    best = k;
                    best_val = v;
                }
            }
            best
        }))
    }

    // ---- Pruning ----

    /// Index of the lightest cluster if its mass falls below the prune
    /// threshold. `None` under the symmetric prior or when every cluster
    /// carries mass.
    ///
    /// The fit loop drops one cluster at a time and re-queries, because
    /// removing a column renormalizes the survivors. Responsibility rows
    /// sum to one, so the masses total the row count and a validated
    /// threshold can never nominate the last surviving cluster.
    pub fn smallest_empty_cluster(&self) -> Option<usize> {
        if !self.prior.allows_pruning() {
            return None;
        }
        let phi_hat = self.state.phi_hat();
        let mut lightest = 0;
        let mut lightest_mass = phi_hat[0];
        for (k, &mass) in phi_hat.iter().enumerate().skip(1) {
            if mass < lightest_mass {
                lightest = k;
                lightest_mass = mass;
            }
        }
        (lightest_mass < self.options.prune_threshold).then_some(lightest)
    }
}
