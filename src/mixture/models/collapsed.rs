//! Collapsed-model trait tying variants to the shared fit machinery.
//!
//! Purpose
//! -------
//! Every mixture variant reduces to the same optimization problem: all
//! component parameters are marginalized or held in closed form, leaving
//! the assignment logits Λ as the only free parameters. This module
//! defines the [`CollapsedModel`] seam a variant implements (its
//! marginal likelihood as a function of responsibilities, plus cluster
//! removal) and provides the bound assembly, the L-BFGS fit loop, and
//! the prune-and-refit cycle on top of it.
//!
//! Key behaviors
//! -------------
//! - A blanket [`Objective`] implementation exposes every collapsed
//!   model to the bound optimizer: `value` evaluates the bound at trial
//!   logits through a scratch responsibility bundle, without touching
//!   the model's cached state.
//! - [`CollapsedModel::fit`] alternates bound maximization with empty-
//!   cluster pruning until no cluster falls below the threshold, then
//!   returns the final optimizer outcome.
//! - Initialization, mixing weights, and hard assignments are delegated
//!   to the embedded [`MixtureCore`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `build_likelihood` must be a pure function of the responsibility
//!   bundle it is handed; the fit loop evaluates it at trial logits the
//!   cached state never sees.
//! - Variants with per-cluster parameters must override `drop_cluster`
//!   to remove their column/entry alongside the state's, keeping both
//!   sides aligned on K.
//!
//! Downstream usage
//! ----------------
//! - Callers construct a variant, optionally initialize responsibilities,
//!   call `fit`, and then read predictions from the variant and
//!   summaries from the trait's convenience methods.
use crate::mixture::core::{MixtureCore, Responsibilities};
use crate::mixture::errors::{MixtureError, MixtureResult};
use crate::optimization::bound_optimizer::{
    maximize, Cost, Grad, Objective, OptimOutcome, Theta,
};
use crate::optimization::errors::{OptError, OptResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

/// A mixture model whose only free parameters are the assignment logits.
///
/// Required:
/// - `core` / `core_mut`: access to the embedded assignment machinery.
/// - `build_likelihood`: the collapsed marginal likelihood as a function
///   of an arbitrary responsibility bundle.
///
/// Overridable:
/// - `drop_cluster`: variants carrying per-cluster parameters must
///   remove theirs together with the assignment column.
pub trait CollapsedModel {
    /// Shared assignment state, prior, and fit options.
    fn core(&self) -> &MixtureCore;

    /// Mutable access to the shared machinery.
    fn core_mut(&mut self) -> &mut MixtureCore;

    /// Collapsed marginal likelihood `E_q[ln p(data | Z)]`-side of the
    /// bound, evaluated at the given responsibilities.
    fn build_likelihood(&self, resp: &Responsibilities) -> MixtureResult<f64>;

    /// Remove cluster `index`. The default drops only the assignment
    /// column; variants with per-cluster parameters must override and
    /// drop both.
    fn drop_cluster(&mut self, index: usize) -> MixtureResult<()> {
        self.core_mut().state_mut().drop_cluster(index)
    }

    // ---- Provided: bound evaluation ----

    /// Evidence bound at the current assignment state.
    fn bound(&self) -> MixtureResult<f64> {
        let likelihood = self.build_likelihood(self.core().state().responsibilities())?;
        Ok(self.core().assemble_bound(likelihood))
    }

    /// Evidence bound at trial logits, via a scratch responsibility
    /// bundle. The cached state is left untouched.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::ThetaLengthMismatch` when the flat length is not
    ///   N·K.
    fn bound_at(&self, theta: ArrayView1<f64>) -> MixtureResult<f64> {
        let n = self.core().num_points();
        let k = self.core().num_clusters();
        if theta.len() != n * k {
            return Err(MixtureError::ThetaLengthMismatch {
                expected: n * k,
                found: theta.len(),
            });
        }
        let lambda = Array2::from_shape_fn((n, k), |(i, j)| theta[i * k + j]);
        let resp = Responsibilities::from_lambda(&lambda);
        let likelihood = self.build_likelihood(&resp)?;
        let kl = self.core().prior().kl_z(resp.entropy, resp.phi_hat.view());
        Ok(likelihood - kl)
    }

    // ---- Provided: fitting ----

    /// Maximize the evidence bound over the assignment logits, pruning
    /// empty clusters between rounds under the stick-breaking prior.
    ///
    /// Each round runs L-BFGS from the current logits, applies the best
    /// parameters to the state, and drops clusters whose mass fell below
    /// the prune threshold. Rounds repeat until no cluster is dropped;
    /// the outcome of the final round is returned with its value in
    /// bound space.
    ///
    /// # Errors
    /// - Propagates optimizer failures and any model error raised during
    ///   bound evaluation, converted to `OptError`.
    fn fit(&mut self) -> OptResult<OptimOutcome>
    where
        Self: Sized,
    {
        loop {
            let theta0 = self.core().state().lambda_flat();
            let opts = self.core().options().opt.clone();
            let outcome = maximize(&*self, theta0, &opts)?;
            self.core_mut()
                .state_mut()
                .set_from_flat(outcome.theta_hat.view())
                .map_err(OptError::from)?;
            let mut pruned = false;
            while let Some(index) = self.core().smallest_empty_cluster() {
                self.drop_cluster(index).map_err(OptError::from)?;
                pruned = true;
            }
            if !pruned {
                return Ok(outcome);
            }
        }
    }

    // ---- Provided: initialization and summaries ----

    /// Draw fresh standard-normal logits, e.g. for restarts.
    fn randomize_assignments<R: Rng + ?Sized>(&mut self, rng: &mut R)
    where
        Self: Sized,
    {
        self.core_mut().state_mut().randomize(rng);
    }

    /// Set responsibilities directly from a user-supplied matrix.
    fn set_responsibilities(&mut self, phi: Array2<f64>) -> MixtureResult<()> {
        self.core_mut().state_mut().set_phi(phi)
    }

    /// Current responsibility matrix Φ.
    fn responsibilities_matrix(&self) -> ArrayView2<f64> {
        self.core().state().phi()
    }

    /// Current number of clusters K.
    fn num_clusters(&self) -> usize {
        self.core().num_clusters()
    }

    /// Predictive mixing weights (φ̂ + α) / Σ(φ̂ + α).
    fn mixing_weights(&self) -> Array1<f64> {
        self.core().mixing_weights()
    }

    /// Most responsible cluster per data point.
    fn hard_assignments(&self) -> Array1<usize> {
        self.core().hard_assignments()
    }
}

impl<M: CollapsedModel> Objective for M {
    /// Bound value at trial logits.
    fn value(&self, theta: &Theta) -> OptResult<Cost> {
        self.bound_at(theta.view()).map_err(OptError::from)
    }

    /// Reject logit vectors of the wrong length or with non-finite
    /// entries before optimization starts.
    fn check(&self, theta: &Theta) -> OptResult<()> {
        let expected = self.core().num_points() * self.core().num_clusters();
        if theta.len() != expected {
            return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        for (index, &value) in theta.iter().enumerate() {
            if !value.is_finite() {
                return Err(OptError::InvalidThetaInput { index, value });
            }
        }
        Ok(())
    }

    fn grad(&self, _theta: &Theta) -> OptResult<Grad> {
        // Finite differences through the adapter; the softmax keeps the
        // bound smooth in the logits.
        Err(OptError::GradientNotImplemented)
    }
}
