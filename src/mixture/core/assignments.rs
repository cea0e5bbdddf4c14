//! Variational assignment state shared by every mixture variant.
//!
//! Purpose
//! -------
//! Own the free assignment parameters Λ (one unconstrained row of logits
//! per data point) together with the derived quantities every bound
//! evaluation needs: the responsibility matrix Φ = softmax(Λ) by rows,
//! its logarithm, its entropy, and the per-cluster masses φ̂.
//!
//! Key behaviors
//! -------------
//! - All derived quantities are refreshed in one place whenever Λ changes,
//!   so Φ, log Φ, H(Φ) and φ̂ can never disagree with Λ.
//! - Initialization supports uniform (Λ = 0), random standard-normal, and
//!   user-supplied responsibility matrices.
//! - Flattening to and from the optimizer's parameter vector is row-major.
//! - Cluster columns can be removed, which renormalizes the remaining
//!   responsibilities through the softmax.
//!
//! Invariants & assumptions
//! ------------------------
//! - Λ is finite; each Φ row is a simplex; φ̂ sums to N.
//! - The entropy is the full −ΣΦ∘log Φ, always finite because log Φ is
//!   computed through the log-sum-exp path.
//!
//! Downstream usage
//! ----------------
//! - The engine's bound assembly reads Φ, H and φ̂; the optimizer round
//!   trips through `lambda_flat`/`set_from_flat`.
use crate::mixture::errors::{MixtureError, MixtureResult};
use crate::optimization::numerical_stability::{safe_softmax, LOGIT_EPS, GENERAL_TOL};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

/// Derived responsibility quantities, refreshed together from Λ.
#[derive(Debug, Clone)]
pub struct Responsibilities {
    /// N×K responsibility matrix, each row a simplex.
    pub phi: Array2<f64>,
    /// Elementwise log of `phi`, from the log-sum-exp path.
    pub log_phi: Array2<f64>,
    /// Full assignment entropy −ΣΦ∘log Φ.
    pub entropy: f64,
    /// Per-cluster masses φ̂ = Σ_n Φ[n, ·].
    pub phi_hat: Array1<f64>,
}

impl Responsibilities {
    /// Derive the full bundle from a logit matrix. Used both for the
    /// cached state and for scratch evaluations at trial logits during
    /// optimization.
    pub fn from_lambda(lambda: &Array2<f64>) -> Responsibilities {
        let (phi, log_phi, entropy) = safe_softmax(lambda);
        let phi_hat = phi.sum_axis(Axis(0));
        Responsibilities { phi, log_phi, entropy, phi_hat }
    }
}

/// AssignmentState — the free logits Λ plus their derived responsibilities.
#[derive(Debug, Clone)]
pub struct AssignmentState {
    lambda: Array2<f64>,
    resp: Responsibilities,
}

impl AssignmentState {
    /// Create a uniform state for `num_points` points and `num_clusters`
    /// clusters (Λ = 0, so every Φ row is 1/K).
    ///
    /// Errors
    /// ------
    /// - `MixtureError::EmptyData` when `num_points` is zero.
    /// - `MixtureError::ZeroClusters` when `num_clusters` is zero.
    pub fn new(num_points: usize, num_clusters: usize) -> MixtureResult<AssignmentState> {
        if num_points == 0 {
            return Err(MixtureError::EmptyData { what: "assignment state" });
        }
        if num_clusters == 0 {
            return Err(MixtureError::ZeroClusters);
        }
        let lambda = Array2::<f64>::zeros((num_points, num_clusters));
        let resp = Responsibilities::from_lambda(&lambda);
        Ok(AssignmentState { lambda, resp })
    }

    // ---- Accessors ----

    /// Number of data points N.
    pub fn num_points(&self) -> usize {
        self.lambda.nrows()
    }

    /// Current number of clusters K.
    pub fn num_clusters(&self) -> usize {
        self.lambda.ncols()
    }

    /// Current logits Λ.
    pub fn lambda(&self) -> ArrayView2<f64> {
        self.lambda.view()
    }

    /// Responsibility matrix Φ.
    pub fn phi(&self) -> ArrayView2<f64> {
        self.resp.phi.view()
    }

    /// Elementwise log Φ.
    pub fn log_phi(&self) -> ArrayView2<f64> {
        self.resp.log_phi.view()
    }

    /// Assignment entropy H(Φ).
    pub fn entropy(&self) -> f64 {
        self.resp.entropy
    }

    /// Per-cluster masses φ̂.
    pub fn phi_hat(&self) -> ArrayView1<f64> {
        self.resp.phi_hat.view()
    }

    /// The full derived bundle for the current Λ.
    pub fn responsibilities(&self) -> &Responsibilities {
        &self.resp
    }

    // ---- State updates ----

    /// Replace Λ wholesale and refresh the derived quantities.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::LambdaShapeMismatch` when the shape differs from
    ///   the current N×K.
    /// - `MixtureError::NonFiniteData` naming the first non-finite logit.
    pub fn set_lambda(&mut self, lambda: Array2<f64>) -> MixtureResult<()> {
        if lambda.dim() != self.lambda.dim() {
            return Err(MixtureError::LambdaShapeMismatch {
                expected_rows: self.lambda.nrows(),
                expected_cols: self.lambda.ncols(),
                found_rows: lambda.nrows(),
                found_cols: lambda.ncols(),
            });
        }
        for ((row, col), &v) in lambda.indexed_iter() {
            if !v.is_finite() {
                return Err(MixtureError::NonFiniteData { what: "assignment logits", row, col });
            }
        }
        self.lambda = lambda;
        self.refresh();
        Ok(())
    }

    /// Set the responsibilities directly from a user-supplied matrix.
    ///
    /// Entries are clamped away from zero before taking logs, so the
    /// stored Φ matches the input up to that clamp and renormalization.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::LambdaShapeMismatch` when the shape differs from
    ///   the current N×K.
    /// - `MixtureError::InvalidResponsibilityRow` when a row has entries
    ///   outside [0, 1], a non-finite entry, or does not sum to one.
    pub fn set_phi(&mut self, phi: Array2<f64>) -> MixtureResult<()> {
        if phi.dim() != self.lambda.dim() {
            return Err(MixtureError::LambdaShapeMismatch {
                expected_rows: self.lambda.nrows(),
                expected_cols: self.lambda.ncols(),
                found_rows: phi.nrows(),
                found_cols: phi.ncols(),
            });
        }
        for (row, r) in phi.rows().into_iter().enumerate() {
            let mut sum = 0.0;
            for &v in r.iter() {
                if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                    return Err(MixtureError::InvalidResponsibilityRow {
                        row,
                        reason: "entries must be finite and lie in [0, 1]",
                    });
                }
                sum += v;
            }
            if (sum - 1.0).abs() > 1e-6 {
                return Err(MixtureError::InvalidResponsibilityRow {
                    row,
                    reason: "row must sum to one",
                });
            }
        }
        self.lambda = phi.mapv(|v| v.max(LOGIT_EPS).ln());
        self.refresh();
        Ok(())
    }

    /// Draw every logit from a standard normal.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for v in self.lambda.iter_mut() {
            *v = rng.sample(StandardNormal);
        }
        self.refresh();
    }

    /// Remove cluster column `index` and renormalize the survivors.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::ClusterIndexOutOfRange` when `index` ≥ K.
    /// - `MixtureError::ClustersExhausted` when only one cluster remains.
    pub fn drop_cluster(&mut self, index: usize) -> MixtureResult<()> {
        let k = self.num_clusters();
        if index >= k {
            return Err(MixtureError::ClusterIndexOutOfRange { index, num_clusters: k });
        }
        if k == 1 {
            return Err(MixtureError::ClustersExhausted);
        }
        let keep: Vec<usize> = (0..k).filter(|&j| j != index).collect();
        self.lambda = self.lambda.select(Axis(1), &keep);
        self.refresh();
        Ok(())
    }

    // ---- Optimizer round trips ----

    /// Flatten Λ row-major into the optimizer's parameter vector.
    pub fn lambda_flat(&self) -> Array1<f64> {
        Array1::from_iter(self.lambda.iter().copied())
    }

    /// Restore Λ from a row-major flat vector and refresh.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::ThetaLengthMismatch` when the length is not N·K.
    /// - `MixtureError::NonFiniteTheta` naming the first non-finite entry.
    pub fn set_from_flat(&mut self, theta: ArrayView1<f64>) -> MixtureResult<()> {
        let (n, k) = self.lambda.dim();
        if theta.len() != n * k {
            return Err(MixtureError::ThetaLengthMismatch { expected: n * k, found: theta.len() });
        }
        for (index, &value) in theta.iter().enumerate() {
            if !value.is_finite() {
                return Err(MixtureError::NonFiniteTheta { index, value });
            }
        }
        for (dst, &src) in self.lambda.iter_mut().zip(theta.iter()) {
            *dst = src;
        }
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        self.resp = Responsibilities::from_lambda(&self.lambda);
    }
}

/// Check that Φ rows stay simplexes within `GENERAL_TOL`; used by
/// engine-level debug assertions.
pub fn rows_are_simplex(phi: ArrayView2<f64>) -> bool {
    phi.rows().into_iter().all(|r| {
        (r.sum() - 1.0).abs() < GENERAL_TOL && r.iter().all(|&v| (0.0..=1.0).contains(&v))
    })
}
