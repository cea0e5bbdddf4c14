//! rust_mixtures — collapsed variational Bayesian mixture models in Rust.
//!
//! Purpose
//! -------
//! Provide a small, well-tested engine for clustering with collapsed
//! variational inference: mixtures of Gaussians over dense vectors,
//! mixtures of sparse Gaussian processes over independent series, and
//! overlapping Gaussian-process mixtures over trajectories that share an
//! input domain. Per-point assignment responsibilities are the only free
//! variational parameters; component parameters are collapsed into
//! closed-form or per-cluster variational blocks.
//!
//! Key behaviors
//! -------------
//! - Represent assignments as free logits Λ mapped through a row-wise
//!   stable softmax, so optimization is unconstrained while Φ rows stay
//!   on the simplex (`mixture::core::assignments`).
//! - Assemble the evidence lower bound as marginal likelihood minus the
//!   assignment-entropy penalty, under symmetric-Dirichlet or truncated
//!   stick-breaking priors over assignments (`mixture::core::engine`,
//!   `mixture::core::priors`).
//! - Maximize the bound with a quasi-Newton solver over the flattened
//!   logits, falling back to finite-difference gradients, then prune
//!   effectively empty clusters and refit (`mixture::models::collapsed`,
//!   `optimization::bound_optimizer`).
//! - Expose per-variant predictive densities, component posteriors, and
//!   posterior sampling (`mixture::models`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Data containers validate shape and finiteness once at construction
//!   and are immutable afterwards, so derived caches cannot go stale.
//! - Every bound evaluation sees Φ rows that sum to one and a φ̂ vector
//!   that sums to the number of data points.
//! - Covariance factorizations go through one checked Cholesky seam
//!   (`numerics::linalg`); failures surface as typed errors, never
//!   panics.
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray` row-major; responsibility matrices are N×K
//!   with one row per data point; indices are 0-based.
//! - Fallible operations return explicit `Result` types
//!   (`mixture::errors`, `optimization::errors`) and propagate with `?`;
//!   no panicking unwraps on user input.
//! - Randomized initialization and posterior sampling take caller-seeded
//!   `rand` generators so runs are reproducible.
//!
//! Downstream usage
//! ----------------
//! - Construct a variant from raw data, fit, then predict:
//!   [`GaussianMixture`] for vector data, [`SparseGpMixture`] for
//!   collections of independent series, [`OverlappingGpMixture`] for
//!   overlapping trajectories.
//! - The [`prelude`] re-exports the types most callers need.
//!
//! Testing notes
//! -------------
//! - Unit tests pin hand-computed bounds, posterior blocks, and
//!   predictive densities in each module; workspace-level integration
//!   tests run the full data → fit → prediction pipeline on synthetic
//!   mixtures.

pub mod mixture;
pub mod numerics;
pub mod optimization;

// ---- Re-exports (primary public surface) ----------------------------------

pub use crate::mixture::{
    AssignmentPrior, CollapsedModel, FitOptions, GaussianMixture, MixtureError, MixtureResult,
    OverlappingGpMixture, SparseGpMixture,
};
pub use crate::optimization::bound_optimizer::{OptOptions, OptimOutcome};
pub use crate::optimization::errors::{OptError, OptResult};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::prelude::*;
//
// to import the commonly used surface in a single line.

pub mod prelude {
    pub use crate::mixture::prelude::*;
    pub use crate::optimization::bound_optimizer::{OptOptions, OptimOutcome};
    pub use crate::optimization::errors::{OptError, OptResult};
}
