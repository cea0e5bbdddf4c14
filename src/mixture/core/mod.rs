//! core — shared data containers, assignment state, priors, and fit
//! machinery.
//!
//! Purpose
//! -------
//! Collect the building blocks every collapsed mixture variant shares:
//! validated data containers, the variational assignment state and its
//! derived responsibilities, assignment and component priors, covariance
//! kernels, observation likelihoods, fit configuration, and the
//! [`MixtureCore`] bundle the variants embed.
//!
//! Key behaviors
//! -------------
//! - Define validated, immutable data containers with the product caches
//!   bound evaluations read ([`VectorData`], [`PairedData`],
//!   [`SeriesSet`]).
//! - Own the free logits Λ and their derived responsibility bundle
//!   ([`AssignmentState`], [`Responsibilities`]) with uniform, random,
//!   and user-supplied initialization.
//! - Encapsulate the two assignment-prior families ([`AssignmentPrior`])
//!   and the conjugate Gaussian component prior
//!   ([`NormalWishartPrior`]).
//! - Provide the covariance-kernel and observation-likelihood seams
//!   ([`Kernel`], [`Rbf`], [`SeriesLikelihood`], [`GaussianLikelihood`])
//!   the Gaussian-process variants draw through.
//! - Bundle fit configuration ([`FitOptions`]) with the shared bound
//!   assembly and prune nomination in [`MixtureCore`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Data containers are finite and non-empty after construction;
//!   derived caches can never go stale because containers are immutable.
//! - Φ rows are simplexes and φ̂ sums to N whenever the state's derived
//!   quantities are read.
//! - Priors and kernels validate their hyperparameters once at
//!   construction.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; responsibility matrices are N×K with one row
//!   per data point.
//! - Optimizer round trips flatten Λ row-major.
//! - Error conditions are reported via `MixtureResult`; this module never
//!   panics on user input.
//!
//! Downstream usage
//! ----------------
//! - The variants in `mixture::models` embed a [`MixtureCore`], add their
//!   data container and per-cluster parameters, and implement the
//!   collapsed-model trait on top.
//! - Callers typically construct data containers and priors here, then
//!   hand them to a variant constructor.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules pin hand-computed values for bounds,
//!   caches, and kernels, and cover every documented rejection path.
//! - Integration tests exercise the full pipeline (data → variant →
//!   fit → predictions) at the workspace level.

pub mod assignments;
pub mod data;
pub mod engine;
pub mod kernels;
pub mod likelihoods;
pub mod options;
pub mod priors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::assignments::{rows_are_simplex, AssignmentState, Responsibilities};
pub use self::data::{PairedData, Series, SeriesSet, VectorData};
pub use self::engine::MixtureCore;
pub use self::kernels::{Kernel, Rbf};
pub use self::likelihoods::{GaussianLikelihood, SeriesLikelihood};
pub use self::options::{FitOptions, DEFAULT_PRUNE_THRESHOLD};
pub use self::priors::{AssignmentPrior, NormalWishartPrior};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::mixture::core::prelude::*;
//
// to import the main mixture core surface in a single line.

pub mod prelude {
    pub use super::assignments::{AssignmentState, Responsibilities};
    pub use super::data::{PairedData, Series, SeriesSet, VectorData};
    pub use super::engine::MixtureCore;
    pub use super::kernels::{Kernel, Rbf};
    pub use super::likelihoods::{GaussianLikelihood, SeriesLikelihood};
    pub use super::options::FitOptions;
    pub use super::priors::{AssignmentPrior, NormalWishartPrior};
}
