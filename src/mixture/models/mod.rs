//! mixture::models — the collapsed-mixture variants.
//!
//! Purpose
//! -------
//! House the model layer built on top of [`crate::mixture::core`]: the
//! [`collapsed`] trait module that ties a variant's marginal likelihood to
//! the shared bound assembly and fit loop, and the three shipped variants.
//!
//! Key behaviors
//! -------------
//! - [`collapsed`] defines [`CollapsedModel`] with the provided `bound`,
//!   `bound_at`, and `fit` machinery plus the blanket `Objective`
//!   implementation every variant inherits.
//! - [`gaussian`] clusters dense vectors under conjugate
//!   Normal-Inverse-Wishart components with a closed-form marginal.
//! - [`sparse_gp`] clusters independent series under inducing-point GPs
//!   with per-cluster variational posteriors.
//! - [`overlapping_gp`] clusters functions on a shared input domain under
//!   exact GPs with responsibility-reweighted noise.
//!
//! Downstream usage
//! ----------------
//! - Construct a variant, optionally initialize its responsibilities, call
//!   `fit`, then read predictions from the variant and summaries from the
//!   trait.

pub mod collapsed;
pub mod gaussian;
pub mod overlapping_gp;
pub mod sparse_gp;

// ---- Re-exports (primary public surface) ----------------------------------

pub use collapsed::CollapsedModel;
pub use gaussian::{GaussianComponents, GaussianMixture};
pub use overlapping_gp::OverlappingGpMixture;
pub use sparse_gp::{SparseGpMixture, DEFAULT_NUM_INDUCING};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::mixture::models::prelude::*;
//
// to import the model surface in a single line.

pub mod prelude {
    pub use super::collapsed::CollapsedModel;
    pub use super::gaussian::{GaussianComponents, GaussianMixture};
    pub use super::overlapping_gp::OverlappingGpMixture;
    pub use super::sparse_gp::{SparseGpMixture, DEFAULT_NUM_INDUCING};
}
