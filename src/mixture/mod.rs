//! mixture — collapsed variational mixture models.
//!
//! Purpose
//! -------
//! Group everything mixture-specific in one namespace: the shared core
//! (data containers, assignment state, priors, kernels, likelihoods, fit
//! configuration), the typed error surface, and the three shipped model
//! variants built on the collapsed-model trait.
//!
//! Key behaviors
//! -------------
//! - [`core`] owns the building blocks the variants share, including the
//!   [`MixtureCore`] bundle with the bound assembly and prune nomination.
//! - [`errors`] defines [`MixtureError`] and the `MixtureResult` alias
//!   used across the namespace.
//! - [`models`] houses [`CollapsedModel`] and the variants:
//!   [`GaussianMixture`], [`SparseGpMixture`], and
//!   [`OverlappingGpMixture`].
//!
//! Conventions
//! -----------
//! - Responsibility matrices are N×K, rows summing to one; cluster and
//!   point indices are 0-based.
//! - Fallible operations return `MixtureResult`; optimizer-facing paths
//!   convert into the optimizer's own error type at the seam.
//!
//! Downstream usage
//! ----------------
//! - Typical flow: build a data container, construct a variant with an
//!   [`AssignmentPrior`] and [`FitOptions`], optionally randomize or seed
//!   the responsibilities, call `fit`, then query predictions.
//!
//! Testing notes
//! -------------
//! - Each submodule carries its own unit tests; end-to-end recovery runs
//!   live in the workspace `tests/` directory.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    AssignmentPrior, AssignmentState, FitOptions, GaussianLikelihood, Kernel, MixtureCore,
    NormalWishartPrior, PairedData, Rbf, Responsibilities, Series, SeriesLikelihood, SeriesSet,
    VectorData,
};
pub use self::errors::{MixtureError, MixtureResult};
pub use self::models::{
    CollapsedModel, GaussianComponents, GaussianMixture, OverlappingGpMixture, SparseGpMixture,
    DEFAULT_NUM_INDUCING,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::mixture::prelude::*;
//
// to import the whole mixture surface in a single line.

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{MixtureError, MixtureResult};
    pub use super::models::prelude::*;
}
