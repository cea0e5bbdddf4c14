//! numerical_stability — numerically robust transforms for the mixture bounds.
//!
//! Purpose
//! -------
//! Collect the numerically stable transforms and small shared tolerances
//! the collapsed-mixture bounds depend on. This module centralizes the
//! softmax that maps unconstrained responsibility logits onto the
//! probability simplex together with the ε constants used for clamping,
//! flooring, and matrix conditioning, so the mixture and optimizer layers
//! share one set of guards.
//!
//! Key behaviors
//! -------------
//! - Provide a row-wise log-sum-exp softmax (`safe_softmax`) returning
//!   probabilities, log-probabilities, and the assignment entropy in a
//!   single pass over the logit matrix.
//! - Centralize numeric tolerances (`GENERAL_TOL`, `LOGIT_EPS`,
//!   `RESP_FLOOR`, `CHOL_JITTER`) so downstream modules apply consistent
//!   clamping, flooring, and jitter behavior.
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms assume finite `f64` inputs; shape and finiteness
//!   validation is enforced in the mixture layer, not here.
//! - `safe_softmax` guarantees simplex rows for any finite input; callers
//!   never re-normalize its output.
//! - The constants are prevention-side guards (applied before a
//!   computation can degenerate), matching the error-handling design in
//!   which numeric failures are fatal rather than retried.
//!
//! Conventions
//! -----------
//! - All routines operate on `ndarray` types and are pure; this module
//!   never logs, performs I/O, or touches global state.
//! - Panics and `unsafe` are avoided; invalid inputs are caught by
//!   upstream validation and surfaced as domain error types.
//!
//! Downstream usage
//! ----------------
//! - The assignment state recomputes its responsibility bundle through
//!   `safe_softmax` on every refresh, and objective evaluations use it to
//!   expand candidate logit vectors.
//! - The overlapping-GP variant applies `RESP_FLOOR` before noise
//!   reweighting and `CHOL_JITTER` before factoring Gram matrices; the
//!   sparse-GP variant shares `CHOL_JITTER` for its inducing-point
//!   factorizations.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover simplex membership, the
//!   uniform-entropy value, and stability under large-magnitude logits.
//! - Higher-level invariants (bound values, pruning behavior) are covered
//!   in the mixture modules rather than re-tested here.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    safe_softmax, CHOL_JITTER, GENERAL_TOL, LOGIT_EPS, RESP_FLOOR,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        safe_softmax, CHOL_JITTER, GENERAL_TOL, LOGIT_EPS, RESP_FLOOR,
    };
}
