//! optimization — bound-maximization stack, numerical helpers, and unified
//! error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for variational fitting,
//! combining an Argmin-backed evidence-bound optimizer, numerically
//! stable responsibility transforms, and a single error/result surface.
//! The mixture models implement an objective, choose tolerances, and
//! obtain fitted assignment logits and diagnostics without touching
//! backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing evidence bounds** `B(θ)`
//!   (`bound_optimizer`), including configuration of solvers and stopping
//!   criteria.
//! - Supply shared numerical primitives (`numerical_stability`) for
//!   mapping unconstrained assignment logits into responsibility space
//!   through a log-sum-exp softmax.
//! - Normalize configuration issues, numerical failures, and backend
//!   solver errors into a single enum (`errors::OptError`) with a common
//!   result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained logit space `θ` and assume
//!   that inputs are finite once validation has passed; invalid states
//!   are reported as `OptError`, not panics.
//! - Objective implementations are expected to treat domain violations
//!   (e.g., failed factorizations, shape mismatches) as recoverable
//!   errors surfaced through the optimization layer.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a bound `B(θ)` by minimizing an
//!   internal cost `c(θ) = -B(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `B`.
//! - Parameters and gradients use `ndarray`-based aliases (`Theta`,
//!   `Grad`); the mapping between θ-space and responsibility matrices is
//!   handled by the numerical-stability helpers and the assignment
//!   state.
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors or model-specific error enums.
//! - This module and its submodules avoid I/O; progress reporting is
//!   opt-in through the `obs_slog` observer feature.
//!
//! Downstream usage
//! ----------------
//! - The mixture variants implement `Objective` through the shared model
//!   trait and call `maximize` with a logit guess and `OptOptions` to
//!   obtain an `OptimOutcome` (via `bound_optimizer`).
//! - Assignment-state code uses `numerical_stability` for the softmax
//!   transform and the shared numeric tolerances.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`, which forwards the submodule preludes
//!   and the core error types.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns:
//!   - `bound_optimizer`: solver wiring, tolerance handling, and sign
//!     conventions on toy objectives.
//!   - `numerical_stability`: simplex and entropy invariants of the
//!     softmax under extreme logits.
//!   - `errors`: conversions from backend/model errors into `OptError`.
//! - Higher-level integration tests exercise end-to-end fits, verifying
//!   that configuration mistakes, numerical problems, and backend
//!   failures all surface as sensible `OptError` values.

pub mod bound_optimizer;
pub mod errors;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::bound_optimizer::prelude::*;
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
}
