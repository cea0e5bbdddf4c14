//! bound_optimizer — argmin-powered maximizer for variational evidence
//! bounds.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for
//! **maximizing evidence bounds** `B(θ)` over assignment logits. Mixture
//! models implement a single trait, [`Objective`], and invoke
//! [`maximize`] to run L-BFGS with a configurable line search,
//! tolerances, and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert model bounds `B(θ)` into Argmin-compatible cost functions
//!   `c(θ) = -B(θ)` via [`adapter::ArgMinAdapter`].
//! - Expose a single entrypoint [`maximize`] that:
//!   - validates the initial guess with [`Objective::check`],
//!   - selects an L-BFGS solver via [`builders`] based on
//!     [`traits::LineSearcher`],
//!   - executes the solver via [`run::run_lbfgs`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide a robust finite-difference helper in [`finite_diff`] for
//!   gradients when analytic derivatives are missing, with post-hoc
//!   validation and error capture.
//! - Centralize optimizer configuration ([`Tolerances`], [`OptOptions`])
//!   and validation logic ([`validation`]) so downstream code can assume
//!   sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** a bound `B(θ)` by minimizing a
//!   cost `c(θ) = -B(θ)`; model code implements `B(θ)` and `∇B(θ)` (when
//!   available), **never** the cost directly.
//! - [`Objective::value`] and [`Objective::grad`] must treat invalid
//!   inputs as recoverable `OptError` values, not panics.
//! - Vectors use the canonical aliases [`Theta`] and [`Grad`]; all are
//!   assumed finite whenever optimization proceeds.
//! - Configuration types ([`Tolerances`], [`OptOptions`]) are validated
//!   on construction and treated as internally consistent by the solver
//!   layer.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`]
//!   (`Array1<f64>`); the softmax mapping to responsibilities happens in
//!   the model layer.
//! - Cost is always `c(θ) = -B(θ)` internally; all user-facing APIs and
//!   diagnostics (including [`OptimOutcome::value`]) are expressed in
//!   terms of the bound `B`.
//! - Gradients exposed by [`Objective::grad`] are for the bound
//!   (`∇B(θ)`); the adapter flips signs to obtain the cost gradient.
//! - Errors bubble up as `OptResult<T>` / `OptError`; this module and its
//!   children never intentionally panic or use `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - The mixture variants implement [`Objective`] through the shared
//!   model trait, then call [`maximize`] with an initial logit vector and
//!   an [`OptOptions`] configuration.
//! - Internal optimizer code:
//!   - uses [`adapter`] to bridge into Argmin,
//!   - uses [`builders`] to construct L-BFGS solvers with the chosen
//!     line search,
//!   - delegates execution to [`run::run_lbfgs`], and
//!   - relies on [`finite_diff`] and [`validation`] for derivative and
//!     state checks.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover:
//!   - sign conventions and gradient handling in [`adapter`],
//!   - solver construction and tolerance wiring in [`builders`],
//!   - finite-difference and validation behavior in [`finite_diff`],
//!   - configuration invariants in [`traits`].
//! - Integration tests exercise [`maximize`] implicitly by fitting
//!   mixture models end to end.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{Objective, OptOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mixtures::optimization::bound_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, Objective, OptOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
