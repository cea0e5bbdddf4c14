//! bound_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! evidence-bound optimizer. Defining these in one place keeps the rest
//! of the optimization code agnostic to `ndarray` and Argmin generics
//! and makes a backend change a local edit.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, and
//!   scalar costs (`Theta`, `Grad`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired L-BFGS solver aliases for both line-search
//!   strategies over the common `(Theta, Grad, Cost)` shapes.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors are `ndarray` containers over `f64`.
//! - `Cost` is a scalar `f64`; higher layers handle the sign flip
//!   between the maximized bound and the minimized cost.
//! - The line-search aliases assume Argmin's three-parameter forms
//!   `(Param, Gradient, Float)` as of the pinned Argmin version.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are treated as flat vectors with length equal to
//!   the number of free assignment logits.
//! - `DEFAULT_LBFGS_MEM` encodes the typical history size for L-BFGS;
//!   callers can override it per run.
//!
//! Downstream usage
//! ----------------
//! - Other optimizer modules import these aliases instead of referring
//!   directly to `ndarray` or Argmin generics.
//! - Solver wrappers construct concrete L-BFGS instances via the
//!   provided aliases (e.g., [`LbfgsHagerZhang`]) based on a chosen line
//!   search.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; correctness is
//!   exercised by tests in the surrounding optimizer modules.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Flattened assignment-logit vector `θ` for bound optimization.
///
/// Alias for `ndarray::Array1<f64>`, the canonical parameter type
/// throughout the optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate, this is the cost `c(θ) = -B(θ)` derived from an
/// evidence bound `B(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager-Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More-Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager-Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More-Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
