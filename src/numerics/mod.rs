//! numerics — shared numeric utilities for the mixture bounds.
//!
//! Purpose
//! -------
//! Collect the pure, stateless numeric building blocks the mixture models
//! share: positive-definite Cholesky factorization with solve and
//! log-determinant accessors ([`linalg`]), and the log-gamma-type
//! normalizing constants of the conjugate and Dirichlet computations
//! ([`special`]).
//!
//! Conventions
//! -----------
//! - Public surfaces take and return `ndarray` types; `nalgebra` storage is
//!   an implementation detail of [`linalg`].
//! - Functions here never construct domain errors; fallible factorizations
//!   report `None`/failing indices and callers attach cluster context.
pub mod linalg;
pub mod special;

// ---- Re-exports (primary public surface) ----
pub use linalg::{factor_all, PdFactor};
pub use special::{ln_dirichlet_c, ln_gamma_d, LOG_2PI, LOG_PI};
