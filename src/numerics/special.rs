//! numerics::special — log-gamma-type normalizing constants.
//!
//! Purpose
//! -------
//! Provide the special-function scalars shared by the conjugate
//! Gaussian-Wishart bound and the Dirichlet/Dirichlet-Process assignment
//! prior: the multivariate log-gamma sum and the log of the Dirichlet
//! normalizing constant, plus the log-π constants those formulas carry.
//!
//! Key behaviors
//! -------------
//! - [`ln_gamma_d`] evaluates `Σ_{i=1..d} lnΓ((v + 1 − i)/2)`, the
//!   dimension-indexed gamma sum appearing in the collapsed
//!   Normal-Inverse-Wishart marginal (the π-dependent part of the full
//!   multivariate gamma cancels between posterior and prior terms and is
//!   accounted for separately by the caller).
//! - [`ln_dirichlet_c`] evaluates `lnΓ(Σ a_k) − Σ lnΓ(a_k)`, the log
//!   normalizer of a Dirichlet(a) distribution.
//!
//! Invariants & assumptions
//! ------------------------
//! - Arguments are expected to keep every gamma argument strictly positive;
//!   callers enforce this through prior validation (α > 0, ν0 ≥ D,
//!   responsibilities ≥ 0) rather than per-call checks here.
//! - All functions are pure and allocation-free.
//!
//! Downstream usage
//! ----------------
//! - `mixture::models::gaussian` uses [`ln_gamma_d`] and [`LOG_PI`] in the
//!   collapsed bound and the Student-t predictive density.
//! - `mixture::core::priors` uses [`ln_dirichlet_c`] for the symmetric
//!   Dirichlet mixing-proportion bound.
use ndarray::Array1;
use statrs::function::gamma::ln_gamma;

/// Natural log of π.
pub const LOG_PI: f64 = 1.144_729_885_849_400_2;

/// Natural log of 2π.
pub const LOG_2PI: f64 = 1.837_877_066_409_345_6;

/// ln_gamma_d — dimension-indexed log-gamma sum.
///
/// Purpose
/// -------
/// Evaluate `Σ_{i=1..d} lnΓ((v + 1 − i)/2)` for degrees of freedom `v` and
/// dimension `d`. This is the π-free part of the multivariate gamma
/// function `lnΓ_d(v/2)`.
///
/// Parameters
/// ----------
/// - `v`: `f64`
///   Degrees of freedom. Every term's argument `(v + 1 − i)/2` must be
///   strictly positive, i.e. `v > d − 1`.
/// - `d`: `usize`
///   Dimension of the problem (number of summed terms).
///
/// Returns
/// -------
/// `f64`
///   The log-gamma sum.
pub fn ln_gamma_d(v: f64, d: usize) -> f64 {
    (1..=d).map(|i| ln_gamma((v + 1.0 - i as f64) / 2.0)).sum()
}

/// ln_dirichlet_c — log normalizing constant of a Dirichlet distribution.
///
/// Purpose
/// -------
/// Evaluate `lnΓ(Σ_k a_k) − Σ_k lnΓ(a_k)` for a concentration vector `a`
/// with strictly positive entries.
///
/// Parameters
/// ----------
/// - `a`: `&Array1<f64>`
///   Concentration parameters, all entries strictly positive.
///
/// Returns
/// -------
/// `f64`
///   The log Dirichlet normalizer.
pub fn ln_dirichlet_c(a: &Array1<f64>) -> f64 {
    ln_gamma(a.sum()) - a.iter().map(|&ai| ln_gamma(ai)).sum::<f64>()
}
