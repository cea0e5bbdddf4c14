//! Fitting configuration shared by all mixture variants.
//!
//! Purpose
//! -------
//! Bundle the optimizer configuration with the mixture-level settings the
//! fit loop consults: currently the responsibility-mass threshold below
//! which a stick-breaking cluster is pruned.
//!
//! Invariants & assumptions
//! ------------------------
//! - The prune threshold is validated once at construction and lies
//!   strictly inside (0, 1).
//! - Optimizer numerics are validated by the optimizer's own option
//!   types; this module does not re-check them.
use crate::mixture::errors::{MixtureError, MixtureResult};
use crate::optimization::bound_optimizer::OptOptions;

/// Default responsibility mass below which a stick-breaking cluster is
/// considered empty.
pub const DEFAULT_PRUNE_THRESHOLD: f64 = 1e-6;

/// FitOptions — optimizer settings plus mixture-level fit behavior.
///
/// Fields:
/// - `opt: OptOptions` — L-BFGS configuration for each bound
///   maximization round.
/// - `prune_threshold: f64` — clusters whose responsibility mass φ̂_k
///   falls below this are removed between rounds under the
///   stick-breaking prior. Ignored under the symmetric prior.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub opt: OptOptions,
    pub prune_threshold: f64,
}

impl FitOptions {
    /// Create validated fit options.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::InvalidPruneThreshold` when the threshold is not
    ///   strictly inside (0, 1).
    pub fn new(opt: OptOptions, prune_threshold: f64) -> MixtureResult<FitOptions> {
        if !prune_threshold.is_finite() || prune_threshold <= 0.0 || prune_threshold >= 1.0 {
            return Err(MixtureError::InvalidPruneThreshold { value: prune_threshold });
        }
        Ok(FitOptions { opt, prune_threshold })
    }
}

impl Default for FitOptions {
    /// Optimizer defaults with the standard prune threshold.
    fn default() -> FitOptions {
        FitOptions { opt: OptOptions::default(), prune_threshold: DEFAULT_PRUNE_THRESHOLD }
    }
}
