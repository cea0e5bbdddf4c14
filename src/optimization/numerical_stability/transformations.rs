//! Numerical stability utilities.
//!
//! Provides the guarded transforms and shared tolerances the mixture
//! bounds rely on. The central piece is a log-sum-exp softmax over
//! responsibility logits; the constants collect the small ε values used
//! to clamp probabilities, floor near-zero responsibilities, and
//! condition Gram matrices before factorization.
//!
//! # Provided items
//! - [`GENERAL_TOL`]: generic tolerance for validating that probability
//!   rows sum to one.
//! - [`LOGIT_EPS`]: clamp applied to probabilities before taking logs
//!   when converting responsibilities back into logits.
//! - [`RESP_FLOOR`]: floor added to per-cluster responsibilities before
//!   dividing a noise variance by them (overlapping-GP noise reweighting).
//! - [`CHOL_JITTER`]: diagonal jitter added to kernel Gram matrices
//!   before Cholesky factorization.
//! - [`safe_softmax`]: row-wise softmax in log-sum-exp form, returning
//!   probabilities, log-probabilities, and the total entropy in one pass.
//!
//! # Rationale
//! Responsibility logits are unconstrained optimizer state and routinely
//! reach magnitudes where a naïve `exp`/normalize cycle overflows. The
//! log-sum-exp form keeps every intermediate finite for any finite input,
//! and the shared constants keep the prevention-side guards (floors,
//! jitter) consistent across the model variants.
use ndarray::Array2;

/// Generic tolerance for checks of the form `|Σ p − 1| ≤ GENERAL_TOL`.
pub const GENERAL_TOL: f64 = 1e-8;

/// Lower clamp applied to probabilities before `ln` when recovering
/// logits from a responsibility matrix. Keeps one-hot initializations
/// finite while remaining far below any mass the prune policy would keep.
pub const LOGIT_EPS: f64 = 1e-12;

/// Floor added to `Φ[:, k]` before dividing the noise variance by it in
/// the overlapping-GP noise reweighting, preventing blow-up when a
/// cluster's responsibility at a point approaches zero.
pub const RESP_FLOOR: f64 = 1e-6;

/// Diagonal jitter added to kernel Gram matrices before Cholesky
/// factorization in the GP variants.
pub const CHOL_JITTER: f64 = 1e-6;

/// Row-wise softmax in log-sum-exp form.
///
/// Maps an unconstrained logit matrix Λ to the responsibility bundle
/// `(Φ, log Φ, H)` where each row of `Φ = softmax(Λ)` lies on the
/// probability simplex, `log Φ` is computed directly in log space, and
/// `H = −Σ Φ·log Φ` is the total assignment entropy.
///
/// The per-row maximum is subtracted before exponentiation, so every
/// intermediate stays finite for any finite Λ; `log Φ` never reaches
/// `-∞` even where `Φ` underflows to zero, which keeps the entropy sum
/// free of `0·∞` products.
///
/// # Parameters
/// - `lambda`: N×K logit matrix; entries must be finite.
///
/// # Returns
/// - `(phi, log_phi, entropy)` with `phi`/`log_phi` shaped like `lambda`.
pub fn safe_softmax(lambda: &Array2<f64>) -> (Array2<f64>, Array2<f64>, f64) {
    let mut log_phi = lambda.clone();
    for mut row in log_phi.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| v - max);
        let lse = row.fold(0.0, |acc, &v| acc + v.exp()).ln();
        row.mapv_inplace(|v| v - lse);
    }
    let phi = log_phi.mapv(f64::exp);
    let entropy = -(&phi * &log_phi).sum();
    (phi, log_phi, entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Simplex membership of softmax rows and agreement between `phi` and
    //   `log_phi`.
    // - The entropy value on uniform logits.
    // - Finiteness under large-magnitude logits.
    //
    // They intentionally DO NOT cover:
    // - Non-finite inputs; assignment-state validation rejects those before
    //   this function is reached.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that every softmax row is a probability vector and that
    // `log_phi` is the elementwise log of `phi`.
    //
    // Given
    // -----
    // - A 3×3 logit matrix with mixed signs and magnitudes.
    //
    // Expect
    // ------
    // - Rows sum to 1 within 1e-12, entries lie in [0, 1], and
    //   `phi.ln()` matches `log_phi`.
    fn softmax_rows_lie_on_the_simplex() {
        // Arrange
        let lambda = array![[0.0, 1.0, -1.0], [3.0, 3.0, 3.0], [-2.0, 0.5, 4.0]];

        // Act
        let (phi, log_phi, _) = safe_softmax(&lambda);

        // Assert
        for row in phi.rows() {
            let sum: f64 = row.sum();
            assert!((sum - 1.0).abs() < 1e-12);
            assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
        for (p, lp) in phi.iter().zip(log_phi.iter()) {
            assert!((p.ln() - lp).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the entropy of a uniform responsibility matrix.
    //
    // Given
    // -----
    // - Zero logits for N = 4 rows and K = 3 clusters, so every row is
    //   uniform.
    //
    // Expect
    // ------
    // - Entropy equals N·ln K.
    fn uniform_logits_give_n_log_k_entropy() {
        // Arrange
        let lambda = Array2::<f64>::zeros((4, 3));

        // Act
        let (_, _, entropy) = safe_softmax(&lambda);

        // Assert
        assert!((entropy - 4.0 * 3.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify stability for logits far outside the naïve-exp range.
    //
    // Given
    // -----
    // - A row containing 1000 and -1000.
    //
    // Expect
    // ------
    // - All outputs finite, the dominant entry's probability is 1, and the
    //   entropy is non-negative and finite.
    fn extreme_logits_stay_finite() {
        // Arrange
        let lambda = array![[1000.0, -1000.0, 0.0]];

        // Act
        let (phi, log_phi, entropy) = safe_softmax(&lambda);

        // Assert
        assert!(phi.iter().all(|p| p.is_finite()));
        assert!(log_phi.iter().all(|lp| lp.is_finite()));
        assert!(entropy.is_finite() && entropy >= 0.0);
        assert!((phi[[0, 0]] - 1.0).abs() < 1e-12);
    }
}
