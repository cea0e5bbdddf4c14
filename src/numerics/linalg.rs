//! numerics::linalg — positive-definite factorization helpers.
//!
//! Purpose
//! -------
//! Wrap `nalgebra`'s Cholesky decomposition behind a small interface tuned
//! to the mixture bounds: factor once, then reuse the factor for
//! log-determinants, right-hand-side solves, and traces of solves. All
//! public surfaces speak `ndarray`; conversion to and from `nalgebra`
//! storage happens inside this module only.
//!
//! Key behaviors
//! -------------
//! - [`PdFactor::new`] factors `A + jitter·I` and reports failure as `None`
//!   instead of panicking, so callers can attach cluster/matrix context to
//!   the error they raise.
//! - [`PdFactor`] exposes `half_log_det`/`log_det` (from the factor
//!   diagonal, never an explicit determinant), vector and matrix solves,
//!   and `trace_solve` for `tr(A⁻¹B)` terms.
//! - [`factor_all`] factors a batch of matrices and reports the index of
//!   the first failure, which callers translate into a per-cluster error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input matrices are square and symmetric; symmetry is not re-checked
//!   here. Callers construct them from symmetric formulas.
//! - `jitter` is a small non-negative constant added to the diagonal before
//!   factorization; `0.0` factors the matrix as given.
//! - No explicit inverse is ever formed.
//!
//! Downstream usage
//! ----------------
//! - Variant A factors posterior scale matrices (no jitter) for the
//!   collapsed bound and Student-t predictions.
//! - Variants B and C factor kernel Gram matrices with the shared
//!   [`CHOL_JITTER`](crate::optimization::numerical_stability::transformations::CHOL_JITTER)
//!   before solves and log-determinant evaluation.
use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2};

/// PdFactor — a successful Cholesky factorization of a positive-definite
/// matrix, with solve and log-determinant accessors.
#[derive(Debug, Clone)]
pub struct PdFactor {
    chol: Cholesky<f64, Dyn>,
    half_log_det: f64,
    dim: usize,
}

impl PdFactor {
    /// Factor `a + jitter·I`, returning `None` when the matrix is not
    /// positive definite.
    ///
    /// Parameters
    /// ----------
    /// - `a`: `&Array2<f64>`
    ///   Square symmetric matrix to factor.
    /// - `jitter`: `f64`
    ///   Non-negative diagonal addition applied before factorization;
    ///   pass `0.0` to factor the matrix exactly as given.
    ///
    /// Returns
    /// -------
    /// `Option<PdFactor>`
    ///   The factorization, or `None` when `a + jitter·I` has a
    ///   non-positive pivot. Callers are expected to surface `None` as a
    ///   domain error naming the matrix that failed.
    pub fn new(a: &Array2<f64>, jitter: f64) -> Option<PdFactor> {
        let n = a.ncols();
        let mut m = to_dmatrix(a);
        if jitter > 0.0 {
            for i in 0..n {
                m[(i, i)] += jitter;
            }
        }
        let chol = Cholesky::new(m)?;
        let half_log_det = (0..n).map(|i| chol.l_dirty()[(i, i)].ln()).sum();
        Some(PdFactor { chol, half_log_det, dim: n })
    }

    /// Dimension of the factored matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `½·log|A|`, accumulated from the factor diagonal.
    pub fn half_log_det(&self) -> f64 {
        self.half_log_det
    }

    /// `log|A|`.
    pub fn log_det(&self) -> f64 {
        2.0 * self.half_log_det
    }

    /// Solve `A·x = b` for a single right-hand side.
    pub fn solve_vec(&self, b: &Array1<f64>) -> Array1<f64> {
        let rhs = DVector::from_iterator(b.len(), b.iter().copied());
        to_array1(&self.chol.solve(&rhs))
    }

    /// Solve `A·X = B` column by column.
    pub fn solve_mat(&self, b: &Array2<f64>) -> Array2<f64> {
        let rhs = to_dmatrix(b);
        to_array2(&self.chol.solve(&rhs))
    }

    /// `tr(A⁻¹·B)` via a full solve; `b` must be square with the factor's
    /// dimension.
    pub fn trace_solve(&self, b: &Array2<f64>) -> f64 {
        let solved = self.solve_mat(b);
        (0..self.dim).map(|i| solved[[i, i]]).sum()
    }

    /// `vᵀ·A⁻¹·v`.
    pub fn quad_form(&self, v: &Array1<f64>) -> f64 {
        self.solve_vec(v).dot(v)
    }

    /// Lower triangular factor L with `A = L·Lᵀ`, for callers that apply
    /// the factor directly (posterior sampling).
    pub fn lower(&self) -> Array2<f64> {
        to_array2(&self.chol.l())
    }
}

/// factor_all — factor a batch of positive-definite matrices.
///
/// Purpose
/// -------
/// Apply [`PdFactor::new`] to each matrix in `mats` with a shared jitter.
/// The batch either factors completely or reports which member failed, so
/// per-cluster error context survives the batching.
///
/// Parameters
/// ----------
/// - `mats`: `&[Array2<f64>]`
///   Square symmetric matrices, one per cluster.
/// - `jitter`: `f64`
///   Diagonal addition shared by every factorization.
///
/// Returns
/// -------
/// `Result<Vec<PdFactor>, usize>`
///   All factors in input order, or `Err(index)` carrying the index of the
///   first matrix whose factorization failed.
pub fn factor_all(mats: &[Array2<f64>], jitter: f64) -> Result<Vec<PdFactor>, usize> {
    mats.iter()
        .enumerate()
        .map(|(k, m)| PdFactor::new(m, jitter).ok_or(k))
        .collect()
}

// ---- ndarray <-> nalgebra bridges ----

fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = (a.nrows(), a.ncols());
    let mut m = DMatrix::<f64>::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            m[(i, j)] = a[[i, j]];
        }
    }
    m
}

fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_iter(v.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Log-determinants, solves, and traces of `PdFactor` against a
    //   hand-factored 2×2 matrix.
    // - `None` on indefinite input and jitter rescuing a singular matrix.
    // - Failing-index reporting from `factor_all`.
    //
    // They intentionally DO NOT cover:
    // - Symmetry checking; callers construct symmetric inputs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify log-determinant and solve outputs against hand computation.
    //
    // Given
    // -----
    // - A = [[4, 2], [2, 3]] with |A| = 8 and A⁻¹ = [[3, −2], [−2, 4]]/8.
    //
    // Expect
    // ------
    // - log_det = ln 8, solve_vec([1, 1]) = [1/8, 1/4],
    //   trace_solve(I) = 7/8, quad_form([1, 1]) = 3/8.
    fn pd_factor_matches_hand_computed_two_by_two() {
        // Arrange
        let a = array![[4.0, 2.0], [2.0, 3.0]];

        // Act
        let factor = PdFactor::new(&a, 0.0).expect("matrix is positive definite");

        // Assert
        assert!((factor.log_det() - 8.0_f64.ln()).abs() < 1e-12);
        assert!((factor.half_log_det() - 0.5 * 8.0_f64.ln()).abs() < 1e-12);

        let x = factor.solve_vec(&array![1.0, 1.0]);
        assert!((x[0] - 0.125).abs() < 1e-12);
        assert!((x[1] - 0.25).abs() < 1e-12);

        let eye = Array2::<f64>::eye(2);
        assert!((factor.trace_solve(&eye) - 0.875).abs() < 1e-12);
        assert!((factor.quad_form(&array![1.0, 1.0]) - 0.375).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify that solve_mat applies the factor to every column.
    //
    // Given
    // -----
    // - A = [[4, 2], [2, 3]] and B = I.
    //
    // Expect
    // ------
    // - solve_mat(B) equals A⁻¹ entry by entry.
    fn solve_mat_reproduces_inverse_columns() {
        // Arrange
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let factor = PdFactor::new(&a, 0.0).expect("matrix is positive definite");

        // Act
        let inv = factor.solve_mat(&Array2::<f64>::eye(2));

        // Assert
        let expected = array![[0.375, -0.25], [-0.25, 0.5]];
        for i in 0..2 {
            for j in 0..2 {
                assert!((inv[[i, j]] - expected[[i, j]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the lower factor against the hand-computed decomposition.
    //
    // Given
    // -----
    // - A = [[4, 2], [2, 3]] with L = [[2, 0], [1, √2]].
    //
    // Expect
    // ------
    // - `lower()` matches L entry by entry.
    fn lower_factor_matches_hand_computation() {
        // Arrange
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let factor = PdFactor::new(&a, 0.0).expect("matrix is positive definite");

        // Act
        let l = factor.lower();

        // Assert
        let expected = array![[2.0, 0.0], [1.0, 2.0_f64.sqrt()]];
        for i in 0..2 {
            for j in 0..2 {
                assert!((l[[i, j]] - expected[[i, j]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that an indefinite matrix is rejected rather than factored.
    //
    // Given
    // -----
    // - A = [[1, 2], [2, 1]] with a negative determinant.
    //
    // Expect
    // ------
    // - `PdFactor::new` returns `None` at zero jitter.
    fn indefinite_matrix_returns_none() {
        // Arrange
        let a = array![[1.0, 2.0], [2.0, 1.0]];

        // Act + Assert
        assert!(PdFactor::new(&a, 0.0).is_none());
    }

    #[test]
    // Purpose
    // -------
    // Verify that jitter rescues a singular but semidefinite matrix.
    //
    // Given
    // -----
    // - A = [[1, 1], [1, 1]] (rank one).
    //
    // Expect
    // ------
    // - Factorization fails at zero jitter and succeeds with 1e-6 added to
    //   the diagonal.
    fn jitter_rescues_singular_matrix() {
        // Arrange
        let a = array![[1.0, 1.0], [1.0, 1.0]];

        // Act + Assert
        assert!(PdFactor::new(&a, 0.0).is_none());
        assert!(PdFactor::new(&a, 1e-6).is_some());
    }

    #[test]
    // Purpose
    // -------
    // Verify that `factor_all` reports the index of the first failing
    // matrix.
    //
    // Given
    // -----
    // - A positive-definite matrix followed by an indefinite one.
    //
    // Expect
    // ------
    // - `Err(1)` identifying the second matrix.
    fn factor_all_reports_failing_index() {
        // Arrange
        let good = array![[2.0, 0.0], [0.0, 2.0]];
        let bad = array![[1.0, 2.0], [2.0, 1.0]];

        // Act
        let result = factor_all(&[good, bad], 0.0);

        // Assert
        assert_eq!(result.err(), Some(1));
    }
}
