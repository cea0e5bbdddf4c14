//! mixture::errors — error taxonomy for mixture construction and inference.
//!
//! Purpose
//! -------
//! Define the crate's mixture-side error enum and result alias. Variants
//! split into construction-time validation errors (bad data shapes, bad
//! hyperparameters), assignment-state errors (malformed optimizer input),
//! numeric failures (Cholesky breakdown inside a bound evaluation, with
//! cluster and matrix context), and configuration errors (cluster count
//! pruned to zero).
//!
//! Conventions
//! -----------
//! - Variants are struct-like and carry the offending values; `reason`
//!   fields are `&'static str` snippets completing the message.
//! - Construction errors are fatal: no partially valid model object exists
//!   after one is raised.
//! - Numeric failures are fatal for the evaluation that hit them and are
//!   never internally retried.
//!
//! Downstream usage
//! ----------------
//! - All `mixture` constructors and operations return
//!   [`MixtureResult<T>`].
//! - `optimization::errors::OptError` implements `From<MixtureError>` so
//!   bound evaluations can surface these through the optimizer boundary.

/// Result alias for mixture operations.
pub type MixtureResult<T> = Result<T, MixtureError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MixtureError {
    // ---- Data validation ----
    /// A data container was constructed without any rows or columns.
    EmptyData {
        what: &'static str,
    },

    /// A data entry was NaN or infinite.
    NonFiniteData {
        what: &'static str,
        row: usize,
        col: usize,
    },

    /// Paired arrays disagree on the number of rows.
    RowCountMismatch {
        x_rows: usize,
        y_rows: usize,
    },

    /// The input and observation series lists have different lengths.
    SeriesCountMismatch {
        num_x: usize,
        num_y: usize,
    },

    /// One series' time and value arrays have different lengths.
    SeriesLengthMismatch {
        series: usize,
        x_len: usize,
        y_len: usize,
    },

    /// A vector or matrix has the wrong extent along one axis.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    // ---- Configuration ----
    /// The requested cluster count was zero.
    ZeroClusters,

    /// The supplied kernel list does not match the cluster count.
    KernelCountMismatch {
        num_kernels: usize,
        num_clusters: usize,
    },

    /// Dirichlet/DP concentration must be finite and > 0.
    InvalidConcentration {
        value: f64,
    },

    /// Observation noise variance must be finite and > 0.
    InvalidNoiseVariance {
        value: f64,
    },

    /// Normal-Inverse-Wishart precision scalar must be finite and > 0.
    InvalidPriorKappa {
        value: f64,
    },

    /// Normal-Inverse-Wishart degrees of freedom must be finite and at
    /// least the data dimension.
    InvalidPriorDof {
        value: f64,
        min: f64,
    },

    /// Normal-Inverse-Wishart scale matrix failed validation.
    InvalidPriorScale {
        reason: &'static str,
    },

    /// A kernel hyperparameter must be finite and > 0.
    InvalidKernelParam {
        name: &'static str,
        value: f64,
    },

    /// Prune threshold must be finite and non-negative.
    InvalidPruneThreshold {
        value: f64,
    },

    /// A variational parameter failed validation.
    InvalidVariationalParam {
        reason: &'static str,
    },

    /// A cluster index was at or beyond the current cluster count.
    ClusterIndexOutOfRange {
        index: usize,
        num_clusters: usize,
    },

    // ---- Assignment state ----
    /// Flattened logits have the wrong length for the current N×K state.
    ThetaLengthMismatch {
        expected: usize,
        found: usize,
    },

    /// A flattened logit entry was NaN or infinite.
    NonFiniteTheta {
        index: usize,
        value: f64,
    },

    /// A logit matrix has the wrong shape for the current state.
    LambdaShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    /// A responsibility row is not a probability vector.
    InvalidResponsibilityRow {
        row: usize,
        reason: &'static str,
    },

    // ---- Numeric failures ----
    /// Cholesky factorization failed during a bound or prediction
    /// evaluation. Fatal for that evaluation; never retried internally.
    CholeskyFailure {
        cluster: usize,
        matrix: &'static str,
    },

    // ---- Cluster management ----
    /// Pruning would remove every remaining cluster.
    ClustersExhausted,
}

impl std::error::Error for MixtureError {}

impl std::fmt::Display for MixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data validation ----
            MixtureError::EmptyData { what } => {
                write!(f, "Empty data: {what} has no entries")
            }
            MixtureError::NonFiniteData { what, row, col } => {
                write!(f, "Non-finite entry in {what} at ({row}, {col})")
            }
            MixtureError::RowCountMismatch { x_rows, y_rows } => {
                write!(f, "Row count mismatch: inputs have {x_rows} rows, observations {y_rows}")
            }
            MixtureError::SeriesCountMismatch { num_x, num_y } => {
                write!(f, "Series count mismatch: {num_x} input series, {num_y} observation series")
            }
            MixtureError::SeriesLengthMismatch { series, x_len, y_len } => {
                write!(
                    f,
                    "Series {series} length mismatch: {x_len} time points, {y_len} observations"
                )
            }
            MixtureError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}")
            }

            // ---- Configuration ----
            MixtureError::ZeroClusters => {
                write!(f, "Cluster count must be at least 1")
            }
            MixtureError::KernelCountMismatch { num_kernels, num_clusters } => {
                write!(f, "Kernel count mismatch: {num_kernels} kernels for {num_clusters} clusters")
            }
            MixtureError::InvalidConcentration { value } => {
                write!(f, "Invalid concentration alpha: {value}, must be finite and > 0")
            }
            MixtureError::InvalidNoiseVariance { value } => {
                write!(f, "Invalid noise variance: {value}, must be finite and > 0")
            }
            MixtureError::InvalidPriorKappa { value } => {
                write!(f, "Invalid prior kappa: {value}, must be finite and > 0")
            }
            MixtureError::InvalidPriorDof { value, min } => {
                write!(f, "Invalid prior degrees of freedom: {value}, must be finite and >= {min}")
            }
            MixtureError::InvalidPriorScale { reason } => {
                write!(f, "Invalid prior scale matrix: {reason}")
            }
            MixtureError::InvalidKernelParam { name, value } => {
                write!(f, "Invalid kernel parameter {name}: {value}, must be finite and > 0")
            }
            MixtureError::InvalidPruneThreshold { value } => {
                write!(f, "Invalid prune threshold: {value}, must be finite and non-negative")
            }
            MixtureError::InvalidVariationalParam { reason } => {
                write!(f, "Invalid variational parameter: {reason}")
            }
            MixtureError::ClusterIndexOutOfRange { index, num_clusters } => {
                write!(f, "Cluster index {index} out of range for {num_clusters} clusters")
            }

            // ---- Assignment state ----
            MixtureError::ThetaLengthMismatch { expected, found } => {
                write!(f, "Theta length mismatch: expected {expected}, found {found}")
            }
            MixtureError::NonFiniteTheta { index, value } => {
                write!(f, "Non-finite theta entry at index {index}: {value}")
            }
            MixtureError::LambdaShapeMismatch {
                expected_rows,
                expected_cols,
                found_rows,
                found_cols,
            } => {
                write!(
                    f,
                    "Logit matrix shape mismatch: expected {expected_rows}x{expected_cols}, \
                     found {found_rows}x{found_cols}"
                )
            }
            MixtureError::InvalidResponsibilityRow { row, reason } => {
                write!(f, "Invalid responsibility row {row}: {reason}")
            }

            // ---- Numeric failures ----
            MixtureError::CholeskyFailure { cluster, matrix } => {
                write!(f, "Cholesky factorization failed for cluster {cluster} ({matrix})")
            }

            // ---- Cluster management ----
            MixtureError::ClustersExhausted => {
                write!(f, "All clusters pruned; no valid mixture state remains")
            }
        }
    }
}
