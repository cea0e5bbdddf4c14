//! Validated data containers for the mixture variants.
//!
//! Purpose
//! -------
//! Centralize input validation and the fixed product caches each variant
//! reads on every bound evaluation: a row-wise outer-product cache for the
//! Gaussian-Wishart variant, the YYᵀ Gram cache for the overlapping-GP
//! variant, and a list of validated (times, values) series for the
//! sparse-GP variant.
//!
//! Key behaviors
//! -------------
//! - [`VectorData`] holds an N×D observation matrix plus the per-row
//!   x_nx_nᵀ cache and exposes the responsibility-weighted scatter sum.
//! - [`PairedData`] holds matching input/observation matrices plus the
//!   YYᵀ cache.
//! - [`SeriesSet`] holds N independent series of possibly unequal length
//!   and the overall input range used for default inducing grids.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every container is non-empty and entirely finite after construction.
//! - Paired containers have matching row counts; each series has matching
//!   time/value lengths.
//! - Containers are immutable after construction; caches can never go
//!   stale.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy paths, each rejection (empty, non-finite,
//!   mismatched shapes), and the cache contents on small hand-checked
//!   inputs.
use crate::mixture::errors::{MixtureError, MixtureResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

pub(crate) fn check_finite(a: &ArrayView2<f64>, what: &'static str) -> MixtureResult<()> {
    for ((row, col), &v) in a.indexed_iter() {
        if !v.is_finite() {
            return Err(MixtureError::NonFiniteData { what, row, col });
        }
    }
    Ok(())
}

/// VectorData — validated N×D observations with a row outer-product cache.
///
/// Purpose
/// -------
/// Back the Gaussian-Wishart variant: the collapsed bound recomputes the
/// per-cluster scatter `Σ_n Φ[n,k]·x_nx_nᵀ` on every evaluation, so the
/// rank-one outer products are built once here.
///
/// Invariants
/// ----------
/// - At least one row and one column; all entries finite.
/// - `xxt[n]` equals `x_n·x_nᵀ` for every row `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorData {
    x: Array2<f64>,
    xxt: Vec<Array2<f64>>,
}

impl VectorData {
    /// Construct a validated container from raw observations.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Array2<f64>`
    ///   N×D observation matrix; must be non-empty with finite entries.
    ///
    /// Returns
    /// -------
    /// `MixtureResult<VectorData>`
    ///   The container with its outer-product cache built.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::EmptyData` when N or D is zero.
    /// - `MixtureError::NonFiniteData` naming the first offending entry.
    pub fn new(x: Array2<f64>) -> MixtureResult<VectorData> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(MixtureError::EmptyData { what: "observation matrix" });
        }
        check_finite(&x.view(), "observation matrix")?;
        let xxt = x
            .rows()
            .into_iter()
            .map(|row| {
                let col = row.insert_axis(Axis(1));
                col.dot(&col.t())
            })
            .collect();
        Ok(VectorData { x, xxt })
    }

    /// Observation matrix view.
    pub fn x(&self) -> ArrayView2<f64> {
        self.x.view()
    }

    /// Number of observations N.
    pub fn num_rows(&self) -> usize {
        self.x.nrows()
    }

    /// Observation dimension D.
    pub fn dim(&self) -> usize {
        self.x.ncols()
    }

    /// Column means of the observations, used for data-derived prior means.
    pub fn column_means(&self) -> Array1<f64> {
        self.x.sum_axis(Axis(0)) / self.x.nrows() as f64
    }

    /// Responsibility-weighted scatter `Σ_n w[n]·x_nx_nᵀ`.
    ///
    /// `w` must have length N; this is an internal contract of the bound
    /// evaluation, not re-validated here.
    pub fn weighted_scatter(&self, w: ArrayView1<f64>) -> Array2<f64> {
        let d = self.dim();
        let mut scatter = Array2::<f64>::zeros((d, d));
        for (wn, xxt) in w.iter().zip(self.xxt.iter()) {
            scatter.scaled_add(*wn, xxt);
        }
        scatter
    }
}

/// PairedData — one shared input domain with a multi-column observation
/// matrix and its YYᵀ cache, backing the overlapping-GP variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedData {
    x: Array2<f64>,
    y: Array2<f64>,
    yyt: Array2<f64>,
}

impl PairedData {
    /// Construct a validated container from paired inputs and observations.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Array2<f64>`
    ///   N×P input locations.
    /// - `y`: `Array2<f64>`
    ///   N×D observations at those locations.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::EmptyData` when either matrix has no entries.
    /// - `MixtureError::RowCountMismatch` when N disagrees.
    /// - `MixtureError::NonFiniteData` naming the first offending entry.
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> MixtureResult<PairedData> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(MixtureError::EmptyData { what: "input matrix" });
        }
        if y.nrows() == 0 || y.ncols() == 0 {
            return Err(MixtureError::EmptyData { what: "observation matrix" });
        }
        if x.nrows() != y.nrows() {
            return Err(MixtureError::RowCountMismatch { x_rows: x.nrows(), y_rows: y.nrows() });
        }
        check_finite(&x.view(), "input matrix")?;
        check_finite(&y.view(), "observation matrix")?;
        let yyt = y.dot(&y.t());
        Ok(PairedData { x, y, yyt })
    }

    /// Input locations view.
    pub fn x(&self) -> ArrayView2<f64> {
        self.x.view()
    }

    /// Observations view.
    pub fn y(&self) -> ArrayView2<f64> {
        self.y.view()
    }

    /// Cached `Y·Yᵀ` Gram matrix.
    pub fn yyt(&self) -> &Array2<f64> {
        &self.yyt
    }

    /// Number of shared input points N.
    pub fn num_points(&self) -> usize {
        self.x.nrows()
    }

    /// Input dimension P.
    pub fn input_dim(&self) -> usize {
        self.x.ncols()
    }

    /// Number of output columns D.
    pub fn output_dim(&self) -> usize {
        self.y.ncols()
    }
}

/// Series — one validated (times, values) pair of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Series {
    /// Observation times.
    pub fn x(&self) -> ArrayView1<f64> {
        self.x.view()
    }

    /// Observed values.
    pub fn y(&self) -> ArrayView1<f64> {
        self.y.view()
    }

    /// Number of observations in this series.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the series is empty. Construction rejects empty series, so
    /// this is always false for series inside a [`SeriesSet`].
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// SeriesSet — N independent (times, values) series of possibly unequal
/// length, backing the sparse-GP variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    series: Vec<Series>,
}

impl SeriesSet {
    /// Construct a validated series set from parallel time/value lists.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Vec<Array1<f64>>`
    ///   Observation times, one array per series.
    /// - `y`: `Vec<Array1<f64>>`
    ///   Observed values, one array per series, each matching its times in
    ///   length.
    ///
    /// Errors
    /// ------
    /// - `MixtureError::SeriesCountMismatch` when the lists disagree.
    /// - `MixtureError::EmptyData` when the lists or any series are empty.
    /// - `MixtureError::SeriesLengthMismatch` naming the first offending
    ///   series.
    /// - `MixtureError::NonFiniteData` naming the first offending entry.
    pub fn new(x: Vec<Array1<f64>>, y: Vec<Array1<f64>>) -> MixtureResult<SeriesSet> {
        if x.len() != y.len() {
            return Err(MixtureError::SeriesCountMismatch { num_x: x.len(), num_y: y.len() });
        }
        if x.is_empty() {
            return Err(MixtureError::EmptyData { what: "series list" });
        }
        let mut series = Vec::with_capacity(x.len());
        for (i, (xi, yi)) in x.into_iter().zip(y.into_iter()).enumerate() {
            if xi.len() != yi.len() {
                return Err(MixtureError::SeriesLengthMismatch {
                    series: i,
                    x_len: xi.len(),
                    y_len: yi.len(),
                });
            }
            if xi.is_empty() {
                return Err(MixtureError::EmptyData { what: "series" });
            }
            for (t, &v) in xi.iter().enumerate() {
                if !v.is_finite() {
                    return Err(MixtureError::NonFiniteData { what: "series times", row: i, col: t });
                }
            }
            for (t, &v) in yi.iter().enumerate() {
                if !v.is_finite() {
                    return Err(MixtureError::NonFiniteData {
                        what: "series values",
                        row: i,
                        col: t,
                    });
                }
            }
            series.push(Series { x: xi, y: yi });
        }
        Ok(SeriesSet { series })
    }

    /// Number of series N.
    pub fn num_series(&self) -> usize {
        self.series.len()
    }

    /// The validated series, in construction order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Smallest and largest observation time across all series.
    pub fn input_range(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for s in &self.series {
            for &t in s.x.iter() {
                lo = lo.min(t);
                hi = hi.max(t);
            }
        }
        (lo, hi)
    }
}
