//! Input containers for the renderers.
//!
//! Estimator output arrives as plain row-major arrays. These types carry the shape alongside
//! the values so each renderer can validate it once, up front, and resolve the polymorphic
//! inputs (one dataset or many, one density curve or an ensemble of them, one comparator
//! function or several) into explicit variants.

use crate::error::{Error, Result};
use crate::stats;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Tensor3
// ============================================================================

/// Dense row-major 3-D array.
///
/// Timeseries use (node, time, sample); density evolution uses (node, bin, time).
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor3 {
    data: Vec<f32>,
    shape: [usize; 3],
}

impl Tensor3 {
    /// Wrap row-major data with its shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len()` is not the product of `shape`.
    pub fn new(data: Vec<f32>, shape: [usize; 3]) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(Error::shape(
                "data",
                format!("{expected} values for shape {shape:?}"),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self { data, shape })
    }

    /// Build from nested vectors indexed `[i][j][k]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the nesting is ragged.
    pub fn from_nested(nested: &[Vec<Vec<f32>>]) -> Result<Self> {
        let d1 = nested.first().map_or(0, Vec::len);
        let d2 = nested.first().and_then(|m| m.first()).map_or(0, Vec::len);

        let mut data = Vec::with_capacity(nested.len() * d1 * d2);
        for (i, matrix) in nested.iter().enumerate() {
            if matrix.len() != d1 {
                return Err(Error::shape("data", format!("{d1} rows in slab {i}"), matrix.len()));
            }
            for row in matrix {
                if row.len() != d2 {
                    let expected = format!("{d2} columns in slab {i}");
                    return Err(Error::shape("data", expected, row.len()));
                }
                data.extend_from_slice(row);
            }
        }
        Self::new(data, [nested.len(), d1, d2])
    }

    /// Array shape.
    #[must_use]
    pub const fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// All values in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at `[i][j][k]`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f32> {
        let [d0, d1, d2] = self.shape;
        if i >= d0 || j >= d1 || k >= d2 {
            return None;
        }
        Some(self.data[(i * d1 + j) * d2 + k])
    }

    /// The 2-D slab at first index `i`, row-major over the last two axes.
    #[must_use]
    pub fn slab(&self, i: usize) -> Option<&[f32]> {
        let stride = self.shape[1] * self.shape[2];
        (i < self.shape[0]).then(|| &self.data[i * stride..(i + 1) * stride])
    }

    /// Values along the middle axis for fixed first and last indices.
    #[must_use]
    pub fn fiber(&self, i: usize, k: usize) -> Vec<f32> {
        (0..self.shape[1]).filter_map(|j| self.get(i, j, k)).collect()
    }
}

// ============================================================================
// SampleMatrix
// ============================================================================

/// Dense row-major 2-D array.
///
/// For density and conditional-statistic ensembles, rows are grid bins and columns are
/// repeated estimates. Covariance input is sample rows by matrix-entry columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl SampleMatrix {
    /// Wrap row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::shape(
                "data",
                format!("{} values for {rows}x{cols}", rows * cols),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from a vector of equally long rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::shape("data", format!("{cols} columns in row {i}"), row.len()));
        }
        Self::new(rows.concat(), rows.len(), cols)
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        (i < self.rows).then(|| &self.data[i * self.cols..(i + 1) * self.cols])
    }

    /// Column `j` as an owned vector.
    #[must_use]
    pub fn column(&self, j: usize) -> Option<Vec<f32>> {
        (j < self.cols).then(|| self.data.iter().skip(j).step_by(self.cols).copied().collect())
    }

    fn reduce_rows(&self, reduce: impl Fn(&[f32]) -> Option<f32>) -> Vec<f32> {
        self.data
            .chunks_exact(self.cols.max(1))
            .take(self.rows)
            .map(|row| reduce(row).unwrap_or(f32::NAN))
            .collect()
    }

    /// Mean of each row (NaN propagates).
    #[must_use]
    pub fn row_means(&self) -> Vec<f32> {
        self.reduce_rows(stats::mean)
    }

    /// Mean of each row ignoring NaN entries; all-NaN rows yield NaN.
    #[must_use]
    pub fn row_nanmeans(&self) -> Vec<f32> {
        self.reduce_rows(stats::nanmean)
    }

    /// Standard error of each row's mean.
    #[must_use]
    pub fn row_standard_errors(&self) -> Vec<f32> {
        self.reduce_rows(stats::standard_error)
    }
}

// ============================================================================
// Estimate
// ============================================================================

/// A statistic evaluated on a grid: one curve, or an ensemble of repeated estimates.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// One value per grid point.
    Single(Vec<f32>),
    /// Bins by repeated estimates.
    Ensemble(SampleMatrix),
}

impl Estimate {
    /// Number of grid points covered.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(values) => values.len(),
            Self::Ensemble(matrix) => matrix.rows(),
        }
    }

    /// Whether the estimate covers no grid points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there is more than one repeated estimate to average over.
    ///
    /// A one-column ensemble counts as a single curve.
    #[must_use]
    pub fn is_ensemble(&self) -> bool {
        matches!(self, Self::Ensemble(matrix) if matrix.cols() > 1)
    }

    /// Values to plot: the ensemble mean, or the curve itself.
    #[must_use]
    pub fn point_estimate(&self, ignore_nan: bool) -> Vec<f32> {
        match self {
            Self::Single(values) => values.clone(),
            Self::Ensemble(matrix) if matrix.cols() == 1 => matrix.data.clone(),
            Self::Ensemble(matrix) if ignore_nan => matrix.row_nanmeans(),
            Self::Ensemble(matrix) => matrix.row_means(),
        }
    }

    /// Standard error of the ensemble mean per grid point; `None` for a single curve.
    #[must_use]
    pub fn standard_errors(&self) -> Option<Vec<f32>> {
        match self {
            Self::Ensemble(matrix) if matrix.cols() > 1 => Some(matrix.row_standard_errors()),
            _ => None,
        }
    }

    /// Number of repeated estimates (1 for a single curve).
    #[must_use]
    pub fn sample_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Ensemble(matrix) => matrix.cols(),
        }
    }
}

impl From<Vec<f32>> for Estimate {
    fn from(values: Vec<f32>) -> Self {
        Self::Single(values)
    }
}

impl From<SampleMatrix> for Estimate {
    fn from(matrix: SampleMatrix) -> Self {
        Self::Ensemble(matrix)
    }
}

// ============================================================================
// OneOrMany
// ============================================================================

/// One dataset (single-panel layout) or a collection (one panel or column per dataset).
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    /// A single dataset.
    One(T),
    /// Several datasets.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// The datasets as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    /// Whether this is the collection variant.
    #[must_use]
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Number of datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

// ============================================================================
// Curves
// ============================================================================

type CurveFn = dyn Fn(f32) -> f32 + Send + Sync;

/// A comparator function evaluated on grid points, with an optional legend label.
#[derive(Clone)]
pub struct Curve {
    func: Arc<CurveFn>,
    label: Option<String>,
}

impl Curve {
    /// Wrap a function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        Self { func: Arc::new(func), label: None }
    }

    /// Attach a legend label.
    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Legend label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Evaluate at one point.
    #[must_use]
    pub fn eval(&self, x: f32) -> f32 {
        (self.func)(x)
    }

    /// Evaluate at every grid point.
    #[must_use]
    pub fn sample(&self, grid: &[f32]) -> Vec<f32> {
        grid.iter().map(|&x| self.eval(x)).collect()
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curve").field("label", &self.label).finish_non_exhaustive()
    }
}

/// How comparator curves are assigned to panels.
#[derive(Debug, Clone, Default)]
pub enum CurveSet {
    /// No curves.
    #[default]
    None,
    /// The same curve on every panel.
    Shared(Curve),
    /// One curve per panel, in panel order. Curves may carry their own labels.
    PerPanel(Vec<Curve>),
    /// One named curve per panel, in panel order; the name becomes the legend label.
    Labeled(Vec<(String, Curve)>),
}

impl CurveSet {
    /// Whether any curve is present.
    #[must_use]
    pub const fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Assign curves to `panels` panels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when a per-panel list has the wrong length and
    /// [`Error::CurveCountMismatch`] when a labeled set does.
    pub fn resolve(&self, panels: usize, argument: &'static str) -> Result<Vec<Option<Curve>>> {
        match self {
            Self::None => Ok(vec![None; panels]),
            Self::Shared(curve) => Ok(vec![Some(curve.clone()); panels]),
            Self::PerPanel(curves) => {
                if curves.len() != panels {
                    return Err(Error::shape(argument, format!("{panels} curves"), curves.len()));
                }
                Ok(curves.iter().cloned().map(Some).collect())
            }
            Self::Labeled(named) => {
                if named.len() != panels {
                    return Err(Error::CurveCountMismatch {
                        argument,
                        expected: panels,
                        actual: named.len(),
                    });
                }
                Ok(named
                    .iter()
                    .map(|(name, curve)| Some(curve.clone().labeled(name.clone())))
                    .collect())
            }
        }
    }
}

impl From<Curve> for CurveSet {
    fn from(curve: Curve) -> Self {
        Self::Shared(curve)
    }
}

impl From<Vec<Curve>> for CurveSet {
    fn from(curves: Vec<Curve>) -> Self {
        Self::PerPanel(curves)
    }
}

// ============================================================================
// NodeOrder
// ============================================================================

/// Node indices `(i, j, k)` naming a conditional statistic of `X_i`, `X_j` given `X_k`.
///
/// Used only for axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeOrder(pub [usize; 3]);

impl NodeOrder {
    /// Create an order triple.
    #[must_use]
    pub const fn new(i: usize, j: usize, k: usize) -> Self {
        Self([i, j, k])
    }

    /// The `n`-th conditioned node (0 or 1).
    #[must_use]
    pub const fn target(&self, n: usize) -> usize {
        self.0[if n == 0 { 0 } else { 1 }]
    }

    /// The conditioning node.
    #[must_use]
    pub const fn condition(&self) -> usize {
        self.0[2]
    }
}

impl From<(usize, usize, usize)> for NodeOrder {
    fn from((i, j, k): (usize, usize, usize)) -> Self {
        Self::new(i, j, k)
    }
}
