//! Conditional expectations `E[X_a | X_c]` of the two conditioned nodes.

use super::{error_bars, labels, open_markers, reference_line, warn_missing, Render};
use crate::data::{Curve, CurveSet, NodeOrder, OneOrMany};
use crate::error::{Error, Result};
use crate::figure::{Axes, Figure};
use crate::render::LineDash;
use crate::style::Style;

/// Expectations of both conditioned nodes of one order triple, on a shared grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationColumn {
    grid: Vec<f32>,
    expectations: [Vec<f32>; 2],
    stds: [Vec<f32>; 2],
    order: NodeOrder,
    samples: Option<usize>,
}

impl ExpectationColumn {
    /// `expectations[n]` and `stds[n]` belong to node `order.target(n)`, conditioned on
    /// `order.condition()`.
    pub fn new(
        grid: Vec<f32>,
        expectations: [Vec<f32>; 2],
        stds: [Vec<f32>; 2],
        order: impl Into<NodeOrder>,
    ) -> Self {
        Self { grid, expectations, stds, order: order.into(), samples: None }
    }

    /// Number of samples behind each standard deviation (default: the std row length).
    #[must_use]
    pub fn samples(mut self, n: usize) -> Self {
        self.samples = Some(n);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.grid.is_empty() {
            return Err(Error::EmptyData);
        }
        let bins = self.grid.len();
        for n in 0..2 {
            if self.expectations[n].len() != bins {
                let actual = self.expectations[n].len();
                return Err(Error::shape("cond_exps", format!("{bins} bins"), actual));
            }
            if self.stds[n].len() != bins {
                return Err(Error::shape("stds", format!("{bins} bins"), self.stds[n].len()));
            }
        }
        if self.samples == Some(0) {
            return Err(Error::shape("samples", "at least one sample", 0));
        }
        Ok(())
    }

    /// Standard errors for node `n`: std divided by the square root of the sample count.
    fn standard_errors(&self, n: usize) -> Vec<f32> {
        let count = self.samples.unwrap_or(self.stds[n].len()) as f32;
        self.stds[n].iter().map(|s| s / count.sqrt()).collect()
    }
}

/// Conditional expectation panels.
///
/// A single column yields a 1 x 2 figure; several columns yield a 2 x N grid with one column
/// per order triple and one row per conditioned node.
#[derive(Debug, Clone)]
pub struct ConditionalExpectationPlot {
    columns: OneOrMany<ExpectationColumn>,
    theory: CurveSet,
    style: Style,
}

impl ConditionalExpectationPlot {
    /// Plot one or several expectation columns.
    #[must_use]
    pub fn new(columns: OneOrMany<ExpectationColumn>) -> Self {
        Self { columns, theory: CurveSet::None, style: Style::publication() }
    }

    /// Comparator curves, resolved over all panels in column-pair order: for column `c` and
    /// node `n`, index `2 * c + n`.
    #[must_use]
    pub fn theory(mut self, theory: impl Into<CurveSet>) -> Self {
        self.theory = theory.into();
        self
    }

    /// Set the presentation style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] without columns or with an empty grid, and
    /// [`Error::ShapeMismatch`] when value or std rows differ from the grid length or the
    /// theory list does not cover every panel.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::EmptyData);
        }
        for column in self.columns.as_slice() {
            column.validate()?;
        }
        self.theory.resolve(2 * self.columns.len(), "theory")?;
        Ok(())
    }

    fn draw(
        &self,
        ax: &mut Axes,
        column: &ExpectationColumn,
        n: usize,
        theory: Option<&Curve>,
    ) -> Result<()> {
        let values = &column.expectations[n];
        warn_missing(values, n);

        ax.add(open_markers(&column.grid, values.clone())?);
        ax.add(error_bars(&column.grid, values.clone(), column.standard_errors(n))?);
        let order = column.order;
        ax.set_ylabel(labels::conditional_expectation(order.target(n), order.condition()));

        if let Some(curve) = theory {
            ax.add(reference_line(&column.grid, curve, LineDash::Dashed, labels::NO_TRIADIC)?);
            ax.legend(self.style.legend_loc);
        }
        Ok(())
    }
}

impl Render for ConditionalExpectationPlot {
    fn to_figure(&self) -> Result<Figure> {
        self.validate()?;
        let columns = self.columns.as_slice();
        let theory = self.theory.resolve(2 * columns.len(), "theory")?;

        let mut fig = if self.columns.is_many() {
            let n = columns.len();
            Figure::subplots(self.style.clone(), 2, n)?.size(2.5 * n as f32, 5.0)
        } else {
            Figure::subplots(self.style.clone(), 1, 2)?.size(6.0, 3.0)
        };
        let ncols = fig.grid().1;

        for (c, column) in columns.iter().enumerate() {
            for n in 0..2 {
                let panel = if self.columns.is_many() { n * ncols + c } else { n };
                let ax = fig.axes_mut(panel).ok_or(Error::EmptyData)?;
                self.draw(ax, column, n, theory[2 * c + n].as_ref())?;

                if !self.columns.is_many() || n == 1 {
                    ax.set_xlabel(labels::node(column.order.condition()));
                }
            }
        }
        Ok(fig)
    }
}
