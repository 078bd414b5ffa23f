//! Stationary probability densities per node.

use super::{error_bars, grid_extent, labels, open_markers, warn_missing, Layout, Render};
use crate::color::Rgba;
use crate::data::{CurveSet, Estimate};
use crate::error::{Error, Result};
use crate::figure::{AxisScale, ErrorBars, Figure, Line, Scatter};
use crate::render::LineDash;
use crate::stats;
use crate::style::Style;

/// Number of points comparator densities are evaluated on.
pub const DEFAULT_THEORY_RESOLUTION: usize = 100;

/// One node's density estimate and the grid it was evaluated on.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfSeries {
    grid: Vec<f32>,
    estimate: Estimate,
}

impl PdfSeries {
    /// Pair a grid with a single density curve or a bin-by-sample ensemble.
    pub fn new(grid: Vec<f32>, estimate: impl Into<Estimate>) -> Self {
        Self { grid, estimate: estimate.into() }
    }

    /// Grid points.
    #[must_use]
    pub fn grid(&self) -> &[f32] {
        &self.grid
    }

    /// The estimate.
    #[must_use]
    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }
}

/// Density plot of one or more nodes, with optional theoretical densities.
#[derive(Debug, Clone)]
pub struct PdfPlot {
    series: Vec<PdfSeries>,
    theory: CurveSet,
    log_scale: bool,
    layout: Layout,
    theory_resolution: usize,
    style: Style,
}

impl PdfPlot {
    /// Plot the given per-node densities.
    #[must_use]
    pub fn new(series: Vec<PdfSeries>) -> Self {
        Self {
            series,
            theory: CurveSet::None,
            log_scale: false,
            layout: Layout::Combined,
            theory_resolution: DEFAULT_THEORY_RESOLUTION,
            style: Style::publication(),
        }
    }

    /// Theoretical densities, one per node (or one shared).
    #[must_use]
    pub fn theory(mut self, theory: impl Into<CurveSet>) -> Self {
        self.theory = theory.into();
        self
    }

    /// Use a logarithmic density axis. Error bars are omitted on log axes.
    #[must_use]
    pub fn log_scale(mut self, log: bool) -> Self {
        self.log_scale = log;
        self
    }

    /// Overlay all nodes or give each its own panel.
    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Number of points theoretical densities are evaluated on.
    #[must_use]
    pub fn theory_resolution(mut self, points: usize) -> Self {
        self.theory_resolution = points;
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
    /// Returns [`Error::EmptyData`] without series or with an empty grid, and
    /// [`Error::ShapeMismatch`] when a grid and its estimate differ in length, when the theory
    /// list does not have one curve per node, or when the theory resolution is below 2.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(Error::EmptyData);
        }
        for (i, series) in self.series.iter().enumerate() {
            if series.grid.is_empty() {
                return Err(Error::EmptyData);
            }
            if series.grid.len() != series.estimate.len() {
                return Err(Error::shape(
                    "probs",
                    format!("{} bins for node {}", series.grid.len(), i + 1),
                    series.estimate.len(),
                ));
            }
        }
        if self.theory.is_some() && self.theory_resolution < 2 {
            let points = self.theory_resolution;
            return Err(Error::shape("theory_resolution", "at least 2 points", points));
        }
        self.theory.resolve(self.series.len(), "theory")?;
        Ok(())
    }

    fn markers(&self, series: &PdfSeries, index: usize) -> Result<(Scatter, Option<ErrorBars>)> {
        let points = series.estimate.point_estimate(false);
        warn_missing(&points, index);
        if self.log_scale && points.iter().any(|p| *p <= 0.0) {
            tracing::warn!(series = index, "non-positive densities are masked on the log axis");
        }

        let errors = if self.log_scale { None } else { series.estimate.standard_errors() };
        let bars = errors.map(|se| error_bars(&series.grid, points.clone(), se)).transpose()?;
        Ok((open_markers(&series.grid, points)?, bars))
    }

    fn combined(&self) -> Result<Figure> {
        let theory = self.theory.resolve(self.series.len(), "theory")?;
        let mut fig = Figure::new(self.style.clone());

        let mut x_min = f32::INFINITY;
        let mut x_max = f32::NEG_INFINITY;
        for series in &self.series {
            let (lo, hi) = grid_extent(&series.grid)?;
            x_min = x_min.min(lo);
            x_max = x_max.max(hi);
        }

        let ax = &mut fig.panels_mut()[0];
        ax.set_xlabel(labels::ANY_NODE);
        ax.set_ylabel(labels::STATIONARY_PDF);
        ax.set_xlim(x_min, x_max);

        for (i, series) in self.series.iter().enumerate() {
            let (scatter, bars) = self.markers(series, i)?;
            ax.add(scatter.label(labels::node(i + 1)));
            if let Some(bars) = bars {
                ax.add(bars);
            }
        }

        let x_theory = stats::linspace(x_min, x_max, self.theory_resolution);
        for (i, curve) in theory.iter().enumerate() {
            if let Some(curve) = curve {
                ax.add(
                    Line::new(x_theory.clone(), curve.sample(&x_theory))?
                        .dash(LineDash::Dashed)
                        .label(format!("theory ({})", labels::node(i + 1))),
                );
            }
        }

        if self.log_scale {
            ax.set_y_scale(AxisScale::Log);
        }
        Ok(fig)
    }

    fn separated(&self) -> Result<Figure> {
        let n = self.series.len();
        let theory = self.theory.resolve(n, "theory")?;
        let mut fig =
            Figure::subplots(self.style.clone(), 1, n)?.size(n as f32 * 2.5, 2.5).share_y(true);

        for (i, (ax, series)) in fig.panels_mut().iter_mut().zip(&self.series).enumerate() {
            let (scatter, bars) = self.markers(series, i)?;
            ax.add(scatter);
            if let Some(bars) = bars {
                ax.add(bars);
            }

            let (lo, hi) = grid_extent(&series.grid)?;
            ax.set_xlabel(labels::node(i + 1));
            ax.set_xlim(lo, hi);
            if i == 0 {
                ax.set_ylabel(labels::STATIONARY_PDF);
            }
            if self.log_scale {
                ax.set_y_scale(AxisScale::Log);
            }

            if let Some(curve) = &theory[i] {
                let x_theory = stats::linspace(lo, hi, self.theory_resolution);
                ax.add(
                    Line::new(x_theory.clone(), curve.sample(&x_theory))?
                        .color(Rgba::BLACK)
                        .dash(LineDash::Dashed)
                        .label(labels::NO_TRIADIC),
                );
                ax.legend(self.style.legend_loc);
            }
        }
        Ok(fig)
    }
}

impl Render for PdfPlot {
    fn to_figure(&self) -> Result<Figure> {
        self.validate()?;
        match self.layout {
            Layout::Combined => self.combined(),
            Layout::Separated => self.separated(),
        }
    }
}
