//! Renderers for triadic-interaction simulation summaries.
//!
//! Each renderer is a builder over precomputed arrays: construct it with the required data,
//! adjust it with setters, validate with `build()`, then either inspect the composed
//! [`Figure`] through [`Render::to_figure`] or write one image file with [`Render::save`].

mod conditional_correlation;
mod conditional_expectation;
mod covariance;
mod evolution;
pub mod labels;
mod mutual_information;
mod pdf;
mod timeseries;

pub use conditional_correlation::{ConditionalCorrelationPlot, CorrelationPanel};
pub use conditional_expectation::{ConditionalExpectationPlot, ExpectationColumn};
pub use covariance::CovariancePlot;
pub use evolution::EvolutionPlot;
pub use mutual_information::{InformationPanel, MutualInformationPlot};
pub use pdf::{PdfPlot, PdfSeries};
pub use timeseries::TimeseriesPlot;

use crate::color::Rgba;
use crate::data::Curve;
use crate::error::{Error, Result};
use crate::figure::{ErrorBars, Figure, Line, Scatter};
use crate::render::LineDash;
use crate::stats;
use std::path::Path;

/// Something that can be composed into a [`Figure`] and written to disk.
pub trait Render {
    /// Compose the figure without writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input fails validation.
    fn to_figure(&self) -> Result<Figure>;

    /// Render and write one image file; the format follows the extension (`.png`, `.svg`).
    ///
    /// # Errors
    ///
    /// Returns an error if validation, rendering or writing fails.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>
    where
        Self: Sized,
    {
        self.to_figure()?.save(path)
    }
}

/// Panel arrangement for renderers that can overlay all nodes or split them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Every node on one panel.
    #[default]
    Combined,
    /// One panel per node.
    Separated,
}

// ============================================================================
// Shared drawing helpers
// ============================================================================

/// Smallest and largest finite grid value.
pub(crate) fn grid_extent(grid: &[f32]) -> Result<(f32, f32)> {
    stats::min_max(grid).ok_or(Error::EmptyData)
}

/// Hollow red circles, the marker used for every empirical estimate.
pub(crate) fn open_markers(x: &[f32], y: Vec<f32>) -> Result<Scatter> {
    Ok(Scatter::new(x.to_vec(), y)?.open(Rgba::RED))
}

/// Translucent red capped error bars.
pub(crate) fn error_bars(x: &[f32], y: Vec<f32>, yerr: Vec<f32>) -> Result<ErrorBars> {
    Ok(ErrorBars::new(x.to_vec(), y, yerr)?.color(Rgba::RED).alpha(0.5))
}

/// `curve` evaluated on `grid` as a black line.
pub(crate) fn reference_line(
    grid: &[f32],
    curve: &Curve,
    dash: LineDash,
    label: &str,
) -> Result<Line> {
    Ok(Line::new(grid.to_vec(), curve.sample(grid))?.color(Rgba::BLACK).dash(dash).label(label))
}

/// Warn once per series when estimates contain NaN bins, which are left out of the plot.
pub(crate) fn warn_missing(values: &[f32], series: usize) {
    let missing = values.iter().filter(|v| v.is_nan()).count();
    if missing > 0 {
        tracing::warn!(series, missing, "estimate has NaN bins; they are not drawn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_extent() {
        assert_eq!(grid_extent(&[3.0, -1.0, f32::NAN, 2.0]).unwrap(), (-1.0, 3.0));
        assert!(matches!(grid_extent(&[]), Err(Error::EmptyData)));
    }

    #[test]
    fn test_reference_line_samples_curve() {
        let curve = Curve::new(|x| 2.0 * x);
        let line = reference_line(&[0.0, 1.0, 2.0], &curve, LineDash::Dashed, "no TI").unwrap();
        assert_eq!(line.y(), &[0.0, 2.0, 4.0]);
        assert_eq!(line.legend_label(), Some("no TI"));
        assert_eq!(line.dash_style(), LineDash::Dashed);
    }

    #[test]
    fn test_open_markers_are_hollow() {
        let scatter = open_markers(&[0.0, 1.0], vec![0.5, 0.7]).unwrap();
        assert!(scatter.is_open());
        assert!(open_markers(&[0.0], vec![0.5, 0.7]).is_err());
    }
}
