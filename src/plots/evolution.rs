//! Time evolution of per-node densities as log-colored heatmaps.

use super::{labels, Render};
use crate::data::Tensor3;
use crate::error::{Error, Result};
use crate::figure::{Figure, Image};
use crate::scale::{nonsingular, ColorScale, LogNorm};
use crate::stats;
use crate::style::Style;

const PANEL_HEIGHT: f32 = 1.1;
const FIGURE_WIDTH: f32 = 3.0;

/// Stacked heatmaps of `p(X_k, t)`, one panel per node, sharing one log color scale.
///
/// Input is shaped (node, bin, time). Bin 0 sits at the bottom of each panel.
///
/// # Example
///
/// ```
/// use triadic_viz::data::Tensor3;
/// use triadic_viz::plots::{EvolutionPlot, Render};
///
/// let data = Tensor3::new((1..=24).map(|v| v as f32 / 24.0).collect(), [3, 4, 2]).unwrap();
/// let plot = EvolutionPlot::new(data, vec![-1.0, 0.0, 1.0, 2.0], vec![0.0, 5.0]);
/// assert_eq!(plot.color_range().unwrap(), (1.0 / 24.0, 1.0));
/// assert_eq!(plot.to_figure().unwrap().panel_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionPlot {
    data: Tensor3,
    values: Vec<f32>,
    times: Vec<f32>,
    style: Style,
}

impl EvolutionPlot {
    /// Densities over the value grid `values` (one per bin) and `times` (one per step).
    #[must_use]
    pub fn new(data: Tensor3, values: Vec<f32>, times: Vec<f32>) -> Self {
        Self { data, values, times, style: Style::publication() }
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
    /// Returns [`Error::EmptyData`] for an empty array, [`Error::ShapeMismatch`] when the
    /// grids do not match the bin or time axes, and [`Error::ScaleDomain`] when no density is
    /// positive or a grid has no finite value.
    pub fn build(self) -> Result<Self> {
        self.extent()?;
        self.norm()?;
        Ok(self)
    }

    /// Bounds of the shared log color scale: smallest positive density to largest density.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] when no density is positive.
    pub fn color_range(&self) -> Result<(f32, f32)> {
        let norm = self.norm()?;
        Ok((norm.vmin(), norm.vmax()))
    }

    fn norm(&self) -> Result<LogNorm> {
        LogNorm::from_data(self.data.as_slice())
    }

    fn extent(&self) -> Result<(f32, f32, f32, f32)> {
        let [nodes, bins, steps] = self.data.shape();
        if nodes == 0 || bins == 0 || steps == 0 {
            return Err(Error::EmptyData);
        }
        if self.values.len() != bins {
            return Err(Error::shape("x_grid", format!("{bins} bins"), self.values.len()));
        }
        if self.times.len() != steps {
            return Err(Error::shape("time_grid", format!("{steps} times"), self.times.len()));
        }

        // A single-entry grid becomes one unit-wide cell centered on it.
        let span = |grid: &[f32], name: &str| -> Result<(f32, f32)> {
            match stats::min_max(grid) {
                Some((lo, hi)) if lo < hi => Ok((lo, hi)),
                Some((lo, hi)) => Ok(nonsingular(lo - 0.5, hi + 0.5)),
                None => Err(Error::ScaleDomain(format!("{name} grid has no finite value"))),
            }
        };
        let (t0, t1) = span(&self.times, "time")?;
        let (x0, x1) = span(&self.values, "value")?;
        Ok((t0, t1, x0, x1))
    }
}

impl Render for EvolutionPlot {
    fn to_figure(&self) -> Result<Figure> {
        let extent = self.extent()?;
        let norm = self.norm()?;
        let colormap = ColorScale::inferno((0.0, 1.0))
            .ok_or_else(|| Error::Rendering("inferno colormap unavailable".into()))?;

        let [nodes, bins, steps] = self.data.shape();
        let mut fig = Figure::subplots(self.style.clone(), nodes, 1)?
            .size(FIGURE_WIDTH, PANEL_HEIGHT * nodes as f32);

        for (i, ax) in fig.panels_mut().iter_mut().enumerate() {
            let slab = self.data.slab(i).ok_or(Error::EmptyData)?;
            ax.add(Image::new(slab.to_vec(), bins, steps, extent, norm, colormap.clone())?);
            ax.set_ylabel(labels::node(i + 1));
            if i + 1 == nodes {
                ax.set_xlabel(labels::EVOLUTION_TIME);
            }
        }
        fig.add_colorbar(nodes - 1, labels::EVOLVING_PDF);

        tracing::debug!(
            nodes,
            bins,
            steps,
            vmin = norm.vmin(),
            vmax = norm.vmax(),
            "composed density evolution"
        );
        Ok(fig)
    }
}
