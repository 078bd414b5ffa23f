//! Node trajectories over time.

use super::{labels, Layout, Render};
use crate::color::Rgba;
use crate::data::{Curve, SampleMatrix, Tensor3};
use crate::error::{Error, Result};
use crate::figure::{Figure, Line};
use crate::render::LineDash;
use crate::stats;
use crate::style::{LegendLoc, Style};

/// Plot of simulated trajectories, shaped (node, timestep, sample).
///
/// # Example
///
/// ```
/// use triadic_viz::data::Tensor3;
/// use triadic_viz::plots::{Layout, Render, TimeseriesPlot};
///
/// let data = Tensor3::new(vec![0.5; 2 * 50 * 3], [2, 50, 3]).unwrap();
/// let fig = TimeseriesPlot::new(data, 10.0).layout(Layout::Combined).to_figure().unwrap();
/// assert_eq!(fig.axes(0).unwrap().lines().count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct TimeseriesPlot {
    data: Tensor3,
    t_max: f32,
    samples: Option<usize>,
    layout: Layout,
    theory: Option<Curve>,
    style: Style,
}

impl TimeseriesPlot {
    /// Trajectories sampled uniformly over `[0, t_max]`.
    #[must_use]
    pub fn new(data: Tensor3, t_max: f32) -> Self {
        Self {
            data,
            t_max,
            samples: None,
            layout: Layout::Combined,
            theory: None,
            style: Style::publication(),
        }
    }

    /// Plot only the first `n` samples (default: all).
    #[must_use]
    pub fn samples(mut self, n: usize) -> Self {
        self.samples = Some(n);
        self
    }

    /// Overlay all nodes or give each its own panel.
    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Comparator trajectory, drawn on the first panel of the separated layout.
    #[must_use]
    pub fn theory(mut self, curve: Curve) -> Self {
        self.theory = Some(curve);
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
    /// Returns [`Error::EmptyData`] for an empty array, [`Error::ScaleDomain`] for a
    /// non-positive duration, and [`Error::SampleCountOutOfRange`] when more samples are
    /// requested than the array holds.
    pub fn build(self) -> Result<Self> {
        self.sample_count()?;
        Ok(self)
    }

    fn sample_count(&self) -> Result<usize> {
        let [nodes, steps, available] = self.data.shape();
        if nodes == 0 || steps == 0 || available == 0 {
            return Err(Error::EmptyData);
        }
        if !(self.t_max.is_finite() && self.t_max > 0.0) {
            let message = format!("duration must be positive, got {}", self.t_max);
            return Err(Error::ScaleDomain(message));
        }
        match self.samples {
            Some(requested) if requested > available => {
                Err(Error::SampleCountOutOfRange { requested, available })
            }
            Some(requested) => Ok(requested),
            None => Ok(available),
        }
    }

    /// Time of each step: `linspace(0, t_max, timesteps)`.
    #[must_use]
    pub fn time_grid(&self) -> Vec<f32> {
        stats::linspace(0.0, self.t_max, self.data.shape()[1])
    }

    fn combined(&self, samples: usize, time: &[f32]) -> Result<Figure> {
        let nodes = self.data.shape()[0];
        let mut fig = Figure::new(self.style.clone());
        let ax = &mut fig.panels_mut()[0];

        for i in 0..samples {
            for n in 0..nodes {
                let line = Line::new(time.to_vec(), self.data.fiber(n, i))?
                    .alpha(0.5)
                    .label(format!("node {}, sample# {}", n + 1, i + 1));
                ax.add(line);
            }
        }
        ax.set_xlabel(labels::TRAJECTORY_TIME);
        ax.set_ylabel(labels::ANY_NODE);
        ax.set_xlim(0.0, self.t_max);
        ax.legend(LegendLoc::OutsideRight);
        Ok(fig)
    }

    fn separated(&self, samples: usize, time: &[f32]) -> Result<Figure> {
        let [nodes, steps, available] = self.data.shape();
        let mut fig = Figure::subplots(self.style.clone(), nodes, 1)?.size(4.0, 5.0);

        for (n, ax) in fig.panels_mut().iter_mut().enumerate() {
            for i in 0..samples {
                let line = Line::new(time.to_vec(), self.data.fiber(n, i))?
                    .alpha(0.5)
                    .label(format!("node {}, sample# {}", n + 1, i + 1));
                ax.add(line);
            }

            let slab = self.data.slab(n).ok_or(Error::EmptyData)?;
            let average = SampleMatrix::new(slab.to_vec(), steps, available)?.row_means();
            ax.add(
                Line::new(time.to_vec(), average)?
                    .color(Rgba::BLACK)
                    .dash(LineDash::Dashed)
                    .alpha(0.5)
                    .label(format!("node {} average", n + 1)),
            );

            if n == 0 {
                if let Some(theory) = &self.theory {
                    ax.add(
                        Line::new(time.to_vec(), theory.sample(time))?
                            .color(Rgba::RED)
                            .dash(LineDash::DashDot)
                            .label(labels::NO_TRIADIC),
                    );
                }
            }

            ax.set_ylabel(labels::node(n + 1));
            ax.set_xlim(0.0, self.t_max);
            if n + 1 == nodes {
                ax.set_xlabel(labels::TRAJECTORY_TIME);
            }
        }
        Ok(fig)
    }
}

impl Render for TimeseriesPlot {
    fn to_figure(&self) -> Result<Figure> {
        let samples = self.sample_count()?;
        let time = self.time_grid();
        match self.layout {
            Layout::Combined => self.combined(samples, &time),
            Layout::Separated => self.separated(samples, &time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(nodes: usize, steps: usize, samples: usize) -> Tensor3 {
        let data = (0..nodes * steps * samples).map(|v| v as f32).collect();
        Tensor3::new(data, [nodes, steps, samples]).unwrap()
    }

    #[test]
    fn test_combined_layout() {
        let fig = TimeseriesPlot::new(ramp(2, 50, 3), 10.0).to_figure().unwrap();
        let ax = fig.axes(0).unwrap();

        assert_eq!(fig.panel_count(), 1);
        assert_eq!(ax.lines().count(), 6);
        assert_eq!(ax.xlim(), Some((0.0, 10.0)));
        assert_eq!(ax.legend_loc(), Some(LegendLoc::OutsideRight));
        assert_eq!(ax.legend_labels()[0], "node 1, sample# 1");
        assert_eq!(ax.legend_labels()[1], "node 2, sample# 1");
    }

    #[test]
    fn test_time_grid_spans_duration() {
        let plot = TimeseriesPlot::new(ramp(1, 5, 1), 2.0);
        assert_eq!(plot.time_grid(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_sample_count_limits() {
        let plot = TimeseriesPlot::new(ramp(2, 4, 3), 1.0).samples(1);
        assert_eq!(plot.to_figure().unwrap().axes(0).unwrap().lines().count(), 2);

        let err = TimeseriesPlot::new(ramp(2, 4, 3), 1.0).samples(4).build().unwrap_err();
        assert!(matches!(err, Error::SampleCountOutOfRange { requested: 4, available: 3 }));
    }

    #[test]
    fn test_invalid_duration() {
        assert!(TimeseriesPlot::new(ramp(1, 4, 1), 0.0).build().is_err());
        assert!(TimeseriesPlot::new(ramp(1, 4, 1), f32::NAN).build().is_err());
    }

    #[test]
    fn test_separated_layout() {
        let fig = TimeseriesPlot::new(ramp(3, 10, 2), 5.0)
            .layout(Layout::Separated)
            .theory(Curve::new(|t| t * 0.1))
            .to_figure()
            .unwrap();

        assert_eq!(fig.panel_count(), 3);
        assert_eq!(fig.size_inches(), (4.0, 5.0));

        let first = fig.axes(0).unwrap();
        assert_eq!(first.lines().count(), 4);
        assert!(first.legend_labels().contains(&"no TI"));
        assert_eq!(first.ylabel(), Some("X₁"));
        assert_eq!(first.xlabel(), None);

        let last = fig.axes(2).unwrap();
        assert_eq!(last.lines().count(), 3);
        assert_eq!(last.xlabel(), Some("T"));

        let average = last.lines().find(|l| l.legend_label() == Some("node 3 average")).unwrap();
        assert_eq!(average.dash_style(), LineDash::Dashed);
    }

    #[test]
    fn test_separated_average_uses_all_samples() {
        let data = Tensor3::new(vec![1.0, 3.0, 5.0, 7.0], [1, 2, 2]).unwrap();
        let plot = TimeseriesPlot::new(data, 1.0).samples(1).layout(Layout::Separated);
        let fig = plot.to_figure().unwrap();
        let average = fig.axes(0).unwrap().lines().last().unwrap();
        assert_eq!(average.y(), &[2.0, 6.0]);
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeseries.png");
        TimeseriesPlot::new(ramp(2, 20, 2), 4.0).save(&path).unwrap();
        assert!(path.exists());
    }
}
