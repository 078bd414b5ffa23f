//! Conditional mutual information `I(X_i; X_j | X_k)`.

use super::{error_bars, grid_extent, labels, open_markers, reference_line, warn_missing, Render};
use crate::data::{CurveSet, Estimate, NodeOrder, OneOrMany};
use crate::error::{Error, Result};
use crate::figure::Figure;
use crate::render::LineDash;
use crate::style::Style;

/// One mutual information estimate on its grid.
#[derive(Debug, Clone, PartialEq)]
pub struct InformationPanel {
    grid: Vec<f32>,
    estimate: Estimate,
    order: NodeOrder,
}

impl InformationPanel {
    /// A single curve or a bin-by-sample ensemble for the triple `order`.
    pub fn new(grid: Vec<f32>, estimate: impl Into<Estimate>, order: impl Into<NodeOrder>) -> Self {
        Self { grid, estimate: estimate.into(), order: order.into() }
    }
}

/// Conditional mutual information panels; several panels share the y range.
#[derive(Debug, Clone)]
pub struct MutualInformationPlot {
    panels: OneOrMany<InformationPanel>,
    theory: CurveSet,
    show_error: bool,
    style: Style,
}

impl MutualInformationPlot {
    /// Plot one or several estimates.
    #[must_use]
    pub fn new(panels: OneOrMany<InformationPanel>) -> Self {
        Self { panels, theory: CurveSet::None, show_error: false, style: Style::publication() }
    }

    /// Comparator curves without triadic interactions.
    #[must_use]
    pub fn theory(mut self, theory: impl Into<CurveSet>) -> Self {
        self.theory = theory.into();
        self
    }

    /// Draw standard-error bars for ensembles.
    #[must_use]
    pub fn show_error(mut self, show: bool) -> Self {
        self.show_error = show;
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
    /// Returns [`Error::EmptyData`] without panels or with an empty grid, and
    /// [`Error::ShapeMismatch`] when an estimate does not match its grid or the theory list
    /// has the wrong length.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.panels.is_empty() {
            return Err(Error::EmptyData);
        }
        for panel in self.panels.as_slice() {
            if panel.grid.is_empty() {
                return Err(Error::EmptyData);
            }
            if panel.estimate.len() != panel.grid.len() {
                let expected = format!("{} bins", panel.grid.len());
                return Err(Error::shape("cmi", expected, panel.estimate.len()));
            }
        }
        self.theory.resolve(self.panels.len(), "theory")?;
        Ok(())
    }
}

impl Render for MutualInformationPlot {
    fn to_figure(&self) -> Result<Figure> {
        self.validate()?;
        let panels = self.panels.as_slice();
        let theory = self.theory.resolve(panels.len(), "theory")?;

        let mut fig = if self.panels.is_many() {
            let n = panels.len();
            Figure::subplots(self.style.clone(), 1, n)?.size(2.5 * n as f32, 2.5).share_y(true)
        } else {
            Figure::new(self.style.clone())
        };

        for (i, (ax, panel)) in fig.panels_mut().iter_mut().zip(panels).enumerate() {
            let points = panel.estimate.point_estimate(false);
            warn_missing(&points, i);

            ax.add(open_markers(&panel.grid, points.clone())?);
            if self.show_error {
                if let Some(se) = panel.estimate.standard_errors() {
                    ax.add(error_bars(&panel.grid, points, se)?);
                }
            }

            if let Some(curve) = &theory[i] {
                ax.add(reference_line(&panel.grid, curve, LineDash::Dashed, labels::NO_TRIADIC)?);
                ax.legend(self.style.legend_loc);
            }

            let (lo, hi) = grid_extent(&panel.grid)?;
            ax.set_xlim(lo, hi);
            let [a, b, k] = panel.order.0;
            ax.set_xlabel(labels::node(k));
            ax.set_ylabel(labels::mutual_information(a, b, k));
        }
        Ok(fig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::LegendLoc;
    use crate::data::{Curve, SampleMatrix};

    fn ensemble() -> SampleMatrix {
        SampleMatrix::from_rows(&[vec![0.1, 0.3], vec![0.2, 0.2], vec![0.05, 0.15]]).unwrap()
    }

    #[test]
    fn test_many_panels_share_y() {
        let grid = vec![0.0, 1.0, 2.0];
        let panels = OneOrMany::Many(vec![
            InformationPanel::new(grid.clone(), ensemble(), (1, 2, 3)),
            InformationPanel::new(grid.clone(), vec![0.5, 0.6, 0.7], (2, 3, 1)),
        ]);
        let fig = MutualInformationPlot::new(panels).to_figure().unwrap();

        assert!(fig.shares_y());
        assert_eq!(fig.size_inches(), (5.0, 2.5));
        assert_eq!(fig.axes(0).unwrap().ylabel(), Some("I(X₁; X₂ | X₃)"));
        assert_eq!(fig.axes(1).unwrap().xlabel(), Some("X₁"));
        assert_eq!(fig.axes(1).unwrap().xlim(), Some((0.0, 2.0)));

        let limits = fig.panel_limits();
        assert_eq!(limits[0].1, limits[1].1);
    }

    #[test]
    fn test_error_bars_only_when_requested() {
        let grid = vec![0.0, 1.0, 2.0];
        let panel = || OneOrMany::One(InformationPanel::new(grid.clone(), ensemble(), (1, 2, 3)));

        let plain = MutualInformationPlot::new(panel()).to_figure().unwrap();
        assert_eq!(plain.axes(0).unwrap().error_bars().count(), 0);

        let with_error = MutualInformationPlot::new(panel()).show_error(true).to_figure().unwrap();
        let ax = with_error.axes(0).unwrap();
        let bars = ax.error_bars().next().unwrap();
        assert_eq!(bars.yerr(), ensemble().row_standard_errors().as_slice());
        assert!(ax.scatters().next().unwrap().is_open());
        assert!((ax.scatters().next().unwrap().y()[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_theory_legend() {
        let grid = vec![0.0, 1.0, 2.0];
        let panels = OneOrMany::Many(vec![
            InformationPanel::new(grid.clone(), vec![0.1; 3], (1, 2, 3)),
            InformationPanel::new(grid, vec![0.2; 3], (2, 3, 1)),
        ]);
        let fig =
            MutualInformationPlot::new(panels).theory(Curve::new(|_| 0.0)).to_figure().unwrap();
        for ax in fig.panels() {
            assert_eq!(ax.legend_labels(), vec!["no TI"]);
            assert_eq!(ax.lines().next().unwrap().dash_style(), LineDash::Dashed);
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let panel = InformationPanel::new(vec![0.0, 1.0], vec![0.1], (1, 2, 3));
        let err = MutualInformationPlot::new(OneOrMany::One(panel)).build().unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { argument: "cmi", .. }));
    }

    #[test]
    fn test_near_zero_estimates_render() {
        let panel = InformationPanel::new(vec![0.0, 1.0, 2.0], vec![1e-9, 2e-9, 3e-9], (1, 2, 3));
        let fig = MutualInformationPlot::new(OneOrMany::One(panel)).to_figure().unwrap();
        assert!(fig.to_framebuffer().is_ok());
    }

    #[test]
    fn test_single_bin_renders() {
        let panels = OneOrMany::Many(vec![
            InformationPanel::new(vec![0.5], vec![0.2], (1, 2, 3)),
            InformationPanel::new(
                vec![0.5],
                SampleMatrix::from_rows(&[vec![0.1, 0.3]]).unwrap(),
                (2, 3, 1),
            ),
        ]);
        let fig = MutualInformationPlot::new(panels)
            .show_error(true)
            .theory(Curve::new(|_| 0.0))
            .to_figure()
            .unwrap();
        assert!(fig.to_framebuffer().is_ok());
        assert!(fig.to_svg().is_ok());
    }

    #[test]
    fn test_legend_follows_style() {
        let panel = InformationPanel::new(vec![0.0, 1.0], vec![0.1, 0.2], (1, 2, 3));
        let style = Style { legend_loc: LegendLoc::LowerRight, ..Style::publication() };
        let fig = MutualInformationPlot::new(OneOrMany::One(panel))
            .theory(Curve::new(|_| 0.0))
            .style(style)
            .to_figure()
            .unwrap();
        assert_eq!(fig.axes(0).unwrap().legend_loc(), Some(LegendLoc::LowerRight));
    }
}
