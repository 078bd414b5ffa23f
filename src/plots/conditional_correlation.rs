//! Conditional correlation `ρ(X_i, X_j | X_k)` against the conditioning node.

use super::{error_bars, grid_extent, labels, open_markers, reference_line, warn_missing, Render};
use crate::color::Rgba;
use crate::data::{Curve, CurveSet, Estimate, NodeOrder, OneOrMany};
use crate::error::{Error, Result};
use crate::figure::{Axes, Figure, Scatter, VLine};
use crate::render::LineDash;
use crate::style::{LegendLoc, Style};

const SUPPLEMENT_LABEL: &str = "supplement";

/// One conditional correlation estimate on its grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPanel {
    grid: Vec<f32>,
    estimate: Estimate,
    order: NodeOrder,
    std: Option<Vec<f32>>,
    x_range: Option<(f32, f32)>,
}

impl CorrelationPanel {
    /// A single correlation curve or a bin-by-sample ensemble for the triple `order`.
    pub fn new(grid: Vec<f32>, estimate: impl Into<Estimate>, order: impl Into<NodeOrder>) -> Self {
        Self { grid, estimate: estimate.into(), order: order.into(), std: None, x_range: None }
    }

    /// Error bar half-heights for a single curve. Ignored for ensembles.
    #[must_use]
    pub fn std(mut self, std: Vec<f32>) -> Self {
        self.std = Some(std);
        self
    }

    /// Explicit x range (default: grid extent).
    #[must_use]
    pub fn x_range(mut self, lo: f32, hi: f32) -> Self {
        self.x_range = Some((lo, hi));
        self
    }

    fn validate(&self) -> Result<()> {
        if self.grid.is_empty() {
            return Err(Error::EmptyData);
        }
        if self.estimate.len() != self.grid.len() {
            let expected = format!("{} bins", self.grid.len());
            return Err(Error::shape("cond_corr", expected, self.estimate.len()));
        }
        if let Some(std) = &self.std {
            if std.len() != self.grid.len() {
                return Err(Error::shape("std", format!("{} bins", self.grid.len()), std.len()));
            }
        }
        if let Some((lo, hi)) = self.x_range {
            if !(lo < hi) {
                return Err(Error::ScaleDomain(format!("x range [{lo}, {hi}] is empty")));
            }
        }
        Ok(())
    }
}

/// Conditional correlation panels.
///
/// Several panels are laid out in one row with the correlation axis fixed to [-1, 1]; a
/// single panel autoscales. Ensembles are averaged ignoring NaN bins.
#[derive(Debug, Clone)]
pub struct ConditionalCorrelationPlot {
    panels: OneOrMany<CorrelationPanel>,
    theory: CurveSet,
    supplement: CurveSet,
    threshold: Option<f32>,
    style: Style,
}

impl ConditionalCorrelationPlot {
    /// Plot one or several correlation estimates.
    #[must_use]
    pub fn new(panels: OneOrMany<CorrelationPanel>) -> Self {
        Self {
            panels,
            theory: CurveSet::None,
            supplement: CurveSet::None,
            threshold: None,
            style: Style::publication(),
        }
    }

    /// Comparator curves without triadic interactions, dashed black.
    #[must_use]
    pub fn theory(mut self, theory: impl Into<CurveSet>) -> Self {
        self.theory = theory.into();
        self
    }

    /// Additional reference curves, dash-dot black.
    ///
    /// Unlabeled curves are labeled "supplement". A [`CurveSet::Labeled`] set must hold
    /// exactly one curve per panel.
    #[must_use]
    pub fn supplement(mut self, supplement: impl Into<CurveSet>) -> Self {
        self.supplement = supplement.into();
        self
    }

    /// Dotted vertical marker at `x` on every panel.
    #[must_use]
    pub fn threshold(mut self, x: f32) -> Self {
        self.threshold = Some(x);
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
    /// Returns [`Error::EmptyData`] without panels or with an empty grid,
    /// [`Error::ShapeMismatch`] for estimate or std lengths that differ from the grid and
    /// curve lists of the wrong length, [`Error::CurveCountMismatch`] for a labeled
    /// supplement of the wrong size, and [`Error::ScaleDomain`] for an empty x range.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.panels.is_empty() {
            return Err(Error::EmptyData);
        }
        for panel in self.panels.as_slice() {
            panel.validate()?;
        }
        self.theory.resolve(self.panels.len(), "theory")?;
        self.supplement.resolve(self.panels.len(), "f_supplement")?;
        Ok(())
    }

    fn draw(
        &self,
        ax: &mut Axes,
        index: usize,
        panel: &CorrelationPanel,
        theory: Option<&Curve>,
        supplement: Option<&Curve>,
    ) -> Result<()> {
        let points = panel.estimate.point_estimate(true);
        warn_missing(&points, index);

        if panel.estimate.is_ensemble() {
            ax.add(Scatter::new(panel.grid.clone(), points)?.filled(Rgba::RED));
        } else {
            ax.add(open_markers(&panel.grid, points.clone())?);
            if let Some(std) = &panel.std {
                ax.add(error_bars(&panel.grid, points, std.clone())?);
            }
        }

        if let Some(curve) = theory {
            ax.add(reference_line(&panel.grid, curve, LineDash::Dashed, labels::NO_TRIADIC)?);
        }
        if let Some(curve) = supplement {
            let label = curve.label().unwrap_or(SUPPLEMENT_LABEL);
            ax.add(reference_line(&panel.grid, curve, LineDash::DashDot, label)?);
        }
        if let Some(x) = self.threshold {
            ax.add(VLine::new(x).dash(LineDash::Dotted));
        }

        let (lo, hi) = match panel.x_range {
            Some(range) => range,
            None => grid_extent(&panel.grid)?,
        };
        ax.set_xlim(lo, hi);
        if self.panels.is_many() {
            ax.set_ylim(-1.0, 1.0);
        }

        let [i, j, k] = panel.order.0;
        ax.set_xlabel(labels::node(k));
        ax.set_ylabel(labels::conditional_correlation(i, j, k));
        if !ax.legend_labels().is_empty() {
            ax.legend(LegendLoc::LowerRight);
        }
        Ok(())
    }
}

impl Render for ConditionalCorrelationPlot {
    fn to_figure(&self) -> Result<Figure> {
        self.validate()?;
        let panels = self.panels.as_slice();
        let theory = self.theory.resolve(panels.len(), "theory")?;
        let supplement = self.supplement.resolve(panels.len(), "f_supplement")?;

        let mut fig = if self.panels.is_many() {
            let n = panels.len();
            Figure::subplots(self.style.clone(), 1, n)?.size(2.5 * n as f32, 2.5)
        } else {
            Figure::new(self.style.clone())
        };

        for (i, (ax, panel)) in fig.panels_mut().iter_mut().zip(panels).enumerate() {
            self.draw(ax, i, panel, theory[i].as_ref(), supplement[i].as_ref())?;
        }
        Ok(fig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleMatrix;

    fn grid() -> Vec<f32> {
        vec![-1.0, -0.5, 0.0, 0.5, 1.0]
    }

    fn single(order: (usize, usize, usize)) -> CorrelationPanel {
        CorrelationPanel::new(grid(), vec![0.1, 0.2, 0.3, 0.2, 0.1], order)
    }

    #[test]
    fn test_many_panels_fix_correlation_range() {
        let panels = OneOrMany::Many(vec![single((1, 2, 3)), single((2, 3, 1)).x_range(-2.0, 2.0)]);
        let fig = ConditionalCorrelationPlot::new(panels).to_figure().unwrap();

        assert_eq!(fig.grid(), (1, 2));
        assert_eq!(fig.size_inches(), (5.0, 2.5));
        let first = fig.axes(0).unwrap();
        assert_eq!(first.ylim(), Some((-1.0, 1.0)));
        assert_eq!(first.xlim(), Some((-1.0, 1.0)));
        assert_eq!(first.ylabel(), Some("ρ(X₁, X₂ | X₃)"));
        assert_eq!(fig.axes(1).unwrap().xlim(), Some((-2.0, 2.0)));
        assert_eq!(fig.axes(1).unwrap().xlabel(), Some("X₁"));
        assert!(first.legend_loc().is_none());
    }

    #[test]
    fn test_ensemble_nanmean_filled_markers() {
        let m = SampleMatrix::from_rows(&[
            vec![0.2, 0.4],
            vec![f32::NAN, 0.5],
            vec![0.0, 0.0],
            vec![-0.2, -0.4],
            vec![0.1, 0.3],
        ])
        .unwrap();
        let panel = CorrelationPanel::new(grid(), m, (1, 2, 3)).std(vec![0.1; 5]);
        let panels = OneOrMany::Many(vec![panel]);
        let fig = ConditionalCorrelationPlot::new(panels).to_figure().unwrap();
        let ax = fig.axes(0).unwrap();

        let points = ax.scatters().next().unwrap();
        assert!(!points.is_open());
        assert!((points.y()[0] - 0.3).abs() < 1e-6);
        assert_eq!(points.y()[1], 0.5);
        assert_eq!(ax.error_bars().count(), 0);
    }

    #[test]
    fn test_single_with_std_and_references() {
        let panel = single((1, 2, 3)).std(vec![0.05; 5]);
        let fig = ConditionalCorrelationPlot::new(OneOrMany::One(panel))
            .theory(Curve::new(|_| 0.0))
            .supplement(Curve::new(|x| x * 0.5))
            .threshold(0.25)
            .to_figure()
            .unwrap();
        let ax = fig.axes(0).unwrap();

        assert!(ax.scatters().next().unwrap().is_open());
        assert_eq!(ax.error_bars().count(), 1);
        assert_eq!(ax.legend_labels(), vec!["no TI", "supplement"]);
        assert_eq!(ax.lines().nth(1).unwrap().dash_style(), LineDash::DashDot);
        assert_eq!(ax.vlines().next().unwrap().position(), 0.25);
        assert_eq!(ax.legend_loc(), Some(LegendLoc::LowerRight));
        assert_eq!(ax.ylim(), None);
    }

    #[test]
    fn test_labeled_supplement() {
        let panels = OneOrMany::Many(vec![single((1, 2, 3)), single((2, 3, 1))]);
        let named = CurveSet::Labeled(vec![
            ("linear".into(), Curve::new(|x| x)),
            ("flat".into(), Curve::new(|_| 0.5)),
        ]);
        let fig =
            ConditionalCorrelationPlot::new(panels.clone()).supplement(named).to_figure().unwrap();
        assert_eq!(fig.axes(1).unwrap().legend_labels(), vec!["flat"]);

        let short = CurveSet::Labeled(vec![("only".into(), Curve::new(|x| x))]);
        let err = ConditionalCorrelationPlot::new(panels).supplement(short).build().unwrap_err();
        assert!(matches!(err, Error::CurveCountMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_per_panel_supplement_keeps_curve_labels() {
        let panels = OneOrMany::Many(vec![single((1, 2, 3)), single((2, 3, 1))]);
        let supplement = vec![Curve::new(|x| x), Curve::new(|x| -x).labeled("mirror")];
        let fig =
            ConditionalCorrelationPlot::new(panels).supplement(supplement).to_figure().unwrap();
        assert_eq!(fig.axes(0).unwrap().legend_labels(), vec!["supplement"]);
        assert_eq!(fig.axes(1).unwrap().legend_labels(), vec!["mirror"]);
    }

    #[test]
    fn test_validation() {
        let bad = CorrelationPanel::new(grid(), vec![0.0; 3], (1, 2, 3));
        assert!(matches!(
            ConditionalCorrelationPlot::new(OneOrMany::One(bad)).build(),
            Err(Error::ShapeMismatch { argument: "cond_corr", .. })
        ));

        let bad_std = single((1, 2, 3)).std(vec![0.1; 2]);
        assert!(ConditionalCorrelationPlot::new(OneOrMany::One(bad_std)).build().is_err());

        let bad_range = single((1, 2, 3)).x_range(1.0, 1.0);
        assert!(matches!(
            ConditionalCorrelationPlot::new(OneOrMany::One(bad_range)).build(),
            Err(Error::ScaleDomain(_))
        ));
    }

    #[test]
    fn test_single_bin_renders() {
        let panels = OneOrMany::Many(vec![
            CorrelationPanel::new(vec![0.0], vec![0.4], (1, 2, 3)),
            CorrelationPanel::new(
                vec![0.0],
                SampleMatrix::from_rows(&[vec![0.2, 0.6]]).unwrap(),
                (2, 3, 1),
            ),
        ]);
        let fig = ConditionalCorrelationPlot::new(panels).threshold(0.0).to_figure().unwrap();
        assert_eq!(fig.axes(0).unwrap().xlim(), Some((0.0, 0.0)));
        assert!(fig.to_framebuffer().is_ok());

        let one = CorrelationPanel::new(vec![0.0], vec![0.4], (1, 2, 3)).std(vec![0.1]);
        let fig = ConditionalCorrelationPlot::new(OneOrMany::One(one)).to_figure().unwrap();
        assert!(fig.to_svg().is_ok());
    }
}
