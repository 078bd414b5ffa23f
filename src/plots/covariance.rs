//! Violin plot of sampled covariance matrix entries.

use super::{labels, Render};
use crate::color::{Rgba, COVARIANCE_PALETTE};
use crate::data::SampleMatrix;
use crate::error::{Error, Result};
use crate::figure::{Figure, Marker, Polygon, Scatter, Segments};
use crate::stats;
use crate::style::Style;

const DEFAULT_DIM: usize = 3;
const KDE_POINTS: usize = 100;
const VIOLIN_HALF_WIDTH: f32 = 0.25;
const VIOLIN_ALPHA: f32 = 0.3;
const MEDIAN_HALF_WIDTH: f32 = 0.075;

/// Distribution of each covariance matrix entry across samples.
///
/// Input rows are samples, columns are the `dim * dim` flattened matrix entries in row-major
/// order. Entry `k` is drawn at x position `k + 1`.
#[derive(Debug, Clone)]
pub struct CovariancePlot {
    samples: SampleMatrix,
    dim: usize,
    theory: Option<Vec<f32>>,
    style: Style,
}

/// Order statistics of one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Summary {
    mean: f32,
    min: f32,
    q1: f32,
    median: f32,
    q3: f32,
    max: f32,
}

impl Summary {
    fn of(values: &[f32]) -> Option<Self> {
        let sorted = stats::sorted_finite(values);
        let (min, max) = (*sorted.first()?, *sorted.last()?);
        Some(Self {
            mean: stats::mean(&sorted)?,
            min,
            q1: stats::percentile(&sorted, 25.0),
            median: stats::percentile(&sorted, 50.0),
            q3: stats::percentile(&sorted, 75.0),
            max,
        })
    }
}

impl CovariancePlot {
    /// Plot samples of a flattened 3x3 covariance matrix.
    #[must_use]
    pub fn new(samples: SampleMatrix) -> Self {
        Self { samples, dim: DEFAULT_DIM, theory: None, style: Style::publication() }
    }

    /// Matrix dimension; the sample matrix must have `dim * dim` columns.
    #[must_use]
    pub fn dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Expected entries without triadic interactions, drawn as red crosses.
    #[must_use]
    pub fn theory(mut self, entries: Vec<f32>) -> Self {
        self.theory = Some(entries);
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
    /// Returns [`Error::ShapeMismatch`] when the column count is not `dim * dim` or the theory
    /// vector has the wrong length, and [`Error::EmptyData`] without samples.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    fn entries(&self) -> usize {
        self.dim * self.dim
    }

    fn validate(&self) -> Result<()> {
        let entries = self.entries();
        if entries == 0 || self.samples.cols() != entries {
            return Err(Error::shape(
                "cov",
                format!("{entries} columns for a {0}x{0} matrix", self.dim),
                self.samples.cols(),
            ));
        }
        if self.samples.rows() == 0 {
            return Err(Error::EmptyData);
        }
        if let Some(theory) = &self.theory {
            if theory.len() != entries {
                return Err(Error::shape("theory", format!("{entries} entries"), theory.len()));
            }
        }
        Ok(())
    }

    /// Left and right outline of the density of `values`, centered on `x`.
    fn violin(values: &[f32], x: f32) -> Option<Vec<(f32, f32)>> {
        let (lo, hi) = stats::min_max(values)?;
        let grid = stats::linspace(lo, hi, KDE_POINTS);
        let density = stats::gaussian_kde(values, &grid)?;
        let peak = density.iter().copied().fold(0.0_f32, f32::max);
        if peak <= 0.0 {
            return None;
        }

        let scale = VIOLIN_HALF_WIDTH / peak;
        let right = grid.iter().zip(&density).map(|(&y, &d)| (x + d * scale, y));
        let left = grid.iter().zip(&density).rev().map(|(&y, &d)| (x - d * scale, y));
        Some(right.chain(left).collect())
    }
}

impl Render for CovariancePlot {
    fn to_figure(&self) -> Result<Figure> {
        self.validate()?;
        let entries = self.entries();
        let positions: Vec<f32> = (1..=entries).map(|k| k as f32).collect();

        let mut fig = Figure::new(self.style.clone());
        let ax = &mut fig.panels_mut()[0];

        let mut summaries = Vec::with_capacity(entries);
        for (k, &x) in positions.iter().enumerate() {
            let column = self.samples.column(k).ok_or(Error::EmptyData)?;
            match Self::violin(&column, x) {
                Some(outline) => {
                    let fill = COVARIANCE_PALETTE[k % COVARIANCE_PALETTE.len()].fade(VIOLIN_ALPHA);
                    ax.add(Polygon::new(outline, fill).edge(Rgba::BLACK, 0.5));
                }
                None => tracing::warn!(entry = k, "entry has no spread; violin body skipped"),
            }
            let summary = Summary::of(&column).ok_or(Error::EmptyData)?;
            summaries.push(summary);
        }

        let pick = |f: fn(&Summary) -> f32| summaries.iter().map(f).collect::<Vec<f32>>();
        let (q1, q3) = (pick(|s| s.q1), pick(|s| s.q3));
        let (min, max) = (pick(|s| s.min), pick(|s| s.max));
        let median = pick(|s| s.median);
        let left: Vec<f32> = positions.iter().map(|x| x - MEDIAN_HALF_WIDTH).collect();
        let right: Vec<f32> = positions.iter().map(|x| x + MEDIAN_HALF_WIDTH).collect();

        let means = Scatter::new(positions.clone(), pick(|s| s.mean))?
            .marker(Marker::Dot)
            .filled(Rgba::WHITE)
            .size(2.0);
        ax.add_with_zorder(means, 3);

        let quartiles = Segments::vertical(&positions, &q1, &q3)?.color(Rgba::GRAY).width(3.0);
        let whiskers = Segments::vertical(&positions, &min, &max)?.color(Rgba::GRAY).width(0.75);
        let medians = Segments::horizontal(&median, &left, &right)?.color(Rgba::BLACK).width(0.5);
        ax.add_with_zorder(quartiles, 2);
        ax.add_with_zorder(whiskers, 2);
        ax.add_with_zorder(medians, 2);

        if let Some(theory) = &self.theory {
            ax.add_with_zorder(
                Scatter::new(positions.clone(), theory.clone())?
                    .marker(Marker::Cross)
                    .filled(Rgba::RED)
                    .label(labels::NO_TRIADIC),
                4,
            );
            ax.legend(self.style.legend_loc);
        }

        let ticks = (0..entries)
            .map(|k| (positions[k], labels::covariance_entry(k / self.dim + 1, k % self.dim + 1)))
            .collect();
        ax.set_xticks(ticks);
        ax.set_xlabel(labels::COVARIANCE_INDEX);
        ax.set_ylabel(labels::COVARIANCE);
        Ok(fig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::LegendLoc;

    fn samples(rows: usize, cols: usize) -> SampleMatrix {
        let data =
            (0..rows * cols).map(|v| ((v * 37) % 101) as f32 / 100.0 + (v % cols) as f32).collect();
        SampleMatrix::new(data, rows, cols).unwrap()
    }

    #[test]
    fn test_nine_violins() {
        let fig = CovariancePlot::new(samples(40, 9)).to_figure().unwrap();
        let ax = fig.axes(0).unwrap();

        assert_eq!(ax.polygons().count(), 9);
        assert_eq!(ax.segments().count(), 3);
        assert!(ax.segments().all(|s| s.len() == 9));
        assert_eq!(ax.xticks().unwrap()[1].1, "Σ₁₂");
        assert_eq!(ax.xticks().unwrap()[8].0, 9.0);
        assert_eq!(ax.xlabel(), Some("(i, j)"));
        assert!(ax.legend_loc().is_none());
    }

    #[test]
    fn test_palette_cycles_with_larger_dim() {
        let fig = CovariancePlot::new(samples(30, 16)).dim(4).to_figure().unwrap();
        let polygons: Vec<_> = fig.axes(0).unwrap().polygons().collect();
        assert_eq!(polygons.len(), 16);
        assert_eq!(polygons[9].fill_color(), polygons[0].fill_color());
    }

    #[test]
    fn test_wrong_entry_count() {
        let err = CovariancePlot::new(samples(10, 4)).build().unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { argument: "cov", .. }));
        assert!(CovariancePlot::new(samples(10, 4)).dim(2).build().is_ok());
    }

    #[test]
    fn test_theory_markers() {
        let theory = vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let fig = CovariancePlot::new(samples(20, 9)).theory(theory).to_figure().unwrap();
        let ax = fig.axes(0).unwrap();

        let cross = ax.scatters().find(|s| s.marker_shape() == Marker::Cross).unwrap();
        assert_eq!(cross.legend_label(), Some("no TI"));
        assert_eq!(ax.legend_loc(), Some(LegendLoc::Best));
        assert!(ax.artists().iter().any(|(z, a)| *z == 4 && a.label() == Some("no TI")));

        assert!(CovariancePlot::new(samples(20, 9)).theory(vec![0.0; 3]).build().is_err());
    }

    #[test]
    fn test_constant_entry_skips_violin() {
        let mut rows = vec![vec![0.0; 4]; 10];
        for (i, row) in rows.iter_mut().enumerate() {
            row[1] = i as f32;
            row[2] = (i * i) as f32;
            row[3] = 1.0 - i as f32;
        }
        let samples = SampleMatrix::from_rows(&rows).unwrap();
        let fig = CovariancePlot::new(samples).dim(2).to_figure().unwrap();
        assert_eq!(fig.axes(0).unwrap().polygons().count(), 3);
    }

    #[test]
    fn test_summary_quartiles() {
        let s = Summary::of(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (1.0, 2.0, 3.0, 4.0, 5.0));
        assert_eq!(s.mean, 3.0);
    }

    #[test]
    fn test_legend_follows_style() {
        let style = Style { legend_loc: LegendLoc::LowerRight, ..Style::publication() };
        let plot = CovariancePlot::new(samples(20, 9)).theory(vec![0.0; 9]).style(style);
        let fig = plot.to_figure().unwrap();
        assert_eq!(fig.axes(0).unwrap().legend_loc(), Some(LegendLoc::LowerRight));
    }
}
