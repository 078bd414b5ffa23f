//! A single plotting panel: its artists, limits, scales and labels.

use super::artist::{Artist, ErrorBars, Image, Line, Polygon, Scatter, Segments, VLine};
use crate::color::Rgba;
use crate::scale::nonsingular;
use crate::style::{LegendLoc, Style};

/// Fraction of the data span added on each side when autoscaling.
const MARGIN: f32 = 0.05;

/// Axis transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    /// Linear axis.
    #[default]
    Linear,
    /// Base-10 logarithmic axis.
    Log,
}

/// Axis limits as `((x_min, x_max), (y_min, y_max))`.
pub type Limits = ((f32, f32), (f32, f32));

/// One panel of a [`Figure`](super::Figure).
#[derive(Debug, Clone, Default)]
pub struct Axes {
    artists: Vec<(i32, Artist)>,
    xlim: Option<(f32, f32)>,
    ylim: Option<(f32, f32)>,
    y_scale: AxisScale,
    xlabel: Option<String>,
    ylabel: Option<String>,
    xticks: Option<Vec<(f32, String)>>,
    legend: Option<LegendLoc>,
}

impl Axes {
    /// Empty linear panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artist at its default stacking order.
    pub fn add(&mut self, artist: impl Into<Artist>) {
        let artist = artist.into();
        self.artists.push((artist.default_zorder(), artist));
    }

    /// Add an artist at an explicit stacking order.
    pub fn add_with_zorder(&mut self, artist: impl Into<Artist>, zorder: i32) {
        self.artists.push((zorder, artist.into()));
    }

    /// Fix the x range.
    pub fn set_xlim(&mut self, lo: f32, hi: f32) {
        self.xlim = Some((lo, hi));
    }

    /// Fix the y range.
    pub fn set_ylim(&mut self, lo: f32, hi: f32) {
        self.ylim = Some((lo, hi));
    }

    /// Set the y axis transform.
    pub fn set_y_scale(&mut self, scale: AxisScale) {
        self.y_scale = scale;
    }

    /// Set the x axis label.
    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = Some(label.into());
    }

    /// Set the y axis label.
    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = Some(label.into());
    }

    /// Replace automatic x ticks with labeled positions.
    pub fn set_xticks(&mut self, ticks: Vec<(f32, String)>) {
        self.xticks = Some(ticks);
    }

    /// Show a legend of the labeled artists.
    pub fn legend(&mut self, loc: LegendLoc) {
        self.legend = Some(loc);
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Artists with their stacking order, in insertion order.
    #[must_use]
    pub fn artists(&self) -> &[(i32, Artist)] {
        &self.artists
    }

    /// Curves on this panel.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.artists.iter().filter_map(|(_, a)| match a {
            Artist::Line(l) => Some(l),
            _ => None,
        })
    }

    /// Marker series on this panel.
    pub fn scatters(&self) -> impl Iterator<Item = &Scatter> {
        self.artists.iter().filter_map(|(_, a)| match a {
            Artist::Scatter(s) => Some(s),
            _ => None,
        })
    }

    /// Error bar series on this panel.
    pub fn error_bars(&self) -> impl Iterator<Item = &ErrorBars> {
        self.artists.iter().filter_map(|(_, a)| match a {
            Artist::ErrorBars(e) => Some(e),
            _ => None,
        })
    }

    /// Range-bar groups on this panel.
    pub fn segments(&self) -> impl Iterator<Item = &Segments> {
        self.artists.iter().filter_map(|(_, a)| match a {
            Artist::Segments(s) => Some(s),
            _ => None,
        })
    }

    /// Filled shapes on this panel.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.artists.iter().filter_map(|(_, a)| match a {
            Artist::Polygon(p) => Some(p),
            _ => None,
        })
    }

    /// Heatmaps on this panel.
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.artists.iter().filter_map(|(_, a)| match a {
            Artist::Image(i) => Some(i),
            _ => None,
        })
    }

    /// Vertical reference lines on this panel.
    pub fn vlines(&self) -> impl Iterator<Item = &VLine> {
        self.artists.iter().filter_map(|(_, a)| match a {
            Artist::VLine(v) => Some(v),
            _ => None,
        })
    }

    /// Explicit x range, if set.
    #[must_use]
    pub const fn xlim(&self) -> Option<(f32, f32)> {
        self.xlim
    }

    /// Explicit y range, if set.
    #[must_use]
    pub const fn ylim(&self) -> Option<(f32, f32)> {
        self.ylim
    }

    /// Y axis transform.
    #[must_use]
    pub const fn y_scale(&self) -> AxisScale {
        self.y_scale
    }

    /// X axis label.
    #[must_use]
    pub fn xlabel(&self) -> Option<&str> {
        self.xlabel.as_deref()
    }

    /// Y axis label.
    #[must_use]
    pub fn ylabel(&self) -> Option<&str> {
        self.ylabel.as_deref()
    }

    /// Explicit x ticks, if set.
    #[must_use]
    pub fn xticks(&self) -> Option<&[(f32, String)]> {
        self.xticks.as_deref()
    }

    /// Legend location, if a legend is shown.
    #[must_use]
    pub const fn legend_loc(&self) -> Option<LegendLoc> {
        self.legend
    }

    /// Labels of artists that appear in the legend, in insertion order.
    #[must_use]
    pub fn legend_labels(&self) -> Vec<&str> {
        self.artists.iter().filter_map(|(_, a)| a.label()).collect()
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Colors for each artist in insertion order, assigning cycle colors to unstyled lines.
    pub(crate) fn line_colors(&self, style: &Style) -> Vec<Option<Rgba>> {
        let mut next = 0;
        self.artists
            .iter()
            .map(|(_, artist)| match artist {
                Artist::Line(line) => Some(line.color.unwrap_or_else(|| {
                    let color = style.cycle_color(next);
                    next += 1;
                    color
                })),
                _ => None,
            })
            .collect()
    }

    /// Axis limits: explicit limits where set, otherwise the data extent plus margins.
    ///
    /// Images pin the limits to their extent. An axis without data gets `(0, 1)`, or
    /// `(1, 10)` when logarithmic.
    #[must_use]
    pub fn resolved_limits(&self) -> Limits {
        let (xs, ys) = self.data_points();
        let image_extent = self.images().map(Image::extent).reduce(|a, b| {
            (a.0.min(b.0), a.1.max(b.1), a.2.min(b.2), a.3.max(b.3))
        });

        let x = self.xlim.unwrap_or_else(|| match image_extent {
            Some((x0, x1, _, _)) => (x0, x1),
            None => autoscale(&xs, AxisScale::Linear),
        });
        let y = self.ylim.unwrap_or_else(|| match image_extent {
            Some((_, _, y0, y1)) => (y0, y1),
            None => autoscale(&ys, self.y_scale),
        });
        let y = match self.y_scale {
            AxisScale::Linear => nonsingular(y.0, y.1),
            AxisScale::Log => log_nonsingular(y),
        };
        (nonsingular(x.0, x.1), y)
    }

    fn data_points(&self) -> (Vec<f32>, Vec<f32>) {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for (_, artist) in &self.artists {
            match artist {
                Artist::Line(Line { x, y, .. }) | Artist::Scatter(Scatter { x, y, .. }) => {
                    xs.extend_from_slice(x);
                    ys.extend_from_slice(y);
                }
                Artist::ErrorBars(bars) => {
                    xs.extend_from_slice(&bars.x);
                    for (&y, &e) in bars.y.iter().zip(&bars.yerr) {
                        ys.push(y - e);
                        ys.push(y + e);
                    }
                }
                Artist::Segments(segs) => {
                    for &((x0, y0), (x1, y1)) in &segs.segments {
                        xs.extend([x0, x1]);
                        ys.extend([y0, y1]);
                    }
                }
                Artist::Polygon(poly) => {
                    for &(x, y) in &poly.points {
                        xs.push(x);
                        ys.push(y);
                    }
                }
                Artist::VLine(v) => xs.push(v.x),
                Artist::Image(_) => {}
            }
        }
        (xs, ys)
    }
}

fn autoscale(values: &[f32], scale: AxisScale) -> (f32, f32) {
    match scale {
        AxisScale::Linear => {
            let finite = values.iter().copied().filter(|v| v.is_finite());
            let Some((lo, hi)) = finite.fold(None, |acc: Option<(f32, f32)>, v| {
                Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
            }) else {
                return (0.0, 1.0);
            };
            let pad = (hi - lo) * MARGIN;
            (lo - pad, hi + pad)
        }
        AxisScale::Log => {
            let logs = values.iter().filter(|v| v.is_finite() && **v > 0.0).map(|v| v.log10());
            let Some((lo, hi)) = logs.fold(None, |acc: Option<(f32, f32)>, v| {
                Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
            }) else {
                return (1.0, 10.0);
            };
            let pad = if hi - lo <= f32::EPSILON { 0.5 } else { (hi - lo) * MARGIN };
            (10f32.powf(lo - pad), 10f32.powf(hi + pad))
        }
    }
}

/// Positive log limits that name a single value widen by half a decade each way.
fn log_nonsingular((lo, hi): (f32, f32)) -> (f32, f32) {
    if lo > 0.0 && hi > 0.0 && (hi.log10() - lo.log10()).abs() < f32::MIN_POSITIVE {
        let half_decade = 10f32.sqrt();
        return (lo.min(hi) / half_decade, lo.max(hi) * half_decade);
    }
    (lo, hi)
}
