//! Things that can be placed on a panel, in data coordinates.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::render::LineDash;
use crate::scale::{ColorScale, LogNorm, Scale};

fn check_lengths(x: &[f32], y: &[f32]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: y.len() });
    }
    Ok(())
}

// ============================================================================
// Line
// ============================================================================

/// A connected curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) color: Option<Rgba>,
    pub(crate) width: Option<f32>,
    pub(crate) dash: LineDash,
    pub(crate) alpha: f32,
    pub(crate) label: Option<String>,
}

impl Line {
    /// Create a line through `(x[i], y[i])`. Non-finite points break the line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if `x` and `y` differ in length.
    pub fn new(x: Vec<f32>, y: Vec<f32>) -> Result<Self> {
        check_lengths(&x, &y)?;
        Ok(Self { x, y, color: None, width: None, dash: LineDash::Solid, alpha: 1.0, label: None })
    }

    /// Set the color (default: next color of the style cycle).
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the width in points (default: style line width).
    #[must_use]
    pub fn width(mut self, points: f32) -> Self {
        self.width = Some(points);
        self
    }

    /// Set the dash pattern.
    #[must_use]
    pub fn dash(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Legend label, if any.
    #[must_use]
    pub fn legend_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Y values.
    #[must_use]
    pub fn y(&self) -> &[f32] {
        &self.y
    }

    /// X values.
    #[must_use]
    pub fn x(&self) -> &[f32] {
        &self.x
    }

    /// Dash pattern.
    #[must_use]
    pub fn dash_style(&self) -> LineDash {
        self.dash
    }

    /// Explicit color, if set.
    #[must_use]
    pub fn explicit_color(&self) -> Option<Rgba> {
        self.color
    }
}

// ============================================================================
// Scatter
// ============================================================================

/// Marker shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    /// `o`
    #[default]
    Circle,
    /// `x`
    Cross,
    /// `.`, a circle at half size
    Dot,
}

/// Unconnected markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) marker: Marker,
    pub(crate) face: Option<Rgba>,
    pub(crate) edge: Option<Rgba>,
    pub(crate) size: Option<f32>,
    pub(crate) label: Option<String>,
}

impl Scatter {
    /// Create filled circle markers at `(x[i], y[i])`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if `x` and `y` differ in length.
    pub fn new(x: Vec<f32>, y: Vec<f32>) -> Result<Self> {
        check_lengths(&x, &y)?;
        Ok(Self { x, y, marker: Marker::Circle, face: None, edge: None, size: None, label: None })
    }

    /// Set the marker shape.
    #[must_use]
    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    /// Filled markers in one color.
    #[must_use]
    pub fn filled(mut self, color: Rgba) -> Self {
        self.face = Some(color);
        self.edge = Some(color);
        self
    }

    /// Hollow markers with a colored edge.
    #[must_use]
    pub fn open(mut self, edge: Rgba) -> Self {
        self.face = None;
        self.edge = Some(edge);
        self
    }

    /// Set the marker diameter in points (default: style marker size).
    #[must_use]
    pub fn size(mut self, points: f32) -> Self {
        self.size = Some(points);
        self
    }

    /// Set the legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Legend label, if any.
    #[must_use]
    pub fn legend_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// X values.
    #[must_use]
    pub fn x(&self) -> &[f32] {
        &self.x
    }

    /// Y values.
    #[must_use]
    pub fn y(&self) -> &[f32] {
        &self.y
    }

    /// Marker shape.
    #[must_use]
    pub fn marker_shape(&self) -> Marker {
        self.marker
    }

    /// Whether the markers are hollow.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.face.is_none()
    }
}

// ============================================================================
// ErrorBars
// ============================================================================

/// Symmetric vertical error bars with caps.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBars {
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) yerr: Vec<f32>,
    pub(crate) color: Rgba,
    pub(crate) width: f32,
    pub(crate) cap: f32,
    pub(crate) alpha: f32,
}

impl ErrorBars {
    /// Bars from `y - yerr` to `y + yerr`, 1 pt wide with 2 pt caps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the three arrays differ in length.
    pub fn new(x: Vec<f32>, y: Vec<f32>, yerr: Vec<f32>) -> Result<Self> {
        check_lengths(&x, &y)?;
        check_lengths(&x, &yerr)?;
        Ok(Self { x, y, yerr, color: Rgba::RED, width: 1.0, cap: 2.0, alpha: 1.0 })
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Half-lengths of the bars.
    #[must_use]
    pub fn yerr(&self) -> &[f32] {
        &self.yerr
    }
}

// ============================================================================
// Segments
// ============================================================================

/// Independent straight segments (vertical or horizontal range bars).
#[derive(Debug, Clone, PartialEq)]
pub struct Segments {
    pub(crate) segments: Vec<((f32, f32), (f32, f32))>,
    pub(crate) color: Rgba,
    pub(crate) width: f32,
}

impl Segments {
    /// Vertical segments at `x[i]` from `y0[i]` to `y1[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the arrays differ in length.
    pub fn vertical(x: &[f32], y0: &[f32], y1: &[f32]) -> Result<Self> {
        check_lengths(x, y0)?;
        check_lengths(x, y1)?;
        let segments =
            x.iter().zip(y0.iter().zip(y1)).map(|(&x, (&a, &b))| ((x, a), (x, b))).collect();
        Ok(Self { segments, color: Rgba::BLACK, width: 1.0 })
    }

    /// Horizontal segments at `y[i]` from `x0[i]` to `x1[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the arrays differ in length.
    pub fn horizontal(y: &[f32], x0: &[f32], x1: &[f32]) -> Result<Self> {
        check_lengths(y, x0)?;
        check_lengths(y, x1)?;
        let segments =
            y.iter().zip(x0.iter().zip(x1)).map(|(&y, (&a, &b))| ((a, y), (b, y))).collect();
        Ok(Self { segments, color: Rgba::BLACK, width: 1.0 })
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the width in points.
    #[must_use]
    pub fn width(mut self, points: f32) -> Self {
        self.width = points;
        self
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

// ============================================================================
// Polygon
// ============================================================================

/// A filled closed outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub(crate) points: Vec<(f32, f32)>,
    pub(crate) fill: Rgba,
    pub(crate) edge: Option<(Rgba, f32)>,
}

impl Polygon {
    /// Create a polygon from its vertices.
    #[must_use]
    pub fn new(points: Vec<(f32, f32)>, fill: Rgba) -> Self {
        Self { points, fill, edge: None }
    }

    /// Outline with `color` at `width` points.
    #[must_use]
    pub fn edge(mut self, color: Rgba, width: f32) -> Self {
        self.edge = Some((color, width));
        self
    }

    /// Fill color.
    #[must_use]
    pub fn fill_color(&self) -> Rgba {
        self.fill
    }

    /// Vertices.
    #[must_use]
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }
}

// ============================================================================
// Image
// ============================================================================

/// A log-normalized, colormapped matrix stretched over a data-space extent.
///
/// Row 0 is drawn at the bottom of the extent (lowest y).
#[derive(Debug, Clone)]
pub struct Image {
    pub(crate) values: Vec<f32>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) extent: (f32, f32, f32, f32),
    pub(crate) norm: LogNorm,
    pub(crate) colormap: ColorScale,
}

impl Image {
    /// Create an image of `rows x cols` row-major values covering
    /// `extent = (x_min, x_max, y_min, y_max)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the value count is wrong, or
    /// [`Error::InvalidDimensions`] for an empty matrix.
    pub fn new(
        values: Vec<f32>,
        rows: usize,
        cols: usize,
        extent: (f32, f32, f32, f32),
        norm: LogNorm,
        colormap: ColorScale,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { width: cols as u32, height: rows as u32 });
        }
        if values.len() != rows * cols {
            return Err(Error::shape("image", format!("{} values", rows * cols), values.len()));
        }
        Ok(Self { values, rows, cols, extent, norm, colormap })
    }

    /// Normalization used for coloring.
    #[must_use]
    pub fn norm(&self) -> LogNorm {
        self.norm
    }

    /// Colormap used for coloring.
    #[must_use]
    pub fn colormap(&self) -> &ColorScale {
        &self.colormap
    }

    /// `(x_min, x_max, y_min, y_max)`.
    #[must_use]
    pub fn extent(&self) -> (f32, f32, f32, f32) {
        self.extent
    }

    /// One pixel per cell, top row of pixels holding the last data row.
    /// Cells the normalization rejects are transparent.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel buffer cannot be allocated.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.cols as u32, self.rows as u32)?;
        for (row, cells) in self.values.chunks_exact(self.cols).enumerate() {
            let py = (self.rows - 1 - row) as u32;
            for (col, &value) in cells.iter().enumerate() {
                if let Some(t) = self.norm.normalize(value) {
                    fb.set_pixel(col as u32, py, self.colormap.scale(t));
                }
            }
        }
        Ok(fb)
    }
}

// ============================================================================
// VLine
// ============================================================================

/// A vertical reference line spanning the full panel height.
#[derive(Debug, Clone, PartialEq)]
pub struct VLine {
    pub(crate) x: f32,
    pub(crate) color: Rgba,
    pub(crate) dash: LineDash,
    pub(crate) label: Option<String>,
}

impl VLine {
    /// Solid black line at `x`.
    #[must_use]
    pub fn new(x: f32) -> Self {
        Self { x, color: Rgba::BLACK, dash: LineDash::Solid, label: None }
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the dash pattern.
    #[must_use]
    pub fn dash(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }

    /// Set the legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Position.
    #[must_use]
    pub fn position(&self) -> f32 {
        self.x
    }
}

// ============================================================================
// Artist
// ============================================================================

/// Any drawable panel element.
#[derive(Debug, Clone)]
pub enum Artist {
    /// Connected curve.
    Line(Line),
    /// Markers.
    Scatter(Scatter),
    /// Error bars.
    ErrorBars(ErrorBars),
    /// Range bars.
    Segments(Segments),
    /// Filled shape.
    Polygon(Polygon),
    /// Heatmap.
    Image(Image),
    /// Vertical reference line.
    VLine(VLine),
}

impl Artist {
    /// Default stacking order (higher draws later), following matplotlib.
    #[must_use]
    pub const fn default_zorder(&self) -> i32 {
        match self {
            Self::Image(_) => 0,
            Self::Polygon(_) | Self::Scatter(_) | Self::Segments(_) => 1,
            Self::Line(_) | Self::ErrorBars(_) | Self::VLine(_) => 2,
        }
    }

    /// Legend label, if the artist has one.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Line(l) => l.label.as_deref(),
            Self::Scatter(s) => s.label.as_deref(),
            Self::VLine(v) => v.label.as_deref(),
            _ => None,
        }
    }
}

macro_rules! impl_from_artist {
    ($($kind:ident),*) => {
        $(impl From<$kind> for Artist {
            fn from(artist: $kind) -> Self {
                Self::$kind(artist)
            }
        })*
    };
}

impl_from_artist!(Line, Scatter, ErrorBars, Segments, Polygon, Image, VLine);
