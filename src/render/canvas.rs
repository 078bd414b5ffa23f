//! Drawing surfaces.
//!
//! Figures draw through the [`Canvas`] trait so the same layout code produces both raster
//! and vector output. [`RasterCanvas`] rasterizes into a [`Framebuffer`]; the SVG encoder
//! implements the trait by recording elements.

use super::primitives::{draw_thick_line, fill_circle, fill_polygon, stroke_circle};
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::output::TextAnchor;

/// Line dash pattern, named after the matplotlib line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineDash {
    /// `-`
    #[default]
    Solid,
    /// `--`
    Dashed,
    /// `-.`
    DashDot,
    /// `:`
    Dotted,
}

impl LineDash {
    /// On/off lengths in pixels, scaled by the stroke width. `None` for solid lines.
    #[must_use]
    pub fn pattern(self, width: f32) -> Option<Vec<f32>> {
        let base: &[f32] = match self {
            Self::Solid => return None,
            Self::Dashed => &[3.7, 1.6],
            Self::DashDot => &[6.4, 1.6, 1.0, 1.6],
            Self::Dotted => &[1.0, 1.65],
        };
        let unit = width.max(1.0);
        Some(base.iter().map(|len| len * unit).collect())
    }
}

/// Stroke parameters for lines and outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Rgba,
    /// Width in pixels.
    pub width: f32,
    /// Dash pattern.
    pub dash: LineDash,
}

impl Stroke {
    /// Solid stroke.
    #[must_use]
    pub const fn solid(color: Rgba, width: f32) -> Self {
        Self { color, width, dash: LineDash::Solid }
    }

    /// Set the dash pattern.
    #[must_use]
    pub const fn dashed(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    /// Anchor on the baseline.
    #[default]
    Baseline,
    /// Anchor on the vertical center.
    Middle,
    /// Anchor on the top of the glyphs.
    Top,
}

/// Text placement and appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Rgba,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical anchor.
    pub align: VerticalAlign,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f32,
}

impl TextStyle {
    /// Unrotated, start-anchored text on the baseline.
    #[must_use]
    pub const fn new(size: f32, color: Rgba) -> Self {
        Self {
            size,
            color,
            anchor: TextAnchor::Start,
            align: VerticalAlign::Baseline,
            rotation: 0.0,
        }
    }

    /// Set the anchors.
    #[must_use]
    pub const fn anchored(mut self, anchor: TextAnchor, align: VerticalAlign) -> Self {
        self.anchor = anchor;
        self.align = align;
        self
    }

    /// Set the rotation.
    #[must_use]
    pub const fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }
}

/// A surface a figure can be drawn onto. Coordinates are pixels, y down.
pub trait Canvas {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Stroke an open polyline.
    fn polyline(&mut self, points: &[Point], stroke: &Stroke);

    /// Fill a closed polygon with an optional outline.
    fn polygon(&mut self, points: &[Point], fill: Rgba, edge: Option<&Stroke>);

    /// Draw a circle with optional fill and outline.
    fn circle(&mut self, center: Point, radius: f32, fill: Option<Rgba>, edge: Option<&Stroke>);

    /// Stretch a pixel image over `rect` without smoothing.
    fn image(&mut self, rect: Rect, image: &Framebuffer) -> Result<()>;

    /// Draw a text label. Surfaces without glyph support ignore this.
    fn text(&mut self, position: Point, text: &str, style: &TextStyle);

    /// Stroke a single segment.
    fn line(&mut self, a: Point, b: Point, stroke: &Stroke) {
        self.polyline(&[a, b], stroke);
    }
}

/// Split a polyline into the "on" runs of a dash pattern.
#[must_use]
pub fn dash_polyline(points: &[Point], pattern: &[f32]) -> Vec<Vec<Point>> {
    let period: f32 = pattern.iter().sum();
    if pattern.is_empty() || period <= 0.0 {
        return vec![points.to_vec()];
    }

    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut index = 0;
    let mut remaining = pattern[0];

    for pair in points.windows(2) {
        let (mut a, b) = (pair[0], pair[1]);
        let mut left = a.distance(b);

        while left > 0.0 {
            let step = remaining.min(left);
            let next = a.lerp(b, step / left);
            if index % 2 == 0 {
                if current.is_empty() {
                    current.push(a);
                }
                current.push(next);
            }
            a = next;
            left -= step;
            remaining -= step;

            if remaining <= f32::EPSILON {
                if index % 2 == 0 && current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
                index = (index + 1) % pattern.len();
                remaining = pattern[index];
            }
        }
    }

    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

/// Raster drawing surface backed by a [`Framebuffer`]. Text is not rasterized.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    fb: Framebuffer,
}

impl RasterCanvas {
    /// Create a surface cleared to `background` (transparent when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    pub fn new(width: u32, height: u32, background: Option<Rgba>) -> Result<Self> {
        let mut fb = Framebuffer::new(width, height)?;
        if let Some(color) = background {
            fb.clear(color);
        }
        Ok(Self { fb })
    }

    /// Borrow the pixels drawn so far.
    #[must_use]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Take ownership of the pixels.
    #[must_use]
    pub fn into_framebuffer(self) -> Framebuffer {
        self.fb
    }

    fn stroke_run(&mut self, points: &[Point], stroke: &Stroke) {
        for pair in points.windows(2) {
            if pair[0].is_finite() && pair[1].is_finite() {
                draw_thick_line(&mut self.fb, pair[0], pair[1], stroke.width, stroke.color);
            }
        }
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        (self.fb.width(), self.fb.height())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let x = rect.x.round().max(0.0) as u32;
        let y = rect.y.round().max(0.0) as u32;
        let w = (rect.right().round().max(0.0) as u32).saturating_sub(x).max(1);
        let h = (rect.bottom().round().max(0.0) as u32).saturating_sub(y).max(1);
        self.fb.blend_rect(x, y, w, h, color);
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        match stroke.dash.pattern(stroke.width) {
            None => self.stroke_run(points, stroke),
            Some(pattern) => {
                for run in dash_polyline(points, &pattern) {
                    self.stroke_run(&run, stroke);
                }
            }
        }
    }

    fn polygon(&mut self, points: &[Point], fill: Rgba, edge: Option<&Stroke>) {
        fill_polygon(&mut self.fb, points, fill);
        if let (Some(edge), Some(first)) = (edge, points.first()) {
            let mut closed = points.to_vec();
            closed.push(*first);
            self.polyline(&closed, edge);
        }
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Option<Rgba>, edge: Option<&Stroke>) {
        if let Some(color) = fill {
            fill_circle(&mut self.fb, center, radius, color);
        }
        if let Some(edge) = edge {
            stroke_circle(&mut self.fb, center, radius, edge.width, edge.color);
        }
    }

    fn image(&mut self, rect: Rect, image: &Framebuffer) -> Result<()> {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Ok(());
        }
        let x0 = rect.x.floor().max(0.0) as u32;
        let y0 = rect.y.floor().max(0.0) as u32;
        let x1 = (rect.right().ceil().max(0.0) as u32).min(self.fb.width());
        let y1 = (rect.bottom().ceil().max(0.0) as u32).min(self.fb.height());

        for y in y0..y1 {
            let v = ((y as f32 + 0.5 - rect.y) / rect.height).clamp(0.0, 0.999_999);
            let src_y = (v * image.height() as f32) as u32;
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - rect.x) / rect.width).clamp(0.0, 0.999_999);
                let src_x = (u * image.width() as f32) as u32;
                if let Some(color) = image.get_pixel(src_x, src_y) {
                    self.fb.blend_pixel(x, y, color);
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, _position: Point, _text: &str, _style: &TextStyle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_patterns_scale_with_width() {
        assert_eq!(LineDash::Solid.pattern(2.0), None);
        assert_eq!(LineDash::Dashed.pattern(2.0), Some(vec![7.4, 3.2]));
        assert_eq!(LineDash::Dotted.pattern(0.5), Some(vec![1.0, 1.65]));
    }

    #[test]
    fn test_dash_polyline_splits_runs() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let runs = dash_polyline(&points, &[2.0, 3.0]);

        assert_eq!(runs.len(), 2);
        assert!((runs[0][0].x - 0.0).abs() < 1e-4);
        assert!((runs[0].last().unwrap().x - 2.0).abs() < 1e-4);
        assert!((runs[1][0].x - 5.0).abs() < 1e-4);
        assert!((runs[1].last().unwrap().x - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_dash_polyline_across_vertices() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 3.0)];
        let runs = dash_polyline(&points, &[2.0, 10.0]);

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
        assert!((runs[0][2].y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_raster_canvas_background() {
        let canvas = RasterCanvas::new(10, 10, Some(Rgba::WHITE)).unwrap();
        assert_eq!(canvas.framebuffer().get_pixel(3, 3), Some(Rgba::WHITE));

        let transparent = RasterCanvas::new(10, 10, None).unwrap();
        assert_eq!(transparent.framebuffer().get_pixel(3, 3), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_raster_canvas_dashed_line_has_gaps() {
        let mut canvas = RasterCanvas::new(100, 20, Some(Rgba::WHITE)).unwrap();
        let stroke = Stroke::solid(Rgba::BLACK, 2.0).dashed(LineDash::Dashed);
        canvas.line(Point::new(0.0, 10.0), Point::new(100.0, 10.0), &stroke);

        let fb = canvas.framebuffer();
        let row: Vec<bool> = (0..100).map(|x| fb.get_pixel(x, 10).unwrap().r < 128).collect();
        assert!(row.iter().any(|&inked| inked));
        assert!(row.iter().any(|&inked| !inked));
    }

    #[test]
    fn test_raster_canvas_image_stretches() {
        let mut image = Framebuffer::new(2, 1).unwrap();
        image.set_pixel(0, 0, Rgba::RED);
        image.set_pixel(1, 0, Rgba::BLACK);

        let mut canvas = RasterCanvas::new(40, 10, Some(Rgba::WHITE)).unwrap();
        canvas.image(Rect::new(0.0, 0.0, 40.0, 10.0), &image).unwrap();

        let fb = canvas.into_framebuffer();
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(35, 5), Some(Rgba::BLACK));
    }

    #[test]
    fn test_raster_canvas_ignores_text() {
        let mut canvas = RasterCanvas::new(10, 10, None).unwrap();
        canvas.text(Point::new(5.0, 5.0), "X", &TextStyle::new(7.0, Rgba::BLACK));
        assert_eq!(canvas.framebuffer().get_pixel(5, 5), Some(Rgba::TRANSPARENT));
    }
}
