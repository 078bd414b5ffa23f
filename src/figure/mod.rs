//! Figure composition: a grid of panels laid out on one surface.
//!
//! A [`Figure`] owns a grid of [`Axes`], each holding artists in data coordinates. Layout
//! is computed at render time (tight-layout style: every panel gets the same insets for
//! tick labels and axis labels), so renderers only describe *what* goes on a panel.
//!
//! ```
//! use triadic_viz::figure::{Figure, Line};
//! use triadic_viz::style::Style;
//!
//! let mut fig = Figure::new(Style::publication());
//! if let Some(ax) = fig.axes_mut(0) {
//!     ax.add(Line::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.5, 0.8]).unwrap());
//!     ax.set_xlabel("T");
//! }
//! assert_eq!(fig.panel_count(), 1);
//! ```

mod artist;
mod axes;
mod draw;
pub mod ticks;

pub use artist::{Artist, ErrorBars, Image, Line, Marker, Polygon, Scatter, Segments, VLine};
pub use axes::{Axes, AxisScale, Limits};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::output::{OutputFormat, PngEncoder, SvgEncoder};
use crate::render::{Canvas, RasterCanvas};
use crate::style::{LegendLoc, Style};
use std::path::Path;

/// A colorbar attached to the right of one panel, describing that panel's first image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colorbar {
    /// Index of the panel whose image the colorbar describes.
    pub panel: usize,
    /// Label drawn alongside the bar.
    pub label: String,
}

/// A grid of panels with shared presentation settings.
#[derive(Debug, Clone)]
pub struct Figure {
    style: Style,
    size: (f32, f32),
    nrows: usize,
    ncols: usize,
    axes: Vec<Axes>,
    colorbar: Option<Colorbar>,
    share_y: bool,
}

impl Figure {
    /// Single-panel figure at the style's default size.
    #[must_use]
    pub fn new(style: Style) -> Self {
        let size = style.figure_size;
        Self {
            style,
            size,
            nrows: 1,
            ncols: 1,
            axes: vec![Axes::new()],
            colorbar: None,
            share_y: false,
        }
    }

    /// `nrows x ncols` grid of panels, numbered row-major.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either count is zero.
    pub fn subplots(style: Style, nrows: usize, ncols: usize) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(Error::InvalidDimensions { width: ncols as u32, height: nrows as u32 });
        }
        let size = style.figure_size;
        Ok(Self {
            style,
            size,
            nrows,
            ncols,
            axes: vec![Axes::new(); nrows * ncols],
            colorbar: None,
            share_y: false,
        })
    }

    /// Set the figure size in inches.
    #[must_use]
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = (width, height);
        self
    }

    /// Give every panel the same y range (the union of their own ranges) and show y tick
    /// labels only in the first column.
    #[must_use]
    pub fn share_y(mut self, share: bool) -> Self {
        self.share_y = share;
        self
    }

    /// Attach a colorbar describing the first image on `panel`.
    pub fn add_colorbar(&mut self, panel: usize, label: impl Into<String>) {
        self.colorbar = Some(Colorbar { panel, label: label.into() });
    }

    /// Presentation settings.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Figure size in inches.
    #[must_use]
    pub const fn size_inches(&self) -> (f32, f32) {
        self.size
    }

    /// Grid shape as `(rows, columns)`.
    #[must_use]
    pub const fn grid(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of panels.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.axes.len()
    }

    /// Panel `index`, row-major.
    #[must_use]
    pub fn axes(&self, index: usize) -> Option<&Axes> {
        self.axes.get(index)
    }

    /// Mutable panel `index`, row-major.
    pub fn axes_mut(&mut self, index: usize) -> Option<&mut Axes> {
        self.axes.get_mut(index)
    }

    /// Panel at grid position `(row, col)`.
    #[must_use]
    pub fn axes_at(&self, row: usize, col: usize) -> Option<&Axes> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.axes.get(row * self.ncols + col)
    }

    /// All panels, row-major.
    #[must_use]
    pub fn panels(&self) -> &[Axes] {
        &self.axes
    }

    /// All panels, mutable.
    pub fn panels_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }

    /// Attached colorbar, if any.
    #[must_use]
    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    /// Whether panels share their y range.
    #[must_use]
    pub const fn shares_y(&self) -> bool {
        self.share_y
    }

    /// Output size in pixels at the style's resolution.
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = self.style.inches(self.size.0).round().max(1.0) as u32;
        let h = self.style.inches(self.size.1).round().max(1.0) as u32;
        (w, h)
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// Limits each panel is drawn with, after y sharing.
    #[must_use]
    pub fn panel_limits(&self) -> Vec<Limits> {
        let mut limits: Vec<Limits> = self.axes.iter().map(Axes::resolved_limits).collect();
        if self.share_y {
            let union = limits
                .iter()
                .map(|(_, y)| *y)
                .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
            if let Some(y) = union {
                for lim in &mut limits {
                    lim.1 = y;
                }
            }
        }
        limits
    }

    fn shows_y_tick_labels(&self, index: usize) -> bool {
        !self.share_y || index % self.ncols == 0
    }

    /// Pixel rectangle of every panel, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rendering`] when the figure is too small to hold its panels.
    pub fn panel_rects(&self) -> Result<Vec<Rect>> {
        self.layout(&self.panel_limits())
    }

    fn layout(&self, limits: &[Limits]) -> Result<Vec<Rect>> {
        let style = &self.style;
        let (w, h) = self.pixel_size();
        let tick_px = style.pt(style.tick_label_size);
        let label_px = style.pt(style.axes_label_size);
        let offset = style.pt(draw::TICK_PAD) + draw::outward_tick(style);
        let gap = style.pt(2.0);

        let y_tick_width = self
            .axes
            .iter()
            .zip(limits)
            .enumerate()
            .filter(|(i, _)| self.shows_y_tick_labels(*i))
            .map(|(_, (axes, lim))| draw::y_ticks(axes.y_scale(), lim.1).max_width(tick_px))
            .fold(0.0, f32::max);
        let has_ylabel = self.axes.iter().any(|a| a.ylabel().is_some());
        let has_xlabel = self.axes.iter().any(|a| a.xlabel().is_some());
        let outside_legend = self
            .axes
            .iter()
            .filter(|a| a.legend_loc() == Some(LegendLoc::OutsideRight))
            .filter_map(|a| draw::legend_size(a, style))
            .map(|(lw, _)| lw + draw::legend_pad(style))
            .fold(0.0, f32::max);

        let axis_label = |shown: bool| {
            if shown {
                style.pt(draw::LABEL_PAD) + label_px
            } else {
                0.0
            }
        };
        let left = offset + y_tick_width + axis_label(has_ylabel) + gap;
        let bottom = offset + tick_px + axis_label(has_xlabel) + gap;
        let top = tick_px / 2.0 + gap;
        let right = tick_px * 1.5 + outside_legend;

        let pad = style.inches(style.pad_inches);
        let colorbar =
            self.colorbar.as_ref().map_or(0.0, |c| draw::colorbar_width(style, &c.label));
        let content = Rect::new(pad, pad, w as f32 - 2.0 * pad - colorbar, h as f32 - 2.0 * pad);
        let cell_w = content.width / self.ncols as f32;
        let cell_h = content.height / self.nrows as f32;

        if cell_w - left - right <= 1.0 || cell_h - top - bottom <= 1.0 {
            return Err(Error::Rendering(format!(
                "figure of {:.2}x{:.2} in is too small for a {}x{} grid",
                self.size.0, self.size.1, self.nrows, self.ncols
            )));
        }

        Ok((0..self.axes.len())
            .map(|i| {
                let (row, col) = (i / self.ncols, i % self.ncols);
                let (x, y) = (content.x + col as f32 * cell_w, content.y + row as f32 * cell_h);
                Rect::new(x, y, cell_w, cell_h).inset(left, top, right, bottom)
            })
            .collect())
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Draw the whole figure onto `canvas`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout does not fit or a panel's limits are invalid for its
    /// scale (for example a non-positive log range).
    pub fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        let limits = self.panel_limits();
        let rects = self.layout(&limits)?;

        for (i, ((axes, rect), lim)) in self.axes.iter().zip(&rects).zip(&limits).enumerate() {
            draw::draw_panel(canvas, axes, *rect, *lim, &self.style, self.shows_y_tick_labels(i))?;
        }

        if let Some(colorbar) = &self.colorbar {
            let image = self.axes.get(colorbar.panel).and_then(|a| a.images().next());
            match (image, rects.get(colorbar.panel)) {
                (Some(image), Some(rect)) => {
                    draw::draw_colorbar(canvas, image, *rect, &colorbar.label, &self.style)?;
                }
                _ => {
                    tracing::warn!(panel = colorbar.panel, "colorbar panel has no image; skipping");
                }
            }
        }
        Ok(())
    }

    fn background(&self) -> Option<Rgba> {
        (!self.style.transparent).then_some(Rgba::WHITE)
    }

    /// Rasterize the figure.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let (w, h) = self.pixel_size();
        let mut canvas = RasterCanvas::new(w, h, self.background())?;
        self.render(&mut canvas)?;
        Ok(canvas.into_framebuffer())
    }

    /// Record the figure as SVG.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn to_svg(&self) -> Result<SvgEncoder> {
        let (w, h) = self.pixel_size();
        let mut svg = SvgEncoder::new(w, h).background(self.background());
        self.render(&mut svg)?;
        Ok(svg)
    }

    /// Write the figure to `path`; the format follows the extension (`.png` or `.svg`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for other extensions, or an error if rendering
    /// or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path)?;
        let (width, height) = self.pixel_size();
        tracing::debug!(
            path = %path.display(),
            ?format,
            width,
            height,
            panels = self.axes.len(),
            "saving figure"
        );

        match format {
            OutputFormat::Png => PngEncoder::write_to_file(&self.to_framebuffer()?, path),
            OutputFormat::Svg => self.to_svg()?.write_to_file(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SvgElement;
    use crate::scale::{ColorScale, LogNorm};

    fn line_figure() -> Figure {
        let mut fig = Figure::new(Style::publication());
        let ax = fig.axes_mut(0).unwrap();
        ax.add(Line::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.5]).unwrap());
        ax.set_xlabel("T");
        ax.set_ylabel("X₁");
        fig
    }

    #[test]
    fn test_subplots_rejects_empty_grid() {
        assert!(Figure::subplots(Style::publication(), 0, 3).is_err());
        let fig = Figure::subplots(Style::publication(), 2, 3).unwrap();
        assert_eq!(fig.panel_count(), 6);
        assert!(fig.axes_at(1, 2).is_some());
        assert!(fig.axes_at(2, 0).is_none());
    }

    #[test]
    fn test_pixel_size_follows_dpi() {
        let fig = Figure::new(Style::publication().with_dpi(100.0)).size(4.0, 5.0);
        assert_eq!(fig.pixel_size(), (400, 500));
    }

    #[test]
    fn test_panel_rects_inside_figure() {
        let fig = Figure::subplots(Style::publication(), 2, 2).unwrap().size(5.0, 5.0);
        let rects = fig.panel_rects().unwrap();
        let (w, h) = fig.pixel_size();
        assert_eq!(rects.len(), 4);
        for r in &rects {
            assert!(r.x > 0.0 && r.y > 0.0);
            assert!(r.right() < w as f32 && r.bottom() < h as f32);
        }
        // Uniform insets give equal panel sizes
        assert!((rects[0].width - rects[3].width).abs() < 1e-3);
        assert!(rects[1].x > rects[0].right());
    }

    #[test]
    fn test_too_small_figure_errors() {
        let fig = Figure::subplots(Style::publication(), 1, 20).unwrap().size(1.0, 1.0);
        assert!(matches!(fig.panel_rects(), Err(Error::Rendering(_))));
    }

    #[test]
    fn test_share_y_unions_limits() {
        let mut fig = Figure::subplots(Style::publication(), 1, 2).unwrap().share_y(true);
        fig.axes_mut(0).unwrap().add(Line::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap());
        fig.axes_mut(1).unwrap().add(Line::new(vec![0.0, 1.0], vec![5.0, 10.0]).unwrap());
        let limits = fig.panel_limits();
        assert_eq!(limits[0].1, limits[1].1);
        let (lo, hi) = limits[0].1;
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn test_raster_has_transparent_background() {
        let fb = line_figure().to_framebuffer().unwrap();
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::TRANSPARENT));

        let mut style = Style::publication();
        style.transparent = false;
        let mut opaque = Figure::new(style);
        opaque.axes_mut(0).unwrap().add(Line::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap());
        assert_eq!(opaque.to_framebuffer().unwrap().get_pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_svg_records_labels() {
        let svg = line_figure().to_svg().unwrap();
        let texts: Vec<&str> = svg
            .elements()
            .iter()
            .filter_map(|e| match e {
                SvgElement::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"T"));
        assert!(texts.contains(&"X₁"));
    }

    #[test]
    fn test_colorbar_draws_gradient() {
        let mut fig = Figure::new(Style::publication());
        let norm = LogNorm::new(0.01, 1.0).unwrap();
        let cmap = ColorScale::inferno((0.0, 1.0)).unwrap();
        let values = vec![0.01, 0.1, 1.0, 0.5];
        let image = Image::new(values, 2, 2, (0.0, 1.0, -1.0, 1.0), norm, cmap).unwrap();
        fig.axes_mut(0).unwrap().add(image);
        fig.add_colorbar(0, "PDF");

        let svg = fig.to_svg().unwrap();
        let images =
            svg.elements().iter().filter(|e| matches!(e, SvgElement::Image { .. })).count();
        assert_eq!(images, 2);
    }

    #[test]
    fn test_save_formats() {
        let dir = tempfile::tempdir().unwrap();
        let fig = line_figure();

        fig.save(dir.path().join("line.png")).unwrap();
        fig.save(dir.path().join("line.svg")).unwrap();
        assert!(dir.path().join("line.png").exists());
        let svg = std::fs::read_to_string(dir.path().join("line.svg")).unwrap();
        assert!(svg.starts_with("<svg"));

        assert!(matches!(fig.save(dir.path().join("line.pdf")), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_render_is_repeatable() {
        let fig = line_figure();
        let a = fig.to_framebuffer().unwrap();
        let b = fig.to_framebuffer().unwrap();
        assert_eq!(a.to_compact_pixels(), b.to_compact_pixels());
    }
}
