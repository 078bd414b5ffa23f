//! Drawing panels, legends and colorbars onto a [`Canvas`].
//!
//! Everything here works in pixels with y pointing down. Font metrics are estimated from
//! character counts; only the SVG surface actually renders glyphs.

use super::artist::{Artist, Image, Marker, Scatter};
use super::axes::{Axes, AxisScale, Limits};
use super::ticks;
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{clip_segment, Point, Rect};
use crate::output::TextAnchor;
use crate::render::{Canvas, Stroke, TextStyle, VerticalAlign};
use crate::scale::{LinearScale, LogScale, PositionScale, Scale};
use crate::style::{LegendLoc, Style, TickDirection};

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH: f32 = 0.55;
/// Gap between ticks and tick labels, in points.
pub(crate) const TICK_PAD: f32 = 3.5;
/// Gap between tick labels and axis labels, in points.
pub(crate) const LABEL_PAD: f32 = 4.0;
/// Marker outline width, in points.
const MARKER_EDGE_WIDTH: f32 = 1.0;
const TICK_TARGET: usize = 5;
const LOG_TICK_MAX: usize = 6;

const COLORBAR_PAD: f32 = 6.0;
const COLORBAR_WIDTH: f32 = 7.0;
const GRADIENT_STEPS: u32 = 256;

/// Estimated rendered width of `text` at `font_px`.
pub(crate) fn text_width(text: &str, font_px: f32) -> f32 {
    text.chars().count() as f32 * CHAR_WIDTH * font_px
}

// ============================================================================
// Ticks
// ============================================================================

/// Tick positions with their labels.
#[derive(Debug, Clone, Default)]
pub(crate) struct Ticks {
    pub values: Vec<f32>,
    pub labels: Vec<String>,
}

impl Ticks {
    fn within(self, (lo, hi): (f32, f32)) -> Self {
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let tolerance = (hi - lo) * 1e-4;
        let (values, labels) = self
            .values
            .into_iter()
            .zip(self.labels)
            .filter(|(v, _)| *v >= lo - tolerance && *v <= hi + tolerance)
            .unzip();
        Self { values, labels }
    }

    /// Widest label at `font_px`.
    pub fn max_width(&self, font_px: f32) -> f32 {
        self.labels.iter().map(|l| text_width(l, font_px)).fold(0.0, f32::max)
    }
}

pub(crate) fn x_ticks(axes: &Axes, limits: (f32, f32)) -> Ticks {
    let ticks = match axes.xticks() {
        Some(explicit) => Ticks {
            values: explicit.iter().map(|(v, _)| *v).collect(),
            labels: explicit.iter().map(|(_, l)| l.clone()).collect(),
        },
        None => linear(limits),
    };
    ticks.within(limits)
}

pub(crate) fn y_ticks(scale: AxisScale, limits: (f32, f32)) -> Ticks {
    let ticks = match scale {
        AxisScale::Linear => linear(limits),
        AxisScale::Log => {
            let values = ticks::log_ticks(limits.0, limits.1, LOG_TICK_MAX);
            let labels = values.iter().map(|v| ticks::format_log(*v)).collect();
            Ticks { values, labels }
        }
    };
    ticks.within(limits)
}

fn linear((lo, hi): (f32, f32)) -> Ticks {
    let (values, step) = ticks::linear_ticks(lo.min(hi), lo.max(hi), TICK_TARGET);
    let labels = values.iter().map(|v| ticks::format_linear(*v, step)).collect();
    Ticks { values, labels }
}

/// Extra outward offset of tick labels when ticks point out.
pub(crate) fn outward_tick(style: &Style) -> f32 {
    match style.tick_direction {
        TickDirection::In => 0.0,
        TickDirection::Out => style.pt(style.tick_major_size),
    }
}

// ============================================================================
// Data-to-pixel transform
// ============================================================================

/// Maps data coordinates into a panel rectangle.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Transform {
    rect: Rect,
    x: PositionScale,
    y: PositionScale,
}

impl Transform {
    pub fn new(rect: Rect, ((x0, x1), (y0, y1)): Limits, y_scale: AxisScale) -> Result<Self> {
        let x = PositionScale::Linear(LinearScale::new((x0, x1), (rect.x, rect.right()))?);
        let y = match y_scale {
            AxisScale::Linear => {
                PositionScale::Linear(LinearScale::new((y0, y1), (rect.bottom(), rect.y))?)
            }
            AxisScale::Log => PositionScale::Log(LogScale::new((y0, y1), (rect.bottom(), rect.y))?),
        };
        Ok(Self { rect, x, y })
    }

    pub fn x(&self, value: f32) -> f32 {
        self.x.scale(value)
    }

    pub fn y(&self, value: f32) -> f32 {
        self.y.scale(value)
    }

    pub fn point(&self, x: f32, y: f32) -> Point {
        Point::new(self.x(x), self.y(y))
    }

    fn points(&self, x: &[f32], y: &[f32]) -> Vec<Point> {
        x.iter().zip(y).map(|(&x, &y)| self.point(x, y)).collect()
    }
}

/// Visible pieces of a polyline: non-finite vertices break it and each segment is clipped.
fn clipped_runs(points: &[Point], rect: &Rect) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for pair in points.windows(2) {
        let visible = if pair[0].is_finite() && pair[1].is_finite() {
            clip_segment(pair[0], pair[1], rect)
        } else {
            None
        };
        match visible {
            Some((a, b)) if current.last().is_some_and(|last| last.distance(a) < 1e-3) => {
                current.push(b);
            }
            Some((a, b)) => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current = vec![a, b];
            }
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

// ============================================================================
// Panels
// ============================================================================

/// Draw one panel: artists by stacking order, then frame, ticks, labels and legend.
pub(crate) fn draw_panel(
    canvas: &mut dyn Canvas,
    axes: &Axes,
    rect: Rect,
    limits: Limits,
    style: &Style,
    show_y_tick_labels: bool,
) -> Result<()> {
    let transform = Transform::new(rect, limits, axes.y_scale())?;
    let colors = axes.line_colors(style);

    let mut order: Vec<usize> = (0..axes.artists().len()).collect();
    order.sort_by_key(|&i| axes.artists()[i].0);
    for i in order {
        draw_artist(canvas, &axes.artists()[i].1, colors[i], &transform, style)?;
    }

    let frame = Stroke::solid(style.axis_color, style.pt(style.axes_line_width));
    let corners = [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.x, rect.bottom()),
        Point::new(rect.x, rect.y),
    ];
    canvas.polyline(&corners, &frame);

    let xt = x_ticks(axes, limits.0);
    let yt = y_ticks(axes.y_scale(), limits.1);
    draw_ticks(canvas, &transform, &xt, &yt, style, show_y_tick_labels);
    draw_axis_labels(canvas, axes, rect, &yt, style, show_y_tick_labels);

    if let Some(loc) = axes.legend_loc() {
        draw_legend(canvas, axes, &colors, &transform, loc, style);
    }
    Ok(())
}

fn draw_artist(
    canvas: &mut dyn Canvas,
    artist: &Artist,
    color: Option<Rgba>,
    t: &Transform,
    style: &Style,
) -> Result<()> {
    match artist {
        Artist::Line(line) => {
            let color = color.unwrap_or(style.text_color).fade(line.alpha);
            let width = style.pt(line.width.unwrap_or(style.line_width));
            let stroke = Stroke::solid(color, width).dashed(line.dash);
            for run in clipped_runs(&t.points(&line.x, &line.y), &t.rect) {
                canvas.polyline(&run, &stroke);
            }
        }
        Artist::Scatter(scatter) => {
            for p in t.points(&scatter.x, &scatter.y) {
                if p.is_finite() && t.rect.contains(p) {
                    draw_marker(canvas, scatter, p, style);
                }
            }
        }
        Artist::ErrorBars(bars) => {
            let stroke = Stroke::solid(bars.color.fade(bars.alpha), style.pt(bars.width));
            let cap = style.pt(bars.cap);
            for ((&x, &y), &e) in bars.x.iter().zip(&bars.y).zip(&bars.yerr) {
                let (lo, hi) = (t.point(x, y - e), t.point(x, y + e));
                if let Some((a, b)) = clip_segment(lo, hi, &t.rect) {
                    canvas.line(a, b, &stroke);
                }
                for end in [lo, hi] {
                    if end.is_finite() && t.rect.contains(end) {
                        canvas.line(
                            Point::new(end.x - cap, end.y),
                            Point::new(end.x + cap, end.y),
                            &stroke,
                        );
                    }
                }
            }
        }
        Artist::Segments(segs) => {
            let stroke = Stroke::solid(segs.color, style.pt(segs.width));
            for &((x0, y0), (x1, y1)) in &segs.segments {
                if let Some((a, b)) = clip_segment(t.point(x0, y0), t.point(x1, y1), &t.rect) {
                    canvas.line(a, b, &stroke);
                }
            }
        }
        Artist::Polygon(poly) => {
            let points: Vec<Point> =
                poly.points.iter().map(|&(x, y)| t.point(x, y)).filter(|p| p.is_finite()).collect();
            if points.len() >= 3 {
                let edge = poly.edge.map(|(c, w)| Stroke::solid(c, style.pt(w)));
                canvas.polygon(&points, poly.fill, edge.as_ref());
            }
        }
        Artist::Image(image) => {
            let (x0, x1, y0, y1) = image.extent;
            let (a, b) = (t.point(x0, y1), t.point(x1, y0));
            if a.is_finite() && b.is_finite() {
                let rect =
                    Rect::new(a.x.min(b.x), a.y.min(b.y), (b.x - a.x).abs(), (b.y - a.y).abs());
                canvas.image(rect, &image.to_framebuffer()?)?;
            }
        }
        Artist::VLine(vline) => {
            let px = t.x(vline.x);
            if px.is_finite() && px >= t.rect.x && px <= t.rect.right() {
                let stroke =
                    Stroke::solid(vline.color, style.pt(style.line_width)).dashed(vline.dash);
                canvas.line(Point::new(px, t.rect.y), Point::new(px, t.rect.bottom()), &stroke);
            }
        }
    }
    Ok(())
}

/// Resolved marker colors: unstyled scatters are filled with the first cycle color.
fn marker_colors(scatter: &Scatter, style: &Style) -> (Option<Rgba>, Option<Rgba>) {
    match (scatter.face, scatter.edge) {
        (None, None) => {
            let color = style.cycle_color(0);
            (Some(color), Some(color))
        }
        colors => colors,
    }
}

fn draw_marker(canvas: &mut dyn Canvas, scatter: &Scatter, center: Point, style: &Style) {
    let (face, edge) = marker_colors(scatter, style);
    let mut radius = style.pt(scatter.size.unwrap_or(style.marker_size)) / 2.0;
    let edge_stroke = edge.map(|c| Stroke::solid(c, style.pt(MARKER_EDGE_WIDTH)));

    match scatter.marker {
        Marker::Dot | Marker::Circle => {
            if scatter.marker == Marker::Dot {
                radius /= 2.0;
            }
            canvas.circle(center, radius, face, edge_stroke.as_ref());
        }
        Marker::Cross => {
            let color = edge.or(face).unwrap_or(style.text_color);
            let stroke = Stroke::solid(color, style.pt(MARKER_EDGE_WIDTH));
            let (cx, cy) = (center.x, center.y);
            let (lo, hi) = (cy - radius, cy + radius);
            canvas.line(Point::new(cx - radius, lo), Point::new(cx + radius, hi), &stroke);
            canvas.line(Point::new(cx - radius, hi), Point::new(cx + radius, lo), &stroke);
        }
    }
}

fn draw_ticks(
    canvas: &mut dyn Canvas,
    t: &Transform,
    xt: &Ticks,
    yt: &Ticks,
    style: &Style,
    show_y_tick_labels: bool,
) {
    let rect = t.rect;
    let length = style.pt(style.tick_major_size);
    let inward = match style.tick_direction {
        TickDirection::In => 1.0,
        TickDirection::Out => -1.0,
    };
    let stroke = Stroke::solid(style.axis_color, style.pt(style.tick_major_width));
    let font = TextStyle::new(style.pt(style.tick_label_size), style.text_color);
    let offset = style.pt(TICK_PAD) + outward_tick(style);

    for (&value, label) in xt.values.iter().zip(&xt.labels) {
        let px = t.x(value);
        let bottom = rect.bottom();
        canvas.line(Point::new(px, bottom), Point::new(px, bottom - inward * length), &stroke);
        if style.mirror_ticks {
            canvas.line(Point::new(px, rect.y), Point::new(px, rect.y + inward * length), &stroke);
        }
        canvas.text(
            Point::new(px, rect.bottom() + offset),
            label,
            &font.anchored(TextAnchor::Middle, VerticalAlign::Top),
        );
    }

    for (&value, label) in yt.values.iter().zip(&yt.labels) {
        let py = t.y(value);
        if !py.is_finite() {
            continue;
        }
        canvas.line(Point::new(rect.x, py), Point::new(rect.x + inward * length, py), &stroke);
        if style.mirror_ticks {
            let right = rect.right();
            canvas.line(Point::new(right, py), Point::new(right - inward * length, py), &stroke);
        }
        if show_y_tick_labels {
            canvas.text(
                Point::new(rect.x - offset, py),
                label,
                &font.anchored(TextAnchor::End, VerticalAlign::Middle),
            );
        }
    }
}

fn draw_axis_labels(
    canvas: &mut dyn Canvas,
    axes: &Axes,
    rect: Rect,
    yt: &Ticks,
    style: &Style,
    show_y_tick_labels: bool,
) {
    let tick_px = style.pt(style.tick_label_size);
    let font = TextStyle::new(style.pt(style.axes_label_size), style.text_color);
    let offset = style.pt(TICK_PAD) + outward_tick(style);

    if let Some(label) = axes.xlabel() {
        let y = rect.bottom() + offset + tick_px + style.pt(LABEL_PAD);
        let font = font.anchored(TextAnchor::Middle, VerticalAlign::Top);
        canvas.text(Point::new(rect.center().x, y), label, &font);
    }
    if let Some(label) = axes.ylabel() {
        let tick_width = if show_y_tick_labels { yt.max_width(tick_px) } else { 0.0 };
        let x = rect.x - offset - tick_width - style.pt(LABEL_PAD);
        canvas.text(
            Point::new(x, rect.center().y),
            label,
            &font.anchored(TextAnchor::Middle, VerticalAlign::Baseline).rotated(90.0),
        );
    }
}

// ============================================================================
// Legend
// ============================================================================

enum Handle {
    Line(Stroke),
    Marker(Scatter),
}

struct LegendMetrics {
    font: f32,
    row: f32,
    border: f32,
    handle: f32,
    handle_pad: f32,
}

impl LegendMetrics {
    fn new(style: &Style) -> Self {
        let font = style.pt(style.legend_font_size);
        Self {
            font,
            row: font * 1.5,
            border: font * 0.4,
            handle: font * style.legend_handle_length,
            handle_pad: font * 0.8,
        }
    }

    fn size(&self, labels: &[&str]) -> (f32, f32) {
        let text = labels.iter().map(|l| text_width(l, self.font)).fold(0.0, f32::max);
        (
            2.0 * self.border + self.handle + self.handle_pad + text,
            2.0 * self.border + labels.len() as f32 * self.row,
        )
    }
}

/// Pixel size of a panel's legend; `None` when it has no labeled artists.
pub(crate) fn legend_size(axes: &Axes, style: &Style) -> Option<(f32, f32)> {
    let labels = axes.legend_labels();
    (!labels.is_empty()).then(|| LegendMetrics::new(style).size(&labels))
}

/// Distance between a legend and the panel edge.
pub(crate) fn legend_pad(style: &Style) -> f32 {
    style.pt(style.legend_font_size) * 0.5
}

fn draw_legend(
    canvas: &mut dyn Canvas,
    axes: &Axes,
    colors: &[Option<Rgba>],
    t: &Transform,
    loc: LegendLoc,
    style: &Style,
) {
    let entries: Vec<(&str, Handle)> = axes
        .artists()
        .iter()
        .zip(colors)
        .filter_map(|((_, artist), color)| {
            let label = artist.label()?;
            let handle = match artist {
                Artist::Line(line) => Handle::Line(
                    Stroke::solid(
                        color.unwrap_or(style.text_color).fade(line.alpha),
                        style.pt(line.width.unwrap_or(style.line_width)),
                    )
                    .dashed(line.dash),
                ),
                Artist::VLine(v) => {
                    Handle::Line(Stroke::solid(v.color, style.pt(style.line_width)).dashed(v.dash))
                }
                Artist::Scatter(s) => Handle::Marker(s.clone()),
                _ => return None,
            };
            Some((label, handle))
        })
        .collect();
    if entries.is_empty() {
        return;
    }

    let metrics = LegendMetrics::new(style);
    let labels: Vec<&str> = entries.iter().map(|(l, _)| *l).collect();
    let (w, h) = metrics.size(&labels);
    let origin = legend_origin(loc, t.rect, (w, h), legend_pad(style), || occupied_points(axes, t));
    let frame = Rect::new(origin.x, origin.y, w, h);

    if style.legend_frame {
        canvas.fill_rect(frame, Rgba::WHITE.fade(0.8));
        let outline = Stroke::solid(Rgba::rgb(204, 204, 204), style.pt(0.5));
        let (x0, y0, x1, y1) = (frame.x, frame.y, frame.right(), frame.bottom());
        canvas.polyline(
            &[
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
                Point::new(x0, y0),
            ],
            &outline,
        );
    }

    let font = TextStyle::new(metrics.font, style.text_color)
        .anchored(TextAnchor::Start, VerticalAlign::Middle);
    let x0 = frame.x + metrics.border;
    for (k, (label, handle)) in entries.iter().enumerate() {
        let yc = frame.y + metrics.border + metrics.row * (k as f32 + 0.5);
        match handle {
            Handle::Line(stroke) => {
                canvas.line(Point::new(x0, yc), Point::new(x0 + metrics.handle, yc), stroke);
            }
            Handle::Marker(scatter) => {
                draw_marker(canvas, scatter, Point::new(x0 + metrics.handle / 2.0, yc), style);
            }
        }
        canvas.text(Point::new(x0 + metrics.handle + metrics.handle_pad, yc), label, &font);
    }
}

/// Pixel positions of plotted data, used to keep automatic legends off the data.
fn occupied_points(axes: &Axes, t: &Transform) -> Vec<Point> {
    axes.artists()
        .iter()
        .flat_map(|(_, artist)| match artist {
            Artist::Line(l) => t.points(&l.x, &l.y),
            Artist::Scatter(s) => t.points(&s.x, &s.y),
            Artist::ErrorBars(e) => t.points(&e.x, &e.y),
            Artist::Polygon(p) => p.points.iter().map(|&(x, y)| t.point(x, y)).collect(),
            _ => Vec::new(),
        })
        .filter(|p| p.is_finite())
        .collect()
}

fn legend_origin(
    loc: LegendLoc,
    rect: Rect,
    (w, h): (f32, f32),
    pad: f32,
    occupied: impl FnOnce() -> Vec<Point>,
) -> Point {
    let upper_right = Point::new(rect.right() - pad - w, rect.y + pad);
    let upper_left = Point::new(rect.x + pad, rect.y + pad);
    let lower_left = Point::new(rect.x + pad, rect.bottom() - pad - h);
    let lower_right = Point::new(rect.right() - pad - w, rect.bottom() - pad - h);

    match loc {
        LegendLoc::UpperRight => upper_right,
        LegendLoc::LowerRight => lower_right,
        LegendLoc::OutsideRight => Point::new(rect.right() + pad, rect.center().y - h / 2.0),
        LegendLoc::Best => {
            let points = occupied();
            [upper_right, upper_left, lower_left, lower_right]
                .into_iter()
                .min_by_key(|origin| {
                    let frame = Rect::new(origin.x, origin.y, w, h);
                    points.iter().filter(|p| frame.contains(**p)).count()
                })
                .unwrap_or(upper_right)
        }
    }
}

// ============================================================================
// Colorbar
// ============================================================================

/// Horizontal space a colorbar needs to the right of its panel.
pub(crate) fn colorbar_width(style: &Style, label: &str) -> f32 {
    let tick_px = style.pt(style.tick_label_size);
    let label_px = if label.is_empty() {
        0.0
    } else {
        style.pt(style.axes_label_size) + style.pt(LABEL_PAD)
    };
    style.pt(COLORBAR_PAD + COLORBAR_WIDTH + TICK_PAD)
        + outward_tick(style)
        + text_width("10⁻⁰⁰", tick_px)
        + label_px
}

/// Draw a vertical log colorbar for `image` beside `panel`.
pub(crate) fn draw_colorbar(
    canvas: &mut dyn Canvas,
    image: &Image,
    panel: Rect,
    label: &str,
    style: &Style,
) -> Result<()> {
    let bar = Rect::new(
        panel.right() + style.pt(COLORBAR_PAD),
        panel.y,
        style.pt(COLORBAR_WIDTH),
        panel.height,
    );

    let mut gradient = Framebuffer::new(1, GRADIENT_STEPS)?;
    let (d0, d1) = image.colormap().domain();
    for row in 0..GRADIENT_STEPS {
        let t = 1.0 - (row as f32 + 0.5) / GRADIENT_STEPS as f32;
        gradient.set_pixel(0, row, image.colormap().scale(d0 + t * (d1 - d0)));
    }
    canvas.image(bar, &gradient)?;

    let outline = Stroke::solid(style.axis_color, style.pt(style.axes_line_width));
    canvas.polyline(
        &[
            Point::new(bar.x, bar.y),
            Point::new(bar.right(), bar.y),
            Point::new(bar.right(), bar.bottom()),
            Point::new(bar.x, bar.bottom()),
            Point::new(bar.x, bar.y),
        ],
        &outline,
    );

    let norm = image.norm();
    let tick_px = style.pt(style.tick_label_size);
    let offset = style.pt(TICK_PAD) + outward_tick(style);
    let mut label_x = bar.right() + offset;

    if norm.vmax() > norm.vmin() {
        let scale = LogScale::new((norm.vmin(), norm.vmax()), (bar.bottom(), bar.y))?;
        let values = ticks::log_ticks(norm.vmin(), norm.vmax(), LOG_TICK_MAX);
        let labels: Vec<String> = values.iter().map(|v| ticks::format_log(*v)).collect();
        let ticks = Ticks { values, labels }.within((norm.vmin(), norm.vmax()));

        let length = style.pt(style.tick_major_size);
        let inward = match style.tick_direction {
            TickDirection::In => 1.0,
            TickDirection::Out => -1.0,
        };
        let stroke = Stroke::solid(style.axis_color, style.pt(style.tick_major_width));
        let font = TextStyle::new(tick_px, style.text_color)
            .anchored(TextAnchor::Start, VerticalAlign::Middle);
        for (&value, text) in ticks.values.iter().zip(&ticks.labels) {
            let py = scale.scale(value);
            let right = bar.right();
            canvas.line(Point::new(right, py), Point::new(right - inward * length, py), &stroke);
            canvas.text(Point::new(bar.right() + offset, py), text, &font);
        }
        label_x += ticks.max_width(tick_px);
    }

    if !label.is_empty() {
        let font = style.pt(style.axes_label_size);
        canvas.text(
            Point::new(label_x + style.pt(LABEL_PAD) + font, bar.center().y),
            label,
            &TextStyle::new(font, style.text_color)
                .anchored(TextAnchor::Middle, VerticalAlign::Baseline)
                .rotated(90.0),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::artist::Line;
    use crate::output::{SvgElement, SvgEncoder};

    #[test]
    fn test_clipped_runs_break_at_nan() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let points = [
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(f32::NAN, 30.0),
            Point::new(40.0, 40.0),
            Point::new(50.0, 50.0),
        ];
        let runs = clipped_runs(&points, &rect);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
    }

    #[test]
    fn test_clipped_runs_trim_to_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let runs = clipped_runs(&[Point::new(-10.0, 5.0), Point::new(20.0, 5.0)], &rect);
        assert_eq!(runs.len(), 1);
        assert!((runs[0][0].x - 0.0).abs() < 1e-4);
        assert!((runs[0][1].x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_ticks_filtered_to_limits() {
        let mut axes = Axes::new();
        axes.set_xticks(vec![(1.0, "a".into()), (5.0, "b".into()), (20.0, "c".into())]);
        let ticks = x_ticks(&axes, (0.0, 10.0));
        assert_eq!(ticks.labels, vec!["a", "b"]);
    }

    #[test]
    fn test_log_y_ticks_are_decades() {
        let ticks = y_ticks(AxisScale::Log, (0.005, 2.0));
        assert_eq!(ticks.labels, vec!["10⁻²", "10⁻¹", "10⁰"]);
    }

    #[test]
    fn test_best_legend_avoids_data() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let crowded = vec![Point::new(95.0, 5.0), Point::new(90.0, 8.0), Point::new(5.0, 5.0)];
        let origin = legend_origin(LegendLoc::Best, rect, (20.0, 10.0), 2.0, || crowded);
        // Upper right holds two points, upper left one, lower left none
        assert_eq!(origin, Point::new(2.0, 88.0));
    }

    #[test]
    fn test_outside_legend_right_of_panel() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        let origin = legend_origin(LegendLoc::OutsideRight, rect, (30.0, 20.0), 3.0, Vec::new);
        assert_eq!(origin, Point::new(113.0, 25.0));
    }

    #[test]
    fn test_panel_draws_legend_text() {
        let style = Style::publication();
        let mut axes = Axes::new();
        axes.add(Line::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap().label("no TI"));
        axes.legend(LegendLoc::UpperRight);
        axes.set_xlabel("T");

        let mut svg = SvgEncoder::new(400, 300);
        let rect = Rect::new(60.0, 20.0, 300.0, 220.0);
        draw_panel(&mut svg, &axes, rect, axes.resolved_limits(), &style, true).unwrap();

        let texts: Vec<&str> = svg
            .elements()
            .iter()
            .filter_map(|e| match e {
                SvgElement::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"no TI"));
        assert!(texts.contains(&"T"));
    }

    #[test]
    fn test_log_panel_rejects_non_positive_limits() {
        let style = Style::publication();
        let mut axes = Axes::new();
        axes.set_y_scale(AxisScale::Log);
        axes.set_ylim(0.0, 1.0);
        let mut svg = SvgEncoder::new(100, 100);
        let rect = Rect::new(10.0, 10.0, 80.0, 80.0);
        assert!(draw_panel(&mut svg, &axes, rect, axes.resolved_limits(), &style, true).is_err());
    }
}
