//! SVG output encoder.
//!
//! Records figure elements as vector shapes; heatmap images are embedded as base64 PNG.
//! This is the only output that carries text.

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::render::{Canvas, Stroke, TextStyle, VerticalAlign};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect { x: f32, y: f32, width: f32, height: f32, fill: Rgba },
    /// Circle
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Polyline, or polygon when filled
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Option<Rgba>,
        stroke_width: f32,
        dasharray: Option<Vec<f32>>,
        fill: Option<Rgba>,
    },
    /// Text
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        baseline: VerticalAlign,
        rotation: f32,
    },
    /// Embedded raster image (base64 PNG), stretched to its box
    Image { x: f32, y: f32, width: f32, height: f32, data: String },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Recorded elements, in drawing order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096 + self.elements.len() * 96);

        let (w, h) = (self.width, self.height);
        let _ = write!(svg, r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}""#);
        let _ = writeln!(svg, r#" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#);

        if let Some(bg) = self.background {
            let fill = rgba_to_css(&bg);
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{fill}"/>"#);
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

impl Canvas for SvgEncoder {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.elements.push(SvgElement::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill: color,
        });
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        self.elements.push(SvgElement::Polyline {
            points: points.iter().map(|p| (p.x, p.y)).collect(),
            stroke: Some(stroke.color),
            stroke_width: stroke.width,
            dasharray: stroke.dash.pattern(stroke.width),
            fill: None,
        });
    }

    fn polygon(&mut self, points: &[Point], fill: Rgba, edge: Option<&Stroke>) {
        if points.len() < 3 {
            return;
        }
        self.elements.push(SvgElement::Polyline {
            points: points.iter().map(|p| (p.x, p.y)).collect(),
            stroke: edge.map(|e| e.color),
            stroke_width: edge.map_or(0.0, |e| e.width),
            dasharray: edge.and_then(|e| e.dash.pattern(e.width)),
            fill: Some(fill),
        });
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Option<Rgba>, edge: Option<&Stroke>) {
        self.elements.push(SvgElement::Circle {
            cx: center.x,
            cy: center.y,
            r: radius,
            fill,
            stroke: edge.map(|e| e.color),
            stroke_width: edge.map_or(0.0, |e| e.width),
        });
    }

    fn image(&mut self, rect: Rect, image: &Framebuffer) -> Result<()> {
        let png_bytes = super::PngEncoder::to_bytes(image)?;
        let data = format!("data:image/png;base64,{}", STANDARD.encode(&png_bytes));

        self.elements.push(SvgElement::Image {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            data,
        });
        Ok(())
    }

    fn text(&mut self, position: Point, text: &str, style: &TextStyle) {
        self.elements.push(SvgElement::Text {
            x: position.x,
            y: position.y,
            text: text.to_string(),
            font_size: style.size,
            fill: style.color,
            anchor: style.anchor,
            baseline: style.align,
            rotation: style.rotation,
        });
    }
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: &Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, f32::from(color.a) / 255.0)
    }
}

fn paint_attr(name: &str, color: Option<&Rgba>) -> String {
    color.map_or_else(
        || format!(r#" {name}="none""#),
        |c| format!(r#" {name}="{}""#, rgba_to_css(c)),
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Convert an SVG element to its string representation.
fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill } => {
            let fill = rgba_to_css(fill);
            format!(r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill}"/>"#)
        }
        SvgElement::Circle { cx, cy, r, fill, stroke, stroke_width } => {
            let stroke_attr = stroke
                .map(|s| format!(r#" stroke="{}" stroke-width="{stroke_width}""#, rgba_to_css(&s)))
                .unwrap_or_default();
            let fill_attr = paint_attr("fill", fill.as_ref());
            format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}"{fill_attr}{stroke_attr}/>"#)
        }
        SvgElement::Polyline { points, stroke, stroke_width, dasharray, fill } => {
            let points_str =
                points.iter().map(|(x, y)| format!("{x},{y}")).collect::<Vec<_>>().join(" ");
            let tag = if fill.is_some() { "polygon" } else { "polyline" };
            let mut attrs = paint_attr("fill", fill.as_ref());
            if let Some(s) = stroke {
                let color = rgba_to_css(s);
                let _ = write!(attrs, r#" stroke="{color}" stroke-width="{stroke_width}""#);
            }
            if let Some(dashes) = dasharray {
                let dashes = dashes.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
                let _ = write!(attrs, r#" stroke-dasharray="{dashes}""#);
            }
            format!(r#"<{tag} points="{points_str}"{attrs}/>"#)
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor, baseline, rotation } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let baseline_attr = match baseline {
                VerticalAlign::Baseline => "",
                VerticalAlign::Middle => r#" dominant-baseline="central""#,
                VerticalAlign::Top => r#" dominant-baseline="hanging""#,
            };
            let transform = if rotation.abs() > f32::EPSILON {
                format!(r#" transform="rotate({} {x} {y})""#, -rotation)
            } else {
                String::new()
            };
            let fill = rgba_to_css(fill);
            let mut tag = format!(r#"<text x="{x}" y="{y}" font-size="{font_size}" fill="{fill}""#);
            let _ = write!(tag, r#" text-anchor="{anchor_str}"{baseline_attr}{transform}"#);
            let _ = write!(tag, r#" font-family="sans-serif">{}</text>"#, escape_xml(text));
            tag
        }
        SvgElement::Image { x, y, width, height, data } => {
            let mut tag = format!(r#"<image x="{x}" y="{y}" width="{width}" height="{height}""#);
            let _ = write!(tag, r#" preserveAspectRatio="none" style="image-rendering:pixelated""#);
            let _ = write!(tag, r#" xlink:href="{data}"/>"#);
            tag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LineDash;

    #[test]
    fn test_svg_encoder_new() {
        let svg = SvgEncoder::new(800, 600).render();

        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(100, 100).background(None).render();
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn test_svg_rgba_alpha() {
        let css = rgba_to_css(&Rgba::new(255, 0, 0, 128));
        assert!(css.contains("rgba"));
        assert!(css.contains("0.502"));
    }

    #[test]
    fn test_canvas_dashed_polyline() {
        let mut encoder = SvgEncoder::new(100, 100);
        let stroke = Stroke::solid(Rgba::BLACK, 2.0).dashed(LineDash::Dashed);
        encoder.polyline(&[Point::new(0.0, 0.0), Point::new(50.0, 100.0)], &stroke);

        let svg = encoder.render();
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("points=\"0,0 50,100\""));
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("stroke-dasharray=\"7.4,3.2\""));
    }

    #[test]
    fn test_canvas_polygon_without_edge() {
        let mut encoder = SvgEncoder::new(100, 100);
        let triangle = [Point::new(0.0, 0.0), Point::new(50.0, 100.0), Point::new(100.0, 0.0)];
        encoder.polygon(&triangle, Rgba::RED, None);

        let svg = encoder.render();
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("fill=\"rgb(255,0,0)\""));
        assert!(!svg.contains("stroke="));
    }

    #[test]
    fn test_canvas_open_circle() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.circle(Point::new(5.0, 6.0), 3.0, None, Some(&Stroke::solid(Rgba::RED, 1.0)));

        let svg = encoder.render();
        assert!(svg.contains(r#"<circle cx="5" cy="6" r="3" fill="none" stroke="rgb(255,0,0)""#));
    }

    #[test]
    fn test_canvas_rotated_text() {
        let mut encoder = SvgEncoder::new(100, 100);
        let style = TextStyle::new(9.0, Rgba::BLACK)
            .anchored(TextAnchor::Middle, VerticalAlign::Middle)
            .rotated(90.0);
        encoder.text(Point::new(10.0, 50.0), "E[X₁ | X₃]", &style);

        let svg = encoder.render();
        assert!(svg.contains("rotate(-90 10 50)"));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("E[X₁ | X₃]"));
    }

    #[test]
    fn test_svg_text_escaping() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.text(Point::new(1.0, 1.0), "<b> & \"q\"", &TextStyle::new(7.0, Rgba::BLACK));

        let svg = encoder.render();
        assert!(svg.contains("&lt;b&gt; &amp; &quot;q&quot;"));
    }

    #[test]
    fn test_canvas_image_embeds_png() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::RED);

        let mut encoder = SvgEncoder::new(100, 100);
        encoder.image(Rect::new(10.0, 10.0, 80.0, 40.0), &fb).unwrap();

        let svg = encoder.render();
        assert!(svg.contains("<image"));
        assert!(svg.contains("data:image/png;base64,"));
        assert!(svg.contains("preserveAspectRatio=\"none\""));
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.svg");

        let mut encoder = SvgEncoder::new(100, 100);
        encoder.fill_rect(Rect::new(10.0, 10.0, 80.0, 80.0), Rgba::GRAY);
        encoder.write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("</svg>"));
        assert_eq!(encoder.elements().len(), 1);
    }
}
