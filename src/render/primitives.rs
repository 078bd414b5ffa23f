//! Primitive rendering functions.
//!
//! Rasterization for the shapes figures are made of: hairlines, thick strokes, filled
//! polygons (violin bodies, stroke quads) and circle markers. Everything blends, so
//! translucent colors composite correctly.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

/// Strokes thinner than this are drawn as anti-aliased hairlines.
const HAIRLINE_WIDTH: f32 = 1.5;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are plotted at each step along the major axis, with intensities set from
/// the fractional distance to the ideal line.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut put = |major: i32, minor: i32, intensity: f32| {
        if steep {
            plot(fb, minor, major, color, intensity);
        } else {
            plot(fb, major, minor, color, intensity);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1 + 1, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    if xpxl2 != xpxl1 {
        put(xpxl2, ypxl2, rfpart(yend) * xgap);
        put(xpxl2, ypxl2 + 1, fpart(yend) * xgap);
    }

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Draw a straight stroke of the given pixel width.
///
/// Hairlines use [`draw_line_aa`]; wider strokes are filled as a quad with flat caps.
pub fn draw_thick_line(fb: &mut Framebuffer, a: Point, b: Point, width: f32, color: Rgba) {
    if width < HAIRLINE_WIDTH {
        draw_line_aa(fb, a.x, a.y, b.x, b.y, color);
        return;
    }

    let length = a.distance(b);
    if length < f32::EPSILON {
        return;
    }

    // Half-width normal
    let nx = -(b.y - a.y) / length * width / 2.0;
    let ny = (b.x - a.x) / length * width / 2.0;

    fill_polygon(
        fb,
        &[
            Point::new(a.x + nx, a.y + ny),
            Point::new(b.x + nx, b.y + ny),
            Point::new(b.x - nx, b.y - ny),
            Point::new(a.x - nx, a.y - ny),
        ],
        color,
    );
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

/// Fractional part of a float.
#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

/// Reverse fractional part.
#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Polygon Filling
// ============================================================================

/// Fill a simple or self-intersecting polygon with the even-odd rule.
///
/// Pixels are covered when their center lies inside the outline.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[Point], color: Rgba) {
    if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    let row_start = min_y.floor().max(0.0) as u32;
    let row_end = (max_y.ceil().max(0.0) as u32).min(fb.height());
    let mut crossings: Vec<f32> = Vec::with_capacity(8);

    for row in row_start..row_end {
        let sample_y = row as f32 + 0.5;
        crossings.clear();

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if (a.y <= sample_y) != (b.y <= sample_y) {
                let t = (sample_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            let x_start = (span[0] - 0.5).ceil().max(0.0) as u32;
            let x_end = ((span[1] - 0.5).floor() + 1.0).max(0.0) as u32;
            if x_end > x_start {
                fb.blend_rect(x_start, row, x_end - x_start, 1, color);
            }
        }
    }
}

// ============================================================================
// Circle/Point Drawing
// ============================================================================

/// Draw a filled circle.
///
/// Circles smaller than a pixel still mark the pixel under their center.
pub fn fill_circle(fb: &mut Framebuffer, center: Point, radius: f32, color: Rgba) {
    if !center.is_finite() {
        return;
    }
    if radius < 0.5 {
        if center.x >= 0.0 && center.y >= 0.0 {
            fb.blend_pixel(center.x as u32, center.y as u32, color);
        }
        return;
    }

    for_each_pixel_near(fb, center, radius, |fb, x, y, distance| {
        if distance <= radius {
            fb.blend_pixel(x, y, color);
        }
    });
}

/// Draw a circle outline of the given stroke width, centered on the radius.
pub fn stroke_circle(fb: &mut Framebuffer, center: Point, radius: f32, width: f32, color: Rgba) {
    if !center.is_finite() {
        return;
    }
    let half = width.max(1.0) / 2.0;
    let (inner, outer) = ((radius - half).max(0.0), radius + half);

    for_each_pixel_near(fb, center, outer, |fb, x, y, distance| {
        if distance >= inner && distance <= outer {
            fb.blend_pixel(x, y, color);
        }
    });
}

/// Visit the pixels of the bounding box of a circle with their center distance.
fn for_each_pixel_near<F>(fb: &mut Framebuffer, center: Point, radius: f32, mut visit: F)
where
    F: FnMut(&mut Framebuffer, u32, u32, f32),
{
    let x0 = (center.x - radius).floor().max(0.0) as u32;
    let y0 = (center.y - radius).floor().max(0.0) as u32;
    let x1 = ((center.x + radius).ceil().max(0.0) as u32).min(fb.width());
    let y1 = ((center.y + radius).ceil().max(0.0) as u32).min(fb.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let distance = Point::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
            visit(fb, x, y, distance);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn white_canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(100, 100).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_draw_line_aa() {
        let mut fb = white_canvas();
        draw_line_aa(&mut fb, 10.0, 10.0, 90.0, 50.0, Rgba::BLACK);

        let pixel = fb.get_pixel(50, 30).unwrap();
        assert!(pixel.r < 255);
        assert_eq!(fb.get_pixel(50, 80), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_line_aa_out_of_bounds() {
        let mut fb = white_canvas();
        draw_line_aa(&mut fb, -10.0, -10.0, 110.0, 110.0, Rgba::BLACK);
        assert!(fb.get_pixel(50, 50).unwrap().r < 255);
    }

    #[test]
    fn test_thick_line_covers_width() {
        let mut fb = white_canvas();
        draw_thick_line(&mut fb, Point::new(10.0, 50.0), Point::new(90.0, 50.0), 6.0, Rgba::BLACK);

        assert_eq!(fb.get_pixel(50, 48), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 52), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 56), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut fb = white_canvas();
        let triangle = [Point::new(10.0, 90.0), Point::new(50.0, 10.0), Point::new(90.0, 90.0)];
        fill_polygon(&mut fb, &triangle, Rgba::RED);

        assert_eq!(fb.get_pixel(50, 60), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(12, 20), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_degenerate_is_noop() {
        let mut fb = white_canvas();
        fill_polygon(&mut fb, &[Point::new(0.0, 0.0), Point::new(50.0, 50.0)], Rgba::RED);
        let broken = [Point::new(0.0, 0.0), Point::new(f32::NAN, 5.0), Point::new(9.0, 9.0)];
        fill_polygon(&mut fb, &broken, Rgba::RED);
        assert_eq!(fb.get_pixel(25, 25), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_circle() {
        let mut fb = white_canvas();
        fill_circle(&mut fb, Point::new(50.0, 50.0), 20.0, Rgba::GRAY);

        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::GRAY));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_circle_sub_pixel() {
        let mut fb = white_canvas();
        fill_circle(&mut fb, Point::new(50.2, 50.7), 0.2, Rgba::RED);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::RED));
    }

    #[test]
    fn test_stroke_circle_is_hollow() {
        let mut fb = white_canvas();
        stroke_circle(&mut fb, Point::new(50.0, 50.0), 20.0, 2.0, Rgba::RED);

        assert_eq!(fb.get_pixel(70, 50), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::WHITE));
    }
}
