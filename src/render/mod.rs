//! Rendering backends and rasterization.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: hairlines with sub-pixel accuracy
//! - **Scanline polygon fill**: even-odd filling for violin bodies and thick strokes
//! - **Distance-tested circles**: filled and stroked markers
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod canvas;
mod primitives;

pub use canvas::{dash_polyline, Canvas, LineDash, RasterCanvas, Stroke, TextStyle, VerticalAlign};
pub use primitives::{draw_line_aa, draw_thick_line, fill_circle, fill_polygon, stroke_circle};
