//! Figure presentation settings.
//!
//! A [`Style`] is an explicit value handed to every renderer; nothing is configured
//! process-wide. [`Style::publication`] reproduces the compact single-column journal look the
//! figures are designed for. With the `config` feature a style can be loaded from YAML, with
//! missing keys taking their publication defaults:
//!
//! ```yaml
//! dpi: 300
//! figure_size: [3.5, 2.5]
//! legend_frame: true
//! ```

use crate::color::{Rgba, TAB10};
#[cfg(feature = "config")]
use crate::error::{Error, Result};
#[cfg(feature = "config")]
use std::path::Path;

/// Direction ticks point relative to the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TickDirection {
    /// Ticks point into the panel.
    #[default]
    In,
    /// Ticks point away from the panel.
    Out,
}

/// Legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum LegendLoc {
    /// Corner that overlaps the least data.
    #[default]
    Best,
    /// Upper right corner inside the panel.
    UpperRight,
    /// Lower right corner inside the panel.
    LowerRight,
    /// Outside the panel on the right, vertically centered.
    OutsideRight,
}

/// Presentation settings for figures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Style {
    /// Default figure size in inches (width, height).
    pub figure_size: (f32, f32),
    /// Output resolution in dots per inch.
    pub dpi: f32,
    /// Axis label font size in points.
    pub axes_label_size: f32,
    /// Panel frame width in points.
    pub axes_line_width: f32,
    /// Tick direction.
    pub tick_direction: TickDirection,
    /// Major tick length in points.
    pub tick_major_size: f32,
    /// Major tick width in points.
    pub tick_major_width: f32,
    /// Tick label font size in points.
    pub tick_label_size: f32,
    /// Draw ticks on the top and right edges as well.
    pub mirror_ticks: bool,
    /// Default line width in points.
    pub line_width: f32,
    /// Default marker diameter in points.
    pub marker_size: f32,
    /// Legend font size in points.
    pub legend_font_size: f32,
    /// Draw a frame behind legends.
    pub legend_frame: bool,
    /// Legend location for panels whose figure type does not fix one.
    pub legend_loc: LegendLoc,
    /// Legend handle length in font-size units.
    pub legend_handle_length: f32,
    /// Padding around the figure when saving, in inches.
    pub pad_inches: f32,
    /// Leave the figure background transparent.
    pub transparent: bool,
    /// Text color.
    pub text_color: Rgba,
    /// Frame and tick color.
    pub axis_color: Rgba,
    /// Colors assigned to unstyled series, in order.
    pub color_cycle: Vec<Rgba>,
}

impl Default for Style {
    fn default() -> Self {
        Self::publication()
    }
}

impl Style {
    /// Compact publication style: small fonts, thin frames, inward mirrored ticks,
    /// frameless legends and a transparent background.
    #[must_use]
    pub fn publication() -> Self {
        Self {
            figure_size: (3.0, 2.5),
            dpi: 150.0,
            axes_label_size: 9.0,
            axes_line_width: 0.5,
            tick_direction: TickDirection::In,
            tick_major_size: 3.0,
            tick_major_width: 0.5,
            tick_label_size: 7.0,
            mirror_ticks: true,
            line_width: 1.0,
            marker_size: 3.0,
            legend_font_size: 6.0,
            legend_frame: false,
            legend_loc: LegendLoc::Best,
            legend_handle_length: 2.5,
            pad_inches: 0.05,
            transparent: true,
            text_color: Rgba::BLACK,
            axis_color: Rgba::BLACK,
            color_cycle: TAB10.to_vec(),
        }
    }

    /// Set the output resolution.
    #[must_use]
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Convert points to pixels at this style's resolution.
    #[must_use]
    pub fn pt(&self, points: f32) -> f32 {
        points * self.dpi / 72.0
    }

    /// Convert inches to pixels at this style's resolution.
    #[must_use]
    pub fn inches(&self, inches: f32) -> f32 {
        inches * self.dpi
    }

    /// Color for the `index`-th unstyled series.
    #[must_use]
    pub fn cycle_color(&self, index: usize) -> Rgba {
        if self.color_cycle.is_empty() {
            return TAB10[index % TAB10.len()];
        }
        self.color_cycle[index % self.color_cycle.len()]
    }

    /// Loads a style from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[cfg(feature = "config")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses a style from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the offending line if parsing fails.
    #[cfg(feature = "config")]
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_defaults() {
        let style = Style::default();
        assert_eq!(style.figure_size, (3.0, 2.5));
        assert_eq!(style.tick_direction, TickDirection::In);
        assert!(style.mirror_ticks);
        assert!(!style.legend_frame);
        assert!(style.transparent);
        assert_eq!(style.color_cycle.len(), 10);
    }

    #[test]
    fn test_unit_conversion() {
        let style = Style::publication().with_dpi(144.0);
        assert!((style.pt(3.0) - 6.0).abs() < 1e-5);
        assert!((style.inches(2.5) - 360.0).abs() < 1e-5);
    }

    #[test]
    fn test_cycle_wraps() {
        let style = Style::publication();
        assert_eq!(style.cycle_color(0), style.cycle_color(10));

        let empty = Style { color_cycle: Vec::new(), ..Style::publication() };
        assert_eq!(empty.cycle_color(3), TAB10[3]);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_parse_partial_yaml() {
        let yaml = "dpi: 300\nlegend_loc: lower_right\ntext_color: '#333333'\n";
        let style = Style::parse(yaml).unwrap();
        assert_eq!(style.dpi, 300.0);
        assert_eq!(style.legend_loc, LegendLoc::LowerRight);
        assert_eq!(style.text_color, Rgba::rgb(0x33, 0x33, 0x33));
        assert_eq!(style.tick_label_size, 7.0);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_parse_error_reports_line() {
        let err = Style::parse("dpi: 300\ntick_label_size: [oops\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { line, .. } if line >= 2));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_parse_rejects_bad_color() {
        assert!(Style::parse("axis_color: not-a-color\n").is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.yaml");
        std::fs::write(&path, "figure_size: [4.0, 5.0]\nmirror_ticks: false\n").unwrap();

        let style = Style::load(&path).unwrap();
        assert_eq!(style.figure_size, (4.0, 5.0));
        assert!(!style.mirror_ticks);
        assert!(Style::load(dir.path().join("missing.yaml")).is_err());
    }
}
