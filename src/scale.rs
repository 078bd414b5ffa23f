//! Scale functions for data-to-visual mappings.
//!
//! Position scales map data coordinates to pixels along an axis; [`ColorScale`] and
//! [`LogNorm`] together map heatmap densities to colors.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if a domain bound is not finite or domain_min equals domain_max.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if !(domain.0.is_finite() && domain.1.is_finite()) {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if (domain.1 - domain.0).abs() < f32::MIN_POSITIVE {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Base-10 logarithmic scale.
#[derive(Debug, Clone, Copy)]
pub struct LogScale {
    log_min: f32,
    log_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LogScale {
    /// Create a new logarithmic scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain contains non-positive values or is degenerate.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if domain.0 <= 0.0 || domain.1 <= 0.0 {
            return Err(Error::ScaleDomain("Log scale domain must be positive".to_string()));
        }
        let (log_min, log_max) = (domain.0.log10(), domain.1.log10());
        if (log_max - log_min).abs() < f32::MIN_POSITIVE {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { log_min, log_max, range_min: range.0, range_max: range.1 })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        10f32.powf(self.log_min + t * (self.log_max - self.log_min))
    }
}

impl Scale<f32, f32> for LogScale {
    /// Non-positive values map to NaN so callers can mask them.
    fn scale(&self, value: f32) -> f32 {
        if value <= 0.0 {
            return f32::NAN;
        }
        let t = (value.log10() - self.log_min) / (self.log_max - self.log_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (10f32.powf(self.log_min), 10f32.powf(self.log_max))
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Spans at or below this fraction of their magnitude are treated as a single value.
const SINGULAR_TOLERANCE: f32 = 4.0 * f32::EPSILON;

/// Fraction of the magnitude added on each side of a singular interval.
const SINGULAR_EXPANSION: f32 = 0.05;

/// Widen an interval that a scale could not map.
///
/// Intervals whose width is within rounding of their magnitude grow by 5% of that magnitude on
/// each side, or to `±0.1` around zero. Wider intervals, including reversed ones, pass through
/// unchanged. Non-finite bounds give `(0, 1)`.
#[must_use]
pub fn nonsingular(lo: f32, hi: f32) -> (f32, f32) {
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let magnitude = lo.abs().max(hi.abs());
    if (hi - lo).abs() > magnitude * SINGULAR_TOLERANCE {
        return (lo, hi);
    }
    let delta = if magnitude < f32::MIN_POSITIVE { 0.1 } else { magnitude * SINGULAR_EXPANSION };
    (lo.min(hi) - delta, lo.max(hi) + delta)
}

/// Axis position mapping, either linear or logarithmic.
#[derive(Debug, Clone, Copy)]
pub enum PositionScale {
    /// Linear axis.
    Linear(LinearScale),
    /// Base-10 log axis.
    Log(LogScale),
}

impl Scale<f32, f32> for PositionScale {
    fn scale(&self, value: f32) -> f32 {
        match self {
            Self::Linear(s) => s.scale(value),
            Self::Log(s) => s.scale(value),
        }
    }

    fn domain(&self) -> (f32, f32) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Log(s) => s.domain(),
        }
    }

    fn range(&self) -> (f32, f32) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Log(s) => s.range(),
        }
    }
}

/// Color scale for mapping values to colors by piecewise-linear interpolation of stops.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f32,
    domain_max: f32,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if colors is empty or domain is invalid.
    pub fn new(colors: Vec<Rgba>, domain: (f32, f32)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain("Color scale requires at least one color".to_string()));
        }

        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Create an inferno color scale (black-purple-orange-yellow, perceptually uniform).
    #[must_use]
    pub fn inferno(domain: (f32, f32)) -> Option<Self> {
        Self::new(
            vec![
                Rgba::rgb(0, 0, 4),
                Rgba::rgb(31, 12, 72),
                Rgba::rgb(85, 15, 109),
                Rgba::rgb(136, 34, 106),
                Rgba::rgb(186, 54, 85),
                Rgba::rgb(227, 89, 51),
                Rgba::rgb(249, 140, 10),
                Rgba::rgb(249, 201, 50),
                Rgba::rgb(252, 255, 164),
            ],
            domain,
        )
        .ok()
    }
}

impl Scale<f32, Rgba> for ColorScale {
    fn scale(&self, value: f32) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = ((t * segment_count as f32).floor() as usize).min(segment_count - 1);
        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}

/// Logarithmic normalization of positive values onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNorm {
    vmin: f32,
    vmax: f32,
}

impl LogNorm {
    /// Create a normalization over `[vmin, vmax]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] unless `0 < vmin <= vmax`.
    pub fn new(vmin: f32, vmax: f32) -> Result<Self> {
        if !(vmin > 0.0 && vmin.is_finite() && vmax.is_finite()) || vmax < vmin {
            return Err(Error::ScaleDomain(format!(
                "log normalization needs 0 < vmin <= vmax, got [{vmin}, {vmax}]"
            )));
        }
        Ok(Self { vmin, vmax })
    }

    /// Normalization from the smallest strictly-positive value to the largest value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] when no value is strictly positive.
    pub fn from_data(values: &[f32]) -> Result<Self> {
        let vmin = crate::stats::min_positive(values).ok_or_else(|| {
            Error::ScaleDomain("log color normalization needs a positive value".to_string())
        })?;
        let vmax = crate::stats::min_max(values).map_or(vmin, |(_, max)| max);
        Self::new(vmin, vmax)
    }

    /// Lower bound.
    #[must_use]
    pub const fn vmin(&self) -> f32 {
        self.vmin
    }

    /// Upper bound.
    #[must_use]
    pub const fn vmax(&self) -> f32 {
        self.vmax
    }

    /// Map a value to `[0, 1]`; `None` for non-positive or non-finite values.
    #[must_use]
    pub fn normalize(&self, value: f32) -> Option<f32> {
        if !(value > 0.0 && value.is_finite()) {
            return None;
        }
        if self.vmax <= self.vmin {
            return Some(0.0);
        }
        let t = (value.ln() - self.vmin.ln()) / (self.vmax.ln() - self.vmin.ln());
        Some(t.clamp(0.0, 1.0))
    }
}
