//! # Triadic-Viz
//!
//! Publication figures for simulations of node dynamics with triadic interactions.
//!
//! The crate turns precomputed arrays (trajectories, densities, covariance samples and
//! conditional statistics) into static PNG or SVG files. It computes no physics and only the
//! statistics needed for drawing: ensemble means, standard errors, quartiles and violin
//! densities.
//!
//! ## Renderers
//!
//! - [`plots::TimeseriesPlot`]: node trajectories, combined or one panel per node
//! - [`plots::PdfPlot`]: stationary densities with optional comparator curves
//! - [`plots::CovariancePlot`]: violin plot of sampled covariance matrix entries
//! - [`plots::ConditionalExpectationPlot`]: `E[X_a | X_c]` with error bars
//! - [`plots::ConditionalCorrelationPlot`]: `ρ(X_i, X_j | X_k)` with reference curves
//! - [`plots::MutualInformationPlot`]: `I(X_i; X_j | X_k)`
//! - [`plots::EvolutionPlot`]: log-colored density heatmaps over time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use triadic_viz::prelude::*;
//!
//! let data = Tensor3::new(vec![0.0; 3 * 100 * 2], [3, 100, 2])?;
//! TimeseriesPlot::new(data, 10.0).layout(Layout::Separated).save("timeseries.png")?;
//! # Ok::<(), triadic_viz::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `config` (default): load a [`style::Style`] from YAML
//!
//! Diagnostics are emitted through `tracing`; install a subscriber to see them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and palettes.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, lines, rectangles).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Reductions used while drawing (means, quantiles, kernel densities).
pub mod stats;

/// Input containers and shape validation.
pub mod data;

/// Presentation settings.
pub mod style;

// ============================================================================
// Figure Modules
// ============================================================================

/// Panels, artists and layout.
pub mod figure;

/// The seven renderers.
pub mod plots;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rendering backends and rasterization.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for triadic-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use triadic_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::data::{Curve, CurveSet, Estimate, NodeOrder, OneOrMany, SampleMatrix, Tensor3};
    pub use crate::error::{Error, Result};
    pub use crate::figure::Figure;
    pub use crate::plots::{
        ConditionalCorrelationPlot, ConditionalExpectationPlot, CorrelationPanel, CovariancePlot,
        EvolutionPlot, ExpectationColumn, InformationPanel, Layout, MutualInformationPlot, PdfPlot,
        PdfSeries, Render, TimeseriesPlot,
    };
    pub use crate::style::{LegendLoc, Style};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_renderers_are_send_sync() {
        assert_send_sync::<TimeseriesPlot>();
        assert_send_sync::<PdfPlot>();
        assert_send_sync::<CovariancePlot>();
        assert_send_sync::<ConditionalExpectationPlot>();
        assert_send_sync::<ConditionalCorrelationPlot>();
        assert_send_sync::<MutualInformationPlot>();
        assert_send_sync::<EvolutionPlot>();
    }

    #[test]
    fn test_concurrent_renders_are_independent() {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                std::thread::spawn(move || {
                    let data = Tensor3::new(vec![n as f32; 2 * 10 * 2], [2, 10, 2]).unwrap();
                    let fig = TimeseriesPlot::new(data, 1.0).to_figure().unwrap();
                    fig.to_framebuffer().unwrap().width()
                })
            })
            .collect();
        let widths: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
