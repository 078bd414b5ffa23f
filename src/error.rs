//! Error types for triadic-viz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or rendering a figure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for framebuffer or figure.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Data length mismatch between x and y arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// An input array does not have the shape the renderer requires.
    #[error("Shape mismatch for `{argument}`: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Name of the offending argument.
        argument: &'static str,
        /// Human-readable description of the expected shape.
        expected: String,
        /// Human-readable description of the shape that was supplied.
        actual: String,
    },

    /// A labeled set of curves does not provide one curve per panel.
    #[error("labeled `{argument}` needs one curve per grid: expected {expected}, got {actual}")]
    CurveCountMismatch {
        /// Name of the offending argument.
        argument: &'static str,
        /// Number of grids (panels).
        expected: usize,
        /// Number of curves supplied.
        actual: usize,
    },

    /// More samples were requested than the sample axis holds.
    #[error("Requested {requested} samples but the sample axis only holds {available}")]
    SampleCountOutOfRange {
        /// Requested number of samples.
        requested: usize,
        /// Length of the sample axis.
        available: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The output path does not name a supported image format.
    #[error("Unsupported output format: {0} (expected .png or .svg)")]
    UnsupportedFormat(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// Style configuration parse error with line number.
    #[cfg(feature = "config")]
    #[error("style configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },
}

impl Error {
    /// Build a [`Error::ShapeMismatch`] from displayable shape descriptions.
    pub(crate) fn shape(
        argument: &'static str,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::ShapeMismatch { argument, expected: expected.to_string(), actual: actual.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_shape_mismatch_names_argument() {
        let err = Error::shape("cov", "9 entries per sample", "4 entries per sample");
        let msg = err.to_string();
        assert!(msg.contains("`cov`"));
        assert!(msg.contains("expected 9 entries"));
        assert!(msg.contains("got 4 entries"));
    }

    #[test]
    fn test_curve_count_mismatch() {
        let err = Error::CurveCountMismatch { argument: "supplement", expected: 3, actual: 2 };
        let msg = err.to_string();
        assert!(msg.contains("supplement"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_sample_count_out_of_range() {
        let err = Error::SampleCountOutOfRange { requested: 5, available: 3 };
        assert!(err.to_string().contains("5 samples"));
    }
}
