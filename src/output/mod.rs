//! Output encoders (PNG, SVG).

mod png_encoder;
mod svg;

pub use png_encoder::PngEncoder;
pub use svg::{SvgElement, SvgEncoder, TextAnchor};

use crate::error::{Error, Result};
use std::path::Path;

/// Image file format, chosen from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raster PNG.
    Png,
    /// Vector SVG.
    Svg,
}

impl OutputFormat {
    /// Determine the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any extension other than `png` or `svg`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        let png = OutputFormat::from_path(Path::new("out/figure.png")).unwrap();
        assert_eq!(png, OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("FIGURE.SVG")).unwrap(), OutputFormat::Svg);
    }

    #[test]
    fn test_format_unsupported() {
        assert!(matches!(
            OutputFormat::from_path(Path::new("figure.pdf")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(OutputFormat::from_path(Path::new("figure")).is_err());
    }
}
