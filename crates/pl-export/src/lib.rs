/// Export encoders for plotscii: plain text, raster image and SVG.
///
/// Every encoder places glyphs with the conversion's `GridGeometry`, so all
/// formats line up with the preview.
pub mod preview;
pub mod rasterizer;
pub mod svg;
pub mod text;

use pl_ascii::ConversionResult;
use thiserror::Error;

pub use preview::PreviewMode;

/// Export failures. No partial file is ever produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The requested format's data is unavailable.
    #[error("Export impossible : {0}")]
    Precondition(String),

    /// Font data could not be parsed.
    #[error("Police invalide : {0}")]
    InvalidFont(String),

    /// The image encoder failed.
    #[error("Encodage échoué : {0}")]
    Encode(String),
}

/// Borrow the latest result, or fail if no conversion has succeeded yet.
///
/// # Errors
/// `ExportError::Precondition` when `result` is `None`.
///
/// # Example
/// ```
/// use pl_export::require_result;
/// assert!(require_result(None).is_err());
/// ```
pub fn require_result(
    result: Option<&ConversionResult>,
) -> Result<&ConversionResult, ExportError> {
    result.ok_or_else(|| {
        ExportError::Precondition("no successful conversion yet; load an image first".into())
    })
}

/// Fail when the pen paths are requested from a grayscale conversion.
///
/// # Errors
/// `ExportError::Precondition` if `result.grayscale`.
pub fn require_color(result: &ConversionResult, what: &str) -> Result<(), ExportError> {
    if result.grayscale {
        return Err(ExportError::Precondition(format!(
            "{what} requires colored ASCII art; disable grayscale mode"
        )));
    }
    Ok(())
}
