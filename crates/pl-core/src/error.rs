use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Unknown named preset (charset, media size).
    #[error("Preset inconnu : {kind} '{name}'")]
    UnknownPreset {
        /// Preset family ("charset", "media").
        kind: &'static str,
        /// Name that did not match.
        name: String,
    },
}

/// Image-side failures: nothing can be converted.
///
/// Surfaced to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Width or height is zero.
    #[error("Invalid image dimensions: {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pixel buffer does not match `width × height × 4`.
    #[error("Failed to get image data: expected {expected} bytes, got {actual}")]
    PixelAccess {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// The decoder rejected the input.
    #[error("Failed to load image: {0}")]
    Decode(String),
}

/// Degenerate sizing inputs. The message names the offending parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Image has a zero dimension.
    #[error("image dimensions must be at least 1×1 (got {width}×{height})")]
    InvalidImageDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pen size is zero, negative or not finite.
    #[error("pen_size_cm = {pen_size_cm} results in zero pixel width; choose a larger pen size")]
    ZeroPenWidth {
        /// Offending pen size in centimeters.
        pen_size_cm: f32,
    },

    /// Character-grid target aspect ratio collapsed to zero.
    #[error("aspect_ratio: character grid target aspect ratio is zero")]
    ZeroAspectRatio,

    /// A caller-supplied layout with zero columns or rows.
    #[error("grid must have at least one column and one row (got {columns}×{rows})")]
    EmptyGrid {
        /// Column count.
        columns: u32,
        /// Row count.
        rows: u32,
    },

    /// Media preset with a zero pixel dimension.
    #[error("media size {width}×{height} px is degenerate")]
    InvalidMedia {
        /// Media width in pixels.
        width: u32,
        /// Media height in pixels.
        height: u32,
    },
}
