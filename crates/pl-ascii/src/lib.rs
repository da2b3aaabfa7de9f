/// Image → character-grid conversion engine for plotscii.
///
/// Resolves the grid geometry, samples luminance per cell, maps it to a glyph
/// and a color, and splits the result into two pen paths.
pub mod color_map;
pub mod compositor;
pub mod geometry;
pub mod luminance;
pub mod partition;

pub use compositor::{ConversionError, ConversionResult, convert, convert_with_geometry};
