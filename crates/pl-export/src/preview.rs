use std::fmt;
use std::str::FromStr;

use pl_ascii::ConversionResult;
use pl_core::frame::GridCell;

/// Pen 1 ink in the dual preview.
pub const PEN1_COLOR: (u8, u8, u8) = (0, 0, 255);
/// Pen 2 ink in the dual preview.
pub const PEN2_COLOR: (u8, u8, u8) = (255, 0, 0);
/// Pen 1 ink, as an SVG color name.
pub const PEN1_SVG_COLOR: &str = "blue";
/// Pen 2 ink, as an SVG color name.
pub const PEN2_SVG_COLOR: &str = "red";

const WHITE: (u8, u8, u8) = (255, 255, 255);

/// How the grids are composited for preview and "current view" exports.
///
/// # Example
/// ```
/// use pl_export::PreviewMode;
/// assert_eq!("dual".parse::<PreviewMode>().unwrap(), PreviewMode::Dual);
/// assert_eq!(PreviewMode::default(), PreviewMode::Path1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewMode {
    /// Full grid in its own colors.
    Single,
    /// Pen 1 in blue, pen 2 in red.
    Dual,
    /// Pen 1 only, own colors.
    #[default]
    Path1,
    /// Pen 2 only, own colors.
    Path2,
}

impl PreviewMode {
    /// Glyph and ink at `(column, row)`, or `None` where nothing is drawn.
    #[inline]
    #[must_use]
    pub fn paint(
        self,
        result: &ConversionResult,
        column: u32,
        row: u32,
    ) -> Option<(char, (u8, u8, u8))> {
        match self {
            Self::Single => own_color(result.full.get(column, row)),
            Self::Path1 => own_color(result.pen1.get(column, row)),
            Self::Path2 => own_color(result.pen2.get(column, row)),
            Self::Dual => {
                let a = result.pen1.get(column, row);
                let b = result.pen2.get(column, row);
                if !a.is_blank() {
                    Some((a.ch, PEN1_COLOR))
                } else if !b.is_blank() {
                    Some((b.ch, PEN2_COLOR))
                } else {
                    None
                }
            }
        }
    }
}

#[inline]
fn own_color(cell: &GridCell) -> Option<(char, (u8, u8, u8))> {
    (!cell.is_blank()).then(|| (cell.ch, cell.color.rgb_or(WHITE)))
}

impl FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "dual" => Ok(Self::Dual),
            "path1" => Ok(Self::Path1),
            "path2" => Ok(Self::Path2),
            other => Err(format!(
                "mode de prévisualisation inconnu '{other}' (single|dual|path1|path2)"
            )),
        }
    }
}

impl fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Dual => "dual",
            Self::Path1 => "path1",
            Self::Path2 => "path2",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_ascii::convert_with_geometry;
    use pl_core::config::{CharsetChoice, ConversionConfig};
    use pl_core::frame::FrameBuffer;
    use pl_core::geometry::GridGeometry;

    fn checker(grayscale: bool) -> ConversionResult {
        let black = (0, 0, 0);
        let white = (255, 255, 255);
        let frame = FrameBuffer::from_rgb_pixels(2, 1, &[black, white]).unwrap();
        let config = ConversionConfig {
            grayscale,
            charset: CharsetChoice::Custom(".@#".into()),
            ..ConversionConfig::default()
        };
        let geometry = GridGeometry {
            columns: 2,
            rows: 1,
            cell_width_px: 6.0,
            cell_height_px: 10.0,
            font_size_px: 10.0,
            canvas_width_px: 12,
            canvas_height_px: 10,
            physical_size_mm: None,
        };
        convert_with_geometry(&frame, &config, geometry).unwrap()
    }

    #[test]
    fn dual_uses_pen_inks() {
        let result = checker(false);
        assert_eq!(PreviewMode::Dual.paint(&result, 0, 0), Some(('.', PEN2_COLOR)));
        assert_eq!(PreviewMode::Dual.paint(&result, 1, 0), Some(('@', PEN1_COLOR)));
    }

    #[test]
    fn isolated_paths_hide_the_other_pen() {
        let result = checker(false);
        assert_eq!(PreviewMode::Path1.paint(&result, 0, 0), None);
        assert!(PreviewMode::Path1.paint(&result, 1, 0).is_some());
        assert_eq!(PreviewMode::Path2.paint(&result, 1, 0), None);
    }

    #[test]
    fn grayscale_single_is_white() {
        let result = checker(true);
        assert_eq!(PreviewMode::Single.paint(&result, 1, 0), Some(('#', WHITE)));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("triple".parse::<PreviewMode>().is_err());
        assert_eq!(PreviewMode::Path2.to_string(), "path2");
    }
}
