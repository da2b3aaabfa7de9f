use pl_core::frame::FrameBuffer;
use pl_core::geometry::GridGeometry;

/// Linear luma: `(0.299·R + 0.587·G + 0.114·B) / 255`.
///
/// # Example
/// ```
/// use pl_ascii::luminance::linear_luma;
/// assert!(linear_luma(0, 0, 0).abs() < 1e-6);
/// assert!((linear_luma(255, 255, 255) - 1.0).abs() < 1e-5);
/// ```
#[inline(always)]
#[must_use]
pub fn linear_luma(r: u8, g: u8, b: u8) -> f64 {
    (f64::from(r) * 0.299 + f64::from(g) * 0.587 + f64::from(b) * 0.114) / 255.0
}

/// Perceived luminance: channels weighted quadratically, then square-rooted.
///
/// Reads brighter than [`linear_luma`] on saturated colors.
///
/// # Example
/// ```
/// use pl_ascii::luminance::{linear_luma, perceived_luminance};
/// assert!(perceived_luminance(255, 0, 0) > linear_luma(255, 0, 0));
/// ```
#[inline(always)]
#[must_use]
pub fn perceived_luminance(r: u8, g: u8, b: u8) -> f64 {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt()
}

/// Brightness in `[0, 1]` under the grayscale (linear) or color (quadratic) model.
/// Kept in f64 all the way to the glyph index floor.
#[inline(always)]
#[must_use]
pub fn brightness(r: u8, g: u8, b: u8, grayscale: bool) -> f64 {
    let value = if grayscale {
        linear_luma(r, g, b)
    } else {
        perceived_luminance(r, g, b)
    };
    value.clamp(0.0, 1.0)
}

/// `brightness`, replaced by `1 − brightness` when `inverted`.
#[inline(always)]
#[must_use]
pub fn apply_inversion(brightness: f64, inverted: bool) -> f64 {
    if inverted {
        (1.0 - brightness).clamp(0.0, 1.0)
    } else {
        brightness
    }
}

/// Source pixel sampled by cell `(column, row)`.
///
/// Point sampling: `floor(column · W / columns)`, clamped to the image.
///
/// # Example
/// ```
/// use pl_ascii::luminance::source_coords;
/// assert_eq!(source_coords(1, 1, 2, 2, 2, 2), (1, 1));
/// assert_eq!(source_coords(9, 0, 10, 1, 4, 4), (3, 0));
/// ```
#[inline(always)]
#[must_use]
pub fn source_coords(
    column: u32,
    row: u32,
    columns: u32,
    rows: u32,
    image_width: u32,
    image_height: u32,
) -> (u32, u32) {
    let px = u64::from(column) * u64::from(image_width) / u64::from(columns.max(1));
    let py = u64::from(row) * u64::from(image_height) / u64::from(rows.max(1));
    (
        (px as u32).min(image_width.saturating_sub(1)),
        (py as u32).min(image_height.saturating_sub(1)),
    )
}

/// One sampled cell: source color and post-inversion brightness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSample {
    /// Source pixel RGB.
    pub rgb: (u8, u8, u8),
    /// Brightness in `[0, 1]`, already inverted if requested.
    pub brightness: f64,
}

/// Sample the pixel under cell `(column, row)` of `geometry`.
#[inline]
#[must_use]
pub fn sample_cell(
    frame: &FrameBuffer,
    geometry: &GridGeometry,
    column: u32,
    row: u32,
    grayscale: bool,
    inverted: bool,
) -> CellSample {
    let (px, py) = source_coords(
        column,
        row,
        geometry.columns,
        geometry.rows,
        frame.width,
        frame.height,
    );
    let (r, g, b, _) = frame.pixel(px, py);
    CellSample {
        rgb: (r, g, b),
        brightness: apply_inversion(brightness(r, g, b, grayscale), inverted),
    }
}
