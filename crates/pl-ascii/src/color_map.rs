use pl_core::charset::CharacterRamp;
use pl_core::color::{CellColor, adjust_brightness};
use pl_core::frame::GridCell;

/// Ramp index for a brightness: `floor(brightness × (N − 1))`.
///
/// Monotonic; 0 maps to the first glyph and 1 to the last.
///
/// # Example
/// ```
/// use pl_ascii::color_map::glyph_index;
/// use pl_core::charset::CharacterRamp;
/// let ramp = CharacterRamp::new(" .:-=+*#%@").unwrap();
/// assert_eq!(glyph_index(0.0, &ramp), 0);
/// assert_eq!(glyph_index(0.5, &ramp), 4);
/// assert_eq!(glyph_index(1.0, &ramp), 9);
/// ```
#[inline(always)]
#[must_use]
pub fn glyph_index(brightness: f64, ramp: &CharacterRamp) -> usize {
    let max = ramp.max_index();
    let scaled = (brightness.clamp(0.0, 1.0) * max as f64).floor();
    (scaled as usize).min(max)
}

/// Density gain in `[0.5, 2.0]`: denser glyphs are drawn brighter.
///
/// A one-glyph ramp has no density range and gets the minimum gain.
#[inline(always)]
#[must_use]
pub fn density_gain(index: usize, ramp: &CharacterRamp) -> f32 {
    let max = ramp.max_index();
    if max == 0 {
        return 0.5;
    }
    (index as f32 / max as f32) * 1.5 + 0.5
}

/// Map a sampled cell to its glyph and display color.
///
/// Grayscale mode always emits white; color mode scales the source RGB by
/// [`density_gain`] and floors each channel at 40.
///
/// # Example
/// ```
/// use pl_ascii::color_map::map_cell;
/// use pl_core::charset::CharacterRamp;
/// use pl_core::color::CellColor;
/// let ramp = CharacterRamp::new(" @").unwrap();
/// let cell = map_cell(1.0, &ramp, (100, 50, 0), false);
/// assert_eq!(cell.ch, '@');
/// assert_eq!(cell.color, CellColor::Rgb(200, 100, 40));
/// ```
#[must_use]
pub fn map_cell(
    brightness: f64,
    ramp: &CharacterRamp,
    (r, g, b): (u8, u8, u8),
    grayscale: bool,
) -> GridCell {
    let index = glyph_index(brightness, ramp);
    let color = if grayscale {
        CellColor::WHITE
    } else {
        let (r, g, b) = adjust_brightness(r, g, b, density_gain(index, ramp));
        CellColor::Rgb(r, g, b)
    };
    GridCell {
        ch: ramp.glyph(index),
        color,
    }
}
