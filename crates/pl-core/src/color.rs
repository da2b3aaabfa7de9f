use std::fmt;

/// Plancher par canal : garantit la visibilité sur fond noir.
pub const MIN_CHANNEL: u8 = 40;

/// Color of a grid cell, or the absence of a mark.
///
/// `Transparent` only ever appears in pen paths, paired with a blank glyph.
///
/// # Example
/// ```
/// use pl_core::color::CellColor;
/// assert_eq!(CellColor::Rgb(255, 0, 10).to_string(), "rgb(255, 0, 10)");
/// assert_eq!(CellColor::Transparent.to_string(), "transparent");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellColor {
    /// A real color.
    Rgb(u8, u8, u8),
    /// No mark here.
    Transparent,
}

impl CellColor {
    /// Fixed color emitted in grayscale mode.
    pub const WHITE: Self = Self::Rgb(255, 255, 255);

    /// RGB triple, or `None` for `Transparent`.
    #[must_use]
    pub fn rgb(self) -> Option<(u8, u8, u8)> {
        match self {
            Self::Rgb(r, g, b) => Some((r, g, b)),
            Self::Transparent => None,
        }
    }

    /// RGB triple with `Transparent` resolved to `fallback`.
    #[must_use]
    pub fn rgb_or(self, fallback: (u8, u8, u8)) -> (u8, u8, u8) {
        self.rgb().unwrap_or(fallback)
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "rgb({r}, {g}, {b})"),
            Self::Transparent => f.write_str("transparent"),
        }
    }
}

/// Scale each channel by `factor`, round, then clamp to `[MIN_CHANNEL, 255]`.
///
/// # Example
/// ```
/// use pl_core::color::adjust_brightness;
/// assert_eq!(adjust_brightness(100, 0, 200, 2.0), (200, 40, 255));
/// assert_eq!(adjust_brightness(10, 10, 10, 0.5), (40, 40, 40));
/// ```
#[must_use]
pub fn adjust_brightness(r: u8, g: u8, b: u8, factor: f32) -> (u8, u8, u8) {
    let channel = |c: u8| -> u8 {
        (f32::from(c) * factor)
            .round()
            .clamp(f32::from(MIN_CHANNEL), 255.0) as u8
    };
    (channel(r), channel(g), channel(b))
}
