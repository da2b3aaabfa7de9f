use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// DPI used for every px ↔ physical conversion.
pub const DPI: f32 = 96.0;

/// Approx width/height for monospace glyphs.
pub const FONT_ASPECT_RATIO: f32 = 0.6;

/// Centimeters per inch.
pub const CM_PER_INCH: f32 = 2.54;

/// Named paper size at 96 DPI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaPreset {
    /// Lookup key ("a4").
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Width in pixels.
    pub width_px: u32,
    /// Height in pixels.
    pub height_px: u32,
    /// Width in millimeters.
    pub width_mm: f32,
    /// Height in millimeters.
    pub height_mm: f32,
}

impl MediaPreset {
    /// The `MediaMode` for this paper size.
    #[must_use]
    pub fn mode(&self) -> MediaMode {
        MediaMode::FixedMedia {
            width_px: self.width_px,
            height_px: self.height_px,
            width_mm: self.width_mm,
            height_mm: self.height_mm,
        }
    }
}

/// Paper sizes, approximated at 96 DPI.
pub const MEDIA_PRESETS: &[MediaPreset] = &[
    MediaPreset {
        key: "a4",
        name: "A4 (210x297mm)",
        width_px: 794,
        height_px: 1123,
        width_mm: 210.0,
        height_mm: 297.0,
    },
    MediaPreset {
        key: "a3",
        name: "A3 (297x420mm)",
        width_px: 1123,
        height_px: 1587,
        width_mm: 297.0,
        height_mm: 420.0,
    },
    MediaPreset {
        key: "a2",
        name: "A2 (420x594mm)",
        width_px: 1587,
        height_px: 2245,
        width_mm: 420.0,
        height_mm: 594.0,
    },
    MediaPreset {
        key: "a0",
        name: "A0 (841x1189mm)",
        width_px: 3179,
        height_px: 4494,
        width_mm: 841.0,
        height_mm: 1189.0,
    },
];

/// Pen widths offered for plotting, in centimeters.
pub const PEN_SIZES_CM: &[f32] = &[0.5, 0.4, 0.3, 0.2, 0.1];

/// Default pen width (0.3 cm).
pub const DEFAULT_PEN_SIZE_CM: f32 = 0.3;

/// How the output surface is sized.
///
/// # Example
/// ```
/// use pl_core::media::MediaMode;
/// let a4 = MediaMode::from_name("A4").unwrap();
/// assert_eq!(a4.pixel_size(), Some((794, 1123)));
/// assert_eq!(MediaMode::from_name("auto").unwrap(), MediaMode::Auto);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub enum MediaMode {
    /// Output takes the source image size ("Original").
    #[default]
    Auto,
    /// Physical paper, constrained by pen width.
    FixedMedia {
        /// Width in pixels.
        width_px: u32,
        /// Height in pixels.
        height_px: u32,
        /// Width in millimeters.
        width_mm: f32,
        /// Height in millimeters.
        height_mm: f32,
    },
}

impl MediaMode {
    /// Resolve "auto"/"original" or a preset key like "a3".
    ///
    /// # Errors
    /// `CoreError::UnknownPreset` for any other name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        if name.eq_ignore_ascii_case("auto") || name.eq_ignore_ascii_case("original") {
            return Ok(Self::Auto);
        }
        MEDIA_PRESETS
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(name))
            .map(MediaPreset::mode)
            .ok_or_else(|| CoreError::UnknownPreset {
                kind: "media",
                name: name.to_string(),
            })
    }

    /// Media pixel size, `None` in Auto mode.
    #[must_use]
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        match *self {
            Self::Auto => None,
            Self::FixedMedia {
                width_px,
                height_px,
                ..
            } => Some((width_px, height_px)),
        }
    }

    /// Physical size in millimeters, `None` in Auto mode.
    #[must_use]
    pub fn physical_size_mm(&self) -> Option<(f32, f32)> {
        match *self {
            Self::Auto => None,
            Self::FixedMedia {
                width_mm,
                height_mm,
                ..
            } => Some((width_mm, height_mm)),
        }
    }
}

/// Pen width in pixels at [`DPI`].
///
/// # Example
/// ```
/// use pl_core::media::pen_width_px;
/// assert!((pen_width_px(2.54) - 96.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn pen_width_px(pen_size_cm: f32) -> f32 {
    pen_size_cm / CM_PER_INCH * DPI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_media_is_an_error() {
        assert!(matches!(
            MediaMode::from_name("letter"),
            Err(CoreError::UnknownPreset { kind: "media", .. })
        ));
    }

    #[test]
    fn presets_keep_portrait_orientation() {
        for p in MEDIA_PRESETS {
            assert!(p.height_px > p.width_px, "{} n'est pas en portrait", p.key);
            assert!(p.height_mm > p.width_mm);
        }
    }

    #[test]
    fn auto_has_no_physical_size() {
        assert_eq!(MediaMode::Auto.physical_size_mm(), None);
        assert_eq!(
            MediaMode::from_name("a0").unwrap().physical_size_mm(),
            Some((841.0, 1189.0))
        );
    }
}
