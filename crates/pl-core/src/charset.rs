use crate::error::CoreError;

/// 10 caractères, compact, bon contraste. Default ramp.
pub const CHARSET_STANDARD: &str = " .:-=+*#%@";

/// 15 caractères, plus de niveaux intermédiaires.
pub const CHARSET_DETAILED: &str = " .,:;i1tfLCG08@";

/// Blocs Unicode, pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Minimal, haut contraste.
pub const CHARSET_MINIMAL: &str = " .:█";

/// Named built-in ramps, in UI order.
pub const CHARSET_PRESETS: &[(&str, &str)] = &[
    ("standard", CHARSET_STANDARD),
    ("detailed", CHARSET_DETAILED),
    ("blocks", CHARSET_BLOCKS),
    ("minimal", CHARSET_MINIMAL),
];

/// Look up a built-in ramp by name (case-insensitive).
///
/// # Example
/// ```
/// use pl_core::charset::preset;
/// assert_eq!(preset("Blocks"), Some(" ░▒▓█"));
/// assert_eq!(preset("nope"), None);
/// ```
#[must_use]
pub fn preset(name: &str) -> Option<&'static str> {
    CHARSET_PRESETS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, ramp)| *ramp)
}

/// Ordered glyph ramp, lightest (index 0) to darkest (index N−1).
///
/// Immutable once built; one ramp serves a whole conversion pass.
///
/// # Example
/// ```
/// use pl_core::charset::CharacterRamp;
/// let ramp = CharacterRamp::new(" .:#@").unwrap();
/// assert_eq!(ramp.len(), 5);
/// assert_eq!(ramp.glyph(0), ' ');
/// assert_eq!(ramp.glyph(4), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterRamp {
    chars: Vec<char>,
}

impl CharacterRamp {
    /// Build a ramp from a string ordered lightest→densest.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the string is empty.
    pub fn new(ramp: &str) -> Result<Self, CoreError> {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::Config(
                "character ramp must contain at least one glyph".into(),
            ));
        }
        Ok(Self { chars })
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Index of the last glyph, `N − 1`. Zero for a one-glyph ramp.
    #[inline(always)]
    #[must_use]
    pub fn max_index(&self) -> usize {
        self.chars.len() - 1
    }

    /// Glyph at `index`, clamped to the last glyph.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, index: usize) -> char {
        self.chars[index.min(self.max_index())]
    }

    /// Glyphs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}
