use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{self, CHARSET_STANDARD, CharacterRamp};
use crate::error::CoreError;
use crate::media::{DEFAULT_PEN_SIZE_CM, MediaMode};

/// Resolution slider bounds.
pub const RESOLUTION_RANGE: (f32, f32) = (0.05, 0.3);

/// Dual-path threshold bounds.
pub const THRESHOLD_RANGE: (f32, f32) = (0.1, 0.9);

/// Which ramp a conversion uses.
///
/// # Example
/// ```
/// use pl_core::config::CharsetChoice;
/// let c = CharsetChoice::from_name("detailed", "").unwrap();
/// assert_eq!(c.ramp_str(), " .,:;i1tfLCG08@");
/// let custom = CharsetChoice::from_name("custom", "ab").unwrap();
/// assert_eq!(custom.ramp_str(), "ab");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum CharsetChoice {
    /// One of the built-in ramps, by name.
    Preset(String),
    /// User-supplied ramp.
    Custom(String),
}

impl CharsetChoice {
    /// Resolve a charset name; "custom" takes `custom` as the ramp.
    ///
    /// # Errors
    /// `CoreError::UnknownPreset` for an unknown name.
    pub fn from_name(name: &str, custom: &str) -> Result<Self, CoreError> {
        if name.eq_ignore_ascii_case("custom") {
            return Ok(Self::Custom(custom.to_string()));
        }
        charset::preset(name)
            .map(|_| Self::Preset(name.to_ascii_lowercase()))
            .ok_or_else(|| CoreError::UnknownPreset {
                kind: "charset",
                name: name.to_string(),
            })
    }

    /// The ramp string. Unknown preset names fall back to "standard".
    #[must_use]
    pub fn ramp_str(&self) -> &str {
        match self {
            Self::Preset(name) => charset::preset(name).unwrap_or(CHARSET_STANDARD),
            Self::Custom(ramp) => ramp,
        }
    }

    /// Build the ramp.
    ///
    /// # Errors
    /// `CoreError::Config` if the ramp is empty.
    pub fn ramp(&self) -> Result<CharacterRamp, CoreError> {
        CharacterRamp::new(self.ramp_str())
    }
}

impl Default for CharsetChoice {
    fn default() -> Self {
        Self::Preset("standard".into())
    }
}

/// Snapshot consumed by one conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use pl_core::config::ConversionConfig;
/// let config = ConversionConfig::default();
/// assert!((config.resolution - 0.11).abs() < f32::EPSILON);
/// assert!(!config.grayscale);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Character density in Auto mode, [0.05, 0.3].
    pub resolution: f32,
    /// Inverser la luminance.
    pub inverted: bool,
    /// Linear luma + white glyphs instead of colored glyphs.
    pub grayscale: bool,
    /// Ramp selection.
    pub charset: CharsetChoice,
    /// Output sizing.
    pub media: MediaMode,
    /// Pen width in centimeters (fixed media only).
    pub pen_size_cm: f32,
    /// Brightness split between pen 1 (above) and pen 2.
    pub dual_path_threshold: f32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            resolution: 0.11,
            inverted: false,
            grayscale: false,
            charset: CharsetChoice::default(),
            media: MediaMode::Auto,
            pen_size_cm: DEFAULT_PEN_SIZE_CM,
            dual_path_threshold: 0.5,
        }
    }
}

impl ConversionConfig {
    /// Clamp numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    ///
    /// Pen size is left alone: a zero pen is rejected by the geometry resolver.
    pub fn clamp_all(&mut self) {
        self.resolution = self.resolution.clamp(RESOLUTION_RANGE.0, RESOLUTION_RANGE.1);
        self.dual_path_threshold = self
            .dual_path_threshold
            .clamp(THRESHOLD_RANGE.0, THRESHOLD_RANGE.1);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize, Default)]
struct ConfigFile {
    conversion: Option<ConversionSection>,
    media: Option<MediaSection>,
    plotter: Option<PlotterSection>,
}

#[derive(Deserialize)]
struct ConversionSection {
    resolution: Option<f32>,
    inverted: Option<bool>,
    grayscale: Option<bool>,
    charset: Option<String>,
    custom_charset: Option<String>,
}

#[derive(Deserialize)]
struct MediaSection {
    size: Option<String>,
    pen_size_cm: Option<f32>,
}

#[derive(Deserialize)]
struct PlotterSection {
    dual_path_threshold: Option<f32>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error on TOML syntax errors or unknown preset names.
///
/// # Example
/// ```
/// use pl_core::config::parse_config;
/// let config = parse_config("[media]\nsize = \"a4\"\npen_size_cm = 0.5\n").unwrap();
/// assert!((config.pen_size_cm - 0.5).abs() < f32::EPSILON);
/// ```
pub fn parse_config(content: &str) -> Result<ConversionConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = ConversionConfig::default();

    if let Some(c) = file.conversion {
        if let Some(v) = c.resolution {
            config.resolution = v;
        }
        if let Some(v) = c.inverted {
            config.inverted = v;
        }
        if let Some(v) = c.grayscale {
            config.grayscale = v;
        }
        let custom = c.custom_charset.as_deref().unwrap_or(CHARSET_STANDARD);
        match c.charset {
            Some(name) => config.charset = CharsetChoice::from_name(&name, custom)?,
            None if c.custom_charset.is_some() => {
                config.charset = CharsetChoice::Custom(custom.to_string());
            }
            None => {}
        }
    }

    if let Some(m) = file.media {
        if let Some(v) = m.size {
            config.media = MediaMode::from_name(&v)?;
        }
        if let Some(v) = m.pen_size_cm {
            config.pen_size_cm = v;
        }
    }

    if let Some(p) = file.plotter {
        if let Some(v) = p.dual_path_threshold {
            config.dual_path_threshold = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use pl_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConversionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Config invalide dans {}", path.display()))?;
    log::debug!("Config chargée depuis {}: {config:?}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), ConversionConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            "[conversion]\nresolution = 1.5\n[plotter]\ndual_path_threshold = 0.0\n",
        )
        .unwrap();
        assert!((config.resolution - 0.3).abs() < f32::EPSILON);
        assert!((config.dual_path_threshold - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn custom_charset_alone_selects_custom() {
        let config = parse_config("[conversion]\ncustom_charset = \"xo\"\n").unwrap();
        assert_eq!(config.charset, CharsetChoice::Custom("xo".into()));
    }

    #[test]
    fn unknown_media_fails() {
        assert!(parse_config("[media]\nsize = \"b5\"\n").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[conversion]\ngrayscale = true\ninverted = true").unwrap();
        let config = load_config(file.path()).unwrap();
        assert!(config.grayscale);
        assert!(config.inverted);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/plotscii.toml")).is_err());
    }
}
