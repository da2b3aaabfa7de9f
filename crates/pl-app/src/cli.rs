use std::path::PathBuf;

use clap::Parser;
use pl_core::charset::CHARSET_STANDARD;
use pl_core::config::{CharsetChoice, ConversionConfig};
use pl_core::error::CoreError;
use pl_core::media::MediaMode;
use pl_export::PreviewMode;

use crate::export::ExportPlan;

/// plotscii: image to character grid, with dual-pen plotter export.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Densité de caractères en mode auto, [0.05, 0.3].
    #[arg(long)]
    pub resolution: Option<f32>,

    /// Inverser la luminance.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Luma linéaire et glyphes blancs.
    #[arg(long, default_value_t = false)]
    pub grayscale: bool,

    /// Ramp: standard, detailed, blocks, minimal, custom.
    #[arg(long)]
    pub charset: Option<String>,

    /// Ramp used with `--charset custom`, lightest glyph first (index 0), densest last.
    #[arg(long)]
    pub custom_charset: Option<String>,

    /// Output media: auto, a4, a3, a2, a0.
    #[arg(long)]
    pub media: Option<String>,

    /// Pen width in centimeters (fixed media).
    #[arg(long)]
    pub pen: Option<f32>,

    /// Dual-path threshold, [0.1, 0.9].
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Compositing for the raster and the current-view SVG: single, dual, path1, path2.
    #[arg(long, default_value_t = PreviewMode::default())]
    pub preview: PreviewMode,

    /// Write the character grid as plain text.
    #[arg(long)]
    pub txt: Option<PathBuf>,

    /// Write a raster image (.jpg or .png). Requires --font.
    #[arg(long)]
    pub raster: Option<PathBuf>,

    /// Write the current-view SVG.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Write the two-pen plotter SVG.
    #[arg(long)]
    pub plotter_svg: Option<PathBuf>,

    /// Write pen 1 alone as SVG.
    #[arg(long)]
    pub path1_svg: Option<PathBuf>,

    /// Write pen 2 alone as SVG.
    #[arg(long)]
    pub path2_svg: Option<PathBuf>,

    /// TrueType/OpenType font for raster export.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Re-convert and re-export whenever the config file changes.
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// CLI values layered over every loaded config, including hot reloads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub resolution: Option<f32>,
    pub invert: bool,
    pub grayscale: bool,
    pub charset: Option<String>,
    pub custom_charset: Option<String>,
    pub media: Option<String>,
    pub pen: Option<f32>,
    pub threshold: Option<f32>,
}

impl Overrides {
    /// Apply on top of `config`, then clamp.
    ///
    /// # Errors
    /// `CoreError::UnknownPreset` for an unknown charset or media name.
    pub fn apply(&self, config: &mut ConversionConfig) -> Result<(), CoreError> {
        if let Some(v) = self.resolution {
            config.resolution = v;
        }
        if self.invert {
            config.inverted = true;
        }
        if self.grayscale {
            config.grayscale = true;
        }
        match (&self.charset, &self.custom_charset) {
            (Some(name), custom) => {
                let fallback = match &config.charset {
                    CharsetChoice::Custom(ramp) => ramp.as_str(),
                    CharsetChoice::Preset(_) => CHARSET_STANDARD,
                };
                let custom = custom.as_deref().unwrap_or(fallback);
                config.charset = CharsetChoice::from_name(name, custom)?;
            }
            (None, Some(custom)) => config.charset = CharsetChoice::Custom(custom.clone()),
            (None, None) => {}
        }
        if let Some(name) = &self.media {
            config.media = MediaMode::from_name(name)?;
        }
        if let Some(v) = self.pen {
            config.pen_size_cm = v;
        }
        if let Some(v) = self.threshold {
            config.dual_path_threshold = v;
        }
        config.clamp_all();
        Ok(())
    }
}

impl Cli {
    /// Config overrides carried by the flags.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            resolution: self.resolution,
            invert: self.invert,
            grayscale: self.grayscale,
            charset: self.charset.clone(),
            custom_charset: self.custom_charset.clone(),
            media: self.media.clone(),
            pen: self.pen,
            threshold: self.threshold,
        }
    }

    /// Requested export files.
    #[must_use]
    pub fn export_plan(&self) -> ExportPlan {
        ExportPlan {
            text: self.txt.clone(),
            raster: self.raster.clone(),
            svg: self.svg.clone(),
            plotter_svg: self.plotter_svg.clone(),
            path1_svg: self.path1_svg.clone(),
            path2_svg: self.path2_svg.clone(),
            font: self.font.clone(),
            preview: self.preview,
        }
    }
}
