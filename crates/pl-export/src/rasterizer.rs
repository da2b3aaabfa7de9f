use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, point};
use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use pl_ascii::ConversionResult;
use pl_core::geometry::GridGeometry;
use rayon::prelude::*;

use crate::ExportError;
use crate::preview::PreviewMode;

/// JPEG quality for raster exports.
pub const JPEG_QUALITY: u8 = 100;

/// Cell-sized alpha masks, one per character.
#[derive(Debug, Default)]
struct GlyphAtlas {
    width: u32,
    height: u32,
    font_size_px: f32,
    glyphs: HashMap<char, Vec<u8>>,
    empty: Vec<u8>,
}

impl GlyphAtlas {
    fn sized_for(geometry: &GridGeometry) -> Self {
        let width = (geometry.cell_width_px.ceil() as u32).max(1);
        let height = (geometry.cell_height_px.ceil() as u32).max(1);
        Self {
            width,
            height,
            font_size_px: geometry.font_size_px,
            glyphs: HashMap::new(),
            empty: vec![0; (width * height) as usize],
        }
    }

    fn matches(&self, geometry: &GridGeometry) -> bool {
        let fresh = Self::sized_for(geometry);
        self.width == fresh.width
            && self.height == fresh.height
            && (self.font_size_px - fresh.font_size_px).abs() < f32::EPSILON
    }

    #[inline(always)]
    fn alpha(&self, ch: char) -> &[u8] {
        self.glyphs.get(&ch).map_or(&self.empty, Vec::as_slice)
    }
}

/// Renders a conversion onto an RGB canvas with a loaded font.
///
/// Glyph masks are cached per cell size and rebuilt when the geometry changes.
pub struct Rasterizer {
    font: FontVec,
    atlas: GlyphAtlas,
}

impl Rasterizer {
    /// Parse `font_data` (TTF/OTF).
    ///
    /// # Errors
    /// `ExportError::InvalidFont` if the data is not a usable font.
    ///
    /// # Example
    /// ```
    /// use pl_export::rasterizer::Rasterizer;
    /// assert!(Rasterizer::new(vec![0, 1, 2, 3]).is_err());
    /// ```
    pub fn new(font_data: Vec<u8>) -> Result<Self, ExportError> {
        let font =
            FontVec::try_from_vec(font_data).map_err(|e| ExportError::InvalidFont(e.to_string()))?;
        Ok(Self {
            font,
            atlas: GlyphAtlas::default(),
        })
    }

    /// Read a font file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
        let raster =
            Self::new(data).with_context(|| format!("Police invalide : {}", path.display()))?;
        log::debug!("Police chargée : {}", path.display());
        Ok(raster)
    }

    /// Rasterise `result` as composited by `mode`, on a black canvas of the
    /// geometry's canvas size.
    ///
    /// # Errors
    /// `ExportError::Encode` if the canvas cannot be allocated.
    pub fn render(
        &mut self,
        result: &ConversionResult,
        mode: PreviewMode,
    ) -> Result<RgbImage, ExportError> {
        self.prepare(result);
        compose(&self.atlas, result, mode)
    }

    fn prepare(&mut self, result: &ConversionResult) {
        if !self.atlas.matches(&result.geometry) {
            self.atlas = GlyphAtlas::sized_for(&result.geometry);
            self.cache_range(' '..='~');
            self.cache_range('\u{00A0}'..='\u{00FF}');
            self.cache_range('\u{2580}'..='\u{259F}');
            log::debug!(
                "Atlas glyphes : {}×{} px, {} glyphes",
                self.atlas.width,
                self.atlas.height,
                self.atlas.glyphs.len()
            );
        }
        // Custom ramps may hold anything.
        let missing: Vec<char> = result
            .full
            .cells
            .iter()
            .map(|c| c.ch)
            .filter(|ch| !self.atlas.glyphs.contains_key(ch))
            .collect();
        for ch in missing {
            self.cache_glyph(ch);
        }
    }

    fn cache_range(&mut self, range: std::ops::RangeInclusive<char>) {
        for ch in range {
            self.cache_glyph(ch);
        }
    }

    fn cache_glyph(&mut self, ch: char) {
        if self.atlas.glyphs.contains_key(&ch) {
            return;
        }
        let font = &self.font;
        let atlas = &mut self.atlas;
        let (w, h) = (atlas.width, atlas.height);
        let mut buffer = vec![0u8; (w * h) as usize];

        let gid = font.glyph_id(ch);
        // .notdef renders as a box; leave those cells empty.
        if gid.0 != 0 {
            let scale = PxScale::from(atlas.font_size_px.max(1.0));
            let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
            let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));
            if let Some(outline) = font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                #[allow(clippy::cast_possible_wrap)]
                outline.draw(|x, y, v| {
                    let px = x as i32 + bounds.min.x as i32;
                    let py = y as i32 + bounds.min.y as i32;
                    if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < h {
                        let idx = (py as u32 * w + px as u32) as usize;
                        buffer[idx] = buffer[idx].max((v * 255.0).round() as u8);
                    }
                });
            }
        }
        atlas.glyphs.insert(ch, buffer);
    }
}

/// Blend every painted cell onto black. Parallel over canvas pixel rows.
fn compose(
    atlas: &GlyphAtlas,
    result: &ConversionResult,
    mode: PreviewMode,
) -> Result<RgbImage, ExportError> {
    let geometry = &result.geometry;
    let (width, height) = (geometry.canvas_width_px, geometry.canvas_height_px);
    let stride = width as usize * 3;
    let mut data = vec![0u8; stride * height as usize];
    if stride == 0 {
        return Err(ExportError::Encode("empty canvas".into()));
    }

    data.par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(py, line)| {
            let row = (py as f32 / geometry.cell_height_px) as u32;
            if row >= geometry.rows {
                return;
            }
            let local_y = py.saturating_sub((row as f32 * geometry.cell_height_px) as usize);
            if local_y >= atlas.height as usize {
                return;
            }
            for px in 0..width as usize {
                let column = (px as f32 / geometry.cell_width_px) as u32;
                if column >= geometry.columns {
                    break;
                }
                let Some((ch, (r, g, b))) = mode.paint(result, column, row) else {
                    continue;
                };
                let local_x = px.saturating_sub((column as f32 * geometry.cell_width_px) as usize);
                if local_x >= atlas.width as usize {
                    continue;
                }
                let alpha = atlas.alpha(ch)[local_y * atlas.width as usize + local_x];
                if alpha == 0 {
                    continue;
                }
                let a = f32::from(alpha) / 255.0;
                let out = &mut line[px * 3..px * 3 + 3];
                out[0] = (f32::from(r) * a) as u8;
                out[1] = (f32::from(g) * a) as u8;
                out[2] = (f32::from(b) * a) as u8;
            }
        });

    RgbImage::from_raw(width, height, data)
        .ok_or_else(|| ExportError::Encode(format!("canvas {width}×{height} invalide")))
}

/// Encode `img` by the extension of `path`: `.jpg`/`.jpeg` at quality 100, or `.png`.
///
/// The file is only written once encoding has succeeded.
///
/// # Errors
/// Returns an error for an unknown extension, an encoder failure or an I/O failure.
pub fn save_raster(img: &RgbImage, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mut bytes = Cursor::new(Vec::new());
    match ext.as_str() {
        "jpg" | "jpeg" => img
            .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY))
            .map_err(|e| ExportError::Encode(e.to_string()))?,
        "png" => img
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| ExportError::Encode(e.to_string()))?,
        other => {
            return Err(ExportError::Encode(format!(
                "extension '{other}' non supportée (jpg|jpeg|png)"
            ))
            .into());
        }
    }

    std::fs::write(path, bytes.into_inner())
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "Image exportée : {} ({}×{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_ascii::convert_with_geometry;
    use pl_core::config::{CharsetChoice, ConversionConfig};
    use pl_core::frame::FrameBuffer;

    fn geometry() -> GridGeometry {
        GridGeometry {
            columns: 2,
            rows: 1,
            cell_width_px: 4.0,
            cell_height_px: 4.0,
            font_size_px: 4.0,
            canvas_width_px: 10,
            canvas_height_px: 6,
            physical_size_mm: None,
        }
    }

    fn result(grayscale: bool) -> ConversionResult {
        let frame = FrameBuffer::from_rgb_pixels(2, 1, &[(0, 0, 0), (255, 255, 255)]).unwrap();
        let config = ConversionConfig {
            grayscale,
            charset: CharsetChoice::Custom(".@#".into()),
            ..ConversionConfig::default()
        };
        convert_with_geometry(&frame, &config, geometry()).unwrap()
    }

    fn solid_atlas() -> GlyphAtlas {
        let mut atlas = GlyphAtlas::sized_for(&geometry());
        atlas.glyphs.insert('@', vec![255; 16]);
        atlas.glyphs.insert('#', vec![255; 16]);
        atlas
    }

    #[test]
    fn invalid_font_is_rejected() {
        assert!(matches!(
            Rasterizer::new(b"definitely not a font".to_vec()),
            Err(ExportError::InvalidFont(_))
        ));
    }

    #[test]
    fn compose_paints_cells_on_black() {
        let img = compose(&solid_atlas(), &result(true), PreviewMode::Single).unwrap();
        assert_eq!(img.dimensions(), (10, 6));
        assert_eq!(img.get_pixel(5, 1).0, [255, 255, 255]);
        // '.' has no mask in this atlas.
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0]);
        // Outside the grid extent.
        assert_eq!(img.get_pixel(9, 5).0, [0, 0, 0]);
    }

    #[test]
    fn dual_mode_uses_pen_ink() {
        let img = compose(&solid_atlas(), &result(false), PreviewMode::Dual).unwrap();
        assert_eq!(img.get_pixel(6, 2).0, [0, 0, 255]);
    }

    #[test]
    fn grayscale_dual_still_uses_pen_inks() {
        let img = compose(&solid_atlas(), &result(true), PreviewMode::Dual).unwrap();
        assert_eq!(img.get_pixel(6, 2).0, [0, 0, 255]);
        // '.' on the dark cell has no mask here.
        assert_eq!(img.get_pixel(2, 2).0, [0, 0, 0]);
    }

    #[test]
    fn path2_hides_pen1_cells() {
        let img = compose(&solid_atlas(), &result(false), PreviewMode::Path2).unwrap();
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn save_raster_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbImage::from_pixel(8, 8, image::Rgb([200, 100, 50]));

        let jpg = dir.path().join("ascii-art.jpg");
        save_raster(&img, &jpg).unwrap();
        let bytes = std::fs::read(&jpg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let png = dir.path().join("ascii-art.PNG");
        save_raster(&img, &png).unwrap();
        assert_eq!(&std::fs::read(&png).unwrap()[1..4], b"PNG");
    }

    #[test]
    fn unknown_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ascii-art.webp");
        let img = RgbImage::new(2, 2);
        assert!(save_raster(&img, &path).is_err());
        assert!(!path.exists());
    }
}
