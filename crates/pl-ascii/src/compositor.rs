use pl_core::charset::CharacterRamp;
use pl_core::config::ConversionConfig;
use pl_core::error::{CoreError, GeometryError, ImageError};
use pl_core::frame::{CharGrid, FrameBuffer};
use pl_core::geometry::GridGeometry;
use thiserror::Error;

use crate::color_map::map_cell;
use crate::geometry;
use crate::luminance::sample_cell;
use crate::partition::partition;

/// Why a conversion attempt produced nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Unusable source image.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// Degenerate sizing inputs.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Unusable character ramp.
    #[error(transparent)]
    Ramp(#[from] CoreError),
}

/// Terminal artifacts of one conversion, consumed by every exporter.
#[derive(Clone, Debug)]
pub struct ConversionResult {
    /// Layout shared by preview and exports.
    pub geometry: GridGeometry,
    /// Every cell, glyph and color.
    pub full: CharGrid,
    /// Cells brighter than the threshold.
    pub pen1: CharGrid,
    /// The complementary cells.
    pub pen2: CharGrid,
    /// Whether the grids were built in grayscale mode.
    pub grayscale: bool,
}

/// Convert `frame` under `config`: resolve geometry, then sample, map and
/// partition every cell.
///
/// Pure: nothing is cached between calls.
///
/// # Errors
/// `ConversionError` on a bad image, degenerate geometry or an empty ramp.
/// No partial result is ever returned.
///
/// # Example
/// ```
/// use pl_ascii::compositor::convert;
/// use pl_core::config::ConversionConfig;
/// use pl_core::frame::FrameBuffer;
///
/// let frame = FrameBuffer::filled(100, 100, (255, 255, 255));
/// let result = convert(&frame, &ConversionConfig::default()).unwrap();
/// assert_eq!(result.full.width, result.geometry.columns);
/// ```
pub fn convert(
    frame: &FrameBuffer,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConversionError> {
    validate_frame(frame)?;
    let geometry = geometry::resolve(frame.width, frame.height, config)?;
    convert_with_geometry(frame, config, geometry)
}

/// Same as [`convert`] but with a caller-chosen layout.
///
/// # Errors
/// `ConversionError` on a bad image, an empty grid or an empty ramp.
pub fn convert_with_geometry(
    frame: &FrameBuffer,
    config: &ConversionConfig,
    geometry: GridGeometry,
) -> Result<ConversionResult, ConversionError> {
    validate_frame(frame)?;
    if geometry.columns == 0 || geometry.rows == 0 {
        return Err(GeometryError::EmptyGrid {
            columns: geometry.columns,
            rows: geometry.rows,
        }
        .into());
    }
    let ramp = config.charset.ramp()?;

    log::info!(
        "Conversion {}×{} px → {}×{} caractères",
        frame.width,
        frame.height,
        geometry.columns,
        geometry.rows
    );

    let (full, pen1, pen2) = build_grids(frame, config, &ramp, &geometry);

    log::debug!(
        "Marques : pen1 = {}, pen2 = {}",
        pen1.mark_count(),
        pen2.mark_count()
    );

    Ok(ConversionResult {
        geometry,
        full,
        pen1,
        pen2,
        grayscale: config.grayscale,
    })
}

fn validate_frame(frame: &FrameBuffer) -> Result<(), ConversionError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(GeometryError::InvalidImageDimensions {
            width: frame.width,
            height: frame.height,
        }
        .into());
    }
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(ImageError::PixelAccess {
            expected,
            actual: frame.data.len(),
        }
        .into());
    }
    Ok(())
}

fn build_grids(
    frame: &FrameBuffer,
    config: &ConversionConfig,
    ramp: &CharacterRamp,
    geometry: &GridGeometry,
) -> (CharGrid, CharGrid, CharGrid) {
    let mut full = CharGrid::new(geometry.columns, geometry.rows);
    let mut pen1 = CharGrid::new(geometry.columns, geometry.rows);
    let mut pen2 = CharGrid::new(geometry.columns, geometry.rows);

    let threshold = f64::from(config.dual_path_threshold);
    for cy in 0..geometry.rows {
        for cx in 0..geometry.columns {
            let sample = sample_cell(frame, geometry, cx, cy, config.grayscale, config.inverted);
            let cell = map_cell(sample.brightness, ramp, sample.rgb, config.grayscale);
            let (a, b) = partition(cell, sample.brightness, threshold);
            full.set(cx, cy, cell);
            pen1.set(cx, cy, a);
            pen2.set(cx, cy, b);
        }
    }

    (full, pen1, pen2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_core::color::CellColor;
    use pl_core::config::CharsetChoice;
    use pl_core::media::MediaMode;

    fn layout(columns: u32, rows: u32) -> GridGeometry {
        GridGeometry {
            columns,
            rows,
            cell_width_px: 1.0,
            cell_height_px: 1.0,
            font_size_px: 1.0,
            canvas_width_px: columns,
            canvas_height_px: rows,
            physical_size_mm: None,
        }
    }

    fn gradient(width: u32, height: u32) -> FrameBuffer {
        let pixels: Vec<(u8, u8, u8)> = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| {
                    let v = ((x + y) * 255 / (width + height - 2).max(1)) as u8;
                    (v, v / 2, 255 - v)
                })
            })
            .collect();
        FrameBuffer::from_rgb_pixels(width, height, &pixels).unwrap()
    }

    #[test]
    fn white_grayscale_image_is_uniformly_densest() {
        let frame = FrameBuffer::filled(100, 100, (255, 255, 255));
        let config = ConversionConfig {
            resolution: 0.1,
            grayscale: true,
            ..ConversionConfig::default()
        };
        let result = convert(&frame, &config).unwrap();
        assert!(result.full.cells.iter().all(|c| c.ch == '@'));
        assert!(result.full.cells.iter().all(|c| c.color == CellColor::WHITE));
    }

    #[test]
    fn white_inverted_image_is_uniformly_lightest() {
        let frame = FrameBuffer::filled(100, 100, (255, 255, 255));
        let config = ConversionConfig {
            resolution: 0.1,
            grayscale: true,
            inverted: true,
            ..ConversionConfig::default()
        };
        let result = convert(&frame, &config).unwrap();
        assert!(result.full.cells.iter().all(|c| c.ch == ' '));
        assert_eq!(result.pen1.mark_count() + result.pen2.mark_count(), 0);
    }

    #[test]
    fn checkerboard_splits_into_diagonals() {
        let black = (0, 0, 0);
        let white = (255, 255, 255);
        let frame = FrameBuffer::from_rgb_pixels(2, 2, &[black, white, white, black]).unwrap();
        let config = ConversionConfig {
            grayscale: true,
            charset: CharsetChoice::Custom(".@".into()),
            dual_path_threshold: 0.5,
            ..ConversionConfig::default()
        };
        let result = convert_with_geometry(&frame, &config, layout(2, 2)).unwrap();

        let pen1: Vec<_> = result.pen1.marks().map(|(x, y, c)| (x, y, c.ch)).collect();
        let pen2: Vec<_> = result.pen2.marks().map(|(x, y, c)| (x, y, c.ch)).collect();
        assert_eq!(pen1, vec![(1, 0, '@'), (0, 1, '@')]);
        assert_eq!(pen2, vec![(0, 0, '.'), (1, 1, '.')]);
    }

    #[test]
    fn pens_overlay_back_to_full_grid() {
        let frame = gradient(64, 48);
        for inverted in [false, true] {
            for grayscale in [false, true] {
                let config = ConversionConfig {
                    resolution: 0.3,
                    inverted,
                    grayscale,
                    dual_path_threshold: 0.4,
                    ..ConversionConfig::default()
                };
                let result = convert(&frame, &config).unwrap();
                for ((full, a), b) in result
                    .full
                    .cells
                    .iter()
                    .zip(&result.pen1.cells)
                    .zip(&result.pen2.cells)
                {
                    let overlay = if a.is_blank() { b } else { a };
                    assert_eq!(overlay.ch, full.ch);
                    if !full.is_blank() {
                        assert!(a.is_blank() ^ b.is_blank());
                    }
                }
            }
        }
    }

    #[test]
    fn fixed_media_grid_matches_resolved_geometry() {
        let frame = gradient(300, 300);
        let config = ConversionConfig {
            media: MediaMode::from_name("a4").unwrap(),
            pen_size_cm: 0.5,
            ..ConversionConfig::default()
        };
        let result = convert(&frame, &config).unwrap();
        assert_eq!((result.full.width, result.full.height), (41, 25));
        assert_eq!(result.pen1.cells.len(), 41 * 25);
    }

    #[test]
    fn empty_custom_ramp_aborts() {
        let frame = gradient(40, 40);
        let config = ConversionConfig {
            charset: CharsetChoice::Custom(String::new()),
            ..ConversionConfig::default()
        };
        assert!(matches!(
            convert(&frame, &config),
            Err(ConversionError::Ramp(CoreError::Config(_)))
        ));
    }

    #[test]
    fn malformed_frame_is_an_image_error() {
        let frame = FrameBuffer {
            data: vec![0; 7],
            width: 2,
            height: 2,
        };
        assert!(matches!(
            convert(&frame, &ConversionConfig::default()),
            Err(ConversionError::Image(ImageError::PixelAccess { .. }))
        ));
    }

    #[test]
    fn zero_sized_frame_is_a_geometry_error() {
        let frame = FrameBuffer::new(0, 5);
        assert!(matches!(
            convert(&frame, &ConversionConfig::default()),
            Err(ConversionError::Geometry(
                GeometryError::InvalidImageDimensions { .. }
            ))
        ));
    }

    #[test]
    fn zero_layout_is_rejected() {
        let frame = gradient(4, 4);
        assert!(matches!(
            convert_with_geometry(&frame, &ConversionConfig::default(), layout(0, 3)),
            Err(ConversionError::Geometry(GeometryError::EmptyGrid { .. }))
        ));
    }
}
