use pl_core::config::ConversionConfig;
use pl_core::error::GeometryError;
use pl_core::geometry::GridGeometry;
use pl_core::media::{FONT_ASPECT_RATIO, MediaMode, pen_width_px};

/// Auto-mode lower bound on columns and rows.
pub const MIN_AUTO_CHARS: u32 = 10;

/// Reference image side for Auto-mode density normalization.
///
/// Empirical: keeps perceived density roughly constant across image sizes.
pub const DENSITY_REFERENCE_PX: f32 = 500.0;

/// Derive the character grid for an image under `config`.
///
/// # Errors
/// `GeometryError` on zero image dimensions, a non-positive pen size,
/// a degenerate media size or a zero target aspect ratio.
///
/// # Example
/// ```
/// use pl_ascii::geometry::resolve;
/// use pl_core::config::ConversionConfig;
/// let config = ConversionConfig { resolution: 0.1, ..ConversionConfig::default() };
/// let g = resolve(1000, 1000, &config).unwrap();
/// assert_eq!((g.columns, g.rows), (200, 333));
/// ```
pub fn resolve(
    image_width: u32,
    image_height: u32,
    config: &ConversionConfig,
) -> Result<GridGeometry, GeometryError> {
    if image_width == 0 || image_height == 0 {
        return Err(GeometryError::InvalidImageDimensions {
            width: image_width,
            height: image_height,
        });
    }
    let geometry = match config.media {
        MediaMode::Auto => resolve_auto(image_width, image_height, config.resolution),
        MediaMode::FixedMedia {
            width_px,
            height_px,
            width_mm,
            height_mm,
        } => resolve_fixed(
            image_width,
            image_height,
            (width_px, height_px),
            (width_mm, height_mm),
            config.pen_size_cm,
        )?,
    };
    log::debug!(
        "Géométrie : {}×{} chars, cellule {:.2}×{:.2} px, police {:.2} px",
        geometry.columns,
        geometry.rows,
        geometry.cell_width_px,
        geometry.cell_height_px,
        geometry.font_size_px
    );
    Ok(geometry)
}

/// Free-resolution sizing: the output surface is the image itself.
fn resolve_auto(image_width: u32, image_height: u32, resolution: f32) -> GridGeometry {
    let w = image_width as f32;
    let h = image_height as f32;
    let adjusted = resolution * (w.min(h) / DENSITY_REFERENCE_PX);

    let columns = clamp_auto((w * adjusted).floor(), image_width);
    let rows = clamp_auto((h * adjusted / FONT_ASPECT_RATIO).floor(), image_height);

    let cell_width_px = w / columns as f32;
    let cell_height_px = h / rows as f32;

    GridGeometry {
        columns,
        rows,
        cell_width_px,
        cell_height_px,
        font_size_px: fitting_font_size(cell_width_px, cell_height_px),
        canvas_width_px: image_width,
        canvas_height_px: image_height,
        physical_size_mm: None,
    }
}

/// Clamp an Auto-mode count to `[MIN_AUTO_CHARS, dimension / 2]`.
/// The lower bound wins for images narrower than 20 px.
fn clamp_auto(count: f32, dimension: u32) -> u32 {
    let upper = dimension / 2;
    (count.max(0.0) as u32).min(upper).max(MIN_AUTO_CHARS)
}

/// Paper + pen sizing: largest grid that fits the media and keeps the image's
/// visual aspect once rendered with non-square glyphs.
fn resolve_fixed(
    image_width: u32,
    image_height: u32,
    (media_w, media_h): (u32, u32),
    physical_mm: (f32, f32),
    pen_size_cm: f32,
) -> Result<GridGeometry, GeometryError> {
    if media_w == 0 || media_h == 0 {
        return Err(GeometryError::InvalidMedia {
            width: media_w,
            height: media_h,
        });
    }

    let pen_w = pen_width_px(pen_size_cm);
    if !pen_w.is_finite() || pen_w <= 0.0 {
        return Err(GeometryError::ZeroPenWidth { pen_size_cm });
    }
    let pen_h = pen_w / FONT_ASPECT_RATIO;

    let media_w_f = media_w as f32;
    let media_h_f = media_h as f32;
    let max_cols = media_w_f / pen_w;
    let max_rows = media_h_f / pen_h;

    let target = (image_width as f32 / image_height as f32) / FONT_ASPECT_RATIO;
    if !target.is_finite() || target <= 0.0 {
        return Err(GeometryError::ZeroAspectRatio);
    }

    let mut rows = max_rows.min(max_cols / target).max(1.0).floor();
    let mut cols = (rows * target).max(1.0).floor();

    // Flooring can push columns past the paper width.
    if cols > max_cols {
        cols = max_cols.max(1.0).floor();
        rows = (cols / target).max(1.0).floor();
    }
    if rows > max_rows {
        rows = max_rows.max(1.0).floor();
        cols = (rows * target).max(1.0).floor();
    }

    // Final clamp: the two corrections above are not enough on their own.
    let columns = (cols as u32).min(max_cols.floor() as u32).max(1);
    let rows = (rows as u32).min(max_rows.floor() as u32).max(1);

    // Cells are pen-sized, shrunk only when a 1-char grid is wider than the paper.
    let cell_width_px = pen_w.min(media_w_f / columns as f32);
    let cell_height_px = pen_h.min(media_h_f / rows as f32);

    Ok(GridGeometry {
        columns,
        rows,
        cell_width_px,
        cell_height_px,
        font_size_px: fitting_font_size(cell_width_px, cell_height_px),
        canvas_width_px: media_w,
        canvas_height_px: media_h,
        physical_size_mm: Some(physical_mm),
    })
}

/// Largest monospace font whose glyph fits the cell.
#[inline]
fn fitting_font_size(cell_width_px: f32, cell_height_px: f32) -> f32 {
    (cell_width_px / FONT_ASPECT_RATIO).min(cell_height_px)
}
