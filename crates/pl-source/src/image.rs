use std::path::Path;

use anyhow::{Context, Result};
use pl_core::error::ImageError;
use pl_core::frame::FrameBuffer;

/// Decode an encoded image (PNG, JPEG, BMP, GIF) from memory.
///
/// # Errors
/// `ImageError::Decode` if the format is not recognised or the data is corrupt,
/// `ImageError::InvalidDimensions` for a zero-sized image.
///
/// # Example
/// ```
/// use pl_source::image::decode_image;
/// assert!(decode_image(b"not an image").is_err());
/// ```
pub fn decode_image(bytes: &[u8]) -> Result<FrameBuffer, ImageError> {
    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameBuffer::from_rgba(width, height, rgba.into_raw())
}

/// Load an image from disk.
///
/// Any failure leaves the caller's previous frame untouched.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded, or has zero dimensions.
/// The root cause is an [`ImageError`] when decoding fails.
///
/// # Example
/// ```no_run
/// use pl_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
    let frame =
        decode_image(&bytes).with_context(|| format!("Impossible de charger {}", path.display()))?;
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        frame.width,
        frame.height
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(px));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_into_rgba() {
        let frame = decode_image(&png_bytes(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixel(2, 1), (10, 20, 30, 255));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_image(&[0x00, 0x01, 0x02]),
            Err(ImageError::Decode(_))
        ));
    }

    #[test]
    fn load_image_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.png");
        std::fs::write(&path, png_bytes(4, 4, [255, 255, 255, 255])).unwrap();
        let frame = load_image(&path).unwrap();
        assert_eq!(frame.data.len(), 4 * 4 * 4);
    }

    #[test]
    fn load_image_keeps_image_error_as_root_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG garbage").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(err.downcast_ref::<ImageError>().is_some());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_image(Path::new("/nonexistent/plotscii.png")).is_err());
    }
}
