use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwapOption;
use pl_ascii::{ConversionError, ConversionResult};
use pl_core::config::ConversionConfig;
use pl_core::frame::FrameBuffer;

/// Loaded image plus the latest successful conversion.
///
/// Readers see either the previous result or the new one, never a mix.
#[derive(Default)]
pub struct Session {
    image: Option<Arc<FrameBuffer>>,
    result: ArcSwapOption<ConversionResult>,
}

impl Session {
    /// Replace the image from disk. On failure the previous image and result stay.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        let frame = pl_source::load_image(path)?;
        self.set_image(frame);
        Ok(())
    }

    /// Replace the image. The previous result no longer matches and is dropped.
    pub fn set_image(&mut self, frame: FrameBuffer) {
        self.image = Some(Arc::new(frame));
        self.result.store(None);
    }

    /// Whether an image is loaded.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Run one conversion. Success swaps the result in; failure clears it.
    ///
    /// With no image loaded nothing happens and `Ok(None)` is returned.
    ///
    /// # Errors
    /// The `ConversionError` of the failed attempt.
    pub fn reconvert(
        &self,
        config: &ConversionConfig,
    ) -> Result<Option<Arc<ConversionResult>>, ConversionError> {
        let Some(image) = self.image.as_deref() else {
            log::warn!("Aucune image chargée, conversion ignorée");
            return Ok(None);
        };
        match pl_ascii::convert(image, config) {
            Ok(result) => {
                let result = Arc::new(result);
                self.result.store(Some(Arc::clone(&result)));
                Ok(Some(result))
            }
            Err(e) => {
                self.result.store(None);
                log::error!("Conversion échouée : {e}");
                Err(e)
            }
        }
    }

    /// Latest successful conversion, if any.
    #[must_use]
    pub fn result(&self) -> Option<Arc<ConversionResult>> {
        self.result.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_core::error::GeometryError;
    use pl_core::media::MediaMode;

    fn with_white_image() -> Session {
        let mut session = Session::default();
        session.set_image(FrameBuffer::filled(60, 40, (255, 255, 255)));
        session
    }

    #[test]
    fn reconvert_publishes_result() {
        let session = with_white_image();
        assert!(session.result().is_none());
        let result = session.reconvert(&ConversionConfig::default()).unwrap().unwrap();
        let published = session.result().unwrap();
        assert!(Arc::ptr_eq(&result, &published));
    }

    #[test]
    fn no_image_is_a_no_op() {
        let session = Session::default();
        assert!(session.reconvert(&ConversionConfig::default()).unwrap().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn failed_conversion_clears_result() {
        let session = with_white_image();
        session.reconvert(&ConversionConfig::default()).unwrap();
        let bad = ConversionConfig {
            media: MediaMode::from_name("a4").unwrap(),
            pen_size_cm: 0.0,
            ..ConversionConfig::default()
        };
        let err = session.reconvert(&bad).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Geometry(GeometryError::ZeroPenWidth { .. })
        ));
        assert!(session.result().is_none());
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let mut session = with_white_image();
        session.reconvert(&ConversionConfig::default()).unwrap();
        let before = session.result().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(session.load_image(&path).is_err());

        assert!(session.has_image());
        assert!(Arc::ptr_eq(&before, &session.result().unwrap()));
    }

    #[test]
    fn loading_a_new_image_drops_stale_result() {
        let mut session = with_white_image();
        session.reconvert(&ConversionConfig::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        image::RgbaImage::from_pixel(20, 20, image::Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        session.load_image(&path).unwrap();
        assert!(session.result().is_none());

        let result = session.reconvert(&ConversionConfig::default()).unwrap().unwrap();
        assert_eq!(result.geometry.canvas_width_px, 20);
    }
}
