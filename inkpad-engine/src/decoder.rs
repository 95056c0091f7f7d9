//! Async image decode boundary.
//!
//! Image import is the engine's only suspension point: the scene is never
//! mutated with a partially-decoded image, so the decode completes in full
//! before any object is inserted.

use async_trait::async_trait;

use crate::{EngineError, EngineResult};

/// A fully decoded image, ready for scene insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Source reference the rendering collaborator resolves to pixels.
    pub src: String,
    /// Natural width in pixels.
    pub natural_width: f32,
    /// Natural height in pixels.
    pub natural_height: f32,
}

/// Decodes raw image bytes into a drawable reference.
///
/// The decoded pixel data itself is owned by the rendering collaborator;
/// the engine only ever sees the [`DecodedImage`] reference.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    /// Decode the given bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ImageDecode`] for malformed or unreadable
    /// image data.
    async fn decode(&self, bytes: &[u8]) -> EngineResult<DecodedImage>;
}

/// Default decoder for common raster formats (PNG, JPEG, GIF, WebP, BMP).
///
/// Produces a base64 data URL as the source reference, the same shape the
/// shipped app gets from reading a dropped file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    /// Create a new raster decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageDecoder for RasterDecoder {
    async fn decode(&self, bytes: &[u8]) -> EngineResult<DecodedImage> {
        let format =
            image::guess_format(bytes).map_err(|e| EngineError::ImageDecode(e.to_string()))?;
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| EngineError::ImageDecode(e.to_string()))?;

        use base64::Engine as _;
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        let src = format!("data:{};base64,{payload}", format.to_mime_type());

        #[allow(clippy::cast_precision_loss)]
        Ok(DecodedImage {
            src,
            natural_width: decoded.width() as f32,
            natural_height: decoded.height() as f32,
        })
    }
}
