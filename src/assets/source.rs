use std::sync::Arc;

use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Decoded source photo in straight-alpha RGBA8.
///
/// Cheap to clone; pixel storage is shared.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: Arc<image::RgbaImage>,
}

impl SourceImage {
    /// Wrap an already-decoded image.
    pub fn new(pixels: image::RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Build from raw straight-alpha RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> WatermarkResult<Self> {
        let pixels = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            WatermarkError::validation(format!(
                "rgba8 buffer does not match {width}x{height} image"
            ))
        })?;
        Ok(Self::new(pixels))
    }

    /// Native width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Native height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Native `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Borrow the pixel buffer.
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}
