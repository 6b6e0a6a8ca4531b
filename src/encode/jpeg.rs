use image::{ExtendedColorType, codecs::jpeg::JpegEncoder};

use crate::{
    foundation::error::{WatermarkError, WatermarkResult},
    foundation::math::mul_div255_u8,
    render::RasterImage,
};

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded output image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl EncodedImage {
    /// MIME type of [`EncodedImage::bytes`].
    pub fn mime(&self) -> &'static str {
        "image/jpeg"
    }

    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        "jpg"
    }
}

/// Encode a raster as baseline JPEG at `quality` (1..=100).
///
/// JPEG has no alpha channel; translucent pixels come out as if composited over black.
pub fn encode_jpeg(raster: &RasterImage, quality: u8) -> WatermarkResult<EncodedImage> {
    if !(1..=100).contains(&quality) {
        return Err(WatermarkError::validation(format!(
            "jpeg quality must be in 1..=100, got {quality}"
        )));
    }
    let expected = (raster.width as usize)
        .checked_mul(raster.height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| WatermarkError::encode("raster size overflow"))?;
    if raster.data.len() != expected {
        return Err(WatermarkError::encode(format!(
            "raster byte length {} does not match {}x{}",
            raster.data.len(),
            raster.width,
            raster.height
        )));
    }

    let mut rgb = Vec::with_capacity(expected / 4 * 3);
    for px in raster.data.chunks_exact(4) {
        if raster.premultiplied {
            rgb.extend_from_slice(&px[..3]);
        } else {
            let a = u16::from(px[3]);
            rgb.extend(px[..3].iter().map(|&c| mul_div255_u8(u16::from(c), a)));
        }
    }

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder
        .encode(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| WatermarkError::encode(e.to_string()))?;

    tracing::debug!(
        width = raster.width,
        height = raster.height,
        quality,
        len = bytes.len(),
        "encoded jpeg"
    );
    Ok(EncodedImage {
        bytes,
        width: raster.width,
        height: raster.height,
    })
}
