use anyhow::Context;

use crate::{assets::source::SourceImage, foundation::error::WatermarkResult};

/// Decode any format `image` recognizes into a straight-alpha [`SourceImage`].
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> WatermarkResult<SourceImage> {
    let format = image::guess_format(bytes).context("detect image format")?;
    let dyn_img =
        image::load_from_memory_with_format(bytes, format).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    tracing::debug!(?format, width = rgba.width(), height = rgba.height(), "decoded source");
    Ok(SourceImage::new(rgba))
}
