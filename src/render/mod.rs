pub(crate) mod background;
pub(crate) mod compositor;
pub(crate) mod cpu;
pub(crate) mod fonts;
pub(crate) mod pipeline;
pub(crate) mod record;
pub(crate) mod surface;
pub(crate) mod text;

/// Rendered canvas pixels before encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixels, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied by alpha.
    pub premultiplied: bool,
}
