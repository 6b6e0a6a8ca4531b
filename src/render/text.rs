use crate::{
    foundation::core::{Point, Rgb8, Rgba8},
    foundation::error::WatermarkResult,
    layout::scale::ScaleFactor,
    render::surface::{FontSpec, Shadow, Surface},
    settings::{color::hex_rgb_or_black, model::LayerSettings},
};

/// Fill color: the layer's hex color (black if malformed) at the layer's opacity.
pub fn text_fill(layer: &LayerSettings) -> Rgba8 {
    hex_rgb_or_black(&layer.color).with_alpha(layer.opacity)
}

/// Fixed legibility shadow applied to all watermark text.
pub fn text_shadow(scale: ScaleFactor) -> Shadow {
    Shadow {
        color: Rgb8::BLACK.with_alpha(0.5),
        blur: scale.px(4.0),
        offset_x: scale.px(2.0),
        offset_y: scale.px(2.0),
    }
}

/// Draw a layer's text with its glyph box top-left at `origin`.
pub fn draw_text<S: Surface + ?Sized>(
    surface: &mut S,
    layer: &LayerSettings,
    origin: Point,
    font: &FontSpec,
    scale: ScaleFactor,
) -> WatermarkResult<()> {
    let shadow = text_shadow(scale);
    surface.fill_text(&layer.text, origin, font, text_fill(layer), Some(&shadow))
}
