use crate::{
    foundation::error::WatermarkResult,
    layout::scale::ScaleFactor,
    render::surface::{FontSpec, TextMeasure},
    settings::model::LayerSettings,
};

/// Glyph whose advance approximates the line height.
pub const LINE_HEIGHT_REFERENCE: &str = "M";
/// Multiplier applied to the reference glyph's advance.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Measured box of a layer at its resolved font size, in output pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayerMetrics {
    /// Advance width of the layer's text.
    pub width: f64,
    /// Approximate line height: `advance("M") * 1.2`.
    pub height: f64,
    /// `fontSize * scale`.
    pub font_size: f64,
}

impl LayerMetrics {
    /// Font request used both for measuring and drawing this layer.
    pub fn font_spec(&self, layer: &LayerSettings) -> FontSpec {
        FontSpec::new(self.font_size, layer.font_family.as_str())
    }
}

/// Measure a layer. Returns `None` for a disabled or empty layer; callers skip it
/// entirely, background panel included.
pub fn measure_layer<M: TextMeasure + ?Sized>(
    measure: &mut M,
    layer: &LayerSettings,
    scale: ScaleFactor,
) -> WatermarkResult<Option<LayerMetrics>> {
    if !layer.is_drawable() {
        return Ok(None);
    }

    let font_size = scale.px(layer.font_size);
    let font = FontSpec::new(font_size, layer.font_family.as_str());
    let width = measure.measure_text(&layer.text, &font)?;
    let height = measure.measure_text(LINE_HEIGHT_REFERENCE, &font)? * LINE_HEIGHT_FACTOR;

    Ok(Some(LayerMetrics {
        width,
        height,
        font_size,
    }))
}
