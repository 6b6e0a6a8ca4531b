use crate::{
    assets::source::SourceImage,
    effects::enhance::EnhanceFilter,
    foundation::core::{Canvas, LayerBox, Rect},
    foundation::error::WatermarkResult,
    layout::{metrics::measure_layer, scale::ScaleFactor, solver::resolve_origin},
    render::{background::draw_background, surface::Surface, text::draw_text},
    settings::model::{LayerSettings, WatermarkSettings},
};

/// Where a layer ended up on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlacedLayer {
    /// Glyph box in output pixels.
    pub bbox: LayerBox,
    /// Resolved font size in output pixels.
    pub font_size: f64,
    /// Background panel, when one was drawn.
    pub panel: Option<Rect>,
}

/// Summary of one composite: canvas, scale, and placed layers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CompositeReport {
    /// Output canvas.
    pub canvas: Canvas,
    /// Design-to-output scale.
    pub scale: ScaleFactor,
    /// Main layer, if drawn.
    pub main: Option<PlacedLayer>,
    /// Sub layer, if drawn.
    pub sub: Option<PlacedLayer>,
}

/// Draw `source` and the configured watermark layers onto `surface`.
///
/// Order is fixed: filtered base image, then main (panel, text), then sub (panel,
/// text). A linked sub layer is positioned against main's final box, so main is
/// always fully resolved first.
pub fn composite_onto<S: Surface + ?Sized>(
    surface: &mut S,
    source: &SourceImage,
    settings: &WatermarkSettings,
) -> WatermarkResult<CompositeReport> {
    let canvas = surface.canvas();
    let scale = ScaleFactor::for_canvas(canvas);

    let filter = EnhanceFilter::for_settings(settings);
    surface.set_filter(filter);
    surface.draw_image(source)?;
    surface.set_filter(None);

    let main = draw_layer(surface, &settings.main, None, canvas, scale)?;
    let sub = draw_layer(
        surface,
        &settings.sub,
        main.as_ref().map(|m| &m.bbox),
        canvas,
        scale,
    )?;

    tracing::debug!(
        width = canvas.width,
        height = canvas.height,
        scale = scale.get(),
        enhanced = filter.is_some(),
        main = main.is_some(),
        sub = sub.is_some(),
        "composited watermark"
    );

    Ok(CompositeReport {
        canvas,
        scale,
        main,
        sub,
    })
}

fn draw_layer<S: Surface + ?Sized>(
    surface: &mut S,
    layer: &LayerSettings,
    main: Option<&LayerBox>,
    canvas: Canvas,
    scale: ScaleFactor,
) -> WatermarkResult<Option<PlacedLayer>> {
    let Some(metrics) = measure_layer(surface, layer, scale)? else {
        return Ok(None);
    };

    let origin = resolve_origin(
        canvas,
        metrics.width,
        metrics.height,
        &layer.placement,
        main,
        scale,
    );
    let bbox = LayerBox::new(origin.x, origin.y, metrics.width, metrics.height);

    let panel = draw_background(surface, &bbox, &layer.background, scale)?;
    draw_text(surface, layer, origin, &metrics.font_spec(layer), scale)?;

    Ok(Some(PlacedLayer {
        bbox,
        font_size: metrics.font_size,
        panel,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
