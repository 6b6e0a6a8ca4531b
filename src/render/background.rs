use crate::{
    foundation::core::{LayerBox, Rect, Rgb8, Rgba8},
    foundation::error::WatermarkResult,
    layout::scale::ScaleFactor,
    render::surface::{GradientStop, Paint, Shadow, Surface},
    settings::model::BackgroundSettings,
};

/// Largest accepted `bgBlur`; larger values render as this.
pub const MAX_BG_BLUR: f64 = 50.0;
/// Panel blur above which the panel also casts a soft shadow.
pub const PANEL_SHADOW_MIN_BLUR: f64 = 5.0;

const MIN_FADE: f64 = 0.01;
const MAX_FADE: f64 = 0.4;

/// `bgBlur` normalized to `[0, 1]`.
pub fn blur_factor(blur: f64) -> f64 {
    if blur.is_nan() {
        return 0.0;
    }
    (blur / MAX_BG_BLUR).clamp(0.0, 1.0)
}

/// Fraction of the panel width spent fading on each side, in `[0.01, 0.4]`.
pub fn fade_size(blur: f64) -> f64 {
    (blur_factor(blur) * MAX_FADE).max(MIN_FADE)
}

/// Panel rectangle around a text box: padded, then widened as blur grows.
pub fn panel_rect(text: &LayerBox, bg: &BackgroundSettings, scale: ScaleFactor) -> Rect {
    let padding = scale.px(bg.padding);
    let extra_width = text.w * blur_factor(bg.blur) * 0.5;
    Rect::new(
        text.x - padding - extra_width,
        text.y - padding,
        text.x + text.w + padding + extra_width,
        text.y + text.h + padding,
    )
}

/// Gradient stops at `{0, fade, 1 - fade, 1}`: transparent, opaque, opaque, transparent.
pub fn gradient_stops(bg: &BackgroundSettings) -> [GradientStop; 4] {
    let fade = fade_size(bg.blur) as f32;
    let edge = Rgba8::TRANSPARENT;
    let center = Rgb8::BLACK.with_alpha(bg.opacity);
    [
        GradientStop {
            offset: 0.0,
            color: edge,
        },
        GradientStop {
            offset: fade,
            color: center,
        },
        GradientStop {
            offset: 1.0 - fade,
            color: center,
        },
        GradientStop {
            offset: 1.0,
            color: edge,
        },
    ]
}

/// Soft shadow under the panel, only for blurs above [`PANEL_SHADOW_MIN_BLUR`].
pub fn panel_shadow(bg: &BackgroundSettings, scale: ScaleFactor) -> Option<Shadow> {
    let blur = bg.blur.min(MAX_BG_BLUR);
    (blur > PANEL_SHADOW_MIN_BLUR).then(|| Shadow {
        color: Rgb8::BLACK.with_alpha(0.5),
        blur: scale.px(blur) * 0.5,
        offset_x: 0.0,
        offset_y: 0.0,
    })
}

/// Draw the protection panel behind `text`. Returns the panel rectangle, or `None`
/// when the background is disabled.
pub fn draw_background<S: Surface + ?Sized>(
    surface: &mut S,
    text: &LayerBox,
    bg: &BackgroundSettings,
    scale: ScaleFactor,
) -> WatermarkResult<Option<Rect>> {
    if !bg.enabled {
        return Ok(None);
    }

    let rect = panel_rect(text, bg, scale);
    let paint = Paint::HorizontalGradient {
        x0: rect.x0,
        x1: rect.x1,
        stops: gradient_stops(bg).to_vec(),
    };
    let shadow = panel_shadow(bg, scale);
    surface.fill_rect(rect, &paint, shadow.as_ref())?;
    Ok(Some(rect))
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
