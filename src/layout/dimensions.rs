use crate::{
    foundation::core::Canvas,
    foundation::error::{WatermarkError, WatermarkResult},
    settings::model::{ResizeMode, WatermarkSettings},
};

/// Resolve the output canvas size from the native size and the resize policy.
///
/// - `original`: native size.
/// - `fixed-long-edge`: both axes scaled by `resizeLongEdge / max(w, h)` and rounded.
///   A zero target keeps the native size.
/// - `manual`: `resizeWidth` / `resizeHeight` verbatim; an unset or zero axis keeps its
///   native value. Aspect ratio is not enforced.
///
/// Fails with [`WatermarkError::InvalidDimension`] if either resolved axis is zero.
pub fn resolve_dimensions(
    native_width: u32,
    native_height: u32,
    settings: &WatermarkSettings,
) -> WatermarkResult<Canvas> {
    let (w, h) = match settings.resize_mode {
        ResizeMode::Original => (i64::from(native_width), i64::from(native_height)),
        ResizeMode::FixedLongEdge => {
            fit_long_edge(native_width, native_height, settings.resize_long_edge)
        }
        ResizeMode::Manual => (
            manual_axis(settings.resize_width, native_width),
            manual_axis(settings.resize_height, native_height),
        ),
    };

    if w <= 0 || h <= 0 {
        return Err(WatermarkError::invalid_dimension(w, h));
    }
    let width = u32::try_from(w).map_err(|_| WatermarkError::invalid_dimension(w, h))?;
    let height = u32::try_from(h).map_err(|_| WatermarkError::invalid_dimension(w, h))?;
    Ok(Canvas::new(width, height))
}

fn fit_long_edge(native_width: u32, native_height: u32, target: u32) -> (i64, i64) {
    let long_side = native_width.max(native_height);
    if target == 0 || long_side == 0 {
        return (i64::from(native_width), i64::from(native_height));
    }
    let scale = f64::from(target) / f64::from(long_side);
    (
        (f64::from(native_width) * scale).round() as i64,
        (f64::from(native_height) * scale).round() as i64,
    )
}

fn manual_axis(requested: Option<u32>, native: u32) -> i64 {
    match requested {
        Some(v) if v > 0 => i64::from(v),
        _ => i64::from(native),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/dimensions.rs"]
mod tests;
