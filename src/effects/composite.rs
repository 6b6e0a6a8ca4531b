use crate::{
    effects::blur::{blur_alpha_mask, blur_extent},
    foundation::error::{WatermarkError, WatermarkResult},
    foundation::math::{mul_div255_u8, mul_div255_u16},
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// [`over`] applied pixelwise across two equal-length buffers.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> WatermarkResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WatermarkError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Inclusive-exclusive pixel bounds `(x0, y0, x1, y1)` of non-transparent pixels.
pub fn alpha_bounds(rgba: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let w = width as usize;
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height as usize {
        let row = rgba.get(y * w * 4..(y + 1) * w * 4)?;
        let first = row.chunks_exact(4).position(|px| px[3] != 0);
        let Some(first) = first else { continue };
        let last = row.chunks_exact(4).rposition(|px| px[3] != 0).unwrap_or(first);
        let (x0, x1, y) = (first as u32, last as u32 + 1, y as u32);
        bounds = Some(match bounds {
            None => (x0, y, x1, y + 1),
            Some((bx0, by0, bx1, _)) => (bx0.min(x0), by0, bx1.max(x1), y + 1),
        });
    }
    bounds
}

/// Parameters of a drop shadow in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowParams {
    /// Premultiplied shadow color.
    pub color: PremulRgba8,
    /// Gaussian standard deviation.
    pub sigma: f32,
    /// Displacement, already rounded to whole pixels.
    pub dx: i32,
    /// Vertical displacement.
    pub dy: i32,
}

/// Composite the drop shadow of `layer` (a full-canvas premultiplied buffer) onto `dst`.
///
/// Only the layer's alpha is used. The blur runs over the layer's visible bounds
/// expanded by the blur reach, so cost tracks the size of the drawn shape.
pub fn shadow_over_in_place(
    dst: &mut [u8],
    layer: &[u8],
    width: u32,
    height: u32,
    shadow: ShadowParams,
) -> WatermarkResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| WatermarkError::render("shadow buffer size overflow"))?;
    if dst.len() != expected || layer.len() != expected {
        return Err(WatermarkError::render(
            "shadow_over_in_place expects canvas-sized rgba8 buffers",
        ));
    }
    if shadow.color[3] == 0 {
        return Ok(());
    }
    let Some((bx0, by0, bx1, by1)) = alpha_bounds(layer, width, height) else {
        return Ok(());
    };

    let pad = blur_extent(shadow.sigma) as i64;
    let rx0 = i64::from(bx0) - pad;
    let ry0 = i64::from(by0) - pad;
    let rw = (i64::from(bx1 - bx0) + 2 * pad) as u32;
    let rh = (i64::from(by1 - by0) + 2 * pad) as u32;

    let mut mask = vec![0u8; rw as usize * rh as usize];
    for my in 0..rh as i64 {
        let sy = ry0 + my;
        if sy < 0 || sy >= i64::from(height) {
            continue;
        }
        for mx in 0..rw as i64 {
            let sx = rx0 + mx;
            if sx < 0 || sx >= i64::from(width) {
                continue;
            }
            mask[(my * i64::from(rw) + mx) as usize] =
                layer[((sy * i64::from(width) + sx) * 4 + 3) as usize];
        }
    }
    let mask = blur_alpha_mask(&mask, rw, rh, shadow.sigma)?;

    let w = i64::from(width);
    for my in 0..rh as i64 {
        let ty = ry0 + my + i64::from(shadow.dy);
        if ty < 0 || ty >= i64::from(height) {
            continue;
        }
        for mx in 0..rw as i64 {
            let tx = rx0 + mx + i64::from(shadow.dx);
            if tx < 0 || tx >= w {
                continue;
            }
            let m = mask[(my * i64::from(rw) + mx) as usize];
            if m == 0 {
                continue;
            }
            let src = shadow.color.map(|c| mul_div255_u16(u16::from(c), u16::from(m)) as u8);
            let i = ((ty * w + tx) * 4) as usize;
            let out = over([dst[i], dst[i + 1], dst[i + 2], dst[i + 3]], src, 1.0);
            dst[i..i + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}
