use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Above this sigma the Gaussian is approximated by three box passes.
const BOX_BLUR_MIN_SIGMA: f32 = 2.0;

/// Blur a single-channel coverage mask with a Gaussian of standard deviation `sigma`.
///
/// Small sigmas use an exact Q16 kernel; larger ones use a triple box blur whose
/// cost does not grow with the radius. Pixels outside the mask read as zero.
pub fn blur_alpha_mask(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> WatermarkResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| WatermarkError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(WatermarkError::render(
            "blur_alpha_mask expects src matching width*height",
        ));
    }
    if !sigma.is_finite() || sigma <= 0.0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let (w, h) = (width as usize, height as usize);
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    if sigma < BOX_BLUR_MIN_SIGMA {
        let radius = gaussian_radius(sigma);
        let kernel = gaussian_kernel_q16(radius, sigma)?;
        horizontal_pass(src, &mut tmp, w, h, &kernel);
        vertical_pass(&tmp, &mut out, w, h, &kernel);
        return Ok(out);
    }

    let r = box_radius(sigma);
    out.copy_from_slice(src);
    for _ in 0..3 {
        box_pass_horizontal(&out, &mut tmp, w, h, r);
        std::mem::swap(&mut out, &mut tmp);
    }
    for _ in 0..3 {
        box_pass_vertical(&out, &mut tmp, w, h, r);
        std::mem::swap(&mut out, &mut tmp);
    }
    Ok(out)
}

/// Distance a blur of `sigma` visibly reaches.
pub fn blur_extent(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    if sigma < BOX_BLUR_MIN_SIGMA {
        gaussian_radius(sigma)
    } else {
        3 * box_radius(sigma) as u32
    }
}

fn gaussian_radius(sigma: f32) -> u32 {
    (sigma * 3.0).ceil().max(1.0) as u32
}

fn box_radius(sigma: f32) -> usize {
    let d = (f64::from(sigma) * 3.0 * (2.0 * std::f64::consts::PI).sqrt() / 4.0 + 0.5).floor();
    ((d as usize) / 2).max(1)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> WatermarkResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(WatermarkError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x as isize + ki as isize - radius;
                if sx >= 0 && (sx as usize) < w {
                    acc += u64::from(kw) * u64::from(row[sx as usize]);
                }
            }
            dst[y * w + x] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y as isize + ki as isize - radius;
                if sy >= 0 && (sy as usize) < h {
                    acc += u64::from(kw) * u64::from(src[sy as usize * w + x]);
                }
            }
            dst[y * w + x] = q16_to_u8(acc);
        }
    }
}

fn box_pass_horizontal(src: &[u8], dst: &mut [u8], w: usize, h: usize, r: usize) {
    let size = (2 * r + 1) as u32;
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        let out = &mut dst[y * w..(y + 1) * w];
        let mut sum: u32 = row.iter().take(r.min(w)).map(|&v| u32::from(v)).sum();
        for x in 0..w {
            if x + r < w {
                sum += u32::from(row[x + r]);
            }
            out[x] = ((sum + size / 2) / size) as u8;
            if x >= r {
                sum -= u32::from(row[x - r]);
            }
        }
    }
}

fn box_pass_vertical(src: &[u8], dst: &mut [u8], w: usize, h: usize, r: usize) {
    let size = (2 * r + 1) as u32;
    for x in 0..w {
        let mut sum: u32 = (0..r.min(h)).map(|y| u32::from(src[y * w + x])).sum();
        for y in 0..h {
            if y + r < h {
                sum += u32::from(src[(y + r) * w + x]);
            }
            dst[y * w + x] = ((sum + size / 2) / size) as u8;
            if y >= r {
                sum -= u32::from(src[(y - r) * w + x]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}
