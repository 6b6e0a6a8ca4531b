use crate::{foundation::math, settings::model::WatermarkSettings};

/// Contrast / saturation / brightness boost applied to the base image.
///
/// The three stages run in that order with each intermediate clamped to `[0, 1]`,
/// matching a `contrast() saturate() brightness()` filter chain.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EnhanceFilter {
    /// Contrast multiplier around mid-gray.
    pub contrast: f64,
    /// Saturation multiplier (luminance-preserving matrix).
    pub saturate: f64,
    /// Linear brightness multiplier.
    pub brightness: f64,
}

impl EnhanceFilter {
    /// The no-op filter.
    pub const IDENTITY: Self = Self {
        contrast: 1.0,
        saturate: 1.0,
        brightness: 1.0,
    };

    /// Derive multipliers from a single `[0, 100]` intensity knob.
    pub fn from_intensity(intensity: u32) -> Self {
        let t = f64::from(intensity.min(100)) / 100.0;
        Self {
            contrast: 1.0 + 0.2 * t,
            saturate: 1.0 + 0.4 * t,
            brightness: 1.0 + 0.1 * t,
        }
    }

    /// Filter for a render, or `None` when auto-enhance is off.
    pub fn for_settings(settings: &WatermarkSettings) -> Option<Self> {
        settings
            .auto_enhance
            .then(|| Self::from_intensity(settings.enhance_intensity()))
    }

    /// Whether every stage is a no-op.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// CSS filter string, e.g. `contrast(1.1) saturate(1.2) brightness(1.05)`.
    pub fn css(&self) -> String {
        format!(
            "contrast({}) saturate({}) brightness({})",
            self.contrast, self.saturate, self.brightness
        )
    }

    /// Apply to straight-alpha RGBA8 pixels. Alpha is untouched.
    pub fn apply_rgba8_straight(&self, rgba: &mut [u8]) {
        if self.is_identity() {
            return;
        }
        let contrast = self.contrast as f32;
        let brightness = self.brightness as f32;
        let m = saturate_matrix(self.saturate as f32);

        for px in rgba.chunks_exact_mut(4) {
            let c = [px[0], px[1], px[2]].map(|v| {
                let v = f32::from(v) / 255.0;
                math::clamp_unit_f32((v - 0.5) * contrast + 0.5)
            });
            for (i, row) in m.iter().enumerate() {
                let s = math::clamp_unit_f32(row[0] * c[0] + row[1] * c[1] + row[2] * c[2]);
                let b = math::clamp_unit_f32(s * brightness);
                px[i] = (b * 255.0).round() as u8;
            }
        }
    }

    /// Apply to premultiplied RGBA8 pixels.
    pub(crate) fn apply_rgba8_premul(&self, rgba: &mut [u8]) {
        if self.is_identity() {
            return;
        }
        math::unpremultiply_rgba8_in_place(rgba);
        self.apply_rgba8_straight(rgba);
        math::premultiply_rgba8_in_place(rgba);
    }
}

impl Default for EnhanceFilter {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/enhance.rs"]
mod tests;
