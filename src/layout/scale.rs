use crate::foundation::core::Canvas;

/// Long edge, in output pixels, that design-pixel settings are authored against.
pub const REFERENCE_LONG_EDGE: f64 = 1000.0;

/// Converts design pixels into output pixels: `max(width, height) / 1000`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// Scale factor for an output canvas.
    pub fn for_canvas(canvas: Canvas) -> Self {
        Self(f64::from(canvas.long_edge()) / REFERENCE_LONG_EDGE)
    }

    /// Explicit factor, mainly for layout tests.
    pub fn new(factor: f64) -> Self {
        Self(factor)
    }

    /// Raw factor.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Design pixels to output pixels.
    pub fn px(self, design: f64) -> f64 {
        design * self.0
    }
}
