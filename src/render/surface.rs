use crate::{
    assets::source::SourceImage,
    effects::enhance::EnhanceFilter,
    foundation::core::{Canvas, Point, Rect, Rgba8},
    foundation::error::WatermarkResult,
};

/// Font request: resolved pixel size plus a CSS-style family list.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Font size in output pixels.
    pub size_px: f64,
    /// Family list, e.g. `"'Noto Sans SC', sans-serif"`.
    pub family: String,
}

impl FontSpec {
    /// Construct a font request.
    pub fn new(size_px: f64, family: impl Into<String>) -> Self {
        Self {
            size_px,
            family: family.into(),
        }
    }
}

/// A color stop on a gradient, `offset` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient axis.
    pub offset: f32,
    /// Straight-alpha color at the stop.
    pub color: Rgba8,
}

/// Fill style for rectangles.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Uniform color.
    Solid(Rgba8),
    /// Linear gradient along the x axis from `x0` to `x1`, padded beyond both ends.
    HorizontalGradient {
        /// Gradient start.
        x0: f64,
        /// Gradient end.
        x1: f64,
        /// Ordered stops.
        stops: Vec<GradientStop>,
    },
}

/// Drop shadow cast by a single draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Straight-alpha shadow color.
    pub color: Rgba8,
    /// Blur amount in output pixels; the Gaussian sigma is half of this.
    pub blur: f64,
    /// Horizontal displacement in output pixels.
    pub offset_x: f64,
    /// Vertical displacement in output pixels.
    pub offset_y: f64,
}

impl Shadow {
    /// A shadow is only drawn if it is visible and displaced or blurred.
    pub fn is_visible(&self) -> bool {
        self.color.a != 0 && (self.blur > 0.0 || self.offset_x != 0.0 || self.offset_y != 0.0)
    }
}

/// Text measurement capability.
pub trait TextMeasure {
    /// Advance width of `text` in output pixels.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WatermarkResult<f64>;
}

/// 2D rasterization surface the compositor draws through.
///
/// The filter set with [`Surface::set_filter`] applies to every subsequent draw call
/// until it is reset with `None`.
pub trait Surface: TextMeasure {
    /// Surface size in pixels.
    fn canvas(&self) -> Canvas;

    /// Set or clear the color filter.
    fn set_filter(&mut self, filter: Option<EnhanceFilter>);

    /// Draw `image` stretched over the whole canvas.
    fn draw_image(&mut self, image: &SourceImage) -> WatermarkResult<()>;

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint, shadow: Option<&Shadow>)
    -> WatermarkResult<()>;

    /// Draw a single line of text with its glyph box top-left at `origin`.
    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Rgba8,
        shadow: Option<&Shadow>,
    ) -> WatermarkResult<()>;
}
