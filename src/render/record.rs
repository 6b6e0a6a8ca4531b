use crate::{
    assets::source::SourceImage,
    effects::enhance::EnhanceFilter,
    foundation::core::{Canvas, Point, Rect, Rgba8},
    foundation::error::WatermarkResult,
    render::surface::{FontSpec, Paint, Shadow, Surface, TextMeasure},
};

/// One draw call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// Filter changed.
    SetFilter(Option<EnhanceFilter>),
    /// Base image drawn at the given native size.
    DrawImage {
        /// Native width of the drawn image.
        width: u32,
        /// Native height of the drawn image.
        height: u32,
    },
    /// Rectangle filled.
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill.
        paint: Paint,
        /// Shadow cast by this draw, if any.
        shadow: Option<Shadow>,
    },
    /// Text drawn.
    FillText {
        /// Drawn string.
        text: String,
        /// Glyph-box top-left.
        origin: Point,
        /// Font request.
        font: FontSpec,
        /// Fill color.
        color: Rgba8,
        /// Shadow cast by this draw, if any.
        shadow: Option<Shadow>,
    },
}

/// Surface that records draw calls instead of rasterizing.
///
/// Text measures as `chars * font size * advance_ratio`, so layout is predictable
/// without any installed fonts.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    advance_ratio: f64,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Default advance per character as a fraction of the font size.
    pub const DEFAULT_ADVANCE_RATIO: f64 = 0.5;

    /// Empty recording for a canvas.
    pub fn new(canvas: Canvas) -> Self {
        Self::with_advance_ratio(canvas, Self::DEFAULT_ADVANCE_RATIO)
    }

    /// Empty recording with a custom per-character advance.
    pub fn with_advance_ratio(canvas: Canvas, advance_ratio: f64) -> Self {
        Self {
            canvas,
            advance_ratio,
            ops: Vec::new(),
        }
    }

    /// Calls recorded so far, in order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take the recorded calls.
    pub fn into_ops(self) -> Vec<SurfaceOp> {
        self.ops
    }
}

impl TextMeasure for RecordingSurface {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WatermarkResult<f64> {
        Ok(text.chars().count() as f64 * font.size_px * self.advance_ratio)
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn set_filter(&mut self, filter: Option<EnhanceFilter>) {
        self.ops.push(SurfaceOp::SetFilter(filter));
    }

    fn draw_image(&mut self, image: &SourceImage) -> WatermarkResult<()> {
        self.ops.push(SurfaceOp::DrawImage {
            width: image.width(),
            height: image.height(),
        });
        Ok(())
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &Paint,
        shadow: Option<&Shadow>,
    ) -> WatermarkResult<()> {
        self.ops.push(SurfaceOp::FillRect {
            rect,
            paint: paint.clone(),
            shadow: shadow.copied(),
        });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Rgba8,
        shadow: Option<&Shadow>,
    ) -> WatermarkResult<()> {
        self.ops.push(SurfaceOp::FillText {
            text: text.to_string(),
            origin,
            font: font.clone(),
            color,
            shadow: shadow.copied(),
        });
        Ok(())
    }
}
