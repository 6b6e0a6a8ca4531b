use crate::{
    assets::source::SourceImage,
    effects::{
        composite::{ShadowParams, over_in_place, shadow_over_in_place},
        enhance::EnhanceFilter,
    },
    foundation::core::{Canvas, Point, Rect, Rgba8},
    foundation::error::{WatermarkError, WatermarkResult},
    foundation::math::premultiply_rgba8_in_place,
    render::{
        RasterImage,
        fonts::{FontBook, TextBrushRgba8},
        surface::{FontSpec, Paint, Shadow, Surface, TextMeasure},
    },
};

/// Software rasterizer backed by `vello_cpu`, with text shaped through a [`FontBook`].
///
/// The canvas is a premultiplied RGBA8 buffer that starts fully transparent. Every
/// draw call is rasterized into its own layer, then filtered, shadowed, and composited
/// source-over, which mirrors how a 2D canvas applies per-call state.
pub struct CpuSurface<'a> {
    fonts: &'a mut FontBook,
    canvas: Canvas,
    width: u16,
    height: u16,
    data: Vec<u8>,
    filter: Option<EnhanceFilter>,
}

struct GlyphBatch {
    font: vello_cpu::peniko::FontData,
    font_size: f32,
    color: TextBrushRgba8,
    glyphs: Vec<vello_cpu::Glyph>,
}

impl<'a> CpuSurface<'a> {
    /// Transparent surface of `canvas` size.
    pub fn new(fonts: &'a mut FontBook, canvas: Canvas) -> WatermarkResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| WatermarkError::render("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| WatermarkError::render("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(WatermarkError::invalid_dimension(
                i64::from(canvas.width),
                i64::from(canvas.height),
            ));
        }
        let len = canvas
            .pixel_count()
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| WatermarkError::render("surface buffer size overflow"))?;

        Ok(Self {
            fonts,
            canvas,
            width,
            height,
            data: vec![0; len],
            filter: None,
        })
    }

    /// Finish drawing and hand back the premultiplied pixels.
    pub fn into_raster(self) -> RasterImage {
        RasterImage {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data,
            premultiplied: true,
        }
    }

    fn rasterize(&self, draw: impl FnOnce(&mut vello_cpu::RenderContext)) -> Vec<u8> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        draw(&mut ctx);
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }

    fn composite_layer(
        &mut self,
        mut layer: Vec<u8>,
        shadow: Option<&Shadow>,
    ) -> WatermarkResult<()> {
        if let Some(filter) = self.filter {
            filter.apply_rgba8_premul(&mut layer);
        }

        if let Some(shadow) = shadow.filter(|s| s.is_visible()) {
            let mut color = shadow.color.to_premul();
            if let Some(filter) = self.filter {
                filter.apply_rgba8_premul(&mut color);
            }
            let params = ShadowParams {
                color,
                sigma: (shadow.blur / 2.0) as f32,
                dx: shadow.offset_x.round() as i32,
                dy: shadow.offset_y.round() as i32,
            };
            shadow_over_in_place(
                &mut self.data,
                &layer,
                self.canvas.width,
                self.canvas.height,
                params,
            )?;
        }

        over_in_place(&mut self.data, &layer, 1.0)
    }

    fn shape_glyphs(
        &mut self,
        text: &str,
        font: &FontSpec,
        color: Rgba8,
    ) -> WatermarkResult<Vec<GlyphBatch>> {
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = self.fonts.layout(text, font, brush)?;

        let mut batches = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let run_font = run.run().font();
                let font_data =
                    self.fonts
                        .render_font(run_font.data.id(), run_font.data.data(), run_font.index);
                batches.push(GlyphBatch {
                    font: font_data,
                    font_size: run.run().font_size(),
                    color: run.style().brush,
                    glyphs: run
                        .glyphs()
                        .map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        })
                        .collect(),
                });
            }
        }
        Ok(batches)
    }
}

impl TextMeasure for CpuSurface<'_> {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> WatermarkResult<f64> {
        self.fonts.measure(text, font)
    }
}

impl Surface for CpuSurface<'_> {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn set_filter(&mut self, filter: Option<EnhanceFilter>) {
        self.filter = filter.filter(|f| !f.is_identity());
    }

    fn draw_image(&mut self, image: &SourceImage) -> WatermarkResult<()> {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut pixels = if image.dimensions() == (w, h) {
            image.pixels().as_raw().clone()
        } else {
            image::imageops::resize(image.pixels(), w, h, image::imageops::FilterType::Triangle)
                .into_raw()
        };

        if let Some(filter) = self.filter {
            filter.apply_rgba8_straight(&mut pixels);
        }
        premultiply_rgba8_in_place(&mut pixels);
        over_in_place(&mut self.data, &pixels, 1.0)
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &Paint,
        shadow: Option<&Shadow>,
    ) -> WatermarkResult<()> {
        let cpu_rect = vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1);
        let layer = match paint {
            Paint::Solid(color) => self.rasterize(|ctx| {
                ctx.set_paint(to_cpu_color(*color));
                ctx.fill_rect(&cpu_rect);
            }),
            Paint::HorizontalGradient { x0, x1, stops } => {
                let stops: Vec<(f32, vello_cpu::peniko::Color)> = stops
                    .iter()
                    .map(|s| (s.offset.clamp(0.0, 1.0), to_cpu_color(s.color)))
                    .collect();
                let gradient = vello_cpu::peniko::Gradient::new_linear(
                    vello_cpu::kurbo::Point::new(*x0, 0.0),
                    vello_cpu::kurbo::Point::new(*x1, 0.0),
                )
                .with_stops(stops.as_slice());
                self.rasterize(|ctx| {
                    ctx.set_paint(gradient);
                    ctx.fill_rect(&cpu_rect);
                })
            }
        };
        self.composite_layer(layer, shadow)
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Rgba8,
        shadow: Option<&Shadow>,
    ) -> WatermarkResult<()> {
        if text.is_empty() || color.a == 0 {
            return Ok(());
        }
        let batches = self.shape_glyphs(text, font, color)?;
        let layer = self.rasterize(|ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
            for batch in batches {
                let c = batch.color;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                ctx.glyph_run(&batch.font)
                    .font_size(batch.font_size)
                    .fill_glyphs(batch.glyphs.into_iter());
            }
        });
        self.composite_layer(layer, shadow)
    }
}

fn to_cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
