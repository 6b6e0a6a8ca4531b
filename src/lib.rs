//! Watermarq stamps one or two text watermark layers onto raster images.
//!
//! A render is a pure function of `(source pixels, settings, native size)` and runs
//! entirely on the CPU:
//!
//! 1. **Resolve** the output canvas from the resize policy ([`resolve_dimensions`]).
//! 2. **Draw** the source stretched over the canvas, optionally through the
//!    contrast/saturation/brightness [`EnhanceFilter`].
//! 3. **Place** the main layer on a 3x3 anchor grid, then the sub layer either on its
//!    own anchor or linked below main's resolved box.
//! 4. **Paint** each layer's background panel (horizontal gradient fade) and text with
//!    a fixed drop shadow.
//! 5. **Encode** to JPEG ([`encode_jpeg`]).
//!
//! Every size-like setting is authored in design pixels against a 1000px long edge and
//! multiplied by [`ScaleFactor`] at render time, so a watermark looks the same on any
//! output resolution.
//!
//! Layout and compositing talk to pixels only through the [`Surface`] capability.
//! [`CpuSurface`] rasterizes with `vello_cpu` and shapes text with `parley`;
//! [`RecordingSurface`] records draw calls with a deterministic text measure for tests.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same inputs produce byte-identical output.
//! - **Premultiplied RGBA8** end-to-end until the encoder flattens alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod encode;
mod foundation;
mod layout;
mod render;
mod settings;

pub use assets::decode::decode_image;
pub use assets::source::SourceImage;
pub use effects::blur::{blur_alpha_mask, blur_extent};
pub use effects::composite::{
    PremulRgba8, ShadowParams, alpha_bounds, over, over_in_place, shadow_over_in_place,
};
pub use effects::enhance::EnhanceFilter;
pub use encode::jpeg::{DEFAULT_JPEG_QUALITY, EncodedImage, encode_jpeg};
pub use foundation::core::{Canvas, LayerBox, Point, Rect, Rgb8, Rgba8};
pub use foundation::error::{WatermarkError, WatermarkResult};
pub use layout::dimensions::resolve_dimensions;
pub use layout::metrics::{LINE_HEIGHT_FACTOR, LINE_HEIGHT_REFERENCE, LayerMetrics, measure_layer};
pub use layout::scale::{REFERENCE_LONG_EDGE, ScaleFactor};
pub use layout::solver::{anchor_origin, linked_origin, resolve_origin};
pub use render::RasterImage;
pub use render::background::{
    MAX_BG_BLUR, PANEL_SHADOW_MIN_BLUR, blur_factor, draw_background, fade_size, gradient_stops,
    panel_rect, panel_shadow,
};
pub use render::compositor::{CompositeReport, PlacedLayer, composite_onto};
pub use render::cpu::CpuSurface;
pub use render::fonts::{
    FALLBACK_FAMILY, FamilyName, FontBook, FontResolution, TextBrushRgba8, parse_family_list,
};
pub use render::pipeline::{
    BatchItem, BatchThreading, OUTPUT_PREFIX, RenderJob, RenderOptions, RenderOutput, Renderer,
    output_file_name, render, render_batch,
};
pub use render::record::{RecordingSurface, SurfaceOp};
pub use render::surface::{FontSpec, GradientStop, Paint, Shadow, Surface, TextMeasure};
pub use render::text::{draw_text, text_fill, text_shadow};
pub use settings::color::parse_hex_rgb;
pub use settings::model::{
    Anchor, AnchorPlacement, AxisAnchor, BackgroundSettings, DEFAULT_ENHANCE_INTENSITY,
    LayerSettings, LinkAlignment, LinkPlacement, Placement, ResizeMode, WatermarkSettings,
};
pub use settings::presets::{FONT_PRESETS, FontPreset};
