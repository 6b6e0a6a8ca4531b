use std::{path::Path, sync::Arc};

use rayon::prelude::*;

use crate::{
    assets::source::SourceImage,
    encode::jpeg::{DEFAULT_JPEG_QUALITY, EncodedImage, encode_jpeg},
    foundation::error::{WatermarkError, WatermarkResult},
    layout::dimensions::resolve_dimensions,
    render::{
        RasterImage,
        compositor::{CompositeReport, composite_onto},
        cpu::CpuSurface,
        fonts::FontBook,
    },
    settings::model::WatermarkSettings,
};

/// Prefix added to exported file names.
pub const OUTPUT_PREFIX: &str = "watermarked_";

/// Per-render knobs that are not part of the watermark design.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// JPEG quality, `1..=100`.
    pub jpeg_quality: u8,
    /// Extra font files registered in every renderer on top of system fonts.
    pub extra_fonts: Vec<Arc<Vec<u8>>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            extra_fonts: Vec::new(),
        }
    }
}

/// Encoded image plus the placement summary it was rendered with.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput {
    /// Encoded JPEG.
    pub image: EncodedImage,
    /// Canvas, scale, and layer boxes.
    pub report: CompositeReport,
}

/// Reusable renderer. Holds font state across renders; one per thread.
pub struct Renderer {
    fonts: FontBook,
    options: RenderOptions,
}

impl Renderer {
    /// Build a renderer, registering `options.extra_fonts`.
    pub fn new(options: RenderOptions) -> WatermarkResult<Self> {
        let mut fonts = FontBook::new();
        for bytes in &options.extra_fonts {
            fonts.register_font(bytes.as_ref().clone())?;
        }
        Ok(Self { fonts, options })
    }

    /// Options this renderer was built with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Font book, e.g. to register more fonts.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Composite without encoding. Returns premultiplied RGBA8 pixels.
    #[tracing::instrument(skip(self, source, settings))]
    pub fn render_raster(
        &mut self,
        source: &SourceImage,
        settings: &WatermarkSettings,
        native_width: u32,
        native_height: u32,
    ) -> WatermarkResult<(RasterImage, CompositeReport)> {
        let canvas = resolve_dimensions(native_width, native_height, settings)?;
        let mut surface = CpuSurface::new(&mut self.fonts, canvas)?;
        let report = composite_onto(&mut surface, source, settings)?;
        Ok((surface.into_raster(), report))
    }

    /// Composite and encode to JPEG.
    pub fn render(
        &mut self,
        source: &SourceImage,
        settings: &WatermarkSettings,
        native_width: u32,
        native_height: u32,
    ) -> WatermarkResult<RenderOutput> {
        let (raster, report) = self.render_raster(source, settings, native_width, native_height)?;
        let image = encode_jpeg(&raster, self.options.jpeg_quality)?;
        Ok(RenderOutput { image, report })
    }
}

/// Render one image with default options and system fonts.
///
/// `native_width`/`native_height` drive the resize policy; `source` is stretched over
/// the resolved canvas.
pub fn render(
    source: &SourceImage,
    settings: &WatermarkSettings,
    native_width: u32,
    native_height: u32,
) -> WatermarkResult<EncodedImage> {
    let mut renderer = Renderer::new(RenderOptions::default())?;
    renderer
        .render(source, settings, native_width, native_height)
        .map(|out| out.image)
}

/// One image of a batch, with its own settings.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Original file name, used to derive the output name.
    pub name: String,
    /// Decoded source.
    pub source: SourceImage,
    /// Settings for this image.
    pub settings: WatermarkSettings,
    /// Native width driving the resize policy.
    pub native_width: u32,
    /// Native height driving the resize policy.
    pub native_height: u32,
}

impl RenderJob {
    /// Job whose native size is the source's own size.
    pub fn new(name: impl Into<String>, source: SourceImage, settings: WatermarkSettings) -> Self {
        let (native_width, native_height) = source.dimensions();
        Self {
            name: name.into(),
            source,
            settings,
            native_width,
            native_height,
        }
    }

    /// Export file name for this job.
    pub fn output_name(&self) -> String {
        output_file_name(&self.name)
    }
}

/// `watermarked_<stem>.jpg` for an input file name or path.
pub fn output_file_name(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    format!("{OUTPUT_PREFIX}{stem}.jpg")
}

/// Batch scheduling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchThreading {
    /// Render on a dedicated worker pool.
    pub parallel: bool,
    /// Worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Result for one job, in input order.
#[derive(Debug)]
pub struct BatchItem {
    /// Output file name.
    pub output_name: String,
    /// Rendered output, or why this image was skipped.
    pub result: WatermarkResult<RenderOutput>,
}

/// Render every job. A failing job does not stop the others.
///
/// Errors are returned only for batch-level setup problems (bad options, thread pool).
#[tracing::instrument(skip(jobs, options), fields(job_count = jobs.len()))]
pub fn render_batch(
    jobs: &[RenderJob],
    options: &RenderOptions,
    threading: &BatchThreading,
) -> WatermarkResult<Vec<BatchItem>> {
    let render_one = |renderer: &mut Renderer, job: &RenderJob| -> BatchItem {
        let result = renderer.render(
            &job.source,
            &job.settings,
            job.native_width,
            job.native_height,
        );
        if let Err(e) = &result {
            tracing::warn!(name = %job.name, error = %e, "skipping image");
        }
        BatchItem {
            output_name: job.output_name(),
            result,
        }
    };

    // Built up front so a bad font file fails the batch rather than every job.
    let mut renderer = Renderer::new(options.clone())?;
    if !threading.parallel {
        return Ok(jobs.iter().map(|job| render_one(&mut renderer, job)).collect());
    }
    drop(renderer);

    let pool = build_thread_pool(threading.threads)?;
    let items = pool.install(|| {
        jobs.par_iter()
            .map_init(
                || Renderer::new(options.clone()),
                |worker, job| match worker {
                    Ok(renderer) => render_one(renderer, job),
                    Err(e) => BatchItem {
                        output_name: job.output_name(),
                        result: Err(WatermarkError::render(format!(
                            "worker renderer setup failed: {e}"
                        ))),
                    },
                },
            )
            .collect::<Vec<_>>()
    });
    Ok(items)
}

fn build_thread_pool(threads: Option<usize>) -> WatermarkResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(WatermarkError::validation(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| WatermarkError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
