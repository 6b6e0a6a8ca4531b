use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "watermarq", version)]
struct Cli {
    /// Log at debug level. `RUST_LOG` takes precedence when set.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watermark a single image and write a JPEG.
    Render(RenderArgs),
    /// Watermark many images into a directory as `watermarked_<name>.jpg`.
    Batch(BatchArgs),
    /// Print the default settings JSON.
    Defaults,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Settings JSON. Defaults are used when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Extra font file (TTF/OTF/TTC) to make available; may be repeated.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// JPEG quality.
    #[arg(long, default_value_t = watermarq::DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render images concurrently.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    common: CommonArgs,

    /// Input images.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<watermarq::WatermarkSettings> {
    let settings = match path {
        Some(p) => watermarq::WatermarkSettings::from_path(p)?,
        None => watermarq::WatermarkSettings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

fn load_options(common: &CommonArgs) -> anyhow::Result<watermarq::RenderOptions> {
    let mut extra_fonts = Vec::with_capacity(common.fonts.len());
    for path in &common.fonts {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        extra_fonts.push(Arc::new(bytes));
    }
    Ok(watermarq::RenderOptions {
        jpeg_quality: common.quality,
        extra_fonts,
    })
}

fn read_source(path: &Path) -> anyhow::Result<watermarq::SourceImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    watermarq::decode_image(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.common.settings.as_deref())?;
    let options = load_options(&args.common)?;
    let source = read_source(&args.in_path)?;

    let mut renderer = watermarq::Renderer::new(options)?;
    let (w, h) = source.dimensions();
    let out = renderer.render(&source, &settings, w, h)?;
    write_output(&args.out, &out.image.bytes)?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        out.image.width,
        out.image.height
    );
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.common.settings.as_deref())?;
    let options = load_options(&args.common)?;

    let mut jobs = Vec::with_capacity(args.inputs.len());
    let mut skipped = 0usize;
    for path in &args.inputs {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match read_source(path) {
            Ok(source) => jobs.push(watermarq::RenderJob::new(name, source, settings.clone())),
            Err(e) => {
                skipped += 1;
                eprintln!("skipped {}: {e:#}", path.display());
            }
        }
    }

    let threading = watermarq::BatchThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let items = watermarq::render_batch(&jobs, &options, &threading)?;

    let mut written = 0usize;
    for (job, item) in jobs.iter().zip(items) {
        match item.result {
            Ok(out) => {
                let path = args.out_dir.join(&item.output_name);
                write_output(&path, &out.image.bytes)?;
                written += 1;
            }
            Err(e) => {
                skipped += 1;
                eprintln!("skipped {}: {e}", job.name);
            }
        }
    }

    eprintln!(
        "wrote {written} image(s) to {}, skipped {skipped}",
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    println!(
        "{}",
        watermarq::WatermarkSettings::default().to_json_pretty()?
    );
    Ok(())
}
