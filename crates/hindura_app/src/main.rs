//! Hindura command-line front end.
//!
//! Thin driver over `hindura_core`: parses arguments, loads settings,
//! resolves ffmpeg, runs the batch, and prints the summary. Exits
//! nonzero when any file fails.
//!
//! Usage:
//!   hindura clip_a.mov clip_b.mov --to mp4
//!   hindura talk.mp4 --to mp3
//!   hindura intro.mov --to gif --gif-fps 15 --gif-scale 480
//!   hindura raw.mkv --to mp4 --mode compression --quality low

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::info;

use hindura_core::config::ConfigManager;
use hindura_core::logging::{init_tracing, ConverterLog};
use hindura_core::models::{
    BatchOutcome, BatchStatus, ConversionMode, GifOptions, MediaCategory, OverwriteSetting,
    QualityTier, RequestTemplate, ResizePreset, ResizeSelection,
};
use hindura_core::runner::{
    BatchRunner, FileProgress, OverwritePolicy, OverwritePrompt, ProgressCallback,
};

/// Default config file name, created next to the working directory on
/// first run.
const DEFAULT_CONFIG: &str = "hindura.toml";

#[derive(Parser)]
#[command(
    name = "hindura",
    author,
    version,
    about = "Batch media converter delegating to ffmpeg",
    long_about = None
)]
struct Args {
    /// Input files to convert (all sharing one source format)
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Target format extension, e.g. mp4, mp3, gif, jpg
    #[arg(short, long, value_name = "FORMAT")]
    to: String,

    /// Conversion mode
    #[arg(long, value_enum, default_value_t = ModeArg::Standard)]
    mode: ModeArg,

    /// Resize preset (use "custom" with --width/--height)
    #[arg(long, value_enum)]
    resize: Option<ResizeArg>,

    /// Custom resize width in pixels
    #[arg(long, value_name = "PIXELS")]
    width: Option<String>,

    /// Custom resize height in pixels
    #[arg(long, value_name = "PIXELS")]
    height: Option<String>,

    /// GIF frame rate (default from config)
    #[arg(long, value_name = "FPS")]
    gif_fps: Option<String>,

    /// GIF output width in pixels (default from config)
    #[arg(long, value_name = "PIXELS")]
    gif_scale: Option<String>,

    /// Quality tier for compression mode
    #[arg(long, value_enum, default_value_t = QualityArg::Medium)]
    quality: QualityArg,

    /// Output directory (defaults to each input's own directory)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Handling of existing output files (default from config)
    #[arg(long, value_enum)]
    overwrite: Option<OverwriteArg>,

    /// Path to the config file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Retry failed files once after the batch completes
    #[arg(long, default_value_t = false)]
    retry: bool,

    /// Log filter directive when RUST_LOG is unset
    #[arg(long, value_name = "DIRECTIVE", default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Standard,
    Resize,
    Compression,
}

impl From<ModeArg> for ConversionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Standard => ConversionMode::Standard,
            ModeArg::Resize => ConversionMode::Resize,
            ModeArg::Compression => ConversionMode::Compression,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ResizeArg {
    #[value(name = "1080p")]
    Hd1080,
    #[value(name = "720p")]
    Hd720,
    #[value(name = "480p")]
    Sd480,
    #[value(name = "360p")]
    Sd360,
    Custom,
}

impl From<ResizeArg> for ResizePreset {
    fn from(preset: ResizeArg) -> Self {
        match preset {
            ResizeArg::Hd1080 => ResizePreset::Hd1080,
            ResizeArg::Hd720 => ResizePreset::Hd720,
            ResizeArg::Sd480 => ResizePreset::Sd480,
            ResizeArg::Sd360 => ResizePreset::Sd360,
            ResizeArg::Custom => ResizePreset::Custom,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum QualityArg {
    High,
    Medium,
    Low,
}

impl From<QualityArg> for QualityTier {
    fn from(tier: QualityArg) -> Self {
        match tier {
            QualityArg::High => QualityTier::High,
            QualityArg::Medium => QualityTier::Medium,
            QualityArg::Low => QualityTier::Low,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OverwriteArg {
    Ask,
    Skip,
    Overwrite,
}

impl From<OverwriteArg> for OverwriteSetting {
    fn from(setting: OverwriteArg) -> Self {
        match setting {
            OverwriteArg::Ask => OverwriteSetting::Ask,
            OverwriteArg::Skip => OverwriteSetting::Skip,
            OverwriteArg::Overwrite => OverwriteSetting::Overwrite,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut config = ConfigManager::new(&args.config);
    config
        .load_or_create()
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    if let Some(dir) = &args.output_dir {
        config.settings_mut().paths.output_folder = dir.display().to_string();
    }
    if let Some(setting) = args.overwrite {
        config.settings_mut().conversion.overwrite = setting.into();
    }
    config.ensure_dirs_exist()?;

    let settings = config.settings().clone();
    let template = build_template(&args, &settings.gif_defaults())?;

    let tool = BatchRunner::resolve_tool(&settings)
        .context("install ffmpeg or set paths.ffmpeg_path in the config")?;
    info!(tool = %tool.display(), "resolved ffmpeg");

    let log = Arc::new(
        ConverterLog::open(settings.logs_dir(), None).context("opening converter log")?,
    );

    let overwrite = overwrite_policy(settings.conversion.overwrite);
    let runner = BatchRunner::new(tool, settings, overwrite, log).with_progress(progress_printer());

    let summary = runner.run_batch(&args.inputs, &template)?;
    eprintln!();
    print_summary(&summary);

    let final_summary = if args.retry && summary.has_failures() {
        println!();
        println!("Retrying failed files...");
        let retried = runner.retry_failures(&template)?;
        eprintln!();
        print_summary(&retried);
        retried
    } else {
        summary
    };

    let failed = final_summary.has_failures() || final_summary.status == BatchStatus::Cancelled;
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Build the shared request template from arguments and config defaults.
fn build_template(args: &Args, gif_defaults: &GifOptions) -> anyhow::Result<RequestTemplate> {
    let first = &args.inputs[0];
    let source_format = first
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if source_format.is_empty() {
        bail!("{} has no file extension", first.display());
    }

    let category = MediaCategory::for_extension(&source_format).with_context(|| {
        format!("unsupported source format: {}", source_format)
    })?;

    for input in &args.inputs {
        if !input.exists() {
            bail!("input file not found: {}", input.display());
        }
    }

    let resize = match args.resize {
        None => ResizeSelection::default(),
        Some(ResizeArg::Custom) => {
            let (Some(width), Some(height)) = (&args.width, &args.height) else {
                bail!("--resize custom requires both --width and --height");
            };
            ResizeSelection::custom(width.clone(), height.clone())
        }
        Some(preset) => ResizeSelection::preset(preset.into()),
    };

    let gif = GifOptions {
        fps: args.gif_fps.clone().unwrap_or_else(|| gif_defaults.fps.clone()),
        scale: args
            .gif_scale
            .clone()
            .unwrap_or_else(|| gif_defaults.scale.clone()),
    };

    Ok(
        RequestTemplate::new(category, source_format, args.to.to_lowercase())
            .with_mode(args.mode.into())
            .with_resize(resize)
            .with_gif(gif)
            .with_quality(args.quality.into()),
    )
}

fn overwrite_policy(setting: OverwriteSetting) -> OverwritePolicy {
    match setting {
        OverwriteSetting::Ask => OverwritePolicy::Ask(stdin_prompt()),
        OverwriteSetting::Skip => OverwritePolicy::Skip,
        OverwriteSetting::Overwrite => OverwritePolicy::Overwrite,
    }
}

fn stdin_prompt() -> OverwritePrompt {
    Box::new(|path: &Path| {
        eprint!("Overwrite {}? [y/N] ", path.display());
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
    })
}

fn progress_printer() -> ProgressCallback {
    Box::new(|progress: FileProgress| {
        let position = format!("[{}/{}]", progress.file_index + 1, progress.total_files);
        match progress.fraction {
            Some(fraction) => eprint!("\r{} {:>3.0}%", position, fraction * 100.0),
            None => eprint!("\r{} converting...", position),
        }
        let _ = io::stderr().flush();
    })
}

fn print_summary(summary: &BatchOutcome) {
    match summary.status {
        BatchStatus::Completed => println!("Batch complete."),
        BatchStatus::Cancelled => println!("Batch cancelled."),
    }
    println!("  Processed: {}", summary.processed());
    println!("  Succeeded: {}", summary.success_count());
    println!("  Skipped:   {}", summary.skipped_count());
    println!("  Failed:    {}", summary.failure_count());

    if summary.has_failures() {
        println!();
        println!("Failures:");
        for description in summary.failure_descriptions() {
            println!("  {}", description.replace('\n', " | "));
        }
    }
}
