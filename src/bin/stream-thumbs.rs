use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use stream_thumbs::{
    DeliveryEndpoint, FormatResult, FormatSpec, OperationType, OutputMode, PreviewGenerator,
    PreviewOptions, ProgressCallback, ProgressInfo, RemoteClient, ThumbnailFit, ThumbnailRequest,
    plan_formats, resolve_duration,
};

const CLI_AFTER_HELP: &str = "Examples:\n  stream-thumbs generate 5d5bc37ffcf54c9b82e996823bffbb81 --out previews --progress\n  stream-thumbs vtt 5d5bc37ffcf54c9b82e996823bffbb81 --out previews --format 320x180:@2x\n  stream-thumbs plan --duration 125 --seconds-per-frame 50 --max-square 800 --json\n  stream-thumbs thumbnail-url 5d5bc37ffcf54c9b82e996823bffbb81 --time 8s --height 180\n  stream-thumbs completions zsh > _stream-thumbs";

#[derive(Debug, Parser)]
#[command(
    name = "stream-thumbs",
    version,
    about = "Generate scrubbing sprite sheets and WebVTT thumbnail cues for hosted streams",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while frames load and pages render.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,

    /// Delivery service root.
    #[arg(long, global = true)]
    endpoint: Option<String>,
}

#[derive(Debug, Args, Clone, Default)]
struct LayoutArgs {
    /// Sample one frame every N seconds instead of deriving the interval.
    #[arg(long)]
    seconds_per_frame: Option<f64>,

    /// Floor for the derived sampling interval.
    #[arg(long)]
    min_seconds_per_frame: Option<f64>,

    /// Maximum page side in pixels.
    #[arg(long)]
    max_square: Option<u32>,

    /// Output format as WIDTHxHEIGHT[:PREFIX]; repeat for several formats.
    #[arg(long = "format")]
    formats: Vec<String>,

    /// JPEG quality for sprite pages (1-100).
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate sprite pages and the VTT file.
    #[command(
        about = "Generate sprite pages and VTT cues",
        after_help = "Examples:\n  stream-thumbs generate <id> --out previews\n  stream-thumbs generate <id> --out previews --format 320x180:@2x --format 144x120"
    )]
    Generate {
        /// Stream identifier.
        stream: String,
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Generate sprite pages only.
    #[command(about = "Generate sprite pages")]
    Preview {
        /// Stream identifier.
        stream: String,
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Generate the VTT file only.
    #[command(about = "Generate VTT cues")]
    Vtt {
        /// Stream identifier.
        stream: String,
        /// Output directory.
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Print the sampling plan for each format.
    #[command(
        about = "Print the layout plan",
        after_help = "Examples:\n  stream-thumbs plan --duration 3600\n  stream-thumbs plan <id> --json"
    )]
    Plan {
        /// Stream identifier; required unless --duration is given.
        stream: Option<String>,
        /// Use this duration (seconds) instead of resolving it.
        #[arg(long)]
        duration: Option<f64>,
        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Resolve and print a stream's duration.
    #[command(about = "Print stream duration")]
    Duration {
        /// Stream identifier.
        stream: String,
        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a thumbnail URL.
    #[command(about = "Build a thumbnail URL")]
    ThumbnailUrl {
        stream: String,
        /// Position, e.g. 8s or 1h2m3s.
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        width: Option<u32>,
        /// crop | clip | scale | fill
        #[arg(long)]
        fit: Option<String>,
        /// Animation length; produces a GIF URL.
        #[arg(long)]
        animate: Option<String>,
        #[arg(long)]
        fps: Option<u32>,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_format(value: &str) -> Option<FormatSpec> {
    let (size, prefix) = match value.split_once(':') {
        Some((size, prefix)) => (size, Some(prefix)),
        None => (value, None),
    };
    let (width, height) = size.trim().split_once(['x', 'X'])?;
    let width: u32 = width.parse().ok()?;
    let height: u32 = height.parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    let format = FormatSpec::new(width, height);
    Some(match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format.with_prefix(prefix),
        None => format,
    })
}

fn parse_fit(value: &str) -> Option<ThumbnailFit> {
    match value.to_ascii_lowercase().as_str() {
        "crop" => Some(ThumbnailFit::Crop),
        "clip" => Some(ThumbnailFit::Clip),
        "scale" => Some(ThumbnailFit::Scale),
        "fill" => Some(ThumbnailFit::Fill),
        _ => None,
    }
}

fn endpoint(global: &GlobalOptions) -> DeliveryEndpoint {
    global
        .endpoint
        .as_deref()
        .map(DeliveryEndpoint::new)
        .unwrap_or_default()
}

fn build_options(
    global: &GlobalOptions,
    layout: &LayoutArgs,
) -> Result<PreviewOptions, Box<dyn std::error::Error>> {
    let mut options = PreviewOptions::new().with_endpoint(endpoint(global));

    if let Some(seconds) = layout.seconds_per_frame {
        options = options.with_seconds_per_frame(seconds);
    }
    if let Some(seconds) = layout.min_seconds_per_frame {
        options = options.with_min_seconds_per_frame(seconds);
    }
    if let Some(pixels) = layout.max_square {
        options = options.with_max_square(pixels);
    }
    if let Some(quality) = layout.quality {
        options = options.with_jpeg_quality(quality);
    }
    if !layout.formats.is_empty() {
        let formats = layout
            .formats
            .iter()
            .map(|value| parse_format(value).ok_or(format!("unsupported --format: {value}")))
            .collect::<Result<Vec<_>, _>>()?;
        options = options.with_formats(formats);
    }
    if global.progress {
        options = options.with_progress(Arc::new(BarProgress::new()));
    }

    Ok(options)
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn write_results(
    results: &[FormatResult],
    out: &Path,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Every target is checked before the first write.
    for artifact in results.iter().flat_map(|result| &result.content) {
        ensure_writable_path(&out.join(&artifact.name), overwrite)?;
    }

    fs::create_dir_all(out)?;
    for result in results {
        for path in result.save_all(out)? {
            println!("{} {}", "saved".green().bold(), path.display());
        }
    }
    Ok(())
}

struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} {msg:>14} [{bar:40.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let message = match info.operation {
            OperationType::FrameLoading => "loading frames",
            OperationType::PageComposition => "composing pages",
            _ => "working",
        };
        self.bar.set_message(message);
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if info.total == Some(info.current) {
            self.bar.finish_and_clear();
            self.bar.reset();
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let default_level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let generator = PreviewGenerator::new();

    match cli.command {
        Commands::Generate {
            stream,
            out,
            layout,
        } => {
            let options = build_options(&cli.global, &layout)?;
            let output = generator
                .generate_with_mode(&stream, &options, OutputMode::Both)
                .await?;
            write_results(&output.into_vec(), &out, cli.global.overwrite)?;
        }
        Commands::Preview {
            stream,
            out,
            layout,
        } => {
            let options = build_options(&cli.global, &layout)?;
            let output = generator.generate_preview(&stream, &options).await?;
            write_results(&output.into_vec(), &out, cli.global.overwrite)?;
        }
        Commands::Vtt {
            stream,
            out,
            layout,
        } => {
            let options = build_options(&cli.global, &layout)?;
            let output = generator.generate_vtt(&stream, &options).await?;
            write_results(&output.into_vec(), &out, cli.global.overwrite)?;
        }
        Commands::Plan {
            stream,
            duration,
            json,
            layout,
        } => {
            let options = build_options(&cli.global, &layout)?;
            let duration = match (duration, stream.as_deref()) {
                (Some(seconds), _) => seconds,
                (None, Some(stream)) => {
                    resolve_duration(&RemoteClient::new(), options.endpoint(), stream).await?
                }
                (None, None) => return Err("plan needs a stream id or --duration".into()),
            };
            let plans = plan_formats(duration, &options)?;

            if json {
                let formats: Vec<_> = plans
                    .iter()
                    .map(|(format, plan)| {
                        json!({
                            "width": format.width,
                            "height": format.height,
                            "prefix": format.prefix,
                            "seconds_per_frame": plan.seconds_per_frame,
                            "frame_count": plan.frame_count,
                            "frames_across": plan.frames_across,
                            "frames_down": plan.frames_down,
                            "frames_per_page": plan.frames_per_page,
                            "page_count": plan.page_count,
                        })
                    })
                    .collect();
                let payload = json!({
                    "duration_seconds": duration,
                    "formats": formats,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Duration: {duration:.3}s");
                for (format, plan) in &plans {
                    println!(
                        "{}x{}{}: {} frames every {}s, {}x{} grid ({} per page), {} pages",
                        format.width,
                        format.height,
                        format.prefix_str(),
                        plan.frame_count,
                        plan.seconds_per_frame,
                        plan.frames_across,
                        plan.frames_down,
                        plan.frames_per_page,
                        plan.page_count,
                    );
                }
            }
        }
        Commands::Duration { stream, json } => {
            let seconds = resolve_duration(&RemoteClient::new(), &endpoint(&cli.global), &stream)
                .await?;
            if json {
                let payload = json!({ "stream": stream, "duration_seconds": seconds });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{seconds:.3}");
            }
        }
        Commands::ThumbnailUrl {
            stream,
            time,
            height,
            width,
            fit,
            animate,
            fps,
        } => {
            let mut request = ThumbnailRequest::new();
            if let Some(time) = time {
                request = request.with_time(time);
            }
            if let Some(height) = height {
                request = request.with_height(height);
            }
            if let Some(width) = width {
                request = request.with_width(width);
            }
            if let Some(fit) = fit {
                let parsed = parse_fit(&fit).ok_or(format!("unsupported --fit: {fit}"))?;
                request = request.with_fit(parsed);
            }
            if let Some(animate) = animate {
                request = request.with_duration(animate);
            }
            if let Some(fps) = fps {
                request = request.with_fps(fps);
            }
            println!("{}", request.url(&endpoint(&cli.global), &stream));
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "stream-thumbs", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
