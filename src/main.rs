use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panel_sim::{FilterKind, MonoAdjustment, MODE_NAMES};
use pocketshot::error::ConvertError;
use pocketshot::models::AppConfig;
use pocketshot::services::{ConvertOptions, Converter};

/// Exit status when the input image itself is unusable.
const EXIT_BAD_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "pocketshot")]
#[command(about = "Turn handheld console screenshots into photos of the real screen")]
#[command(after_help = "Exit status is 2 when the input image cannot be used, 1 on other errors.")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file (defaults to $POCKETSHOT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Emulate a screen and write the result as PNG
    Convert {
        /// Screenshot PNG
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Mode name (see `pocketshot modes`)
        #[arg(short, long)]
        mode: Option<String>,

        /// Mode index, takes precedence over --mode
        #[arg(long)]
        mode_index: Option<usize>,

        /// Grid algorithm for colour LCD modes: subpixel, smear or none
        #[arg(short, long)]
        grid: Option<String>,

        /// Output scale (1-8)
        #[arg(short, long)]
        scale: Option<u32>,

        /// Foreground colour for the custom mode (e.g. "#0f380f")
        #[arg(long)]
        fg: Option<String>,

        /// Foreground opacity for the custom mode in percent
        #[arg(long)]
        fg_opacity: Option<f64>,

        /// Background colour for the custom mode
        #[arg(long)]
        bg: Option<String>,

        /// Named colour LCD profile from the config file
        #[arg(long, conflicts_with = "palette")]
        profile: Option<String>,

        /// Named mono palette from the config file
        #[arg(long)]
        palette: Option<String>,

        /// Ordered dithering for mono modes
        #[arg(long)]
        dither: bool,

        /// Swap light and dark for mono modes
        #[arg(long)]
        invert: bool,

        /// Brightness for mono modes
        #[arg(long, default_value_t = 1.0)]
        brightness: f64,

        /// Contrast for mono modes
        #[arg(long, default_value_t = 1.0)]
        contrast: f64,

        /// Edge enhancement for mono modes (0 disables)
        #[arg(long, default_value_t = 0.0)]
        edge: f64,

        /// Recompress the output PNG
        #[arg(long)]
        optimize: bool,
    },
    /// List the available modes
    Modes,
    /// Show which device a screenshot appears to come from
    Detect {
        /// Screenshot PNG
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Convert {
            input,
            output,
            mode,
            mode_index,
            grid,
            scale,
            fg,
            fg_opacity,
            bg,
            profile,
            palette,
            dither,
            invert,
            brightness,
            contrast,
            edge,
            optimize,
        }) => {
            let opts = ConvertOptions {
                mode,
                mode_index,
                grid,
                scale,
                foreground: fg,
                background: bg,
                foreground_opacity: fg_opacity,
                profile,
                palette,
                adjustment: MonoAdjustment {
                    dither,
                    brightness,
                    contrast,
                    invert,
                    edge_enhancement: edge,
                },
                optimize: optimize.then_some(true),
            };
            run_convert_command(cli.config, &input, &output, &opts)
        }
        Some(Commands::Modes) => {
            run_modes_command();
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Detect { input }) => run_detect_command(cli.config, &input),
        None => {
            run_status_command();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pocketshot=debug,panel_sim=debug"
    } else {
        "pocketshot=info,panel_sim=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Report an unusable input with its own exit status; pass anything else up.
fn input_failure(input: &Path, e: ConvertError) -> anyhow::Result<ExitCode> {
    if e.is_bad_input() {
        eprintln!("Error: {}: {e}", input.display());
        return Ok(ExitCode::from(EXIT_BAD_INPUT));
    }
    Err(anyhow::anyhow!("{}: {e}", input.display()))
}

/// Convert one screenshot
fn run_convert_command(
    config: Option<PathBuf>,
    input: &Path,
    output: &Path,
    opts: &ConvertOptions,
) -> anyhow::Result<ExitCode> {
    let converter = Converter::new(AppConfig::load(config.as_deref()));
    let converted = match converter.convert_file(input, output, opts) {
        Ok(converted) => converted,
        Err(e) => return input_failure(input, e),
    };

    println!(
        "Wrote {} ({}x{}, {} bytes)",
        output.display(),
        converted.width,
        converted.height,
        converted.png.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Print every mode with its index and filter family
fn run_modes_command() {
    println!("Modes:");
    for (index, name) in MODE_NAMES.iter().enumerate() {
        let kind = FilterKind::for_index(index);
        let note = if kind == FilterKind::Crt && !cfg!(feature = "crt") {
            " (not built)"
        } else {
            ""
        };
        println!("  {index}  {name:<14} {kind}{note}");
    }
    println!("\nGrid algorithms: subpixel (default), smear, none");
}

/// Print the detected device and stride
fn run_detect_command(config: Option<PathBuf>, input: &Path) -> anyhow::Result<ExitCode> {
    let converter = Converter::new(AppConfig::load(config.as_deref()));
    let (width, height, detection) = match converter.detect_file(input) {
        Ok(detected) => detected,
        Err(e) => return input_failure(input, e),
    };

    println!("{}: {width}x{height}", input.display());
    println!("  Device: {}", detection.kind);
    println!("  Stride: {}", detection.stride);
    match detection.kind.native_width() {
        Some(native) if width != native * detection.stride => {
            println!("  Note: width is not an exact multiple of {native}");
        }
        _ => {}
    }
    Ok(ExitCode::SUCCESS)
}

/// Display version and command overview
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Pocketshot v{VERSION}");
    println!("Handheld screen emulation for console screenshots\n");
    println!(
        "  POCKETSHOT_CONFIG = {}",
        std::env::var("POCKETSHOT_CONFIG")
            .as_deref()
            .unwrap_or("(not set)")
    );
    println!("\nCommands:");
    println!("  pocketshot convert   Emulate a screen and write a PNG");
    println!("  pocketshot modes     List the available modes");
    println!("  pocketshot detect    Show the detected device of a screenshot");
    println!("\nRun 'pocketshot --help' for more details.");
}
