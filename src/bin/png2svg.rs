//! CLI binary for edgequake-png2svg.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_png2svg::{
    convert_with_report, inspect_tool, ConversionConfig, ConversionProgressCallback,
    ProgressCallback, Stage, TraceOptions,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner naming the current stage, plus one
/// log line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening image…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Remove the spinner, whatever the outcome.
    fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, input: &Path, output: &Path) {
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{} → {}", input.display(), output.display()))
        ));
    }

    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        self.bar.println(format!(
            "  {} {:<24}  {}",
            green("✓"),
            stage.label(),
            dim(&format!("{elapsed_ms}ms")),
        ));
    }

    fn on_conversion_complete(&self, _output: &Path) {
        self.finish();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes logo.svg next to logo.png)
  png2svg logo.png

  # Choose the output file
  png2svg logo.png -o out/logo.svg

  # Keep the intermediate bitmap for inspection
  png2svg --keep-temp scan.jpg

  # Drop small speckles and use a darker threshold
  png2svg --turdsize 10 --blacklevel 0.6 sketch.png

  # Check which potrace will be used
  png2svg --check-tool

  # Machine-readable result
  png2svg --json photo.png > result.json

TIPS:
  Tracing works best with high-contrast images; everything is reduced to
  grayscale and thresholded at --blacklevel (default 0.5). Detailed photos
  produce large SVG files: raise contrast beforehand for cleaner output.

ENVIRONMENT VARIABLES:
  POTRACE_PATH        Path to the potrace executable (skips PATH search)
  PNG2SVG_*           Every flag can also be set as PNG2SVG_<FLAG>
  RUST_LOG            Override log filtering (e.g. RUST_LOG=debug)

SETUP:
  Ubuntu/Debian:  sudo apt-get install potrace
  macOS:          brew install potrace
  Windows:        download from https://potrace.sourceforge.net or use WSL
"#;

/// Convert raster images to SVG line art using potrace.
#[derive(Parser, Debug)]
#[command(
    name = "png2svg",
    version,
    about = "Convert raster images to SVG line art using potrace",
    long_about = "Convert PNG, JPEG, GIF, TIFF, or BMP images into SVG vector line art. \
The image is reduced to grayscale, written as a temporary bitmap, and traced by the \
external potrace tool; temporary files are removed afterwards unless --keep-temp is given.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input raster image.
    #[arg(required_unless_present = "check_tool")]
    input: Option<PathBuf>,

    /// Write the SVG here instead of next to the input.
    #[arg(short, long, env = "PNG2SVG_OUTPUT")]
    output: Option<PathBuf>,

    /// Keep temporary files created during conversion.
    #[arg(long = "keep-temp", visible_alias = "keep-scratch", env = "PNG2SVG_KEEP_TEMP")]
    keep_temp: bool,

    /// Directory in which to create the temporary workspace.
    #[arg(long, env = "PNG2SVG_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Path to the potrace executable.
    #[arg(
        long,
        env = "PNG2SVG_POTRACE",
        long_help = "Path to the potrace executable. When unset, POTRACE_PATH is \
          honoured and then PATH is searched."
    )]
    potrace: Option<PathBuf>,

    /// Kill potrace if it runs longer than this many seconds.
    #[arg(long, env = "PNG2SVG_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Suppress speckles of up to this many pixels.
    #[arg(long, env = "PNG2SVG_TURDSIZE")]
    turdsize: Option<u32>,

    /// Corner threshold (0.0–1.3334).
    #[arg(long, env = "PNG2SVG_ALPHAMAX")]
    alphamax: Option<f64>,

    /// Curve optimisation tolerance.
    #[arg(long, env = "PNG2SVG_OPTTOLERANCE")]
    opttolerance: Option<f64>,

    /// Black/white cutoff (0.0–1.0).
    #[arg(long, env = "PNG2SVG_BLACKLEVEL")]
    blacklevel: Option<f64>,

    /// Invert the image before tracing.
    #[arg(long, env = "PNG2SVG_INVERT")]
    invert: bool,

    /// Print the result as JSON (ConversionOutput) instead of a message.
    #[arg(long, env = "PNG2SVG_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PNG2SVG_NO_PROGRESS")]
    no_progress: bool,

    /// Report which potrace would be used and exit; INPUT is not needed.
    #[arg(long)]
    check_tool: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PNG2SVG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PNG2SVG_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // While the spinner is up only warnings (e.g. cleanup failures) get through.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.check_tool;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Tool check mode ──────────────────────────────────────────────────
    if cli.check_tool {
        let config = build_config(&cli, None)?;
        let info = inspect_tool(&config).context("potrace is not usable")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialize tool info")?
            );
        } else {
            println!("Tool:     {}", info.path.display());
            println!("Version:  {}", info.version.as_deref().unwrap_or("unknown"));
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let input = cli
        .input
        .as_deref()
        .context("INPUT is required unless --check-tool is given")?;
    let spinner = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = spinner
        .as_ref()
        .map(|cb| Arc::clone(cb) as Arc<dyn ConversionProgressCallback>);

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let result = convert_with_report(input, cli.output.as_deref(), &config);
    if let Some(ref cb) = spinner {
        cb.finish();
    }
    let output = result.context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        println!(
            "Successfully converted {} to {}",
            input.display(),
            output.output_path.display()
        );
        if let Some(ref dir) = output.scratch_dir {
            eprintln!("   {} {}", dim("temporary files kept in"), dir.display());
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let options = TraceOptions {
        turd_size: cli.turdsize,
        alpha_max: cli.alphamax,
        opt_tolerance: cli.opttolerance,
        black_level: cli.blacklevel,
        invert: cli.invert,
    };

    let mut builder = ConversionConfig::builder()
        .keep_scratch(cli.keep_temp)
        .trace_options(options);

    if let Some(ref dir) = cli.scratch_dir {
        builder = builder.scratch_root(dir);
    }
    if let Some(ref path) = cli.potrace {
        builder = builder.tool_path(path);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.tool_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_tool_needs_no_input() {
        let cli = Cli::try_parse_from(["png2svg", "--check-tool"]).unwrap();
        assert!(cli.check_tool);
        assert!(cli.input.is_none());
    }

    #[test]
    fn input_required_for_conversion() {
        assert!(Cli::try_parse_from(["png2svg", "--keep-temp"]).is_err());
    }

    #[test]
    fn conversion_flags_parse() {
        let cli =
            Cli::try_parse_from(["png2svg", "art.png", "-o", "out/result.svg", "--keep-temp"])
                .unwrap();
        assert_eq!(cli.input.as_deref(), Some(Path::new("art.png")));
        assert_eq!(cli.output.as_deref(), Some(Path::new("out/result.svg")));
        assert!(cli.keep_temp);
    }
}
