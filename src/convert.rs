//! Conversion entry points.
//!
//! Every public function funnels into [`convert_with_report`], which runs the
//! pipeline strictly in order on the calling thread:
//!
//! ```text
//! validate ─▶ resolve output ─▶ resolve tracer ─▶ scratch ─▶ decode ─▶ L8 ─▶ BMP ─▶ mkdir ─▶ trace ─▶ release
//! ```
//!
//! The scratch workspace is released whether the stages succeed or fail; a
//! cleanup problem is reported next to the result and never replaces it.

use crate::config::ConversionConfig;
use crate::error::Png2SvgError;
use crate::output::{ConversionOutput, ConversionStats, ToolInfo};
use crate::pipeline::scratch::{Release, ScratchWorkspace};
use crate::pipeline::trace::{probe_version, PotraceCli, Tracer};
use crate::pipeline::{bitmap, input, normalize};
use crate::progress::Stage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Convert a raster image to SVG next to the input.
///
/// The output path is the input path with its extension replaced by `.svg`.
///
/// # Errors
/// - [`Png2SvgError::FileNotFound`] before any scratch state is created
/// - decode, scratch, and tracer failures as described on [`Png2SvgError`]
pub fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<PathBuf, Png2SvgError> {
    convert_with_report(input, None, config).map(|out| out.output_path)
}

/// Convert a raster image and write the SVG to `output_path`.
///
/// Missing parent directories of `output_path` are created.
pub fn convert_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<PathBuf, Png2SvgError> {
    convert_with_report(input, Some(output_path.as_ref()), config).map(|out| out.output_path)
}

/// Convert a raster image and return the full [`ConversionOutput`].
///
/// `output` defaults to the input path with a `.svg` extension.
pub fn convert_with_report(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Png2SvgError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting conversion: {}", input.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    let input_path = input::resolve_input(input)?;

    // ── Step 2: Resolve output ───────────────────────────────────────────
    let output_path = input::resolve_output(&input_path, output);

    // ── Step 3: Resolve tracer ───────────────────────────────────────────
    let tracer = resolve_tracer(config)?;
    debug!("Using tracer '{}'", tracer.name());

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(&input_path, &output_path);
    }

    // ── Step 4: Acquire scratch workspace ────────────────────────────────
    let scratch = ScratchWorkspace::create(config.scratch_root.as_deref(), config.keep_scratch)?;
    let bitmap_path = scratch.bitmap_path();

    // ── Steps 5–7: Decode, normalise, stage bitmap, trace ────────────────
    let outcome = run_stages(
        &input_path,
        &output_path,
        &bitmap_path,
        &*tracer,
        config,
    );

    // ── Step 8: Release scratch (always) ─────────────────────────────────
    let (release, _) = run_stage(config, Stage::Cleanup, || Ok(scratch.release()))?;

    let mut stats = outcome?;

    let (scratch_dir, retained_bitmap, cleanup_warning) = match release {
        Release::Removed => (None, None, None),
        Release::Retained(dir) => (Some(dir), Some(bitmap_path), None),
        Release::Failed(w) => (None, None, Some(w)),
    };

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Successfully converted {} to {} ({}ms)",
        input_path.display(),
        output_path.display(),
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(&output_path);
    }

    Ok(ConversionOutput {
        output_path,
        scratch_dir,
        bitmap_path: retained_bitmap,
        cleanup_warning,
        stats,
    })
}

/// Run [`convert_with_report`] on tokio's blocking pool.
///
/// The pipeline itself stays synchronous (image decoding and potrace are both
/// blocking); this only keeps async callers from stalling a worker thread.
pub async fn convert_async(
    input: impl Into<PathBuf>,
    output: Option<PathBuf>,
    config: ConversionConfig,
) -> Result<ConversionOutput, Png2SvgError> {
    let input = input.into();
    tokio::task::spawn_blocking(move || convert_with_report(&input, output.as_deref(), &config))
        .await
        .map_err(|e| Png2SvgError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Locate the potrace executable and report its version.
///
/// Does not touch any image. Honours `config.tool_path` before
/// `POTRACE_PATH` and `PATH`.
pub fn inspect_tool(config: &ConversionConfig) -> Result<ToolInfo, Png2SvgError> {
    let path = match config.tool_path {
        Some(ref p) => p.clone(),
        None => locate_tool()?,
    };
    let version = probe_version(&path)?;
    Ok(ToolInfo { path, version })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn run_stages(
    input_path: &Path,
    output_path: &Path,
    bitmap_path: &Path,
    tracer: &dyn Tracer,
    config: &ConversionConfig,
) -> Result<ConversionStats, Png2SvgError> {
    let (img, decode_ms) = run_stage(config, Stage::Decode, || {
        normalize::decode_image(input_path)
    })?;
    let (width, height) = (img.width(), img.height());

    let (normalized, _) = run_stage(config, Stage::Normalize, || {
        Ok(normalize::to_grayscale(img))
    })?;

    run_stage(config, Stage::WriteBitmap, || {
        bitmap::write_bitmap(&normalized.image, bitmap_path)
    })?;

    // Only create output directories once there is something to put in them.
    input::ensure_output_parent(output_path)?;
    let (_, trace_ms) = run_stage(config, Stage::Trace, || {
        tracer.trace(bitmap_path, output_path)
    })?;

    Ok(ConversionStats {
        width,
        height,
        source_color: format!("{:?}", normalized.source_color),
        converted_to_grayscale: normalized.converted,
        decode_duration_ms: decode_ms,
        trace_duration_ms: trace_ms,
        total_duration_ms: 0,
    })
}

/// Run one stage, timing it and firing progress events.
fn run_stage<T>(
    config: &ConversionConfig,
    stage: Stage,
    f: impl FnOnce() -> Result<T, Png2SvgError>,
) -> Result<(T, u64), Png2SvgError> {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
    let start = Instant::now();
    let value = f()?;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    debug!("Stage '{}' finished in {}ms", stage, elapsed_ms);
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(stage, elapsed_ms);
    }
    Ok((value, elapsed_ms))
}

/// Resolve the tracer, from most-specific to least-specific:
///
/// 1. **Pre-built tracer** (`config.tracer`): used as-is; `trace_options`
///    and `tool_timeout_secs` are the tracer's own business.
/// 2. **Explicit executable** (`config.tool_path`).
/// 3. **Located executable**: `POTRACE_PATH`, then a `PATH` search.
fn resolve_tracer(config: &ConversionConfig) -> Result<Arc<dyn Tracer>, Png2SvgError> {
    if let Some(ref tracer) = config.tracer {
        return Ok(Arc::clone(tracer));
    }

    let program = match config.tool_path {
        Some(ref p) => p.clone(),
        None => locate_tool()?,
    };

    let mut cli = PotraceCli::new(program).with_options(config.trace_options.clone());
    if let Some(secs) = config.tool_timeout_secs {
        cli = cli.with_timeout(Duration::from_secs(secs));
    }
    Ok(Arc::new(cli))
}

fn locate_tool() -> Result<PathBuf, Png2SvgError> {
    potrace_locate::locate_potrace().map_err(|e| Png2SvgError::ToolNotFound {
        tool: potrace_locate::executable_name().to_string(),
        hint: format!("{e}\n{}", potrace_locate::install_hint()),
    })
}
