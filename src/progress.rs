//! Progress-callback trait for per-stage conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves through its stages. The CLI uses this to drive
//! its spinner; library callers can forward events anywhere they like.
//!
//! # Example
//!
//! ```rust
//! use edgequake_png2svg::{ConversionConfig, ConversionProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! struct PrintStages;
//!
//! impl ConversionProgressCallback for PrintStages {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("→ {stage}");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(PrintStages) as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// One step of the conversion pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Decode the input raster.
    Decode,
    /// Convert to single-channel grayscale.
    Normalize,
    /// Persist the intermediate BMP into the scratch workspace.
    WriteBitmap,
    /// Run the external tracing tool.
    Trace,
    /// Remove (or retain) the scratch workspace.
    Cleanup,
}

impl Stage {
    /// Short human-readable label, used by the CLI spinner.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Decode => "decoding image",
            Stage::Normalize => "converting to grayscale",
            Stage::WriteBitmap => "writing bitmap",
            Stage::Trace => "tracing",
            Stage::Cleanup => "cleaning up",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Called by the conversion pipeline as it processes each stage.
///
/// Implementations must be `Send + Sync` because [`crate::convert_async`]
/// runs the pipeline on a blocking-pool thread. All methods have default
/// no-op implementations so callers only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, after the input has been validated.
    fn on_conversion_start(&self, input: &Path, output: &Path) {
        let _ = (input, output);
    }

    /// Called when a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    ///
    /// # Arguments
    /// * `stage`      — the finished stage
    /// * `elapsed_ms` — wall-clock time spent in it
    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called once when the SVG has been written and scratch state released.
    fn on_conversion_complete(&self, output: &Path) {
        let _ = output;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
