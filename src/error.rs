//! Error types for the edgequake-png2svg library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Png2SvgError`]: **Fatal**: the conversion cannot proceed (missing
//!   input, undecodable image, no scratch space, potrace missing or failing).
//!   Returned as `Err(Png2SvgError)` from the top-level `convert*` functions.
//!
//! * [`CleanupWarning`]: **Non-fatal**: the SVG was (or was not) produced,
//!   but the scratch workspace could not be removed. It is logged and stored
//!   in [`crate::output::ConversionOutput::cleanup_warning`]; it never turns a
//!   successful conversion into a failure, nor hides an earlier fatal error.
//!
//! Every fatal variant belongs to exactly one [`ErrorKind`], so callers can
//! branch on the category without matching every variant.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse category of a [`Png2SvgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The input file is missing or unreadable.
    NotFound,
    /// The input could not be decoded as a raster image.
    Decode,
    /// Scratch space or output location could not be allocated or written.
    Resource,
    /// The tracing tool is absent, failed, or timed out.
    ExternalTool,
    /// The configuration was rejected by the builder.
    Config,
}

/// All fatal errors returned by the edgequake-png2svg library.
///
/// Scratch cleanup failures use [`CleanupWarning`] and are reported in
/// [`crate::output::ConversionOutput`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Png2SvgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The file exists but is corrupt or in an unsupported format.
    #[error("Could not decode image '{path}': {source}")]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Resource errors ───────────────────────────────────────────────────
    /// No writable scratch location could be created.
    #[error("Failed to create scratch directory under '{root}': {source}")]
    ScratchUnavailable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The intermediate bitmap could not be written into the scratch workspace.
    #[error("Failed to write intermediate bitmap '{path}': {source}")]
    BitmapWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The output directory could not be created.
    #[error("Failed to prepare output location '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── External tool errors ──────────────────────────────────────────────
    /// The tracing executable is not installed or could not be located.
    #[error("Tracing tool '{tool}' is not available.\n{hint}")]
    ToolNotFound { tool: String, hint: String },

    /// The tool could not be started for a reason other than absence.
    #[error("Failed to launch '{tool}': {source}")]
    ToolLaunchFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited unsuccessfully.
    ///
    /// `status` is `None` when the process was terminated by a signal.
    #[error("'{tool}' exited with {}{}", fmt_status(.status), fmt_stderr(.stderr))]
    ToolFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    /// The tool did not exit within the configured timeout and was killed.
    #[error("'{tool}' did not finish within {secs}s and was killed\nIncrease --timeout.")]
    ToolTimeout { tool: String, secs: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Png2SvgError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Png2SvgError::FileNotFound { .. } | Png2SvgError::PermissionDenied { .. } => {
                ErrorKind::NotFound
            }
            Png2SvgError::DecodeFailed { .. } => ErrorKind::Decode,
            Png2SvgError::ScratchUnavailable { .. }
            | Png2SvgError::BitmapWriteFailed { .. }
            | Png2SvgError::OutputWriteFailed { .. }
            | Png2SvgError::Internal(_) => ErrorKind::Resource,
            Png2SvgError::ToolNotFound { .. }
            | Png2SvgError::ToolLaunchFailed { .. }
            | Png2SvgError::ToolFailed { .. }
            | Png2SvgError::ToolTimeout { .. } => ErrorKind::ExternalTool,
            Png2SvgError::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}

fn fmt_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// The scratch workspace could not be fully removed.
///
/// Non-fatal: logged at WARN and reported alongside the conversion result.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
#[error("Could not clean up temporary files in '{}': {detail}", .dir.display())]
pub struct CleanupWarning {
    /// The scratch directory that was left behind (possibly partially).
    pub dir: PathBuf,
    /// Underlying I/O error text.
    pub detail: String,
}
