//! Result types returned by the conversion entry points.

use crate::error::CleanupWarning;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a successful conversion reports.
///
/// Serialisable so the CLI's `--json` mode can print it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Where the SVG was written.
    pub output_path: PathBuf,
    /// The retained scratch workspace, when `keep_scratch` was requested.
    pub scratch_dir: Option<PathBuf>,
    /// The retained intermediate bitmap, when `keep_scratch` was requested.
    pub bitmap_path: Option<PathBuf>,
    /// Set when the scratch workspace could not be removed.
    pub cleanup_warning: Option<CleanupWarning>,
    pub stats: ConversionStats,
}

/// Measurements collected while converting one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub width: u32,
    pub height: u32,
    /// Colour type of the decoded source, e.g. `"Rgba8"` or `"L8"`.
    pub source_color: String,
    /// `false` when the source was already 8-bit grayscale and passed through.
    pub converted_to_grayscale: bool,
    pub decode_duration_ms: u64,
    pub trace_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// What [`crate::inspect_tool`] found out about the tracing executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub path: PathBuf,
    /// Parsed from `--version`; None if the banner had no version number.
    pub version: Option<String>,
}
