//! # edgequake-png2svg
//!
//! Convert raster images (PNG, JPEG, GIF, TIFF, BMP) into SVG line art by
//! driving [potrace](https://potrace.sourceforge.net).
//!
//! ## Why this crate?
//!
//! potrace only reads BMP and PNM, and only sees one channel. Getting a PNG
//! logo into it by hand means converting to grayscale, saving a bitmap
//! somewhere, running potrace with the right flags, and remembering to delete
//! the bitmap. This crate does exactly that, with a scratch directory that is
//! cleaned up on every exit path.
//!
//! No tracing happens in Rust: potrace is an opaque collaborator.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Input      validate path, derive `<stem>.svg` when no output given
//!  ├─ 2. Scratch    unique temp dir (released on success, error, or panic)
//!  ├─ 3. Normalize  decode + reduce to 8-bit grayscale
//!  ├─ 4. Bitmap     write `<scratch>/input.bmp`
//!  ├─ 5. Trace      potrace --svg --output <svg> <bitmap>
//!  └─ 6. Release    delete bitmap + dir unless `keep_scratch`
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_png2svg::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // potrace is found via POTRACE_PATH or PATH
//!     let config = ConversionConfig::default();
//!     let svg = convert("logo.png", &config)?;
//!     println!("wrote {}", svg.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `png2svg` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-png2svg = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, TraceOptions};
pub use convert::{convert, convert_async, convert_to_file, convert_with_report, inspect_tool};
pub use error::{CleanupWarning, ErrorKind, Png2SvgError};
pub use output::{ConversionOutput, ConversionStats, ToolInfo};
pub use pipeline::trace::{PotraceCli, Tracer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
