//! Pipeline stages for raster-to-SVG conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its own
//! and the tracer can be swapped without touching the image handling.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ scratch ──▶ normalize ──▶ bitmap ──▶ trace ──▶ (scratch release)
//! (path)    (TempDir)   (decode+L8)   (BMP)     (potrace)
//! ```
//!
//! 1. [`input`]     — validate the input path and resolve the output path
//! 2. [`scratch`]   — allocate the per-call workspace; released on every exit path
//! 3. [`normalize`] — decode with the `image` crate and reduce to 8-bit gray
//! 4. [`bitmap`]    — write the fixed-name BMP potrace will read
//! 5. [`trace`]     — run potrace (or a stub) to write the SVG

pub mod bitmap;
pub mod input;
pub mod normalize;
pub mod scratch;
pub mod trace;
