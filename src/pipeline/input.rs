//! Input resolution: validate the user-supplied raster path and work out
//! where the SVG should go.
//!
//! Validation happens before any scratch state exists, so a typo in the path
//! never leaves an empty temp directory behind.

use crate::error::Png2SvgError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension given to derived output paths.
pub const SVG_EXTENSION: &str = "svg";

/// Validate that `path` exists and can be opened for reading.
pub fn resolve_input(path: &Path) -> Result<PathBuf, Png2SvgError> {
    if !path.exists() {
        return Err(Png2SvgError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Directories fall through to the decoder, which reports them as undecodable.
    if path.is_file() {
        match std::fs::File::open(path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(Png2SvgError::PermissionDenied {
                    path: path.to_path_buf(),
                });
            }
            Err(_) => {
                return Err(Png2SvgError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        }
    }

    debug!("Resolved local input: {}", path.display());
    Ok(path.to_path_buf())
}

/// The output path used when the caller did not supply one: the input path
/// with its extension replaced (or added) as `.svg`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    input.with_extension(SVG_EXTENSION)
}

/// Pick the caller's output path, or derive one from the input.
pub fn resolve_output(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(p) => p.to_path_buf(),
        None => derive_output_path(input),
    }
}

/// Make sure the directory that will hold `output` exists. potrace does not
/// create it.
pub fn ensure_output_parent(output: &Path) -> Result<(), Png2SvgError> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            debug!("Creating output directory {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| Png2SvgError::OutputWriteFailed {
                path: output.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}
