//! Scratch workspace: one exclusively-owned temp directory per conversion.
//!
//! [`ScratchWorkspace`] wraps a [`tempfile::TempDir`] and is released exactly
//! once, either explicitly through [`ScratchWorkspace::release`] (which reports
//! what happened) or implicitly on drop, so early returns and panics still
//! clean up. Cleanup failures are never errors: they come back as a
//! [`CleanupWarning`] and are logged at WARN.

use crate::error::{CleanupWarning, Png2SvgError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// File name of the intermediate bitmap inside the workspace.
pub const BITMAP_FILE_NAME: &str = "input.bmp";

/// Prefix of every workspace directory name.
pub const SCRATCH_PREFIX: &str = "png2svg-";

/// What happened to the workspace when it was released.
#[derive(Debug)]
pub enum Release {
    /// Bitmap and directory were deleted.
    Removed,
    /// Retention was requested; the directory is still on disk.
    Retained(PathBuf),
    /// Deletion failed part-way.
    Failed(CleanupWarning),
}

/// A uniquely-named scratch directory holding the intermediate bitmap.
pub struct ScratchWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
    keep: bool,
}

impl ScratchWorkspace {
    /// Create a fresh workspace under `root` (or the OS temp dir).
    pub fn create(root: Option<&Path>, keep: bool) -> Result<Self, Png2SvgError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);

        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| Png2SvgError::ScratchUnavailable {
            root: root.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
            source: e,
        })?;

        let path = dir.path().to_path_buf();
        debug!("Created scratch workspace {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
            keep,
        })
    }

    /// The workspace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fixed location of the intermediate bitmap.
    pub fn bitmap_path(&self) -> PathBuf {
        self.path.join(BITMAP_FILE_NAME)
    }

    /// Release the workspace now and report the outcome.
    pub fn release(mut self) -> Release {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Release {
        let Some(dir) = self.dir.take() else {
            return Release::Removed;
        };

        if self.keep {
            let kept = dir.keep();
            info!("Keeping temporary files in {}", kept.display());
            return Release::Retained(kept);
        }

        let bitmap = self.bitmap_path();
        let result = match std::fs::remove_file(&bitmap) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
        .and_then(|()| dir.close());

        match result {
            Ok(()) => {
                debug!("Removed scratch workspace {}", self.path.display());
                Release::Removed
            }
            Err(e) => {
                let warning = CleanupWarning {
                    dir: self.path.clone(),
                    detail: e.to_string(),
                };
                warn!("{warning}");
                Release::Failed(warning)
            }
        }
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        let _ = self.release_inner();
    }
}
