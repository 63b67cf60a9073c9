//! Persist the normalised image as the BMP potrace reads.
//!
//! potrace accepts PNM and BMP only. BMP is written as 8 bits per pixel with
//! a 256-entry gray palette, which potrace thresholds at `--blacklevel`.

use crate::error::Png2SvgError;
use image::{GrayImage, ImageFormat};
use std::path::Path;
use tracing::debug;

/// Write `img` to `path` as an 8-bit grayscale BMP.
pub fn write_bitmap(img: &GrayImage, path: &Path) -> Result<(), Png2SvgError> {
    img.save_with_format(path, ImageFormat::Bmp)
        .map_err(|e| Png2SvgError::BitmapWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!(
        "Wrote {}x{} bitmap → {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}
