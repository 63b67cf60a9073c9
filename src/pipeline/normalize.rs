//! Decode the input raster and normalise it to 8-bit grayscale.
//!
//! potrace thresholds a single luminance channel, so anything that is not
//! already `Luma8` (RGB, RGBA, palette PNGs decoded to RGB, 16-bit gray,
//! gray+alpha) is converted with the `image` crate's Rec. 709 luma weights.
//! Alpha is dropped, not composited.

use crate::error::Png2SvgError;
use image::{DynamicImage, GrayImage, ImageReader};
use std::path::Path;
use tracing::debug;

/// A decoded image reduced to one 8-bit channel.
pub struct Normalized {
    pub image: GrayImage,
    /// Colour type of the source before normalisation.
    pub source_color: image::ColorType,
    /// Whether a conversion actually happened.
    pub converted: bool,
}

/// Decode `path`, sniffing the format from content rather than the extension.
pub fn decode_image(path: &Path) -> Result<DynamicImage, Png2SvgError> {
    let decode_err = |source| Png2SvgError::DecodeFailed {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    debug!(
        "Decoded {} → {}x{} {:?}",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

/// Reduce `img` to single-channel 8-bit grayscale.
///
/// An image that is already `Luma8` passes through untouched.
pub fn to_grayscale(img: DynamicImage) -> Normalized {
    let source_color = img.color();
    match img {
        DynamicImage::ImageLuma8(gray) => Normalized {
            image: gray,
            source_color,
            converted: false,
        },
        other => {
            debug!("Converting {:?} to L8", source_color);
            Normalized {
                image: other.to_luma8(),
                source_color,
                converted: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn grayscale_passes_through_unchanged() {
        let gray = GrayImage::from_fn(8, 4, |x, y| Luma([(x * 30 + y) as u8]));
        let out = to_grayscale(DynamicImage::ImageLuma8(gray.clone()));
        assert!(!out.converted);
        assert_eq!(out.source_color, image::ColorType::L8);
        assert_eq!(out.image, gray);
    }

    #[test]
    fn rgb_is_converted() {
        let rgb = RgbImage::from_pixel(3, 3, Rgb([255, 0, 0]));
        let out = to_grayscale(DynamicImage::ImageRgb8(rgb));
        assert!(out.converted);
        assert_eq!(out.source_color, image::ColorType::Rgb8);
        assert_eq!(out.image.dimensions(), (3, 3));
        // Pure red is dark-ish but not black under Rec. 709 weights.
        let v = out.image.get_pixel(0, 0)[0];
        assert!(v > 0 && v < 128, "got {v}");
    }

    #[test]
    fn neutral_rgb_keeps_its_level() {
        let rgb = RgbImage::from_pixel(2, 2, Rgb([77, 77, 77]));
        let out = to_grayscale(DynamicImage::ImageRgb8(rgb));
        assert_eq!(out.image.get_pixel(1, 1), &Luma([77]));
    }

    #[test]
    fn rgba_alpha_is_dropped() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0]));
        let out = to_grayscale(DynamicImage::ImageRgba8(rgba));
        assert!(out.converted);
        assert_eq!(out.image.get_pixel(0, 0), &Luma([255]));
    }

    #[test]
    fn sixteen_bit_gray_is_converted() {
        let img = DynamicImage::new_luma16(4, 4);
        let out = to_grayscale(img);
        assert!(out.converted);
        assert_eq!(out.source_color, image::ColorType::L16);
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nthis is not a real png").unwrap();

        let err = decode_image(&path).err().expect("decode should fail");
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
    }

    #[test]
    fn png_round_trips_through_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        RgbImage::from_pixel(5, 7, Rgb([10, 20, 30])).save(&path).unwrap();

        let img = decode_image(&path).unwrap();
        assert_eq!((img.width(), img.height()), (5, 7));
    }
}
