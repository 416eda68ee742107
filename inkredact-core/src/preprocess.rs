//! Image preparation for recognition.
//!
//! Produces two images from one input file: the untouched original, which is
//! what redaction is rendered onto, and a binarised grayscale working copy for
//! the recognition engine. Rotation correction is not performed; fragments
//! carry quadrilateral regions and the engine over-covers them.

use std::path::Path;

use image::{GrayImage, RgbImage};
use imageproc::contrast::{adaptive_threshold, equalize_histogram};
use log::debug;

use crate::errors::InkRedactError;
use crate::sensitive_log::content_sha256;

/// Original and processed images for one document.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub original: RgbImage,
    pub processed: GrayImage,
    /// SHA-256 of the source file bytes.
    pub source_sha256: String,
}

/// Loads `path` and prepares it. An unreadable or undecodable file is an input
/// error for the document.
pub fn preprocess(path: &Path) -> Result<PreparedImage, InkRedactError> {
    let bytes = std::fs::read(path).map_err(|e| InkRedactError::ImageLoad {
        path: path.to_path_buf(),
        source: image::ImageError::IoError(e),
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| InkRedactError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let original = decoded.to_rgb8();
    debug!(
        "Loaded {} ({}x{}).",
        path.display(),
        original.width(),
        original.height()
    );

    Ok(PreparedImage {
        processed: prepare_for_recognition(&original),
        original,
        source_sha256: content_sha256(&bytes),
    })
}

/// Half the side of the local window used for binarisation (a 35x35 block).
pub const BINARIZE_BLOCK_RADIUS: u32 = 17;

/// Grayscale, histogram equalisation, then local adaptive binarisation.
pub fn prepare_for_recognition(original: &RgbImage) -> GrayImage {
    let gray = image::DynamicImage::ImageRgb8(original.clone()).to_luma8();
    let contrast = equalize_histogram(&gray);
    debug!("Binarising with block radius {}.", BINARIZE_BLOCK_RADIUS);
    adaptive_threshold(&contrast, BINARIZE_BLOCK_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_prepare_for_recognition_is_binary_and_same_size() {
        let mut img = RgbImage::from_pixel(16, 8, Rgb([240, 240, 240]));
        for x in 4..12 {
            img.put_pixel(x, 4, Rgb([10, 10, 10]));
        }
        let processed = prepare_for_recognition(&img);
        assert_eq!(processed.dimensions(), (16, 8));
        assert!(processed.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(processed.get_pixel(5, 4).0[0], 0);
        assert_eq!(processed.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_binarisation_follows_local_lighting() {
        // Bright left half, shadowed right half with one dark stroke.
        let mut img = RgbImage::from_fn(80, 20, |x, _| {
            if x < 40 { Rgb([230, 230, 230]) } else { Rgb([110, 110, 110]) }
        });
        img.put_pixel(60, 10, Rgb([30, 30, 30]));

        let processed = prepare_for_recognition(&img);
        assert_eq!(processed.get_pixel(60, 10).0[0], 0);
        assert_eq!(processed.get_pixel(75, 3).0[0], 255);
        assert_eq!(processed.get_pixel(5, 5).0[0], 255);
    }

    #[test]
    fn test_preprocess_missing_file_is_input_error() {
        let err = preprocess(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, InkRedactError::ImageLoad { .. }));
    }

    #[test]
    fn test_preprocess_keeps_original_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        let img = RgbImage::from_pixel(5, 5, Rgb([12, 34, 56]));
        img.save(&path).unwrap();

        let prepared = preprocess(&path).unwrap();
        assert_eq!(prepared.original, img);
        assert_eq!(prepared.source_sha256.len(), 64);
    }
}
