//! Grayscale image export of pipeline matrices.
//!
//! Debug artifacts only: cells in [0,1] scale to 0-255 intensity, one pixel
//! per cell. Matrix row 0 lands on the top pixel row; callers wanting low
//! frequencies at the bottom pass a matrix through
//! [`presentation_view`](crate::spectrogram::presentation_view) first.

use crate::error::{Error, Result};
use crate::spectrogram::Matrix;
use image::GrayImage;
use std::path::Path;

/// Write a [0,1]-valued matrix as a grayscale PNG.
///
/// Values outside [0,1] are clamped. An empty matrix produces a 1x1 black
/// image so the export never fails on shape.
pub fn save_matrix_png(spec: &Matrix, path: &Path) -> Result<()> {
    let image = matrix_to_image(spec);
    image.save(path).map_err(|e| Error::ImageWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn matrix_to_image(spec: &Matrix) -> GrayImage {
    if spec.rows() == 0 || spec.cols() == 0 {
        return GrayImage::new(1, 1);
    }

    #[allow(clippy::cast_possible_truncation)]
    let (width, height) = (spec.cols() as u32, spec.rows() as u32);
    let mut image = GrayImage::new(width, height);
    for col in 0..spec.cols() {
        for row in 0..spec.rows() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let intensity = (spec.get(row, col).clamp(0.0, 1.0) * 255.0).round() as u8;
            #[allow(clippy::cast_possible_truncation)]
            image.put_pixel(col as u32, row as u32, image::Luma([intensity]));
        }
    }
    image
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_to_image_dimensions() {
        let spec = Matrix::zeros(4, 7);
        let image = matrix_to_image(&spec);
        assert_eq!(image.width(), 7);
        assert_eq!(image.height(), 4);
    }

    #[test]
    fn test_empty_matrix_yields_single_pixel() {
        let spec = Matrix::zeros(0, 0);
        let image = matrix_to_image(&spec);
        assert_eq!((image.width(), image.height()), (1, 1));
    }

    #[test]
    fn test_intensity_scaling() {
        let mut spec = Matrix::zeros(2, 1);
        spec.set(0, 0, 1.0);
        spec.set(1, 0, 0.5);
        let image = matrix_to_image(&spec);
        assert_eq!(image.get_pixel(0, 0).0[0], 255);
        assert_eq!(image.get_pixel(0, 1).0[0], 128);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let mut spec = Matrix::zeros(1, 2);
        spec.set(0, 0, -0.5);
        spec.set(0, 1, 2.0);
        let image = matrix_to_image(&spec);
        assert_eq!(image.get_pixel(0, 0).0[0], 0);
        assert_eq!(image.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn test_save_matrix_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.png");
        let spec = Matrix::zeros(3, 3);
        save_matrix_png(&spec, &path).unwrap();
        assert!(path.exists());
    }
}
