//! Gaussian smoothing used by both detection passes.
//!
//! Kernel radius is `round(4 * sigma)` and boundaries reflect about the
//! edge (the edge cell is repeated), matching the filter defaults the
//! detection thresholds were calibrated against.

use crate::constants::gaussian;
use crate::spectrogram::Matrix;

/// Discrete Gaussian kernel for the given standard deviation.
///
/// Weights are normalized to sum to 1. Sigma must be positive; callers
/// validate before reaching here.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let radius = (gaussian::TRUNCATE * sigma + 0.5) as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let denom = 2.0 * sigma * sigma;
    for i in -(radius as isize)..=(radius as isize) {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f32;
        kernel.push((-x * x / denom).exp());
    }
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Smooth a 1-D sequence with a Gaussian of the given sigma.
#[must_use]
pub fn smooth_1d(values: &[f32], sigma: f32) -> Vec<f32> {
    let kernel = gaussian_kernel(sigma);
    convolve_reflect(values, &kernel)
}

/// Isotropic 2-D Gaussian smoothing, applied separably: first along each
/// time frame (frequency direction), then along each frequency row.
#[must_use]
pub fn smooth_2d(spec: &Matrix, sigma: f32) -> Matrix {
    let kernel = gaussian_kernel(sigma);
    let (rows, cols) = (spec.rows(), spec.cols());

    // Frequency direction: each column is contiguous
    let mut pass1 = Matrix::zeros(rows, cols);
    for col in 0..cols {
        let smoothed = convolve_reflect(spec.col(col), &kernel);
        pass1.col_mut(col).copy_from_slice(&smoothed);
    }

    // Time direction: gather each row across columns
    let mut out = Matrix::zeros(rows, cols);
    let mut row_buf = vec![0.0f32; cols];
    for row in 0..rows {
        for col in 0..cols {
            row_buf[col] = pass1.get(row, col);
        }
        let smoothed = convolve_reflect(&row_buf, &kernel);
        for (col, &v) in smoothed.iter().enumerate() {
            out.set(row, col, v);
        }
    }
    out
}

#[allow(clippy::cast_possible_wrap)]
fn convolve_reflect(values: &[f32], kernel: &[f32]) -> Vec<f32> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let radius = kernel.len() / 2;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let mut acc = 0.0f32;
        for (k, &w) in kernel.iter().enumerate() {
            let offset = i as isize + k as isize - radius as isize;
            acc += w * values[reflect_index(offset, n)];
        }
        out.push(acc);
    }
    out
}

/// Reflect an out-of-bounds index about the array edges (edge repeated).
#[allow(clippy::cast_possible_wrap)]
fn reflect_index(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            #[allow(clippy::cast_sign_loss)]
            return i as usize;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized() {
        let kernel = gaussian_kernel(3.0);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_radius_matches_truncation() {
        // radius = round(4 * sigma)
        assert_eq!(gaussian_kernel(1.0).len(), 2 * 4 + 1);
        assert_eq!(gaussian_kernel(3.0).len(), 2 * 12 + 1);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let kernel = gaussian_kernel(2.0);
        let n = kernel.len();
        for i in 0..n / 2 {
            assert!((kernel[i] - kernel[n - 1 - i]).abs() < 1e-7);
        }
    }

    #[test]
    fn test_smooth_1d_preserves_constant() {
        let values = vec![0.5f32; 64];
        let smoothed = smooth_1d(&values, 3.0);
        for v in smoothed {
            assert!((v - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_smooth_1d_spreads_impulse() {
        let mut values = vec![0.0f32; 65];
        values[32] = 1.0;
        let smoothed = smooth_1d(&values, 2.0);
        assert!(smoothed[32] < 1.0);
        assert!(smoothed[30] > 0.0);
        // Mass is conserved away from boundaries
        let sum: f32 = smoothed.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(2, 4), 2);
    }

    #[test]
    fn test_smooth_2d_preserves_constant() {
        let mut spec = Matrix::zeros(16, 16);
        for col in 0..16 {
            spec.col_mut(col).fill(0.25);
        }
        let smoothed = smooth_2d(&spec, 1.5);
        for &v in smoothed.as_slice() {
            assert!((v - 0.25).abs() < 1e-5);
        }
    }
}
