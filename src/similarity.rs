//! Structural similarity scoring.
//!
//! Compares two equal-sized luminance images and returns a score in
//! `[0, 1]`, where `1.0` means structurally identical content. The score
//! drives the keep/drop decision in [`crate::Deduplicator`].
//!
//! The metric follows the classic SSIM formulation: local means, variances,
//! and covariance are computed with an 11×11 averaging window, combined
//! per pixel with the standard stabilising constants for 8-bit luminance,
//! and averaged over the image.
//!
//! # Example
//!
//! ```
//! use image::GrayImage;
//!
//! let a = GrayImage::from_pixel(32, 32, image::Luma([128]));
//! let b = GrayImage::from_pixel(32, 32, image::Luma([128]));
//! assert!((framesift::similarity::score(&a, &b) - 1.0).abs() < 1e-9);
//! ```

use image::GrayImage;

/// Side length of the local averaging window.
pub const WINDOW_SIZE: u32 = 11;

/// Luminance stabilising constant, `(0.01 * 255)^2` for 8-bit range.
const C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
/// Contrast stabilising constant, `(0.03 * 255)^2` for 8-bit range.
const C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// Score the structural similarity of two luminance images.
///
/// Returns a value in `[0, 1]`. Images with differing dimensions (or no
/// pixels at all) are defined to score `0.0`: maximally different, never
/// deduplicated. The computation is a pure function of its inputs and
/// accumulates in `f64` throughout.
pub fn score(a: &GrayImage, b: &GrayImage) -> f64 {
    if a.dimensions() != b.dimensions() {
        return 0.0;
    }
    let (width, height) = a.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let pixel_count = (width * height) as usize;
    let plane_a: Vec<f64> = a.as_raw().iter().map(|&p| f64::from(p)).collect();
    let plane_b: Vec<f64> = b.as_raw().iter().map(|&p| f64::from(p)).collect();

    let mut product_aa = vec![0.0; pixel_count];
    let mut product_bb = vec![0.0; pixel_count];
    let mut product_ab = vec![0.0; pixel_count];
    for i in 0..pixel_count {
        product_aa[i] = plane_a[i] * plane_a[i];
        product_bb[i] = plane_b[i] * plane_b[i];
        product_ab[i] = plane_a[i] * plane_b[i];
    }

    let mu_a = box_mean(&plane_a, width, height);
    let mu_b = box_mean(&plane_b, width, height);
    let mean_aa = box_mean(&product_aa, width, height);
    let mean_bb = box_mean(&product_bb, width, height);
    let mean_ab = box_mean(&product_ab, width, height);

    let mut total = 0.0;
    for i in 0..pixel_count {
        let variance_a = mean_aa[i] - mu_a[i] * mu_a[i];
        let variance_b = mean_bb[i] - mu_b[i] * mu_b[i];
        let covariance = mean_ab[i] - mu_a[i] * mu_b[i];

        let numerator = (2.0 * mu_a[i] * mu_b[i] + C1) * (2.0 * covariance + C2);
        let denominator =
            (mu_a[i] * mu_a[i] + mu_b[i] * mu_b[i] + C1) * (variance_a + variance_b + C2);
        total += numerator / denominator;
    }

    total / pixel_count as f64
}

/// Local mean with a [`WINDOW_SIZE`]² window, separable two-pass box
/// filter. The window is cropped at image borders and normalised by the
/// number of samples actually inside it, so edge pixels average over a
/// smaller neighbourhood instead of padded data.
fn box_mean(plane: &[f64], width: u32, height: u32) -> Vec<f64> {
    let radius = (WINDOW_SIZE / 2) as usize;
    let width = width as usize;
    let height = height as usize;

    // Horizontal pass over each row, via prefix sums.
    let mut horizontal = vec![0.0; plane.len()];
    let mut prefix = vec![0.0; width + 1];
    for row in 0..height {
        let start = row * width;
        for column in 0..width {
            prefix[column + 1] = prefix[column] + plane[start + column];
        }
        for column in 0..width {
            let low = column.saturating_sub(radius);
            let high = (column + radius).min(width - 1);
            let count = (high - low + 1) as f64;
            horizontal[start + column] = (prefix[high + 1] - prefix[low]) / count;
        }
    }

    // Vertical pass over each column of the horizontal means.
    let mut means = vec![0.0; plane.len()];
    let mut column_prefix = vec![0.0; height + 1];
    for column in 0..width {
        for row in 0..height {
            column_prefix[row + 1] = column_prefix[row] + horizontal[row * width + column];
        }
        for row in 0..height {
            let low = row.saturating_sub(radius);
            let high = (row + radius).min(height - 1);
            let count = (high - low + 1) as f64;
            means[row * width + column] = (column_prefix[high + 1] - column_prefix[low]) / count;
        }
    }

    means
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_mean_of_constant_plane_is_constant() {
        let plane = vec![42.0; 16 * 16];
        let means = box_mean(&plane, 16, 16);
        for value in means {
            assert!((value - 42.0).abs() < 1e-12);
        }
    }

    #[test]
    fn box_mean_spreads_a_point_over_its_window() {
        let mut plane = vec![0.0; 32 * 32];
        plane[16 * 32 + 16] = 255.0;
        let means = box_mean(&plane, 32, 32);
        // Interior window holds 11x11 = 121 samples.
        assert!((means[16 * 32 + 16] - 255.0 / 121.0).abs() < 1e-12);
        // Far corner is outside every window containing the point.
        assert_eq!(means[0], 0.0);
    }
}
