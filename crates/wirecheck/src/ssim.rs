//! Structural Similarity Index (Wang et al., 2004)
//!
//! Local statistics come from a uniform square window slid over every
//! position where it fits entirely inside the image, with sample (N-1)
//! variance normalization. The score is the mean of the per-window index,
//! matching scikit-image's default `structural_similarity`.

use crate::config::ComparisonConfig;
use crate::result::{CompareError, CompareResult};
use image::GrayImage;

const K1: f64 = 0.01;
const K2: f64 = 0.03;
/// Dynamic range of 8-bit samples
const DYNAMIC_RANGE: f64 = 255.0;

/// Structural Similarity Index scorer
/// Range: -1 to 1 (1 = identical)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityScorer {
    /// Side length of the sliding window
    pub window_size: u32,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self { window_size: 7 }
    }
}

/// Window sums for one image pair
#[derive(Debug, Clone, Copy, Default)]
struct WindowSums {
    x: i64,
    y: i64,
    xx: i64,
    yy: i64,
    xy: i64,
}

impl SimilarityScorer {
    /// Create a scorer with the given window size
    #[must_use]
    pub const fn new(window_size: u32) -> Self {
        Self { window_size }
    }

    /// Create a scorer from the configured window size
    #[must_use]
    pub const fn from_config(config: &ComparisonConfig) -> Self {
        Self::new(config.ssim_window)
    }

    /// Mean SSIM between two grayscale images of equal size
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the images differ in size
    pub fn score(&self, a: &GrayImage, b: &GrayImage) -> CompareResult<f64> {
        if a.dimensions() != b.dimensions() {
            return Err(CompareError::dimension_mismatch(a.dimensions(), b.dimensions()));
        }
        let (width, height) = a.dimensions();
        if width == 0 || height == 0 {
            return Ok(1.0);
        }

        // Images smaller than the window are scored as a single window
        let win_w = self.window_size.clamp(1, width) as usize;
        let win_h = self.window_size.clamp(1, height) as usize;
        let width = width as usize;
        let height = height as usize;
        let a = a.as_raw();
        let b = b.as_raw();

        let n = (win_w * win_h) as i64;
        let c1 = (K1 * DYNAMIC_RANGE).powi(2);
        let c2 = (K2 * DYNAMIC_RANGE).powi(2);

        // Per-column sums over the current band of `win_h` rows
        let mut columns = vec![WindowSums::default(); width];
        for row in 0..win_h {
            accumulate_row(&mut columns, a, b, row * width, 1);
        }

        let mut total = 0.0;
        let mut windows = 0u64;
        for top in 0..=(height - win_h) {
            if top > 0 {
                accumulate_row(&mut columns, a, b, (top - 1) * width, -1);
                accumulate_row(&mut columns, a, b, (top + win_h - 1) * width, 1);
            }

            let mut sums = WindowSums::default();
            for column in &columns[..win_w] {
                sums.add(*column, 1);
            }
            for left in 0..=(width - win_w) {
                if left > 0 {
                    sums.add(columns[left - 1], -1);
                    sums.add(columns[left + win_w - 1], 1);
                }
                total += window_ssim(&sums, n, c1, c2);
                windows += 1;
            }
        }

        Ok(total / windows as f64)
    }
}

impl WindowSums {
    fn add(&mut self, other: Self, sign: i64) {
        self.x += sign * other.x;
        self.y += sign * other.y;
        self.xx += sign * other.xx;
        self.yy += sign * other.yy;
        self.xy += sign * other.xy;
    }
}

fn accumulate_row(columns: &mut [WindowSums], a: &[u8], b: &[u8], offset: usize, sign: i64) {
    let width = columns.len();
    let rows = a[offset..offset + width].iter().zip(&b[offset..offset + width]);
    for (column, (&pa, &pb)) in columns.iter_mut().zip(rows) {
        let x = i64::from(pa);
        let y = i64::from(pb);
        column.x += sign * x;
        column.y += sign * y;
        column.xx += sign * x * x;
        column.yy += sign * y * y;
        column.xy += sign * x * y;
    }
}

fn window_ssim(sums: &WindowSums, n: i64, c1: f64, c2: f64) -> f64 {
    let nf = n as f64;
    let mean_x = sums.x as f64 / nf;
    let mean_y = sums.y as f64 / nf;

    // Exact integer numerators keep identical inputs at exactly 1.0
    let (var_x, var_y, covar) = if n > 1 {
        let norm = (n * (n - 1)) as f64;
        (
            (n * sums.xx - sums.x * sums.x) as f64 / norm,
            (n * sums.yy - sums.y * sums.y) as f64 / norm,
            (n * sums.xy - sums.x * sums.y) as f64 / norm,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let numerator = (2.0 * mean_x * mean_y + c1) * (2.0 * covar + c2);
    let denominator = (mean_x * mean_x + mean_y * mean_y + c1) * (var_x + var_y + c2);
    numerator / denominator
}


// =============================================================================
// Property-Based Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy(width: u32, height: u32) -> impl Strategy<Value = GrayImage> {
        proptest::collection::vec(any::<u8>(), (width * height) as usize)
            .prop_map(move |data| GrayImage::from_raw(width, height, data).unwrap())
    }

    proptest! {
        /// SSIM of identical images is always 1.0
        #[test]
        fn prop_ssim_identical_is_one(img in image_strategy(16, 12)) {
            let score = SimilarityScorer::default().score(&img, &img).unwrap();
            prop_assert!((score - 1.0).abs() < 1e-6, "got {}", score);
        }

        /// SSIM is symmetric
        #[test]
        fn prop_ssim_symmetric(a in image_strategy(16, 12), b in image_strategy(16, 12)) {
            let scorer = SimilarityScorer::default();
            let ab = scorer.score(&a, &b).unwrap();
            let ba = scorer.score(&b, &a).unwrap();
            prop_assert_eq!(ab.to_bits(), ba.to_bits());
        }

        /// SSIM is bounded [-1, 1]
        #[test]
        fn prop_ssim_bounded(a in image_strategy(16, 12), b in image_strategy(16, 12)) {
            let score = SimilarityScorer::default().score(&a, &b).unwrap();
            prop_assert!((-1.0..=1.0).contains(&score), "got {}", score);
        }
    }
}
