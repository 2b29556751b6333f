//! Discrepancy detection: difference map, smoothing, adaptive thresholding
//! and contour-based region extraction.
//!
//! ```text
//! grayA ─┐
//!        ├─► |A − B| ─► gaussian 5×5 ─► mean-C threshold ─► outer contours ─► regions
//! grayB ─┘
//! ```
//!
//! Regions come out in contour discovery order: a raster scan (top to
//! bottom, left to right) over the binary map, so a region's position in the
//! list follows its top-most, then left-most pixel.

use crate::config::ComparisonConfig;
use crate::result::{CompareError, CompareResult};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use serde::{Deserialize, Serialize};

/// OpenCV's fixed kernels for small sizes when sigma is derived from size
const SMALL_GAUSSIAN_KERNELS: [&[f64]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Per-pixel absolute grayscale difference between the two canonical images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceMap {
    map: GrayImage,
}

impl DifferenceMap {
    /// Compute `|a − b|` for every pixel
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the images differ in size
    pub fn between(a: &GrayImage, b: &GrayImage) -> CompareResult<Self> {
        if a.dimensions() != b.dimensions() {
            return Err(CompareError::dimension_mismatch(a.dimensions(), b.dimensions()));
        }
        let (width, height) = a.dimensions();
        let data = a
            .as_raw()
            .iter()
            .zip(b.as_raw())
            .map(|(&pa, &pb)| pa.abs_diff(pb))
            .collect();
        let map =
            GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height));
        Ok(Self { map })
    }

    /// Underlying single-channel image
    #[must_use]
    pub const fn as_image(&self) -> &GrayImage {
        &self.map
    }

    /// Width and height
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.map.dimensions()
    }

    /// Difference at a coordinate
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.map.get_pixel(x, y).0[0]
    }

    /// Largest difference anywhere in the map
    #[must_use]
    pub fn max(&self) -> u8 {
        self.map.as_raw().iter().copied().max().unwrap_or(0)
    }

    /// Number of pixels with any difference at all
    #[must_use]
    pub fn changed_pixels(&self) -> usize {
        self.map.as_raw().iter().filter(|&&v| v > 0).count()
    }
}

/// Bounding box of one connected area of significant difference.
///
/// Coordinates are in canonical-resolution space, not the resolution of the
/// original uploads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels (inclusive extent)
    pub width: u32,
    /// Height in pixels (inclusive extent)
    pub height: u32,
    /// Polygon area enclosed by the contour
    pub area: f64,
}

impl Region {
    /// Check if a point lies inside the bounding box
    #[must_use]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Check if this box fully covers another box
    #[must_use]
    pub const fn covers(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        x >= self.x
            && y >= self.y
            && x + width <= self.x + self.width
            && y + height <= self.y + self.height
    }

    fn from_contour(contour: &Contour<u32>) -> Option<Self> {
        let first = contour.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &contour.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
            area: polygon_area(contour),
        })
    }
}

/// Output of a detection run
#[derive(Debug, Clone)]
pub struct Detection {
    /// Raw absolute difference
    pub difference: DifferenceMap,
    /// Regions above the noise floor, in discovery order
    pub regions: Vec<Region>,
}

/// Finds regions where two grayscale images differ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscrepancyDetector {
    /// Gaussian kernel size (odd)
    pub blur_kernel_size: u32,
    /// Adaptive threshold neighbourhood (odd)
    pub block_size: u32,
    /// Constant subtracted from the local mean
    pub offset: f64,
    /// Regions with area at or below this are dropped
    pub min_region_area: f64,
}

impl Default for DiscrepancyDetector {
    fn default() -> Self {
        Self::from_config(&ComparisonConfig::default())
    }
}

impl DiscrepancyDetector {
    /// Create a detector from configuration
    #[must_use]
    pub const fn from_config(config: &ComparisonConfig) -> Self {
        Self {
            blur_kernel_size: config.blur_kernel_size,
            block_size: config.threshold_block_size,
            offset: config.threshold_offset,
            min_region_area: config.min_region_area,
        }
    }

    /// Set the noise floor
    #[must_use]
    pub const fn with_min_region_area(mut self, area: f64) -> Self {
        self.min_region_area = area;
        self
    }

    /// Run the full detection chain on two grayscale images
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the images differ in size
    pub fn detect(&self, a: &GrayImage, b: &GrayImage) -> CompareResult<Detection> {
        let difference = DifferenceMap::between(a, b)?;
        let smoothed = gaussian_blur(difference.as_image(), self.blur_kernel_size);
        let binary = adaptive_threshold(&smoothed, self.block_size, self.offset);
        let regions = self.extract_regions(&binary);
        Ok(Detection {
            difference,
            regions,
        })
    }

    /// Outer contours of a binary map, as regions above the noise floor
    #[must_use]
    pub fn extract_regions(&self, binary: &GrayImage) -> Vec<Region> {
        find_contours::<u32>(binary)
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(Region::from_contour)
            .filter(|r| r.area > self.min_region_area)
            .collect()
    }
}

/// Separable Gaussian smoothing with a square kernel, reflect-101 borders
#[must_use]
pub fn gaussian_blur(image: &GrayImage, kernel_size: u32) -> GrayImage {
    let kernel = gaussian_kernel(kernel_size);
    let radius = (kernel.len() / 2) as i64;
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let src = image.as_raw();

    let mut horizontal = vec![0.0f64; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as i64 + k as i64 - radius, w);
                acc += weight * f64::from(row[sx]);
            }
            horizontal[y * w + x] = acc;
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as i64 + k as i64 - radius, h);
                acc += weight * horizontal[sy * w + x];
            }
            out[y * w + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Mean-based adaptive threshold.
///
/// A pixel is marked (255) when it exceeds the mean of its
/// `block_size`×`block_size` neighbourhood minus `offset`. Neighbourhoods
/// replicate edge pixels. Pixels with a value of zero are never marked.
///
/// The blur leaves a faint halo around a changed block. Along straight
/// edges the halo stays below the local mean, but next to corners the mean
/// drops far enough that the halo is marked, so a detected box can extend
/// one pixel past the changed block on each side.
#[must_use]
pub fn adaptive_threshold(image: &GrayImage, block_size: u32, offset: f64) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let src = image.as_raw();
    let radius = (block_size / 2) as i64;
    let area = f64::from(block_size * block_size);
    let delta = offset.ceil() as i32;

    let mut horizontal = vec![0u32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            horizontal[y * w + x] = (-radius..=radius)
                .map(|d| u32::from(row[replicate(x as i64 + d, w)]))
                .sum();
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let value = src[y * w + x];
            if value == 0 {
                continue;
            }
            let sum: u32 = (-radius..=radius)
                .map(|d| horizontal[replicate(y as i64 + d, h) * w + x])
                .sum();
            let mean = (f64::from(sum) / area).round() as i32;
            if i32::from(value) > mean - delta {
                out[y * w + x] = 255;
            }
        }
    }

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| GrayImage::new(width, height))
}

fn gaussian_kernel(size: u32) -> Vec<f64> {
    let size = size.max(1) | 1;
    if let Some(fixed) = SMALL_GAUSSIAN_KERNELS.get((size / 2) as usize) {
        return fixed.to_vec();
    }
    let sigma = 0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8;
    let radius = f64::from(size / 2);
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let d = f64::from(i) - radius;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

fn reflect_101(index: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as i64 - 1;
    let mut i = index;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

fn replicate(index: i64, len: usize) -> usize {
    index.clamp(0, len as i64 - 1) as usize
}

/// Shoelace area of the closed polygon through the contour points
fn polygon_area(contour: &Contour<u32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area: i64 = 0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    twice_area.abs() as f64 / 2.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill_rect(image: &mut GrayImage, x: u32, y: u32, width: u32, height: u32, value: u8) {
        for py in y..y + height {
            for px in x..x + width {
                image.put_pixel(px, py, Luma([value]));
            }
        }
    }

    fn flat(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    fn with_patch(base: &GrayImage, x: u32, y: u32, size: u32, value: u8) -> GrayImage {
        let mut img = base.clone();
        fill_rect(&mut img, x, y, size, size, value);
        img
    }

    #[test]
    fn test_difference_map_is_absolute() {
        let a = GrayImage::from_raw(3, 1, vec![10, 200, 50]).unwrap();
        let b = GrayImage::from_raw(3, 1, vec![30, 100, 50]).unwrap();
        let diff = DifferenceMap::between(&a, &b).unwrap();
        assert_eq!(diff.get(0, 0), 20);
        assert_eq!(diff.get(1, 0), 100);
        assert_eq!(diff.get(2, 0), 0);
        assert_eq!(diff.max(), 100);
        assert_eq!(diff.changed_pixels(), 2);
    }

    #[test]
    fn test_difference_map_dimension_mismatch() {
        let result = DifferenceMap::between(&flat(4, 4, 0), &flat(5, 4, 0));
        assert!(matches!(result, Err(CompareError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_kernel_five_is_binomial() {
        let kernel = gaussian_kernel(5);
        assert_eq!(kernel, vec![0.0625, 0.25, 0.375, 0.25, 0.0625]);
    }

    #[test]
    fn test_large_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(11);
        assert_eq!(kernel.len(), 11);
        let total: f64 = kernel.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        for i in 0..5 {
            assert!((kernel[i] - kernel[10 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
        assert_eq!(reflect_101(-3, 1), 0);
    }

    #[test]
    fn test_blur_keeps_flat_images_flat() {
        let img = flat(9, 7, 123);
        assert_eq!(gaussian_blur(&img, 5), img);
    }

    #[test]
    fn test_blur_spreads_a_single_pixel() {
        let mut img = flat(9, 9, 0);
        img.put_pixel(4, 4, Luma([255]));
        let blurred = gaussian_blur(&img, 5);
        // center weight 0.375², neighbours fall off
        assert_eq!(blurred.get_pixel(4, 4).0[0], 36);
        assert!(blurred.get_pixel(5, 4).0[0] > 0);
        assert_eq!(blurred.get_pixel(7, 4).0[0], 0);
    }

    #[test]
    fn test_threshold_never_marks_zero_pixels() {
        let binary = adaptive_threshold(&flat(20, 20, 0), 11, 2.0);
        assert!(binary.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_threshold_marks_flat_nonzero_areas() {
        let binary = adaptive_threshold(&flat(20, 20, 40), 11, 2.0);
        assert!(binary.as_raw().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_threshold_marks_blob_but_not_halo_beside_edges() {
        let img = with_patch(&flat(60, 60, 0), 20, 20, 20, 200);
        let binary = adaptive_threshold(&gaussian_blur(&img, 5), 11, 2.0);
        assert_eq!(binary.get_pixel(30, 30).0[0], 255);
        assert_eq!(binary.get_pixel(20, 20).0[0], 255);
        assert_eq!(binary.get_pixel(39, 39).0[0], 255);
        assert_eq!(binary.get_pixel(19, 30).0[0], 0);
        assert_eq!(binary.get_pixel(40, 30).0[0], 0);
        assert_eq!(binary.get_pixel(5, 5).0[0], 0);
    }

    #[test]
    fn test_identical_images_have_no_regions() {
        let img = with_patch(&flat(200, 150, 90), 40, 40, 50, 10);
        let detection = DiscrepancyDetector::default().detect(&img, &img).unwrap();
        assert!(detection.regions.is_empty());
        assert_eq!(detection.difference.max(), 0);
    }

    #[test]
    fn test_small_patch_is_noise() {
        let base = flat(200, 150, 255);
        let changed = with_patch(&base, 80, 60, 10, 0);
        let detection = DiscrepancyDetector::default().detect(&base, &changed).unwrap();
        assert!(detection.regions.is_empty());
        assert_eq!(detection.difference.changed_pixels(), 100);
    }

    #[test]
    fn test_large_patch_is_one_region_covering_it() {
        let base = flat(200, 150, 255);
        let changed = with_patch(&base, 80, 60, 30, 0);
        let detection = DiscrepancyDetector::default().detect(&base, &changed).unwrap();

        assert_eq!(detection.regions.len(), 1);
        let region = detection.regions[0];
        assert!(region.area > 500.0);
        assert!(region.covers(80, 60, 30, 30));
        // Corner halo may add at most one pixel per side
        assert!(region.x >= 79 && region.y >= 59);
        assert!(region.x + region.width <= 111);
        assert!(region.y + region.height <= 91);
    }

    #[test]
    fn test_regions_follow_raster_order() {
        let base = flat(300, 200, 0);
        let mut changed = with_patch(&base, 200, 20, 40, 255);
        fill_rect(&mut changed, 20, 120, 40, 40, 255);
        fill_rect(&mut changed, 20, 20, 40, 40, 255);

        let detection = DiscrepancyDetector::default().detect(&base, &changed).unwrap();
        let origins: Vec<(u32, u32)> = detection.regions.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(origins, vec![(19, 19), (199, 19), (19, 119)]);
    }

    #[test]
    fn test_nested_contours_are_ignored() {
        // A ring with a blob inside its hole yields only the ring
        let mut binary = flat(100, 100, 0);
        fill_rect(&mut binary, 10, 10, 80, 80, 255);
        fill_rect(&mut binary, 20, 20, 60, 60, 0);
        fill_rect(&mut binary, 40, 40, 25, 25, 255);

        let regions = DiscrepancyDetector::default().extract_regions(&binary);
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].x, regions[0].y), (10, 10));
        assert_eq!((regions[0].width, regions[0].height), (80, 80));
    }

    #[test]
    fn test_area_is_polygon_area() {
        let mut binary = flat(50, 50, 0);
        fill_rect(&mut binary, 5, 5, 30, 30, 255);
        let regions = DiscrepancyDetector::default()
            .with_min_region_area(0.0)
            .extract_regions(&binary);
        assert_eq!(regions.len(), 1);
        assert!((regions[0].area - 841.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let a = GrayImage::from_fn(120, 90, |x, y| Luma([((x * 3 + y * 5) % 256) as u8]));
        let b = with_patch(&a, 30, 30, 40, 0);
        let detector = DiscrepancyDetector::default();
        let first = detector.detect(&a, &b).unwrap();
        let second = detector.detect(&a, &b).unwrap();
        assert_eq!(first.difference, second.difference);
        assert_eq!(first.regions, second.regions);
    }

    #[test]
    fn test_detect_dimension_mismatch() {
        let result = DiscrepancyDetector::default().detect(&flat(10, 10, 0), &flat(11, 10, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_region_contains() {
        let region = Region {
            x: 10,
            y: 20,
            width: 5,
            height: 5,
            area: 16.0,
        };
        assert!(region.contains(10, 20));
        assert!(region.contains(14, 24));
        assert!(!region.contains(15, 24));
        assert!(!region.contains(9, 20));
    }
}
