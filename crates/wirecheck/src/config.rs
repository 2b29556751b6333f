//! Comparison configuration
//!
//! One value object carries every tunable of a comparison. It is passed to
//! the pipeline at construction; nothing is read from process-wide state.
//! Supports JSON deserialization via serde, missing fields fall back to the
//! reference defaults.

use crate::heatmap::ColorMap;
use crate::result::{CompareError, CompareResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reference canonical width
pub const CANONICAL_WIDTH: u32 = 1440;
/// Reference canonical height
pub const CANONICAL_HEIGHT: u32 = 1000;
/// Regions with a contour area at or below this are treated as noise
pub const MIN_REGION_AREA: f64 = 500.0;

/// Configuration for a wireframe/live-site comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Width both inputs are resized to
    pub canonical_width: u32,
    /// Height both inputs are resized to
    pub canonical_height: u32,
    /// Minimum contour area for a region to be reported (exclusive)
    pub min_region_area: f64,
    /// Gaussian smoothing kernel size (odd)
    pub blur_kernel_size: u32,
    /// Adaptive threshold neighbourhood size (odd, >= 3)
    pub threshold_block_size: u32,
    /// Constant subtracted from the local mean when thresholding
    pub threshold_offset: f64,
    /// SSIM sliding window size (odd)
    pub ssim_window: u32,
    /// Weight of the wireframe when blending it over the annotated live site
    pub overlay_alpha: f64,
    /// Weight of the annotated overlay when blending in the heatmap
    pub heatmap_overlay_weight: f64,
    /// Bounding box stroke color (RGB)
    pub box_color: [u8; 3],
    /// Bounding box stroke width in pixels
    pub box_thickness: u32,
    /// Color map used for the heatmap
    pub colormap: ColorMap,
    /// Run scoring and detection on separate threads
    pub parallel: bool,
    /// Tesseract language code, `None` for the engine default
    pub ocr_language: Option<String>,
    /// Artifact name of the annotated overlay
    pub overlay_name: String,
    /// Artifact name of the heatmap overlay
    pub heatmap_name: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            canonical_width: CANONICAL_WIDTH,
            canonical_height: CANONICAL_HEIGHT,
            min_region_area: MIN_REGION_AREA,
            blur_kernel_size: 5,
            threshold_block_size: 11,
            threshold_offset: 2.0,
            ssim_window: 7,
            overlay_alpha: 0.4,
            heatmap_overlay_weight: 0.7,
            box_color: [255, 0, 0],
            box_thickness: 2,
            colormap: ColorMap::Jet,
            parallel: true,
            ocr_language: None,
            overlay_name: String::from("annotated_overlay_combined.png"),
            heatmap_name: String::from("heatmap_overlay.png"),
        }
    }
}

impl ComparisonConfig {
    /// Create the reference configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or fails validation
    pub fn from_json_file(path: impl AsRef<Path>) -> CompareResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the canonical resolution
    #[must_use]
    pub const fn with_canonical_size(mut self, width: u32, height: u32) -> Self {
        self.canonical_width = width;
        self.canonical_height = height;
        self
    }

    /// Set the noise floor for regions
    #[must_use]
    pub const fn with_min_region_area(mut self, area: f64) -> Self {
        self.min_region_area = area;
        self
    }

    /// Set the wireframe blend weight
    #[must_use]
    pub const fn with_overlay_alpha(mut self, alpha: f64) -> Self {
        self.overlay_alpha = alpha;
        self
    }

    /// Set the heatmap color map
    #[must_use]
    pub const fn with_colormap(mut self, colormap: ColorMap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Enable or disable concurrent scoring and detection
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the OCR language
    #[must_use]
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = Some(language.into());
        self
    }

    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// Returns `CompareError::Config` describing the first invalid field
    pub fn validate(&self) -> CompareResult<()> {
        if self.canonical_width == 0 || self.canonical_height == 0 {
            return Err(CompareError::config("canonical resolution must be non-zero"));
        }
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(CompareError::config(format!(
                "blur_kernel_size must be odd, got {}",
                self.blur_kernel_size
            )));
        }
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(CompareError::config(format!(
                "threshold_block_size must be odd and >= 3, got {}",
                self.threshold_block_size
            )));
        }
        if self.ssim_window < 3 || self.ssim_window % 2 == 0 {
            return Err(CompareError::config(format!(
                "ssim_window must be odd and >= 3, got {}",
                self.ssim_window
            )));
        }
        for (name, weight) in [
            ("overlay_alpha", self.overlay_alpha),
            ("heatmap_overlay_weight", self.heatmap_overlay_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(CompareError::config(format!(
                    "{name} must be within [0, 1], got {weight}"
                )));
            }
        }
        if self.min_region_area < 0.0 {
            return Err(CompareError::config("min_region_area must not be negative"));
        }
        if self.overlay_name.is_empty() || self.heatmap_name.is_empty() {
            return Err(CompareError::config("artifact names must not be empty"));
        }
        if self.overlay_name == self.heatmap_name {
            return Err(CompareError::config(
                "overlay and heatmap artifacts must have different names",
            ));
        }
        Ok(())
    }
}
