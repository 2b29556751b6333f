//! Input decoding and normalization to the canonical resolution.
//!
//! Both inputs are stretched to the same fixed size. Aspect ratio is not
//! preserved; region coordinates downstream are therefore expressed in
//! canonical space, not in the coordinates of the uploaded files.

use crate::config::ComparisonConfig;
use crate::result::{CompareError, CompareResult, InputRole};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// BT.601 luma weights, the same weighting used for perceptual diffs
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Both inputs after normalization.
///
/// All four images always share the same dimensions.
#[derive(Debug, Clone)]
pub struct CanonicalPair {
    /// Wireframe, color
    pub wireframe: RgbImage,
    /// Live site, color
    pub live_site: RgbImage,
    /// Wireframe, grayscale
    pub wireframe_gray: GrayImage,
    /// Live site, grayscale
    pub live_site_gray: GrayImage,
}

impl CanonicalPair {
    /// Build a pair from two already-resized color images
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the images differ in size
    pub fn from_rgb(wireframe: RgbImage, live_site: RgbImage) -> CompareResult<Self> {
        if wireframe.dimensions() != live_site.dimensions() {
            return Err(CompareError::dimension_mismatch(
                wireframe.dimensions(),
                live_site.dimensions(),
            ));
        }
        let wireframe_gray = to_luma(&wireframe);
        let live_site_gray = to_luma(&live_site);
        Ok(Self {
            wireframe,
            live_site,
            wireframe_gray,
            live_site_gray,
        })
    }

    /// Width and height shared by every member
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.wireframe.dimensions()
    }
}

/// Decodes and resizes inputs to a fixed resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageNormalizer {
    width: u32,
    height: u32,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::from_config(&ComparisonConfig::default())
    }
}

impl ImageNormalizer {
    /// Create a normalizer for the given target size
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create a normalizer from the configured canonical size
    #[must_use]
    pub const fn from_config(config: &ComparisonConfig) -> Self {
        Self::new(config.canonical_width, config.canonical_height)
    }

    /// Target size
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decode both inputs and bring them to the canonical resolution
    ///
    /// # Errors
    ///
    /// Returns `Decode` naming the first input that is empty, corrupt, or in
    /// an unsupported format
    pub fn normalize(&self, wireframe: &[u8], live_site: &[u8]) -> CompareResult<CanonicalPair> {
        let wireframe = self.resize(&decode(wireframe, InputRole::Wireframe)?);
        let live_site = self.resize(&decode(live_site, InputRole::LiveSite)?);
        CanonicalPair::from_rgb(wireframe, live_site)
    }

    /// Decode one input and return its canonical color and grayscale forms
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the bytes are not a supported image
    pub fn normalize_one(&self, bytes: &[u8], input: InputRole) -> CompareResult<(RgbImage, GrayImage)> {
        let rgb = self.resize(&decode(bytes, input)?);
        let gray = to_luma(&rgb);
        Ok((rgb, gray))
    }

    fn resize(&self, image: &DynamicImage) -> RgbImage {
        let rgb = image.to_rgb8();
        if rgb.dimensions() == (self.width, self.height) {
            return rgb;
        }
        image::imageops::resize(&rgb, self.width, self.height, FilterType::Triangle)
    }
}

/// Decode raw bytes as a raster image
///
/// # Errors
///
/// Returns `Decode` for empty input or anything the `image` crate rejects
pub fn decode(bytes: &[u8], input: InputRole) -> CompareResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(CompareError::decode(input, "input is empty"));
    }
    image::load_from_memory(bytes).map_err(|e| CompareError::decode(input, e.to_string()))
}

/// Convert to grayscale with BT.601 weights, no gamma correction
#[must_use]
pub fn to_luma(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b);
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}
