//! Heatmap rendering of the difference map.
//!
//! The raw absolute difference is mapped through a color map and blended
//! under the annotated overlay, so hot areas show through the bounding boxes.

use crate::config::ComparisonConfig;
use crate::detect::DifferenceMap;
use crate::overlay::blend;
use crate::result::{CompareError, CompareResult, HEATMAP_STAGE};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Viridis control points, low to high
const VIRIDIS_STOPS: [u32; 5] = [
    0x44_0154, // Dark purple
    0x3B_528B, // Blue
    0x21_918C, // Teal
    0x5D_C863, // Green
    0xFD_E725, // Yellow
];

/// Color map applied to difference intensities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    /// Blue through cyan, yellow and red
    #[default]
    Jet,
    /// Perceptually uniform purple to yellow (colorblind-friendly)
    Viridis,
}

impl std::fmt::Display for ColorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jet => f.write_str("jet"),
            Self::Viridis => f.write_str("viridis"),
        }
    }
}

impl ColorMap {
    /// Color for an 8-bit intensity
    #[must_use]
    pub fn color(self, value: u8) -> Rgb<u8> {
        let t = f64::from(value) / 255.0;
        match self {
            Self::Jet => jet(t),
            Self::Viridis => viridis(t),
        }
    }

    /// Precomputed colors for every intensity
    #[must_use]
    pub fn lookup_table(self) -> [Rgb<u8>; 256] {
        let mut table = [Rgb([0, 0, 0]); 256];
        for (value, slot) in (0u8..=255).zip(table.iter_mut()) {
            *slot = self.color(value);
        }
        table
    }
}

fn jet(t: f64) -> Rgb<u8> {
    let channel = |center: f64| {
        let v = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

fn viridis(t: f64) -> Rgb<u8> {
    let segments = (VIRIDIS_STOPS.len() - 1) as f64;
    let scaled = t.clamp(0.0, 1.0) * segments;
    let index = (scaled.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let frac = scaled - index as f64;
    let from = hex(VIRIDIS_STOPS[index]);
    let to = hex(VIRIDIS_STOPS[index + 1]);
    Rgb(std::array::from_fn(|c| {
        let v = f64::from(from[c]) + (f64::from(to[c]) - f64::from(from[c])) * frac;
        v.round().clamp(0.0, 255.0) as u8
    }))
}

const fn hex(value: u32) -> [u8; 3] {
    [
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
    ]
}

/// Renders colorized difference maps blended with the annotated overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapRenderer {
    /// Color map for the difference intensities
    pub colormap: ColorMap,
    /// Weight of the overlay in the blend; the heatmap gets the rest
    pub overlay_weight: f64,
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self::from_config(&ComparisonConfig::default())
    }
}

impl HeatmapRenderer {
    /// Create a renderer from configuration
    #[must_use]
    pub const fn from_config(config: &ComparisonConfig) -> Self {
        Self {
            colormap: config.colormap,
            overlay_weight: config.heatmap_overlay_weight,
        }
    }

    /// Set the color map
    #[must_use]
    pub const fn with_colormap(mut self, colormap: ColorMap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Map every difference value through the color map
    #[must_use]
    pub fn colorize(&self, difference: &DifferenceMap) -> RgbImage {
        let table = self.colormap.lookup_table();
        let (width, height) = difference.dimensions();
        RgbImage::from_fn(width, height, |x, y| table[usize::from(difference.get(x, y))])
    }

    /// Blend the colorized map under an overlay image
    ///
    /// # Errors
    ///
    /// Returns a heatmap `Render` error if the overlay and the map differ in
    /// size
    pub fn render(&self, difference: &DifferenceMap, overlay: &RgbImage) -> CompareResult<RgbImage> {
        if overlay.dimensions() != difference.dimensions() {
            let (ow, oh) = overlay.dimensions();
            let (dw, dh) = difference.dimensions();
            return Err(CompareError::render(
                HEATMAP_STAGE,
                format!("overlay is {ow}x{oh} but difference map is {dw}x{dh}"),
            ));
        }
        let heat = self.colorize(difference);
        Ok(blend(overlay, &heat, self.overlay_weight))
    }

    /// Decode a stored overlay artifact and blend the heatmap under it
    ///
    /// # Errors
    ///
    /// Returns a heatmap `Render` error if the bytes do not decode or the
    /// decoded overlay has the wrong size
    pub fn render_encoded(&self, difference: &DifferenceMap, overlay_png: &[u8]) -> CompareResult<RgbImage> {
        let overlay = image::load_from_memory(overlay_png)
            .map_err(|e| CompareError::render(HEATMAP_STAGE, format!("cannot decode overlay: {e}")))?
            .to_rgb8();
        self.render(difference, &overlay)
    }
}
