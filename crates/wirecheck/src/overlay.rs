//! Annotated overlay: bounding boxes on the live site with the wireframe
//! ghosted on top.

use crate::config::ComparisonConfig;
use crate::detect::Region;
use crate::result::{CompareError, CompareResult, OVERLAY_STAGE};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Draws region boxes and blends the wireframe over the result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRenderer {
    /// Weight of the wireframe in the blend
    pub alpha: f64,
    /// Stroke color
    pub box_color: Rgb<u8>,
    /// Stroke width in pixels
    pub box_thickness: u32,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::from_config(&ComparisonConfig::default())
    }
}

impl OverlayRenderer {
    /// Create a renderer from configuration
    #[must_use]
    pub const fn from_config(config: &ComparisonConfig) -> Self {
        Self {
            alpha: config.overlay_alpha,
            box_color: Rgb(config.box_color),
            box_thickness: config.box_thickness,
        }
    }

    /// Set the wireframe weight
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Draw every region onto a copy of the live site.
    ///
    /// Boxes span `(x, y)` to `(x + width, y + height)` inclusive; a stroke
    /// wider than one pixel grows outward first, then inward.
    #[must_use]
    pub fn annotate(&self, live_site: &RgbImage, regions: &[Region]) -> RgbImage {
        let mut annotated = live_site.clone();
        let thickness = self.box_thickness.max(1) as i32;
        for region in regions {
            for step in 0..thickness {
                let inset = step - thickness / 2;
                let width = region.width as i32 + 1 - 2 * inset;
                let height = region.height as i32 + 1 - 2 * inset;
                if width <= 0 || height <= 0 {
                    continue;
                }
                let rect = Rect::at(region.x as i32 + inset, region.y as i32 + inset)
                    .of_size(width as u32, height as u32);
                draw_hollow_rect_mut(&mut annotated, rect, self.box_color);
            }
        }
        annotated
    }

    /// Annotate the live site and blend the wireframe over it:
    /// `alpha · wireframe + (1 − alpha) · annotated`
    ///
    /// # Errors
    ///
    /// Returns an overlay `Render` error if the two images differ in size
    pub fn render(&self, wireframe: &RgbImage, live_site: &RgbImage, regions: &[Region]) -> CompareResult<RgbImage> {
        if wireframe.dimensions() != live_site.dimensions() {
            let (ww, wh) = wireframe.dimensions();
            let (lw, lh) = live_site.dimensions();
            return Err(CompareError::render(
                OVERLAY_STAGE,
                format!("wireframe is {ww}x{wh} but live site is {lw}x{lh}"),
            ));
        }
        let annotated = self.annotate(live_site, regions);
        Ok(blend(wireframe, &annotated, self.alpha))
    }
}

/// Weighted sum `alpha · front + (1 − alpha) · back`, rounded and saturated.
/// Both images must share dimensions.
pub(crate) fn blend(front: &RgbImage, back: &RgbImage, alpha: f64) -> RgbImage {
    let beta = 1.0 - alpha;
    RgbImage::from_fn(front.width(), front.height(), |x, y| {
        let f = front.get_pixel(x, y).0;
        let b = back.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|c| {
            let v = alpha * f64::from(f[c]) + beta * f64::from(b[c]);
            v.round().clamp(0.0, 255.0) as u8
        }))
    })
}
