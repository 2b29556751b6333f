//! Wireframe Comparison Demo
//!
//! Demonstrates the comparison pipeline on two synthetic pages:
//! - SSIM similarity score
//! - Discrepancy regions from the contour pass
//! - Overlay and heatmap artifacts kept in memory
//! - Summary counts and the text check
//!
//! Run with: cargo run --example compare_demo -p wirecheck

use image::{GrayImage, Rgb, RgbImage};
use std::sync::Arc;
use wirecheck::artifact::encode_png;
use wirecheck::{
    ColorMap, CompareResult, ComparisonConfig, ComparisonPipeline, MemoryStore, TextRecognizer,
};

/// Stands in for Tesseract so the demo runs anywhere
#[derive(Debug)]
struct FixedText;

impl TextRecognizer for FixedText {
    fn recognize(&self, _image: &GrayImage) -> CompareResult<String> {
        Ok("Sign up".to_string())
    }
}

fn page(button_x: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(640, 480, Rgb([255, 255, 255]));
    for y in 200..240 {
        for x in button_x..(button_x + 120).min(640) {
            img.put_pixel(x, y, Rgb([52, 120, 246]));
        }
    }
    img
}

fn main() -> CompareResult<()> {
    println!("=== Wireframe Comparison Demo ===\n");

    let config = ComparisonConfig::default()
        .with_canonical_size(640, 480)
        .with_colormap(ColorMap::Viridis);
    println!("1. Configuration");
    println!("   Canonical size: {}x{}", config.canonical_width, config.canonical_height);
    println!("   Min region area: {}", config.min_region_area);
    println!("   Color map: {}\n", config.colormap);

    let store = Arc::new(MemoryStore::new());
    let pipeline = ComparisonPipeline::new(config, store.clone())
        .with_recognizer(Arc::new(FixedText));

    println!("2. Identical pages");
    let same = encode_png(&page(200))?;
    let result = pipeline.run(&same, &same)?;
    println!("   SSIM: {:?}", result.similarity_score);
    println!("   Regions: {}\n", result.regions.len());

    println!("3. Button moved 40px right");
    let wireframe = encode_png(&page(200))?;
    let live = encode_png(&page(240))?;
    let result = pipeline.run(&wireframe, &live)?;
    println!("   SSIM: {:?}", result.similarity_score);
    for region in &result.regions {
        println!(
            "   Region at ({}, {}) {}x{} area {:.0}",
            region.x, region.y, region.width, region.height, region.area
        );
    }
    for (kind, count) in result.summary.iter() {
        println!("   {kind}: {count}");
    }
    println!("   Font/style mismatch: {}\n", result.font_style_mismatch);

    println!("4. Artifacts");
    println!("   Overlay: {}", result.overlay);
    if let Some(heatmap) = &result.heatmap {
        println!("   Heatmap: {heatmap}");
    }
    println!("   Stored: {}", store.len());

    println!("\n=== Demo Complete ===");
    Ok(())
}
