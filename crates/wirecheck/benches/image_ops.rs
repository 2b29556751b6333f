//! Image Operations Benchmarks
//!
//! Benchmarks for SSIM scoring, discrepancy detection and heatmap colorizing.
//!
//! Run with: `cargo bench --bench image_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{GrayImage, Luma};
use wirecheck::{ColorMap, DifferenceMap, DiscrepancyDetector, HeatmapRenderer, SimilarityScorer};

fn page(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([(((x / 8) ^ (y / 8)) % 2 * 200 + 30) as u8]))
}

fn with_block(base: &GrayImage, x0: u32, y0: u32, size: u32) -> GrayImage {
    let mut img = base.clone();
    for y in y0..(y0 + size).min(img.height()) {
        for x in x0..(x0 + size).min(img.width()) {
            img.put_pixel(x, y, Luma([0]));
        }
    }
    img
}

const SIZES: [(u32, u32); 3] = [(360, 250), (720, 500), (1440, 1000)];

fn bench_ssim(c: &mut Criterion) {
    let mut group = c.benchmark_group("ssim");
    group.sample_size(20);

    for (width, height) in SIZES {
        let a = page(width, height);
        let b = with_block(&a, width / 4, height / 4, width / 5);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(a, b),
            |bench, (a, b)| {
                let scorer = SimilarityScorer::default();
                bench.iter(|| black_box(scorer.score(black_box(a), black_box(b)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");
    group.sample_size(20);

    for (width, height) in SIZES {
        let a = page(width, height);
        let b = with_block(&a, width / 3, height / 3, width / 6);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(a, b),
            |bench, (a, b)| {
                let detector = DiscrepancyDetector::default();
                bench.iter(|| black_box(detector.detect(black_box(a), black_box(b)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_colorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("colorize");

    let a = page(1440, 1000);
    let b = with_block(&a, 300, 300, 400);
    let difference = DifferenceMap::between(&a, &b).unwrap();

    for colormap in [ColorMap::Jet, ColorMap::Viridis] {
        let renderer = HeatmapRenderer::default().with_colormap(colormap);
        group.bench_with_input(
            BenchmarkId::from_parameter(colormap),
            &difference,
            |bench, difference| {
                bench.iter(|| black_box(renderer.colorize(black_box(difference))));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ssim, bench_detect, bench_colorize);
criterion_main!(benches);
