// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the labelwerk-vision crate. Benchmarks the full
// per-page pipeline on a small synthetic bordered-label page.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use labelwerk_core::PipelineConfig;
use labelwerk_vision::LabelPipeline;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark the per-page pipeline on a quarter-resolution synthetic page.
///
/// A 638x825 page (8.5x11in at 75dpi) with a bordered label box — the same
/// fixture shape used in the pipeline unit tests, scaled down so the Canny
/// and Hough stages dominate rather than allocation.
fn bench_page_pipeline(c: &mut Criterion) {
    let (width, height) = (638u32, 825u32);
    let mut img = GrayImage::from_pixel(width, height, Luma([255u8]));

    // Label box border from (92, 200) to (495, 650).
    for x in 92..495 {
        img.put_pixel(x, 200, Luma([0u8]));
        img.put_pixel(x, 649, Luma([0u8]));
    }
    for y in 200..650 {
        img.put_pixel(92, y, Luma([0u8]));
        img.put_pixel(494, y, Luma([0u8]));
    }
    let page = DynamicImage::ImageLuma8(img);

    let mut config = PipelineConfig::default();
    config.dpi = 75;

    c.bench_function("page_pipeline (638x825)", |b| {
        let pipeline = LabelPipeline::new(config.clone());
        b.iter(|| {
            let out = pipeline.process_page(black_box(page.clone()));
            black_box(out).ok();
        });
    });
}

criterion_group!(benches, bench_page_pipeline);
criterion_main!(benches);
