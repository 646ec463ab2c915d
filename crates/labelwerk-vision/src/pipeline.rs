// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page pipeline: orient -> classify -> extract -> normalize -> encode.
//
// Pure compute, one page at a time, no state kept between pages and no
// external services — print submission lives with the caller, so this
// whole phase is unit-testable on synthetic images.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::{info, instrument};

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::{PageResult, PipelineConfig};

use crate::canvas::fit_to_canvas;
use crate::classify::classify_page;
use crate::extract::extract_regions;
use crate::orient::normalize_orientation;

/// Everything the pipeline produces for one page.
///
/// The encoded images are already letterboxed to the configured target
/// media at the configured DPI, ready for spool submission. An undetected
/// page carries the result only.
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    pub result: PageResult,
    pub label_png: Option<Vec<u8>>,
    pub auxiliary_png: Option<Vec<u8>>,
}

/// The per-page label pipeline, parameterized by a read-only configuration.
pub struct LabelPipeline {
    config: PipelineConfig,
}

impl LabelPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode a page image from encoded bytes and process it.
    ///
    /// Invalid bytes fail with `DecodeFailure` for this page only; batch
    /// callers continue with their remaining pages.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub fn process_page_bytes(&self, bytes: &[u8]) -> Result<ProcessedPage> {
        let page = image::load_from_memory(bytes)
            .map_err(|err| LabelwerkError::DecodeFailure(format!("page image: {err}")))?;
        self.process_page(page)
    }

    /// Run the full pipeline on an already-decoded page.
    #[instrument(skip(self, page), fields(width = page.width(), height = page.height()))]
    pub fn process_page(&self, page: DynamicImage) -> Result<ProcessedPage> {
        if page.width() == 0 || page.height() == 0 {
            return Err(LabelwerkError::InvalidInput(
                "page image has zero dimensions".into(),
            ));
        }

        let page = normalize_orientation(page);
        let classification = classify_page(&page);
        let result = extract_regions(
            &page,
            classification.family,
            classification.cut_line_y,
            &self.config,
        )?;

        if result.undetected {
            info!(family = %result.family, "page has no detectable label structure");
            return Ok(ProcessedPage {
                result,
                label_png: None,
                auxiliary_png: None,
            });
        }

        let (label_w, label_h) = self.config.label_pixel_dims();
        let label_png = result
            .label
            .map(|region| {
                let crop = page.crop_imm(region.left, region.top, region.width(), region.height());
                let fitted = fit_to_canvas(&crop, label_w, label_h)?;
                encode_png(&fitted)
            })
            .transpose()?;

        let (aux_w, aux_h) = self.config.auxiliary_pixel_dims();
        let auxiliary_png = result
            .auxiliary
            .map(|region| {
                let crop = page.crop_imm(region.left, region.top, region.width(), region.height());
                let fitted = fit_to_canvas(&crop, aux_w, aux_h)?;
                encode_png(&fitted)
            })
            .transpose()?;

        info!(
            family = %result.family,
            has_label = label_png.is_some(),
            has_auxiliary = auxiliary_png.is_some(),
            "page processed"
        );
        Ok(ProcessedPage {
            result,
            label_png,
            auxiliary_png,
        })
    }
}

/// Encode to PNG — the output encoding is lossless by contract.
fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| LabelwerkError::ImageEncode(format!("PNG encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use labelwerk_core::LabelFamily;

    fn white_page(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([255u8]))
    }

    fn draw_h_line(img: &mut GrayImage, y: u32, x0: u32, x1: u32) {
        for x in x0..x1 {
            for t in 0..3 {
                img.put_pixel(x, y + t, Luma([0u8]));
            }
        }
    }

    fn draw_v_bar(img: &mut GrayImage, x: u32, y0: u32, y1: u32) {
        for y in y0..y1 {
            for t in 0..3 {
                img.put_pixel(x + t, y, Luma([0u8]));
            }
        }
    }

    fn draw_rect_border(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
        for x in x0..x1 {
            for t in 0..3 {
                img.put_pixel(x, y0 + t, Luma([0u8]));
                img.put_pixel(x, y1 - 1 - t, Luma([0u8]));
            }
        }
        for y in y0..y1 {
            for t in 0..3 {
                img.put_pixel(x0 + t, y, Luma([0u8]));
                img.put_pixel(x1 - 1 - t, y, Luma([0u8]));
            }
        }
    }

    fn pipeline() -> LabelPipeline {
        LabelPipeline::new(PipelineConfig::default())
    }

    /// 8.5x11in page at 300dpi with a full-width cut line at mid-height and
    /// two vertical anchor bars.
    #[test]
    fn full_cut_line_page_end_to_end() {
        let mut img = white_page(2550, 3300);
        draw_h_line(&mut img, 1650, 0, 2550);
        draw_v_bar(&mut img, 500, 600, 1400);
        draw_v_bar(&mut img, 2000, 300, 3000);

        let out = pipeline()
            .process_page(DynamicImage::ImageLuma8(img))
            .unwrap();

        assert_eq!(out.result.family, LabelFamily::FullCutLine);
        assert!(!out.result.undetected);
        let label = out.result.label.expect("label region");
        assert_eq!((label.left, label.right), (150, 2400));

        // Encoded label is exactly the configured 4x6in @ 300dpi.
        let png = out.label_png.expect("label image");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 1800));

        // FullCutLine also yields an auxiliary image at document media size.
        let aux_png = out.auxiliary_png.expect("auxiliary image");
        let decoded = image::load_from_memory(&aux_png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2550, 3300));
    }

    /// Same page dimensions, no mid-band line, bordered label box.
    #[test]
    fn bordered_page_end_to_end() {
        let mut img = white_page(2550, 3300);
        draw_rect_border(&mut img, 370, 800, 1980, 2600);

        let out = pipeline()
            .process_page(DynamicImage::ImageLuma8(img))
            .unwrap();

        assert_eq!(out.result.family, LabelFamily::Bordered);
        let label = out.result.label.expect("label region");
        assert_eq!((label.left, label.right), (370, 1980));

        assert!(out.result.auxiliary.is_none());
        assert!(out.auxiliary_png.is_none());

        let png = out.label_png.expect("label image");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 1800));
    }

    /// A page with no line structure at all: valid result, no output images.
    #[test]
    fn featureless_page_reports_undetected() {
        let img = white_page(2550, 3300);
        let out = pipeline()
            .process_page(DynamicImage::ImageLuma8(img))
            .unwrap();

        assert!(out.result.undetected);
        assert!(out.result.label.is_none());
        assert!(out.label_png.is_none());
        assert!(out.auxiliary_png.is_none());
    }

    #[test]
    fn landscape_page_is_normalized_before_analysis() {
        // Same bordered fixture rotated 90 degrees counter-clockwise; the
        // pipeline's clockwise normalization restores it.
        let mut img = white_page(2550, 3300);
        draw_rect_border(&mut img, 370, 800, 1980, 2600);
        let landscape = DynamicImage::ImageLuma8(img).rotate270();
        assert!(landscape.width() > landscape.height());

        let out = pipeline().process_page(landscape).unwrap();
        assert_eq!(out.result.family, LabelFamily::Bordered);
        let label = out.result.label.expect("label region");
        assert_eq!((label.left, label.right), (370, 1980));
    }

    #[test]
    fn garbage_bytes_fail_with_decode_failure() {
        let err = pipeline()
            .process_page_bytes(b"definitely not a png")
            .unwrap_err();
        assert!(matches!(err, LabelwerkError::DecodeFailure(_)));
    }

    #[test]
    fn zero_dimension_page_is_invalid_input() {
        let err = pipeline()
            .process_page(DynamicImage::new_luma8(0, 0))
            .unwrap_err();
        assert!(matches!(err, LabelwerkError::InvalidInput(_)));
    }
}
