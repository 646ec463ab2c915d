// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas normalization: uniform scale plus letterbox onto target media.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::{debug, instrument};

use labelwerk_core::error::{LabelwerkError, Result};

/// Letterbox background.
const CANVAS_WHITE: Rgb<u8> = Rgb([255u8, 255, 255]);

/// Scale a cropped image to fit within `target_w` x `target_h` preserving
/// aspect ratio, then center it on a white canvas of exactly the target
/// size.
///
/// Wide sources (aspect > 1.5) are fitted width-first, others height-first,
/// falling back to the opposite axis when the first choice would overflow.
/// All dimension arithmetic is integer, truncating toward zero, so the
/// centering offset may be off by one pixel — that is accepted, not a
/// defect. The output is always exactly target-sized; nothing is ever
/// cropped here.
#[instrument(skip(source), fields(src_w = source.width(), src_h = source.height(), target_w, target_h))]
pub fn fit_to_canvas(source: &DynamicImage, target_w: u32, target_h: u32) -> Result<RgbImage> {
    let w = source.width();
    let h = source.height();
    if w == 0 || h == 0 {
        return Err(LabelwerkError::InvalidInput(
            "cannot normalize a zero-dimension image".into(),
        ));
    }
    if target_w == 0 || target_h == 0 {
        return Err(LabelwerkError::InvalidInput(format!(
            "target canvas {target_w}x{target_h} is degenerate"
        )));
    }

    let (new_w, new_h) = fitted_dims(w, h, target_w, target_h);
    debug!(new_w, new_h, "scaled dimensions computed");

    // Resampling at 1:1 scale would only add filter blur; skip it.
    let scaled = if (new_w, new_h) == (w, h) {
        source.to_rgb8()
    } else {
        imageops::resize(&source.to_rgb8(), new_w, new_h, FilterType::Lanczos3)
    };

    let mut canvas = RgbImage::from_pixel(target_w, target_h, CANVAS_WHITE);
    let off_x = ((target_w - new_w) / 2) as i64;
    let off_y = ((target_h - new_h) / 2) as i64;
    imageops::replace(&mut canvas, &scaled, off_x, off_y);

    Ok(canvas)
}

/// Integer fit of a `w` x `h` source inside the target bounds.
fn fitted_dims(w: u32, h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let (w, h) = (w as u64, h as u64);
    let (tw, th) = (target_w as u64, target_h as u64);
    let aspect = w as f64 / h as f64;

    let (mut new_w, mut new_h) = if aspect > 1.5 {
        let nw = tw;
        let nh = tw * h / w;
        if nh > th { (th * w / h, th) } else { (nw, nh) }
    } else {
        let nh = th;
        let nw = th * w / h;
        if nw > tw { (tw, tw * h / w) } else { (nw, nh) }
    };

    new_w = new_w.clamp(1, tw);
    new_h = new_h.clamp(1, th);
    (new_w as u32, new_h as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gray_src(w: u32, h: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([value])))
    }

    #[test]
    fn output_is_exactly_target_size_for_extreme_wide_aspect() {
        // 10:1 source.
        let out = fit_to_canvas(&gray_src(2000, 200, 0), 1200, 1800).unwrap();
        assert_eq!(out.dimensions(), (1200, 1800));
    }

    #[test]
    fn output_is_exactly_target_size_for_extreme_tall_aspect() {
        // 1:10 source.
        let out = fit_to_canvas(&gray_src(200, 2000, 0), 1200, 1800).unwrap();
        assert_eq!(out.dimensions(), (1200, 1800));
    }

    #[test]
    fn target_sized_source_round_trips_pixel_identical() {
        let src = gray_src(1200, 1800, 37);
        let out = fit_to_canvas(&src, 1200, 1800).unwrap();
        assert_eq!(out.dimensions(), (1200, 1800));
        for p in out.pixels() {
            assert_eq!(p.0, [37, 37, 37]);
        }
    }

    #[test]
    fn scaled_image_is_centered_on_white() {
        // A black 10:1 bar on a portrait canvas: letterboxed vertically.
        let out = fit_to_canvas(&gray_src(2000, 200, 0), 1200, 1800).unwrap();

        // Scaled content is 1200x120, centered at rows [840, 960).
        assert_eq!(out.get_pixel(600, 900).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(600, 100).0, [255, 255, 255]);
        assert_eq!(out.get_pixel(600, 1700).0, [255, 255, 255]);
    }

    #[test]
    fn centering_offset_floors_odd_remainders() {
        // 4x1 content on a 4x4 canvas: vertical offset (4 - 1) / 2 = 1.
        let out = fit_to_canvas(&gray_src(300, 100, 0), 4, 4).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(0, 1).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(out.get_pixel(0, 3).0, [255, 255, 255]);
    }

    #[test]
    fn degenerate_target_is_invalid_input() {
        let err = fit_to_canvas(&gray_src(100, 100, 0), 0, 600).unwrap_err();
        assert!(matches!(err, LabelwerkError::InvalidInput(_)));
    }
}
