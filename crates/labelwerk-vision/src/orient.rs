// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation normalizer — first stage of the per-page pipeline.

use image::DynamicImage;
use tracing::debug;

/// Ensure the page raster is in portrait orientation.
///
/// Landscape pages (width > height) are rotated 90 degrees clockwise;
/// portrait pages pass through unchanged. The rotation direction is a fixed
/// guess: a landscape page read the "wrong way round" ends up upside-down,
/// and downstream stages tolerate that — the crop rules anchor on detected
/// lines, never on top-of-page equals top-of-label.
pub fn normalize_orientation(image: DynamicImage) -> DynamicImage {
    if image.width() > image.height() {
        debug!(
            width = image.width(),
            height = image.height(),
            "rotating landscape page to portrait"
        );
        image.rotate90()
    } else {
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gray_page(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([255u8])))
    }

    #[test]
    fn portrait_page_passes_through_unchanged() {
        let img = gray_page(200, 300);
        let before = img.clone();
        let out = normalize_orientation(img);
        assert_eq!(out.as_bytes(), before.as_bytes());
        assert_eq!((out.width(), out.height()), (200, 300));
    }

    #[test]
    fn normalization_is_idempotent_on_portrait() {
        let once = normalize_orientation(gray_page(200, 300));
        let twice = normalize_orientation(once.clone());
        assert_eq!(once.as_bytes(), twice.as_bytes());
    }

    #[test]
    fn landscape_page_becomes_portrait() {
        let out = normalize_orientation(gray_page(300, 200));
        assert!(out.width() <= out.height());
        assert_eq!((out.width(), out.height()), (200, 300));
    }

    #[test]
    fn square_page_is_left_alone() {
        let out = normalize_orientation(gray_page(250, 250));
        assert_eq!((out.width(), out.height()), (250, 250));
    }

    #[test]
    fn rotation_moves_pixels_clockwise() {
        // Mark the top-left pixel of a landscape image; after a clockwise
        // rotation it must land in the top-right corner.
        let mut img = GrayImage::from_pixel(4, 2, Luma([255u8]));
        img.put_pixel(0, 0, Luma([0u8]));
        let out = normalize_orientation(DynamicImage::ImageLuma8(img)).to_luma8();
        assert_eq!(out.get_pixel(1, 0).0[0], 0);
    }
}
