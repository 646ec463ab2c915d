// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label-family classification.
//
// Probes the horizontal mid-band of an orientation-normalized page for a
// full-width cut line. The probe can only prove a cut line, never a border,
// so `Bordered` is the default when no qualifying segment is found — a
// binary decision with no "unknown" outcome.

use image::DynamicImage;
use tracing::{debug, info, instrument};

use labelwerk_core::LabelFamily;

use crate::lines::{LineDetectionParams, binarize_inverted, detect_segments};

/// Intensity cutoff below which a pixel counts as ink.
const INK_CUTOFF: u8 = 220;

/// Maximum vertical deviation for a segment to count as the cut line.
const HORIZONTAL_TOL: u32 = 2;

/// Classifier output: the family plus, for `FullCutLine`, the vertical
/// coordinate of the detected cut line in full-page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub family: LabelFamily,
    pub cut_line_y: Option<u32>,
}

/// Classify a full, orientation-normalized page.
///
/// The searched band spans the middle third of the page height (center
/// ± h/6) across the full width. A near-horizontal segment covering at
/// least 60% of the page width decides `FullCutLine`; the first qualifying
/// segment wins and further matches cannot change the outcome.
#[instrument(skip(page), fields(width = page.width(), height = page.height()))]
pub fn classify_page(page: &DynamicImage) -> Classification {
    let w = page.width();
    let h = page.height();

    let band_top = h / 2 - h / 6;
    let band_height = 2 * (h / 6);
    let band = page.crop_imm(0, band_top, w, band_height).to_luma8();

    let binary = binarize_inverted(&band, INK_CUTOFF);
    let params = LineDetectionParams {
        vote_threshold: 50,
        min_line_length: (w as f64 * 0.9) as u32,
        max_line_gap: 50,
        angle_step_degrees: 1.0,
    };
    let segments = detect_segments(&binary, &params);
    debug!(segments = segments.len(), band_top, band_height, "mid-band probed");

    for seg in &segments {
        if seg.is_horizontal(HORIZONTAL_TOL) && seg.x_span() as f64 >= w as f64 * 0.6 {
            let band_y = (seg.y1 + seg.y2) / 2;
            let cut_line_y = band_top + band_y.max(0) as u32;
            info!(cut_line_y, "cut line found, full-cut-line family");
            return Classification {
                family: LabelFamily::FullCutLine,
                cut_line_y: Some(cut_line_y),
            };
        }
    }

    info!("no cut line in mid-band, bordered family");
    Classification {
        family: LabelFamily::Bordered,
        cut_line_y: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// White portrait page, optionally with a solid horizontal ink line.
    fn page_with_line(w: u32, h: u32, line: Option<(u32, u32, u32)>) -> DynamicImage {
        let mut img = GrayImage::from_pixel(w, h, Luma([255u8]));
        if let Some((y, x0, x1)) = line {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn full_width_mid_line_classifies_as_full_cut_line() {
        let page = page_with_line(850, 1100, Some((550, 20, 830)));
        let c = classify_page(&page);
        assert_eq!(c.family, LabelFamily::FullCutLine);
        let y = c.cut_line_y.expect("cut line coordinate recorded");
        assert!(y.abs_diff(550) <= 2, "cut line at {y}, expected ~550");
    }

    #[test]
    fn page_without_line_defaults_to_bordered() {
        let page = page_with_line(850, 1100, None);
        let c = classify_page(&page);
        assert_eq!(c.family, LabelFamily::Bordered);
        assert!(c.cut_line_y.is_none());
    }

    #[test]
    fn line_outside_mid_band_is_ignored() {
        // Band covers rows [367, 733); a line near the top must not match.
        let page = page_with_line(850, 1100, Some((100, 0, 850)));
        let c = classify_page(&page);
        assert_eq!(c.family, LabelFamily::Bordered);
    }

    #[test]
    fn short_mid_line_is_not_a_cut_line() {
        // 40% of the width — below both the detector's minimum length and
        // the 60% decision rule.
        let page = page_with_line(850, 1100, Some((550, 250, 590)));
        let c = classify_page(&page);
        assert_eq!(c.family, LabelFamily::Bordered);
    }
}
