// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region extraction: finds the label (and, per family, auxiliary) crop
// regions from the structural lines of a page.
//
// Vertical segments are the geometric anchor. Convention: the
// shortest-spanning vertical segment bounds the label, the longest-spanning
// one bounds the auxiliary region — the label artwork is boxed more tightly
// than the shipping document around it. The convention lives in per-family
// rule functions so a new family can substitute its own anchor rule.

use image::DynamicImage;
use imageproc::edges::canny;
use tracing::{debug, instrument, warn};

use labelwerk_core::config::{BorderedRules, FullCutLineRules};
use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::{CropRegion, LabelFamily, PageResult, PipelineConfig};

use crate::lines::{LineDetectionParams, LineSegment, detect_segments};

/// Canny gradient thresholds for the structural edge map.
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// A vertical anchor's y-extent, ordered (min, max).
#[derive(Debug, Clone, Copy)]
struct VerticalSpan {
    top: i64,
    bottom: i64,
}

impl VerticalSpan {
    fn of(seg: &LineSegment) -> Self {
        let (top, bottom) = seg.y_range();
        Self {
            top: top as i64,
            bottom: bottom as i64,
        }
    }

    fn len(&self) -> i64 {
        self.bottom - self.top
    }
}

/// Extract the label and auxiliary crop regions from a full page.
///
/// Never fails for a well-formed image: a page without usable anchor lines
/// yields an `undetected` result, which is data, not an error. A
/// zero-dimension image is a contract violation and fails with
/// `InvalidInput`.
#[instrument(skip(page, config), fields(width = page.width(), height = page.height(), %family))]
pub fn extract_regions(
    page: &DynamicImage,
    family: LabelFamily,
    cut_line_y: Option<u32>,
    config: &PipelineConfig,
) -> Result<PageResult> {
    let w = page.width();
    let h = page.height();
    if w == 0 || h == 0 {
        return Err(LabelwerkError::InvalidInput(
            "cannot extract regions from a zero-dimension image".into(),
        ));
    }

    let gray = page.to_luma8();
    let edges = canny(&gray, CANNY_LOW, CANNY_HIGH);

    let params = LineDetectionParams {
        vote_threshold: 80,
        min_line_length: config.scaled(500),
        max_line_gap: config.scaled(10).max(1),
        angle_step_degrees: 1.0,
    };
    let segments = detect_segments(&edges, &params);

    let axis_tol = config.scaled(10).max(1);
    let verticals: Vec<VerticalSpan> = segments
        .iter()
        .filter(|s| s.is_vertical(axis_tol))
        .map(VerticalSpan::of)
        .collect();
    debug!(
        segments = segments.len(),
        verticals = verticals.len(),
        "structural lines partitioned"
    );

    if verticals.is_empty() {
        warn!("no vertical anchor lines found on page");
        return Ok(PageResult::undetected(family, cut_line_y));
    }

    let shortest = verticals
        .iter()
        .min_by_key(|s| s.len())
        .copied()
        .expect("verticals is non-empty");
    let longest = verticals
        .iter()
        .max_by_key(|s| s.len())
        .copied()
        .expect("verticals is non-empty");

    let (label, auxiliary) = match family {
        LabelFamily::FullCutLine => {
            full_cut_line_regions(shortest, longest, w, h, &config.full_cut_line, config)
        }
        LabelFamily::Bordered => bordered_regions(longest, w, h, &config.bordered, config),
    };

    Ok(PageResult::detected(family, label, auxiliary, cut_line_y))
}

/// FullCutLine rule: the label anchor's span padded outward, fixed symmetric
/// side margins; the auxiliary region spans the full width around the
/// longest anchor.
fn full_cut_line_regions(
    shortest: VerticalSpan,
    longest: VerticalSpan,
    w: u32,
    h: u32,
    rules: &FullCutLineRules,
    config: &PipelineConfig,
) -> (Option<CropRegion>, Option<CropRegion>) {
    let label_pad = config.scaled(rules.label_pad) as i64;
    let side_margin = config.scaled(rules.side_margin) as i64;
    let aux_pad = config.scaled(rules.aux_pad) as i64;

    let label = CropRegion::clamped(
        shortest.top - label_pad,
        shortest.bottom + label_pad,
        side_margin,
        w as i64 - side_margin,
        w,
        h,
    );
    let auxiliary = CropRegion::clamped(
        longest.top - aux_pad,
        longest.bottom + aux_pad,
        0,
        w as i64,
        w,
        h,
    );
    (label, auxiliary)
}

/// Bordered rule: the longest anchor's span inset inward so the border line
/// itself is excluded, fixed asymmetric side margins. The auxiliary region
/// is defined by the configuration schema but intentionally left
/// unpopulated for this family.
fn bordered_regions(
    longest: VerticalSpan,
    w: u32,
    h: u32,
    rules: &BorderedRules,
    config: &PipelineConfig,
) -> (Option<CropRegion>, Option<CropRegion>) {
    let inset = config.scaled(rules.inset) as i64;
    let left = config.scaled(rules.left_margin) as i64;
    let right = w as i64 - config.scaled(rules.right_margin) as i64;

    let label = CropRegion::clamped(
        longest.top + inset,
        longest.bottom - inset,
        left,
        right,
        w,
        h,
    );
    (label, None)
}
