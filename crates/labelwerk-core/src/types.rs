// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Labelwerk label pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structural layout variant of a shipping label.
///
/// Each family selects one fixed set of crop rules. The variants map to the
/// label sources seen in the wild (DHL-style sheets with a full-width cut
/// line, Amazon-style sheets with a dotted border around the label) but are
/// modeled as generic rule selectors so new families extend additively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelFamily {
    /// A long, thin, nearly horizontal cut line crosses the page mid-height.
    FullCutLine,
    /// No cut line; the label artwork is boxed by its own border.
    Bordered,
}

impl std::fmt::Display for LabelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullCutLine => write!(f, "full-cut-line"),
            Self::Bordered => write!(f, "bordered"),
        }
    }
}

/// Axis-aligned rectangle in source-image pixel coordinates.
///
/// Always clamped to the image bounds at construction; an inverted or
/// zero-area rectangle can never be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CropRegion {
    /// Clamp the given signed bounds to `[0, img_w) x [0, img_h)` and build a
    /// region, or return `None` when the clamped rectangle would be empty.
    pub fn clamped(
        top: i64,
        bottom: i64,
        left: i64,
        right: i64,
        img_w: u32,
        img_h: u32,
    ) -> Option<Self> {
        let top = top.clamp(0, img_h as i64) as u32;
        let bottom = bottom.clamp(0, img_h as i64) as u32;
        let left = left.clamp(0, img_w as i64) as u32;
        let right = right.clamp(0, img_w as i64) as u32;
        if top >= bottom || left >= right {
            return None;
        }
        Some(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Outcome of classifying and extracting a single page.
///
/// A page with no detectable anchor geometry carries `undetected == true`
/// and no regions — downstream code must treat that as a reportable state,
/// never as a blank crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub family: LabelFamily,
    /// The label artwork region, when anchor lines were found.
    pub label: Option<CropRegion>,
    /// The auxiliary "additional information" region. Populated for the
    /// `FullCutLine` family only; the `Bordered` rule set defines the field
    /// but intentionally leaves it empty.
    pub auxiliary: Option<CropRegion>,
    /// Vertical coordinate of the detected cut line, when the classifier
    /// found one (full-page coordinates).
    pub cut_line_y: Option<u32>,
    /// True when no usable anchor lines were found on the page.
    pub undetected: bool,
}

impl PageResult {
    pub fn detected(
        family: LabelFamily,
        label: Option<CropRegion>,
        auxiliary: Option<CropRegion>,
        cut_line_y: Option<u32>,
    ) -> Self {
        Self {
            family,
            label,
            auxiliary,
            cut_line_y,
            undetected: false,
        }
    }

    pub fn undetected(family: LabelFamily, cut_line_y: Option<u32>) -> Self {
        Self {
            family,
            label: None,
            auxiliary: None,
            cut_line_y,
            undetected: true,
        }
    }
}

/// Document metadata reported by the rasterization service.
///
/// PostScript sources carry this in `%%Title:` / `%%For:` / `%%Creator:`
/// header comments; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator_application: Option<String>,
}

/// Physical target media size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaSize {
    pub width_in: f32,
    pub height_in: f32,
}

impl MediaSize {
    /// Standard 4x6 inch label stock.
    pub const LABEL_4X6: Self = Self {
        width_in: 4.0,
        height_in: 6.0,
    };

    /// Pixel dimensions at the given resolution, truncated toward zero.
    pub fn pixel_dims(&self, dpi: u32) -> (u32, u32) {
        (
            (self.width_in * dpi as f32) as u32,
            (self.height_in * dpi as f32) as u32,
        )
    }
}

/// Which configured printer route an encoded image is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputRole {
    Label,
    Auxiliary,
}

/// Unique identifier for a submitted print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record of a job accepted by the print spooler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedJob {
    pub id: JobId,
    /// The job-id assigned by the printer itself.
    pub printer_job_id: i32,
    pub printer: String,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_region_clamps_to_image_bounds() {
        let r = CropRegion::clamped(-20, 4000, -5, 3000, 2550, 3300).unwrap();
        assert_eq!(r.top, 0);
        assert_eq!(r.bottom, 3300);
        assert_eq!(r.left, 0);
        assert_eq!(r.right, 2550);
    }

    #[test]
    fn crop_region_rejects_inverted_bounds() {
        assert!(CropRegion::clamped(500, 400, 0, 100, 1000, 1000).is_none());
        assert!(CropRegion::clamped(0, 100, 300, 300, 1000, 1000).is_none());
    }

    #[test]
    fn crop_region_rejects_fully_out_of_bounds_span() {
        // Both bounds clamp to the same edge — empty, not inverted.
        assert!(CropRegion::clamped(4000, 5000, 0, 100, 1000, 1000).is_none());
    }

    #[test]
    fn media_size_pixel_dims_truncate() {
        let (w, h) = MediaSize::LABEL_4X6.pixel_dims(300);
        assert_eq!((w, h), (1200, 1800));
    }

    #[test]
    fn undetected_page_result_has_no_regions() {
        let r = PageResult::undetected(LabelFamily::Bordered, None);
        assert!(r.undetected);
        assert!(r.label.is_none());
        assert!(r.auxiliary.is_none());
    }
}
