// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.
//
// Constructed once at startup and passed by reference — no static registries.
// All pixel-valued crop rules are calibrated at `reference_dpi` and scaled
// linearly to the configured rendering DPI before use, so the rule set is not
// welded to one rasterization resolution.

use serde::{Deserialize, Serialize};

use crate::types::MediaSize;

/// Scale a pixel rule calibrated at `reference_dpi` to `dpi`, truncating
/// toward zero.
pub fn scale_px(px: u32, dpi: u32, reference_dpi: u32) -> u32 {
    (px as u64 * dpi as u64 / reference_dpi.max(1) as u64) as u32
}

/// Crop rules for the `FullCutLine` family.
///
/// The cut line bounds the label vertically; horizontal bounds are fixed
/// page margins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FullCutLineRules {
    /// Outward padding around the label anchor's vertical span.
    pub label_pad: u32,
    /// Fixed margin trimmed from each side of the page for the label crop.
    pub side_margin: u32,
    /// Outward padding around the auxiliary anchor's vertical span.
    pub aux_pad: u32,
}

impl Default for FullCutLineRules {
    fn default() -> Self {
        Self {
            label_pad: 20,
            side_margin: 150,
            aux_pad: 50,
        }
    }
}

/// Crop rules for the `Bordered` family.
///
/// The border line itself must be excluded from the crop, hence the inward
/// inset. The horizontal margins are asymmetric on the known sheet layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BorderedRules {
    /// Inward inset applied to each end of the anchor's vertical span.
    pub inset: u32,
    pub left_margin: u32,
    pub right_margin: u32,
}

impl Default for BorderedRules {
    fn default() -> Self {
        Self {
            inset: 5,
            left_margin: 370,
            right_margin: 570,
        }
    }
}

/// One printer route: where an output image goes and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterRoute {
    /// Target printer URI (ipp:// or ipps://).
    pub uri: String,
    /// IPP media keyword for the stock loaded in this printer.
    pub media_keyword: String,
    pub copies: u32,
}

impl Default for PrinterRoute {
    fn default() -> Self {
        Self {
            uri: "ipp://localhost:631/printers/label".into(),
            media_keyword: "custom_4x6in".into(),
            copies: 1,
        }
    }
}

/// Printer routing: which route handles label output, which handles
/// auxiliary output, and whether auxiliary output is enabled at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterRouting {
    pub label: PrinterRoute,
    pub auxiliary: Option<PrinterRoute>,
    /// When false, auxiliary images are computed but never submitted.
    pub print_auxiliary: bool,
}

impl Default for PrinterRouting {
    fn default() -> Self {
        Self {
            label: PrinterRoute::default(),
            auxiliary: None,
            print_auxiliary: false,
        }
    }
}

/// Complete, already-resolved pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rendering resolution requested from the rasterization service.
    pub dpi: u32,
    /// Resolution at which the pixel-valued crop rules were calibrated.
    pub reference_dpi: u32,
    pub full_cut_line: FullCutLineRules,
    pub bordered: BorderedRules,
    /// Target media for the extracted label image.
    pub label_media: MediaSize,
    /// Target media for the auxiliary image.
    pub auxiliary_media: MediaSize,
    pub routing: PrinterRouting,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            reference_dpi: 300,
            full_cut_line: FullCutLineRules::default(),
            bordered: BorderedRules::default(),
            label_media: MediaSize::LABEL_4X6,
            auxiliary_media: MediaSize {
                width_in: 8.5,
                height_in: 11.0,
            },
            routing: PrinterRouting::default(),
        }
    }
}

impl PipelineConfig {
    /// Scale a pixel rule from the calibration resolution to the configured
    /// rendering resolution.
    pub fn scaled(&self, px: u32) -> u32 {
        scale_px(px, self.dpi, self.reference_dpi)
    }

    /// Label output dimensions in pixels at the configured DPI.
    pub fn label_pixel_dims(&self) -> (u32, u32) {
        self.label_media.pixel_dims(self.dpi)
    }

    /// Auxiliary output dimensions in pixels at the configured DPI.
    pub fn auxiliary_pixel_dims(&self) -> (u32, u32) {
        self.auxiliary_media.pixel_dims(self.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_px_identity_at_reference_dpi() {
        assert_eq!(scale_px(150, 300, 300), 150);
    }

    #[test]
    fn scale_px_halves_at_half_resolution() {
        assert_eq!(scale_px(150, 150, 300), 75);
        assert_eq!(scale_px(370, 150, 300), 185);
    }

    #[test]
    fn scale_px_truncates_toward_zero() {
        // 5 * 100 / 300 = 1.66.. -> 1
        assert_eq!(scale_px(5, 100, 300), 1);
    }

    #[test]
    fn default_config_reproduces_calibrated_margins() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.scaled(cfg.full_cut_line.side_margin), 150);
        assert_eq!(cfg.scaled(cfg.bordered.left_margin), 370);
        assert_eq!(cfg.scaled(cfg.bordered.right_margin), 570);
        assert_eq!(cfg.label_pixel_dims(), (1200, 1800));
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = PipelineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dpi, cfg.dpi);
        assert_eq!(back.bordered.left_margin, cfg.bordered.left_margin);
    }
}
