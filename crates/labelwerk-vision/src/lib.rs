// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelwerk-vision — Geometric core of the Labelwerk label pipeline.
//
// Provides orientation normalization, straight-line segment detection,
// label-family classification, family-specific region extraction, and
// aspect-preserving letterbox normalization to a target media size. All
// stages are pure image-to-data or image-to-image transforms with no
// external services and no cross-page state.

pub mod canvas;
pub mod classify;
pub mod extract;
pub mod lines;
pub mod orient;
pub mod pipeline;

pub use canvas::fit_to_canvas;
pub use classify::{Classification, classify_page};
pub use extract::extract_regions;
pub use lines::{LineDetectionParams, LineSegment, binarize_inverted, detect_segments};
pub use orient::normalize_orientation;
pub use pipeline::{LabelPipeline, ProcessedPage};
