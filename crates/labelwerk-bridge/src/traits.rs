// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for the external collaborators.
//
// Both services are opaque to the pipeline: the rasterizer is a function
// from document bytes to decoded page images, the spooler a sink from an
// encoded image to a printer job id. Failures from either are always
// recoverable at the caller's discretion — the pipeline core holds no
// resources across calls to them.

use image::DynamicImage;

use labelwerk_core::error::Result;
use labelwerk_core::{DocumentMeta, SubmittedJob};

/// A document rendered to page rasters by the external rasterization
/// service.
#[derive(Debug, Clone)]
pub struct RasterizedDocument {
    /// Fully decoded page images, in document order, at the requested DPI.
    pub pages: Vec<DynamicImage>,
    /// Metadata the service could recover from the document, if any.
    pub meta: DocumentMeta,
}

/// The external rasterization service: print-stream document bytes in,
/// ordered decoded page images out.
pub trait Rasterizer {
    fn rasterize(&self, document: &[u8]) -> Result<RasterizedDocument>;
}

/// Submission options for one spool job.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub copies: u32,
    /// Human-readable name shown in the printer queue.
    pub job_name: String,
}

/// The external print-spooling service: one implementation per printer
/// route. Submitting to a printer/media combination the service does not
/// know fails with `PrinterUnavailable`.
pub trait PrintSpooler {
    /// Submit an encoded (lossless) image for printing on the given media.
    fn submit(
        &self,
        image_png: &[u8],
        media_keyword: &str,
        options: &SubmitOptions,
    ) -> impl Future<Output = Result<SubmittedJob>> + Send;

    /// The printer this spooler targets, for logs and job records.
    fn printer_name(&self) -> &str;
}
