// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory test doubles for the external services. Used by the app runner
// tests; no network, no subprocess.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};

use image::DynamicImage;
use tracing::debug;

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::{DocumentMeta, JobId, SubmittedJob};

use crate::traits::{PrintSpooler, Rasterizer, RasterizedDocument, SubmitOptions};

/// Rasterizer that returns preset pages regardless of the document bytes.
pub struct FixtureRasterizer {
    pages: Vec<DynamicImage>,
    meta: DocumentMeta,
}

impl FixtureRasterizer {
    pub fn new(pages: Vec<DynamicImage>) -> Self {
        Self {
            pages,
            meta: DocumentMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl Rasterizer for FixtureRasterizer {
    fn rasterize(&self, _document: &[u8]) -> Result<RasterizedDocument> {
        debug!(pages = self.pages.len(), "fixture rasterizer invoked");
        Ok(RasterizedDocument {
            pages: self.pages.clone(),
            meta: self.meta.clone(),
        })
    }
}

/// One recorded spool submission.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub media_keyword: String,
    pub copies: u32,
    pub job_name: String,
    pub image_bytes: usize,
}

/// Spooler that records submissions and hands out sequential job ids.
///
/// Only the media keywords registered at construction are accepted; any
/// other combination fails with `PrinterUnavailable`, matching the real
/// service's contract.
pub struct RecordingSpooler {
    name: String,
    registered_media: Vec<String>,
    next_job_id: AtomicI32,
    submissions: Mutex<Vec<RecordedSubmission>>,
}

impl RecordingSpooler {
    pub fn new(name: impl Into<String>, registered_media: &[&str]) -> Self {
        Self {
            name: name.into(),
            registered_media: registered_media.iter().map(|m| m.to_string()).collect(),
            next_job_id: AtomicI32::new(1),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything submitted so far.
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().expect("submissions lock").clone()
    }
}

impl PrintSpooler for RecordingSpooler {
    async fn submit(
        &self,
        image_png: &[u8],
        media_keyword: &str,
        options: &SubmitOptions,
    ) -> Result<SubmittedJob> {
        if !self.registered_media.iter().any(|m| m == media_keyword) {
            return Err(LabelwerkError::PrinterUnavailable {
                printer: self.name.clone(),
                media: media_keyword.to_string(),
            });
        }

        let printer_job_id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        self.submissions
            .lock()
            .expect("submissions lock")
            .push(RecordedSubmission {
                media_keyword: media_keyword.to_string(),
                copies: options.copies,
                job_name: options.job_name.clone(),
                image_bytes: image_png.len(),
            });

        Ok(SubmittedJob {
            id: JobId::new(),
            printer_job_id,
            printer: self.name.clone(),
            submitted_at: chrono::Utc::now(),
        })
    }

    fn printer_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SubmitOptions {
        SubmitOptions {
            copies: 1,
            job_name: "test".into(),
        }
    }

    #[tokio::test]
    async fn recording_spooler_assigns_sequential_job_ids() {
        let spooler = RecordingSpooler::new("label", &["custom_4x6in"]);
        let first = spooler.submit(b"png", "custom_4x6in", &options()).await.unwrap();
        let second = spooler.submit(b"png", "custom_4x6in", &options()).await.unwrap();
        assert_eq!(first.printer_job_id, 1);
        assert_eq!(second.printer_job_id, 2);
        assert_eq!(spooler.submissions().len(), 2);
    }

    #[tokio::test]
    async fn unregistered_media_fails_with_printer_unavailable() {
        let spooler = RecordingSpooler::new("label", &["custom_4x6in"]);
        let err = spooler
            .submit(b"png", "iso_a4_210x297mm", &options())
            .await
            .unwrap_err();
        assert!(matches!(err, LabelwerkError::PrinterUnavailable { .. }));
        assert!(spooler.submissions().is_empty());
    }

    #[test]
    fn fixture_rasterizer_returns_preset_pages() {
        let page = DynamicImage::new_luma8(10, 20);
        let rasterizer = FixtureRasterizer::new(vec![page]).with_meta(DocumentMeta {
            title: Some("fixture".into()),
            ..DocumentMeta::default()
        });
        let doc = rasterizer.rasterize(b"ignored").unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.meta.title.as_deref(), Some("fixture"));
    }
}
