// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async IPP adapter for the print-spooling service.
//
// Sends a Print-Job operation (RFC 8011 §4.2.1) per submission. Each
// instance is bound to a single printer URI; routing across printers is the
// caller's concern.

use std::io::Cursor;

use ipp::prelude::*;
use tracing::{debug, error, info, instrument};

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::{JobId, SubmittedJob};

use crate::traits::{PrintSpooler, SubmitOptions};

/// IPP-backed print spooler bound to one printer.
pub struct IppSpooler {
    uri: Uri,
    /// Display name used in logs and job records.
    name: String,
}

impl IppSpooler {
    /// Create a spooler targeting the given `ipp://` or `ipps://` URI.
    pub fn new(uri: &str, name: impl Into<String>) -> Result<Self> {
        let parsed: Uri = uri
            .parse()
            .map_err(|e| LabelwerkError::Spooler(format!("invalid printer URI '{uri}': {e}")))?;
        Ok(Self {
            uri: parsed,
            name: name.into(),
        })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}

impl PrintSpooler for IppSpooler {
    #[instrument(skip(self, image_png), fields(uri = %self.uri, media = media_keyword, job = %options.job_name))]
    async fn submit(
        &self,
        image_png: &[u8],
        media_keyword: &str,
        options: &SubmitOptions,
    ) -> Result<SubmittedJob> {
        let payload = IppPayload::new(Cursor::new(image_png.to_vec()));

        let operation = IppOperationBuilder::print_job(self.uri.clone(), payload)
            .job_title(&options.job_name)
            .document_format("image/png")
            .attribute(IppAttribute::new(
                "media",
                IppValue::Keyword(media_keyword.to_string()),
            ))
            .attribute(IppAttribute::new(
                "copies",
                IppValue::Integer(options.copies.max(1) as i32),
            ))
            .build();

        let client = AsyncIppClient::new(self.uri.clone());

        info!("sending Print-Job");
        let response = client
            .send(operation)
            .await
            .map_err(|e| LabelwerkError::Spooler(format!("Print-Job: {e}")))?;

        let code = response.header().status_code();
        if !code.is_success() {
            error!(status = ?code, "Print-Job failed");
            return Err(map_status_error(code, &self.name, media_keyword));
        }

        let printer_job_id = extract_job_id(response.attributes()).ok_or_else(|| {
            LabelwerkError::Spooler("Print-Job response missing job-id attribute".into())
        })?;

        info!(printer_job_id, "print job accepted by printer");
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

/// Map an unsuccessful IPP status to the error taxonomy.
///
/// Not-found / not-supported / not-possible statuses mean the printer or
/// the requested media is not registered on the spool side; everything else
/// is a generic spooler failure.
fn map_status_error(code: StatusCode, printer: &str, media: &str) -> LabelwerkError {
    let rendered = format!("{code:?}");
    if rendered.contains("NotFound")
        || rendered.contains("NotSupported")
        || rendered.contains("NotPossible")
    {
        LabelwerkError::PrinterUnavailable {
            printer: printer.to_string(),
            media: media.to_string(),
        }
    } else {
        LabelwerkError::Spooler(format!("Print-Job returned status {rendered}"))
    }
}

/// Extract the `job-id` integer from the response's Job Attributes group.
fn extract_job_id(attrs: &IppAttributes) -> Option<i32> {
    for group in attrs.groups_of(DelimiterTag::JobAttributes) {
        if let Some(attr) = group.attributes().get("job-id") {
            if let IppValue::Integer(id) = attr.value() {
                return Some(*id);
            }
        }
    }
    None
}
