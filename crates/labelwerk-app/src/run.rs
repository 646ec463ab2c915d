// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document runner: rasterize once, process pages in parallel, submit the
// results in page order.
//
// The pure per-page pipeline runs on the blocking pool; only the spool
// submissions are awaited on the async runtime. Every per-page failure is
// captured in that page's outcome — a batch only fails as a whole when the
// rasterization service itself fails.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::task;
use tracing::{info, warn};

use labelwerk_bridge::{PrintSpooler, Rasterizer, SubmitOptions};
use labelwerk_core::error::Result;
use labelwerk_core::{PageResult, PipelineConfig, SubmittedJob};
use labelwerk_vision::{LabelPipeline, ProcessedPage};

/// Everything that happened to one page of a document.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// Zero-based page index in document order.
    pub page_index: usize,
    /// Classification and extraction result; `None` when the page failed
    /// before producing one.
    pub result: Option<PageResult>,
    pub label_job: Option<SubmittedJob>,
    pub auxiliary_job: Option<SubmittedJob>,
    /// First error hit while processing or submitting this page.
    pub error: Option<String>,
}

impl PageOutcome {
    fn failed(page_index: usize, error: String) -> Self {
        Self {
            page_index,
            result: None,
            label_job: None,
            auxiliary_job: None,
            error: Some(error),
        }
    }
}

/// Process one document end to end.
///
/// The auxiliary spooler is consulted only when routing enables auxiliary
/// output and a route is configured; otherwise auxiliary images are
/// computed and dropped.
pub async fn run_document<R, L, A>(
    rasterizer: &R,
    label_spooler: &L,
    auxiliary_spooler: Option<&A>,
    config: &PipelineConfig,
    document: &[u8],
) -> Result<Vec<PageOutcome>>
where
    R: Rasterizer,
    L: PrintSpooler,
    A: PrintSpooler,
{
    let doc_hash = hex::encode(Sha256::digest(document));
    let doc_tag = &doc_hash[..8];

    let rasterized = rasterizer.rasterize(document)?;
    let title = rasterized
        .meta
        .title
        .clone()
        .unwrap_or_else(|| "document".into());
    info!(
        doc = doc_tag,
        title,
        pages = rasterized.pages.len(),
        "document rasterized"
    );

    // Fan the pure compute out to the blocking pool, keeping page order.
    let pipeline = Arc::new(LabelPipeline::new(config.clone()));
    let handles: Vec<_> = rasterized
        .pages
        .into_iter()
        .map(|page| {
            let pipeline = Arc::clone(&pipeline);
            task::spawn_blocking(move || pipeline.process_page(page))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (page_index, handle) in handles.into_iter().enumerate() {
        let processed = match handle.await {
            Ok(Ok(processed)) => processed,
            Ok(Err(err)) => {
                warn!(doc = doc_tag, page = page_index, error = %err, "page processing failed");
                outcomes.push(PageOutcome::failed(page_index, err.to_string()));
                continue;
            }
            Err(join_err) => {
                warn!(doc = doc_tag, page = page_index, error = %join_err, "page task panicked");
                outcomes.push(PageOutcome::failed(page_index, join_err.to_string()));
                continue;
            }
        };

        outcomes.push(
            submit_page(
                processed,
                page_index,
                &title,
                doc_tag,
                label_spooler,
                auxiliary_spooler,
                config,
            )
            .await,
        );
    }

    Ok(outcomes)
}

async fn submit_page<L, A>(
    processed: ProcessedPage,
    page_index: usize,
    title: &str,
    doc_tag: &str,
    label_spooler: &L,
    auxiliary_spooler: Option<&A>,
    config: &PipelineConfig,
) -> PageOutcome
where
    L: PrintSpooler,
    A: PrintSpooler,
{
    let mut outcome = PageOutcome {
        page_index,
        result: Some(processed.result.clone()),
        label_job: None,
        auxiliary_job: None,
        error: None,
    };

    if processed.result.undetected {
        warn!(
            doc = doc_tag,
            page = page_index,
            "no label structure detected, nothing submitted"
        );
        return outcome;
    }

    if let Some(png) = processed.label_png.as_deref() {
        let route = &config.routing.label;
        let options = SubmitOptions {
            copies: route.copies,
            job_name: format!("{title} p{} [{doc_tag}] label", page_index + 1),
        };
        match label_spooler.submit(png, &route.media_keyword, &options).await {
            Ok(job) => {
                info!(
                    doc = doc_tag,
                    page = page_index,
                    printer = job.printer,
                    printer_job_id = job.printer_job_id,
                    "label submitted"
                );
                outcome.label_job = Some(job);
            }
            Err(err) => {
                warn!(doc = doc_tag, page = page_index, error = %err, "label submission failed");
                outcome.error = Some(err.to_string());
                return outcome;
            }
        }
    }

    if !config.routing.print_auxiliary {
        return outcome;
    }
    let (Some(spooler), Some(route), Some(png)) = (
        auxiliary_spooler,
        config.routing.auxiliary.as_ref(),
        processed.auxiliary_png.as_deref(),
    ) else {
        return outcome;
    };

    let options = SubmitOptions {
        copies: route.copies,
        job_name: format!("{title} p{} [{doc_tag}] auxiliary", page_index + 1),
    };
    match spooler.submit(png, &route.media_keyword, &options).await {
        Ok(job) => {
            info!(
                doc = doc_tag,
                page = page_index,
                printer = job.printer,
                printer_job_id = job.printer_job_id,
                "auxiliary submitted"
            );
            outcome.auxiliary_job = Some(job);
        }
        Err(err) => {
            warn!(doc = doc_tag, page = page_index, error = %err, "auxiliary submission failed");
            outcome.error = Some(err.to_string());
        }
    }

    outcome
}
