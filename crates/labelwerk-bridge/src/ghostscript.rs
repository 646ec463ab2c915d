// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ghostscript-backed rasterization adapter.
//
// Consumes the external Ghostscript renderer by subprocess: the document is
// written to a per-call unique temporary directory, rendered to one PNG per
// page, and the pages are decoded into memory. The directory (and every
// file in it) is removed on every exit path, including failures, by the
// `TempDir` guard. Document metadata is recovered from the PostScript
// header comments when present.

use std::path::PathBuf;
use std::process::Command;

use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::DocumentMeta;

use crate::traits::{Rasterizer, RasterizedDocument};

/// How many header lines are scanned for `%%` metadata comments.
const HEADER_SCAN_LINES: usize = 20;

/// Rasterizes print-stream documents via the `gs` binary.
pub struct GhostscriptRasterizer {
    /// Rendering resolution passed to Ghostscript.
    dpi: u32,
    /// Path of the Ghostscript executable.
    gs_binary: PathBuf,
}

impl GhostscriptRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi,
            gs_binary: PathBuf::from("gs"),
        }
    }

    /// Override the Ghostscript executable path.
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.gs_binary = path.into();
        self
    }
}

impl Rasterizer for GhostscriptRasterizer {
    #[instrument(skip(self, document), fields(dpi = self.dpi, document_bytes = document.len()))]
    fn rasterize(&self, document: &[u8]) -> Result<RasterizedDocument> {
        // Unique working directory per call; dropped (and deleted) on every
        // return path below.
        let workdir = tempfile::tempdir()?;
        let input_path = workdir.path().join("input.ps");
        std::fs::write(&input_path, document)?;

        let output_pattern = workdir.path().join("page_%03d.png");
        let status = Command::new(&self.gs_binary)
            .arg("-q")
            .arg("-dSAFER")
            .arg("-dBATCH")
            .arg("-dNOPAUSE")
            .arg(format!("-r{}", self.dpi))
            .arg("-sDEVICE=png16m")
            .arg(format!("-sOutputFile={}", output_pattern.display()))
            .arg(&input_path)
            .output()
            .map_err(|err| {
                LabelwerkError::Rasterizer(format!(
                    "failed to launch {}: {err}",
                    self.gs_binary.display()
                ))
            })?;

        if !status.status.success() {
            let stderr = String::from_utf8_lossy(&status.stderr);
            return Err(LabelwerkError::Rasterizer(format!(
                "ghostscript exited with {}: {}",
                status.status,
                stderr.trim()
            )));
        }

        let page_files = collect_page_files(workdir.path())?;
        if page_files.is_empty() {
            warn!("ghostscript produced no pages");
        }

        let mut pages: Vec<DynamicImage> = Vec::with_capacity(page_files.len());
        for path in &page_files {
            let page = image::open(path).map_err(|err| {
                LabelwerkError::Rasterizer(format!(
                    "rendered page {} is not a valid image: {err}",
                    path.display()
                ))
            })?;
            pages.push(page);
        }

        let meta = parse_postscript_meta(document);
        info!(pages = pages.len(), ?meta, "document rasterized");
        Ok(RasterizedDocument { pages, meta })
    }
}

/// Collect the rendered `page_NNN.png` files in page order.
fn collect_page_files(dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("page_") && n.ends_with(".png"))
        })
        .collect();
    // Zero-padded numbering makes lexicographic order page order.
    files.sort();
    debug!(pages = files.len(), "rendered page files collected");
    Ok(files)
}

/// Scan the leading PostScript header comments for document metadata.
///
/// Only the conventional DSC fields are read: `%%Title:`, `%%For:`
/// (author), `%%Creator:` (application, trimmed at the first colon as some
/// drivers append a version suffix). Non-PostScript documents simply yield
/// empty metadata.
fn parse_postscript_meta(document: &[u8]) -> DocumentMeta {
    let text = String::from_utf8_lossy(document);
    let mut meta = DocumentMeta::default();

    for line in text.lines().take(HEADER_SCAN_LINES) {
        if let Some(value) = line.strip_prefix("%%Title: ") {
            meta.title = non_empty(value);
        } else if let Some(value) = line.strip_prefix("%%For: ") {
            meta.author = non_empty(value);
        } else if let Some(value) = line.strip_prefix("%%Creator: ") {
            let app = value.split(':').next().unwrap_or(value);
            meta.creator_application = non_empty(app);
        }
    }
    meta
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_matches(|c| c == '(' || c == ')');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
