// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelwerk — label extraction and print routing for rasterized label pages.
//
// Entry point. Reads one print-stream document from stdin, rasterizes it,
// extracts label regions page by page, and spools the results to the
// configured printers.

mod run;

use std::io::Read;
use std::path::Path;

use tracing::{error, info};

use labelwerk_bridge::{GhostscriptRasterizer, IppSpooler};
use labelwerk_core::error::Result;
use labelwerk_core::PipelineConfig;

use run::run_document;

const CONFIG_FILE: &str = "labelwerk.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Labelwerk starting");

    match run().await {
        Ok(printed_any) => {
            if !printed_any {
                std::process::exit(1);
            }
        }
        Err(err) => {
            error!(error = %err, "document run failed");
            std::process::exit(1);
        }
    }
}

/// Returns whether at least one page produced a spooled job.
async fn run() -> Result<bool> {
    let config = load_config(Path::new(CONFIG_FILE))?;

    let mut document = Vec::new();
    std::io::stdin().read_to_end(&mut document)?;

    let rasterizer = GhostscriptRasterizer::new(config.dpi);
    let label_spooler = IppSpooler::new(&config.routing.label.uri, "label")?;
    let auxiliary_spooler = match config.routing.auxiliary.as_ref() {
        Some(route) => Some(IppSpooler::new(&route.uri, "auxiliary")?),
        None => None,
    };

    let outcomes = run_document(
        &rasterizer,
        &label_spooler,
        auxiliary_spooler.as_ref(),
        &config,
        &document,
    )
    .await?;

    let printed = outcomes.iter().filter(|o| o.label_job.is_some()).count();
    let undetected = outcomes
        .iter()
        .filter(|o| o.result.as_ref().is_some_and(|r| r.undetected))
        .count();
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    info!(
        pages = outcomes.len(),
        printed, undetected, failed, "document run complete"
    );

    Ok(printed > 0)
}

/// Load the pipeline configuration from the working directory, falling back
/// to the built-in defaults when no file is present.
fn load_config(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        info!("no {CONFIG_FILE} found, using default configuration");
        return Ok(PipelineConfig::default());
    }
    let bytes = std::fs::read(path)?;
    let config: PipelineConfig = serde_json::from_slice(&bytes)?;
    info!(dpi = config.dpi, "configuration loaded from {CONFIG_FILE}");
    Ok(config)
}
