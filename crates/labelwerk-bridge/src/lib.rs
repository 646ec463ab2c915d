// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelwerk-bridge — Boundary to the two external collaborators of the
// label pipeline: the rasterization service (print-stream document to page
// images) and the print-spooling service (encoded image to a printer job).
//
// The core never implements these services; it consumes them behind the
// traits in `traits`. Adapters: Ghostscript subprocess for rasterization,
// IPP Print-Job for spooling. In-memory stubs for tests live in `stub`.

pub mod ghostscript;
pub mod ipp;
pub mod stub;
pub mod traits;

pub use ghostscript::GhostscriptRasterizer;
pub use ipp::IppSpooler;
pub use stub::{FixtureRasterizer, RecordingSpooler};
pub use traits::{PrintSpooler, Rasterizer, RasterizedDocument, SubmitOptions};
