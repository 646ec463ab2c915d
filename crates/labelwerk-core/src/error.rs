// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Labelwerk.
//
// "No structure found on the page" is deliberately absent from this enum.
// A missing cut line or border is a valid outcome of a deformed scan and is
// carried as data (`PageResult::undetected`), never raised as an error.

use thiserror::Error;

/// Top-level error type for all Labelwerk operations.
#[derive(Debug, Error)]
pub enum LabelwerkError {
    // -- Page pipeline errors --
    #[error("page image decode failed: {0}")]
    DecodeFailure(String),

    #[error("invalid input image: {0}")]
    InvalidInput(String),

    // -- External collaborators --
    #[error("rasterization service failed: {0}")]
    Rasterizer(String),

    #[error("print spooler request failed: {0}")]
    Spooler(String),

    #[error("printer '{printer}' has no registered media '{media}'")]
    PrinterUnavailable { printer: String, media: String },

    // -- Storage / encoding --
    #[error("image encoding failed: {0}")]
    ImageEncode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelwerkError>;
