// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Acervo.

use thiserror::Error;

/// Top-level error type for all Acervo operations.
#[derive(Debug, Error)]
pub enum AcervoError {
    // -- Catalog errors --
    #[error("not found: {0}")]
    NotFound(String),

    // -- Document errors --
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("document could not be parsed: {0}")]
    Corrupt(String),

    // -- Conversion errors --
    //
    // The converter variants are recovered internally by falling back to the
    // in-process renderer; they never reach the caller of `preview_pdf`.
    #[error("external converter is not available")]
    ConverterUnavailable,

    #[error("external converter failed: {0}")]
    ConverterFailed(String),

    #[error("PDF rendering failed: {0}")]
    RenderFailed(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AcervoError>;
