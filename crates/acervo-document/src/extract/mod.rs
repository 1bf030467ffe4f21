// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format extractors — turn a stored office document into bounded structural
// content (paragraphs or a cell grid).
//
// Extraction is deliberately lossy: no styles, no images, no layout. The
// caps keep worst-case latency predictable regardless of source size. A
// file that declares a supported extension but cannot be parsed degrades to
// `Corrupt` — the caller renders that as an inline message, never as a
// server fault.

pub mod sheet;
pub mod word;

use std::path::Path;

use tracing::{debug, instrument};

use acervo_core::error::{AcervoError, Result};
use acervo_core::types::{DocumentKind, ExtractedContent};

/// Extract structural content from the file at `path`.
///
/// The extension decides which extractor applies; extensions outside the
/// supported set fail with `UnsupportedFormat` before any file I/O.
#[instrument(skip(path), fields(path = %path.as_ref().display(), ext = extension))]
pub fn extract(path: impl AsRef<Path>, extension: &str) -> Result<ExtractedContent> {
    let kind = DocumentKind::from_extension(extension)
        .ok_or_else(|| AcervoError::UnsupportedFormat(extension.to_string()))?;

    let content = match kind {
        DocumentKind::Word => word::extract_paragraphs(path.as_ref())?,
        DocumentKind::SheetZipped | DocumentKind::SheetBinary => {
            sheet::extract_grid(path.as_ref())?
        }
    };

    match &content {
        ExtractedContent::Text { paragraphs, truncated } => {
            debug!(paragraphs = paragraphs.len(), truncated, "word extraction done");
        }
        ExtractedContent::Table { rows } => {
            debug!(rows = rows.len(), "sheet extraction done");
        }
    }
    Ok(content)
}
