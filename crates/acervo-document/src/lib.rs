// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// acervo-document — Document processing for the Acervo publication engine.
//
// Provides catalog file resolution, structural content extraction (docx,
// xlsx, xls), PDF conversion with an mtime-keyed artifact cache (external
// converter plus in-process fallback), and inline HTML previews.

pub mod convert;
pub mod extract;
pub mod preview;
pub mod render;
pub mod soffice;
pub mod store;

// Re-export the primary types so callers can use `acervo_document::DocumentStore` etc.
pub use convert::ConversionService;
pub use preview::render_preview;
pub use soffice::{PdfConverter, SofficeConverter};
pub use store::DocumentStore;

/// Initialize the library's logging.
/// Call this once at application startup if you want to see logs.
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}
