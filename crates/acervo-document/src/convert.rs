// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestrator — one cached PDF artifact per publication.
//
// Strategy order per call: cache hit, external converter, in-process
// fallback. The two conversion paths are mutually exclusive; a call never
// mixes partial results from both. Artifacts are written to a temp file and
// renamed into place so a concurrent reader can never observe a partial
// PDF, and the cache trusts an artifact exactly when its mtime is not older
// than the source's.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use acervo_core::error::{AcervoError, Result};
use acervo_core::types::{DocumentKind, PublicationId, StoredDocument};

use crate::extract::extract;
use crate::render::render_pdf;
use crate::soffice::PdfConverter;
use crate::store::DocumentStore;

/// Orchestrates preview-PDF generation and owns the artifact cache
/// directory. No in-memory cache state: the filesystem convention
/// (`preview_<id>.pdf` + mtime comparison) is the whole cache.
pub struct ConversionService<C> {
    preview_dir: PathBuf,
    converter: C,
}

impl<C: PdfConverter> ConversionService<C> {
    pub fn new(preview_dir: impl Into<PathBuf>, converter: C) -> Self {
        Self {
            preview_dir: preview_dir.into(),
            converter,
        }
    }

    /// Deterministic artifact path for a publication.
    pub fn artifact_path(&self, id: PublicationId) -> PathBuf {
        self.preview_dir.join(format!("preview_{id}.pdf"))
    }

    /// Produce a full paginated PDF for embedding in a viewer.
    ///
    /// Unsupported extensions are rejected before any work. Converter
    /// absence or failure is recovered via the fallback renderer and never
    /// surfaces to the caller; `RenderFailed` means both paths broke.
    #[instrument(skip(self, store), fields(%id))]
    pub async fn preview_pdf(&self, store: &DocumentStore, id: PublicationId) -> Result<Vec<u8>> {
        let doc = store.resolve(id)?;
        let kind = doc
            .kind()
            .ok_or_else(|| AcervoError::UnsupportedFormat(doc.extension.clone()))?;

        std::fs::create_dir_all(&self.preview_dir)?;
        let artifact = self.artifact_path(id);

        if artifact_is_fresh(&artifact, &doc.path) {
            debug!(%id, "artifact cache hit");
            return Ok(std::fs::read(&artifact)?);
        }

        if self.converter.available() {
            match self.convert_external(&doc, &artifact).await {
                Ok(bytes) => {
                    info!(%id, "external conversion cached");
                    return Ok(bytes);
                }
                Err(err) => {
                    warn!(%id, error = %err, "external conversion failed, using fallback");
                }
            }
        } else {
            debug!(%id, "external converter unavailable, using fallback");
        }

        self.render_fallback(&doc, kind, &artifact)
    }

    /// Drop the cached artifact for a publication. Staleness is normally
    /// detected by the mtime rule; this exists for operational cleanup.
    pub fn invalidate(&self, id: PublicationId) -> Result<()> {
        match std::fs::remove_file(self.artifact_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn convert_external(&self, doc: &StoredDocument, artifact: &Path) -> Result<Vec<u8>> {
        // The converter writes into a scratch directory next to the cache so
        // the final rename stays on one filesystem.
        let scratch = tempfile::tempdir_in(&self.preview_dir)?;
        let produced = self.converter.convert(&doc.path, scratch.path()).await?;
        let bytes = std::fs::read(&produced)?;
        std::fs::rename(&produced, artifact)?;
        Ok(bytes)
    }

    fn render_fallback(
        &self,
        doc: &StoredDocument,
        kind: DocumentKind,
        artifact: &Path,
    ) -> Result<Vec<u8>> {
        debug!(id = %doc.id, ?kind, "rendering fallback PDF");
        let content = extract(&doc.path, &doc.extension)?;
        let bytes = render_pdf(&doc.display_title, &content)
            .map_err(|e| AcervoError::RenderFailed(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.preview_dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(artifact).map_err(|e| AcervoError::Io(e.error))?;
        Ok(bytes)
    }
}

/// The cache-validity rule: an artifact is trusted exactly when its
/// modification time is not older than the source's.
fn artifact_is_fresh(artifact: &Path, source: &Path) -> bool {
    let Ok(a) = std::fs::metadata(artifact) else {
        return false;
    };
    let Ok(s) = std::fs::metadata(source) else {
        return false;
    };
    match (a.modified(), s.modified()) {
        (Ok(am), Ok(sm)) => am >= sm,
        _ => false,
    }
}
