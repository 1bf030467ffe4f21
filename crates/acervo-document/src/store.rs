// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document store accessor — read-only lookups against the publication
// catalog.
//
// The catalog schema (publicacao / usuario / curso) is owned by the web
// layer; this crate never creates or migrates tables. A `DocumentStore`
// wraps one SQLite connection and answers exactly one question: which file
// on disk does a publication id refer to.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, instrument};

use acervo_core::error::{AcervoError, Result};
use acervo_core::types::{PublicationId, StoredDocument};

/// Convert a `rusqlite::Error` into an `AcervoError::Database`.
fn db_err(e: rusqlite::Error) -> AcervoError {
    AcervoError::Database(e.to_string())
}

/// Read-only accessor over the publication catalog.
pub struct DocumentStore {
    conn: Connection,
}

impl DocumentStore {
    /// Open the catalog database at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;
        debug!("catalog opened");
        Ok(Self { conn })
    }

    /// Wrap an already-open connection (the web layer owns pooling).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection, e.g. to hand it to the report
    /// query builder.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Resolve a publication id to its stored file.
    ///
    /// Fails with `NotFound` when the catalog has no such record or when the
    /// referenced file is missing from disk. Performs no conversion and has
    /// no side effects.
    #[instrument(skip(self), fields(%id))]
    pub fn resolve(&self, id: PublicationId) -> Result<StoredDocument> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT titulo, arquivo FROM publicacao WHERE id_publicacao = ?1",
                params![id.0],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(db_err)?;

        let Some((title, stored_path)) = row else {
            return Err(AcervoError::NotFound(format!("publication {id}")));
        };

        let path = PathBuf::from(stored_path);
        if !path.is_file() {
            return Err(AcervoError::NotFound(format!(
                "stored file for publication {id}"
            )));
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        debug!(%id, ext = %extension, "publication resolved");
        Ok(StoredDocument {
            id,
            path,
            display_title: title,
            extension,
        })
    }
}

/// Build the on-disk name for a fresh upload: a sortable timestamp prefix
/// plus the client filename reduced to a safe character set.
///
/// The upload route of the web layer calls this before inserting the
/// catalog row, so every stored file is unique per second and shell-safe.
pub fn timestamped_filename(original: &str, now: chrono::NaiveDateTime) -> String {
    let safe: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", now.format("%Y%m%d%H%M%S"), safe.trim_matches('_'))
}
