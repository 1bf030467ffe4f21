// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Acervo publication engine.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum paragraphs extracted from a word-processor document.
pub const MAX_PARAGRAPHS: usize = 120;
/// Maximum rows extracted from a spreadsheet (first sheet only).
pub const MAX_SHEET_ROWS: usize = 50;
/// Maximum columns extracted from a spreadsheet.
pub const MAX_SHEET_COLS: usize = 20;

/// Unique identifier of a publication record in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicationId(pub i64);

impl std::fmt::Display for PublicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document families this engine can extract and convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Word-processor document (OOXML, `.docx`).
    Word,
    /// Spreadsheet in the zipped OOXML variant (`.xlsx`).
    SheetZipped,
    /// Spreadsheet in the legacy binary variant (`.xls`).
    SheetBinary,
}

impl DocumentKind {
    /// Infer the document kind from a file extension.
    ///
    /// Anything outside the supported set (including the legacy `.doc`
    /// binary) returns `None` and is rejected as unsupported upstream.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Word),
            "xlsx" => Some(Self::SheetZipped),
            "xls" => Some(Self::SheetBinary),
            _ => None,
        }
    }

    /// MIME type of the source format, for serving the original file.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::SheetZipped => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::SheetBinary => "application/vnd.ms-excel",
        }
    }

    /// Whether this kind is laid out as a cell grid rather than flowed text.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::SheetZipped | Self::SheetBinary)
    }
}

/// A publication's stored file, resolved from the catalog by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: PublicationId,
    /// Absolute or upload-dir-relative path of the stored file.
    pub path: PathBuf,
    /// Title shown in previews and used for PDF metadata.
    pub display_title: String,
    /// Lower-cased file extension without the dot.
    pub extension: String,
}

impl StoredDocument {
    /// The document kind, if the extension is in the supported set.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_extension(&self.extension)
    }
}

/// A single spreadsheet cell as read from the source (already evaluated —
/// formulas are never re-computed here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => {
                // Integral values print without the trailing ".0" so a cell
                // holding 2024 reads as "2024", not "2024.0".
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
        }
    }
}

/// Structural content pulled out of a document by the format extractors.
///
/// This is a transient, lossy representation: enough for an inline preview
/// or a fallback PDF, never a full-fidelity rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractedContent {
    /// Ordered non-empty paragraphs, capped at [`MAX_PARAGRAPHS`].
    Text {
        paragraphs: Vec<String>,
        /// Set exactly when the source had more paragraphs than the cap.
        truncated: bool,
    },
    /// Row-major cell grid, capped at [`MAX_SHEET_ROWS`] x [`MAX_SHEET_COLS`].
    /// The first row carries no header semantics — header styling is a
    /// rendering concern.
    Table { rows: Vec<Vec<CellValue>> },
}

/// One denormalized catalog row as consumed by the report serializers.
/// Computed per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: i64,
    pub title: String,
    pub publication_type: Option<String>,
    pub author: Option<String>,
    pub course: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub subjects: Option<String>,
}

/// Tabular output encodings of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ReportFormat {
    /// Parse the request token; anything unrecognized falls back to the
    /// default spreadsheet format.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "csv" => Self::Csv,
            "pdf" => Self::Pdf,
            _ => Self::Xlsx,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }
}
