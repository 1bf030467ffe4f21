// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report column whitelist.
//
// The whitelist is the authoritative vocabulary: request tokens outside it
// are dropped silently, and an empty resolution falls back to the full set.
// Both the English tokens of the export API and the Portuguese spellings
// used by the product UI are accepted.

use serde::{Deserialize, Serialize};

/// One column of the report projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportColumn {
    Id,
    Title,
    Type,
    Author,
    Course,
    Date,
    Status,
    Subjects,
}

impl ReportColumn {
    /// The full whitelist, in default output order.
    pub const WHITELIST: [ReportColumn; 8] = [
        ReportColumn::Id,
        ReportColumn::Title,
        ReportColumn::Type,
        ReportColumn::Author,
        ReportColumn::Course,
        ReportColumn::Date,
        ReportColumn::Status,
        ReportColumn::Subjects,
    ];

    /// Parse one request token. Unknown tokens return `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "id" => Some(Self::Id),
            "title" | "titulo" | "título" => Some(Self::Title),
            "type" | "tipo" => Some(Self::Type),
            "author" | "autor" => Some(Self::Author),
            "course" | "curso" => Some(Self::Course),
            "date" | "data" => Some(Self::Date),
            "status" => Some(Self::Status),
            "subjects" | "assuntos" => Some(Self::Subjects),
            _ => None,
        }
    }

    /// Display label used as the header in every output format.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Title => "Título",
            Self::Type => "Tipo",
            Self::Author => "Autor",
            Self::Course => "Curso",
            Self::Date => "Data",
            Self::Status => "Status",
            Self::Subjects => "Assuntos",
        }
    }

    /// Spreadsheet column width, tuned per column identity.
    pub fn width(&self) -> f64 {
        match self {
            Self::Id => 8.0,
            Self::Title => 48.0,
            Self::Type => 20.0,
            Self::Author => 32.0,
            Self::Course => 32.0,
            Self::Date => 12.0,
            Self::Status => 14.0,
            Self::Subjects => 40.0,
        }
    }

    /// Long free-text columns get word-wrap in the spreadsheet output.
    pub fn wraps(&self) -> bool {
        matches!(self, Self::Title | Self::Subjects)
    }
}

/// Resolve a raw request string (tokens separated by whitespace, commas, or
/// semicolons) against the whitelist.
///
/// Request order is preserved, duplicates are collapsed, unknown tokens are
/// dropped. An empty or entirely invalid request yields the full whitelist
/// in whitelist order.
pub fn resolve_selection(raw: &str) -> Vec<ReportColumn> {
    let mut selected = Vec::new();
    for token in raw.split([' ', '\t', '\n', ',', ';']) {
        if token.is_empty() {
            continue;
        }
        if let Some(column) = ReportColumn::from_token(token) {
            if !selected.contains(&column) {
                selected.push(column);
            }
        }
    }
    if selected.is_empty() {
        ReportColumn::WHITELIST.to_vec()
    } else {
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tokens_are_dropped_and_valid_ones_kept() {
        assert_eq!(
            resolve_selection("bogus, titulo"),
            vec![ReportColumn::Title]
        );
    }

    #[test]
    fn request_order_is_preserved_and_duplicates_collapse() {
        assert_eq!(
            resolve_selection("data;autor data TITLE"),
            vec![ReportColumn::Date, ReportColumn::Author, ReportColumn::Title]
        );
    }

    #[test]
    fn empty_or_all_invalid_requests_fall_back_to_the_whitelist() {
        assert_eq!(resolve_selection(""), ReportColumn::WHITELIST.to_vec());
        assert_eq!(
            resolve_selection("foo bar baz"),
            ReportColumn::WHITELIST.to_vec()
        );
    }

    #[test]
    fn english_and_portuguese_tokens_agree() {
        assert_eq!(
            ReportColumn::from_token("subjects"),
            ReportColumn::from_token("assuntos")
        );
        assert_eq!(
            ReportColumn::from_token("Título"),
            Some(ReportColumn::Title)
        );
    }
}
