// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// acervo-report — Filterable catalog reports for the Acervo publication
// engine.
//
// One logical row-set, three encodings: the query builder composes a
// parameterized predicate over the optional filter set, and the serializer
// projects a validated column selection into CSV, a styled workbook, or a
// paginated landscape PDF.

pub mod columns;
pub mod query;
pub mod serialize;

pub use columns::{ReportColumn, resolve_selection};
pub use query::{ReportFilter, SearchField, fetch_rows, search_publications};
pub use serialize::{ReportOutput, export_report};
