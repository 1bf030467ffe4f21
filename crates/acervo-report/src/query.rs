// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report query builder — parameterized predicates over the publication
// catalog.
//
// Every present filter contributes exactly one predicate fragment; the
// fragments are AND-joined and every value travels as a bound parameter.
// User input is never interpolated into SQL text. An empty filter set
// yields the `1=1` tautology so the base join and ordering still apply.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;
use tracing::{debug, instrument};

use acervo_core::error::{AcervoError, Result};
use acervo_core::types::ReportRow;

/// Convert a `rusqlite::Error` into an `AcervoError::Database`.
fn db_err(e: rusqlite::Error) -> AcervoError {
    AcervoError::Database(e.to_string())
}

/// Optional, independently combinable report filters.
///
/// Date bounds are carried as raw `YYYY-MM-DD` strings: a malformed bound
/// is ignored as if it were unset. That lenient policy mirrors the product
/// behaviour — a bad date narrows nothing and never fails the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    /// Case-insensitive substring match on the author's name.
    pub author_name: Option<String>,
    /// Exact author (advisor) id.
    pub author_id: Option<i64>,
    /// Exact course id.
    pub course_id: Option<i64>,
    /// Exact publication type, e.g. "Artigo Científico".
    pub publication_type: Option<String>,
    /// Inclusive lower date bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
}

/// One bound SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

impl rusqlite::types::ToSql for BindValue {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        match self {
            BindValue::Text(s) => s.to_sql(),
            BindValue::Int(i) => i.to_sql(),
        }
    }
}

/// Build the WHERE clause for a filter set: AND-joined fragments plus the
/// parameter values to bind, in order.
pub fn build_predicate(filter: &ReportFilter) -> (String, Vec<BindValue>) {
    let mut fragments: Vec<&'static str> = Vec::new();
    let mut params: Vec<BindValue> = Vec::new();

    if let Some(name) = non_empty(&filter.author_name) {
        fragments.push("LOWER(u.nome) LIKE LOWER(?)");
        params.push(BindValue::Text(format!("%{name}%")));
    }
    if let Some(author_id) = filter.author_id {
        fragments.push("p.id_autor = ?");
        params.push(BindValue::Int(author_id));
    }
    if let Some(course_id) = filter.course_id {
        fragments.push("p.id_curso = ?");
        params.push(BindValue::Int(course_id));
    }
    if let Some(tipo) = non_empty(&filter.publication_type) {
        fragments.push("p.tipo = ?");
        params.push(BindValue::Text(tipo.to_string()));
    }
    if let Some(from) = parse_bound(&filter.date_from) {
        fragments.push("date(p.data_publicacao) >= date(?)");
        params.push(BindValue::Text(from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = parse_bound(&filter.date_to) {
        fragments.push("date(p.data_publicacao) <= date(?)");
        params.push(BindValue::Text(to.format("%Y-%m-%d").to_string()));
    }

    if fragments.is_empty() {
        ("1=1".to_string(), params)
    } else {
        (fragments.join(" AND "), params)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Lenient date parsing: a malformed bound is dropped, not rejected.
fn parse_bound(value: &Option<String>) -> Option<NaiveDate> {
    let raw = non_empty(value)?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            debug!(raw, "ignoring malformed date bound");
            None
        }
    }
}

const SELECT_ROWS: &str = "SELECT p.id_publicacao, p.titulo, p.tipo, u.nome, c.nome_curso, \
     p.data_publicacao, p.status, p.assuntos_relacionados \
     FROM publicacao p \
     LEFT JOIN usuario u ON u.id_usuario = p.id_autor \
     LEFT JOIN curso c ON c.id_curso = p.id_curso";

const ORDER_ROWS: &str = "ORDER BY p.data_publicacao DESC, p.id_publicacao DESC";

/// Run the report query and materialize the denormalized rows.
#[instrument(skip(conn, filter))]
pub fn fetch_rows(conn: &Connection, filter: &ReportFilter) -> Result<Vec<ReportRow>> {
    let (predicate, params) = build_predicate(filter);
    let sql = format!("{SELECT_ROWS} WHERE {predicate} {ORDER_ROWS}");

    let mut stmt = conn.prepare(&sql).map_err(db_err)?;
    let mapped = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), row_from_sql)
        .map_err(db_err)?;

    let mut rows = Vec::new();
    for row in mapped {
        rows.push(row.map_err(db_err)?);
    }
    debug!(count = rows.len(), "report rows fetched");
    Ok(rows)
}

/// Which catalog fields a free-text search inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Author,
    Subject,
    Course,
    Title,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::Author,
        SearchField::Subject,
        SearchField::Course,
        SearchField::Title,
    ];

    fn fragment(&self) -> &'static str {
        match self {
            Self::Author => "LOWER(u.nome) LIKE LOWER(?)",
            Self::Subject => "LOWER(p.assuntos_relacionados) LIKE LOWER(?)",
            Self::Course => "LOWER(c.nome_curso) LIKE LOWER(?)",
            Self::Title => "LOWER(p.titulo) LIKE LOWER(?)",
        }
    }
}

/// Free-text catalog search over published records: the selected fields are
/// OR-combined with the same substring semantics as the report filter.
/// An empty field list searches all of them.
#[instrument(skip(conn))]
pub fn search_publications(
    conn: &Connection,
    query: &str,
    fields: &[SearchField],
) -> Result<Vec<ReportRow>> {
    let fields: &[SearchField] = if fields.is_empty() {
        &SearchField::ALL
    } else {
        fields
    };

    let needle = BindValue::Text(format!("%{}%", query.trim()));
    let fragments: Vec<&'static str> = fields.iter().map(SearchField::fragment).collect();
    let params: Vec<BindValue> = std::iter::repeat_n(needle, fragments.len()).collect();

    let sql = format!(
        "{SELECT_ROWS} WHERE p.status = 'Publicado' AND ({}) {ORDER_ROWS}",
        fragments.join(" OR ")
    );

    let mut stmt = conn.prepare(&sql).map_err(db_err)?;
    let mapped = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), row_from_sql)
        .map_err(db_err)?;

    let mut rows = Vec::new();
    for row in mapped {
        rows.push(row.map_err(db_err)?);
    }
    Ok(rows)
}

fn row_from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportRow> {
    let date_raw: Option<String> = row.get(5)?;
    Ok(ReportRow {
        id: row.get(0)?,
        title: row.get(1)?,
        publication_type: row.get(2)?,
        author: row.get(3)?,
        course: row.get(4)?,
        publication_date: date_raw.and_then(|s| parse_stored_date(&s)),
        status: row.get(6)?,
        subjects: row.get(7)?,
    })
}

/// Stored dates are ISO text, sometimes with a time suffix; only the
/// calendar part matters for reports.
fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
