// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report serializer — one projected table, three encoders.
//
// Every format consumes the same `project()` output, so CSV, XLSX, and PDF
// carry the same logical dataset and differ only in encoding. The PDF
// encoder is allowed to break (fonts, logo decoding); when it does, the
// request degrades to CSV instead of failing.

mod csv;
mod pdf;
mod xlsx;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use acervo_core::error::Result;
use acervo_core::types::{ReportFormat, ReportRow};

use crate::columns::ReportColumn;

/// Title line shown in the XLSX and PDF headings.
pub const REPORT_TITLE: &str = "Relatório de Publicações";

/// One serialized report ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    /// Suggested download name, `relatorio_<timestamp>.<ext>`.
    pub filename: String,
}

/// One projected cell. The typed variants let the spreadsheet encoder keep
/// numbers and dates native while the text encoders share one display form.
#[derive(Debug, Clone)]
pub(crate) enum Field {
    Int(i64),
    Text(String),
    Date(Option<NaiveDate>),
}

impl Field {
    /// Display form used by the CSV and PDF encoders.
    pub(crate) fn display(&self) -> String {
        match self {
            Field::Int(v) => v.to_string(),
            Field::Text(s) => s.clone(),
            Field::Date(Some(d)) => d.format("%d/%m/%Y").to_string(),
            Field::Date(None) => String::new(),
        }
    }
}

fn field(row: &ReportRow, column: ReportColumn) -> Field {
    match column {
        ReportColumn::Id => Field::Int(row.id),
        ReportColumn::Title => Field::Text(row.title.clone()),
        ReportColumn::Type => Field::Text(row.publication_type.clone().unwrap_or_default()),
        ReportColumn::Author => Field::Text(row.author.clone().unwrap_or_default()),
        ReportColumn::Course => Field::Text(row.course.clone().unwrap_or_default()),
        ReportColumn::Date => Field::Date(row.publication_date),
        ReportColumn::Status => Field::Text(row.status.clone().unwrap_or_default()),
        ReportColumn::Subjects => Field::Text(row.subjects.clone().unwrap_or_default()),
    }
}

/// Project the row-set over the selected columns. All three encoders read
/// this table and nothing else.
pub(crate) fn project(rows: &[ReportRow], columns: &[ReportColumn]) -> Vec<Vec<Field>> {
    rows.iter()
        .map(|row| columns.iter().map(|c| field(row, *c)).collect())
        .collect()
}

/// Serialize the rows into the requested format.
///
/// An empty column selection means the full whitelist. The XLSX format
/// drops the identifier column by policy; a selection that only named `id`
/// therefore also falls back to the whitelist there.
#[instrument(skip(rows, selection, logo), fields(format = ?format, rows = rows.len()))]
pub fn export_report(
    rows: &[ReportRow],
    selection: &[ReportColumn],
    format: ReportFormat,
    logo: Option<&[u8]>,
) -> Result<ReportOutput> {
    let mut columns: Vec<ReportColumn> = if selection.is_empty() {
        ReportColumn::WHITELIST.to_vec()
    } else {
        selection.to_vec()
    };
    if format == ReportFormat::Xlsx {
        columns.retain(|c| *c != ReportColumn::Id);
        if columns.is_empty() {
            columns = ReportColumn::WHITELIST
                .iter()
                .copied()
                .filter(|c| *c != ReportColumn::Id)
                .collect();
        }
    }

    let table = project(rows, &columns);
    debug!(columns = columns.len(), "projection built");

    match format {
        ReportFormat::Csv => Ok(output(csv::encode(&columns, &table)?, ReportFormat::Csv)),
        ReportFormat::Xlsx => Ok(output(
            xlsx::encode(&columns, &table, logo)?,
            ReportFormat::Xlsx,
        )),
        ReportFormat::Pdf => match pdf::encode(&columns, &table, logo) {
            Ok(bytes) => Ok(output(bytes, ReportFormat::Pdf)),
            Err(err) => {
                // A report request never hard-fails because the richer
                // renderer broke: degrade to CSV with the same dataset.
                warn!(error = %err, "PDF report failed, degrading to CSV");
                Ok(output(csv::encode(&columns, &table)?, ReportFormat::Csv))
            }
        },
    }
}

fn output(bytes: Vec<u8>, format: ReportFormat) -> ReportOutput {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    ReportOutput {
        bytes,
        mime_type: format.mime_type(),
        filename: format!("relatorio_{timestamp}.{}", format.extension()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ReportRow> {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        vec![
            ReportRow {
                id: 1,
                title: "Artigo A".into(),
                publication_type: Some("Artigo Científico".into()),
                author: Some("Maria Souza".into()),
                course: Some("Engenharia de Software".into()),
                publication_date: date(2024, 3, 1),
                status: Some("Publicado".into()),
                subjects: Some("educação".into()),
            },
            ReportRow {
                id: 2,
                title: "Artigo B".into(),
                publication_type: Some("TCC".into()),
                author: Some("João Lima".into()),
                course: Some("Direito".into()),
                publication_date: date(2024, 6, 15),
                status: Some("Publicado".into()),
                subjects: None,
            },
            ReportRow {
                id: 3,
                title: "Artigo C".into(),
                publication_type: Some("Artigo Científico".into()),
                author: Some("Ana Castro".into()),
                course: Some("Engenharia de Software".into()),
                publication_date: date(2024, 12, 31),
                status: Some("Rascunho".into()),
                subjects: Some("pesquisa; ensino".into()),
            },
        ]
    }

    fn selection() -> Vec<ReportColumn> {
        vec![ReportColumn::Title, ReportColumn::Author, ReportColumn::Date]
    }

    #[test]
    fn csv_carries_header_bom_and_every_row() {
        let out = export_report(&sample_rows(), &selection(), ReportFormat::Csv, None)
            .expect("export");
        assert_eq!(out.mime_type, "text/csv");
        assert!(out.filename.starts_with("relatorio_"));
        assert!(out.filename.ends_with(".csv"));

        assert!(out.bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        let text = String::from_utf8(out.bytes[3..].to_vec()).expect("utf8");
        assert!(text.starts_with("\"Título\";\"Autor\";\"Data\""));
        assert_eq!(text.lines().count(), 4);
        for name in ["Maria Souza", "João Lima", "Ana Castro"] {
            assert!(text.contains(name));
        }
        assert!(text.contains("01/03/2024"));
    }

    #[test]
    fn the_three_formats_carry_the_same_dataset() {
        use calamine::Reader;

        let rows = sample_rows();
        let cols = selection();

        let csv_out =
            export_report(&rows, &cols, ReportFormat::Csv, None).expect("csv");
        let xlsx_out =
            export_report(&rows, &cols, ReportFormat::Xlsx, None).expect("xlsx");
        let pdf_out =
            export_report(&rows, &cols, ReportFormat::Pdf, None).expect("pdf");

        let csv_text = String::from_utf8(csv_out.bytes[3..].to_vec()).expect("utf8");

        // Read the workbook back and flatten its cells.
        let cursor = std::io::Cursor::new(xlsx_out.bytes);
        let mut workbook = calamine::Xlsx::new(cursor).expect("open xlsx");
        let range = workbook
            .worksheet_range_at(0)
            .expect("sheet present")
            .expect("range");
        let cells: Vec<String> = range
            .rows()
            .flat_map(|r| r.iter().map(|c| c.to_string()))
            .collect();

        assert_eq!(pdf_out.mime_type, "application/pdf");
        assert!(pdf_out.bytes.starts_with(b"%PDF"));

        for value in ["Artigo A", "Artigo B", "Artigo C", "Maria Souza", "João Lima", "Ana Castro"] {
            assert!(csv_text.contains(value), "csv missing {value}");
            assert!(
                cells.iter().any(|c| c.contains(value)),
                "xlsx missing {value}"
            );
        }
        // Same logical row count in both tabular encodings: header + 3.
        assert_eq!(csv_text.lines().count(), 4);
        assert_eq!(range.rows().count(), 5); // title band + header + 3 data rows
    }

    #[test]
    fn xlsx_drops_the_identifier_column_by_policy() {
        use calamine::Reader;

        let out = export_report(
            &sample_rows(),
            &[ReportColumn::Id, ReportColumn::Title],
            ReportFormat::Xlsx,
            None,
        )
        .expect("export");

        let cursor = std::io::Cursor::new(out.bytes);
        let mut workbook = calamine::Xlsx::new(cursor).expect("open xlsx");
        let range = workbook
            .worksheet_range_at(0)
            .expect("sheet present")
            .expect("range");
        let header: Vec<String> = range
            .rows()
            .nth(1)
            .expect("header row")
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert!(header.contains(&"Título".to_string()));
        assert!(!header.contains(&"ID".to_string()));
    }

    #[test]
    fn broken_pdf_renderer_degrades_to_csv_with_the_same_rows() {
        let rows = sample_rows();
        // An undecodable logo forces the PDF encoder to fail.
        let out = export_report(
            &rows,
            &selection(),
            ReportFormat::Pdf,
            Some(b"not an image at all"),
        )
        .expect("export must still succeed");

        assert_eq!(out.mime_type, "text/csv");
        assert!(out.filename.ends_with(".csv"));
        let text = String::from_utf8(out.bytes[3..].to_vec()).expect("utf8");
        let direct = export_report(&rows, &selection(), ReportFormat::Csv, None)
            .expect("direct csv");
        let direct_text = String::from_utf8(direct.bytes[3..].to_vec()).expect("utf8");
        assert_eq!(text.lines().count(), direct_text.lines().count());
    }

    #[test]
    fn empty_selection_uses_the_full_whitelist() {
        let out = export_report(&sample_rows(), &[], ReportFormat::Csv, None)
            .expect("export");
        let text = String::from_utf8(out.bytes[3..].to_vec()).expect("utf8");
        let header = text.lines().next().expect("header");
        for label in ["ID", "Título", "Tipo", "Autor", "Curso", "Data", "Status", "Assuntos"] {
            assert!(header.contains(label), "header missing {label}");
        }
    }
}
