// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spreadsheet extraction — first-sheet cell grid from `.xlsx` (zipped OOXML)
// and legacy `.xls` (binary BIFF), both through calamine.
//
// Cell values arrive already evaluated; formulas are never re-computed.
// Only the first sheet is read, row-major, capped at the grid limits.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use acervo_core::error::{AcervoError, Result};
use acervo_core::types::{CellValue, ExtractedContent, MAX_SHEET_COLS, MAX_SHEET_ROWS};

fn corrupt(detail: impl std::fmt::Display) -> AcervoError {
    AcervoError::Corrupt(detail.to_string())
}

/// Read the first sheet into a bounded grid.
///
/// `open_workbook_auto` picks the xlsx or xls backend from the file itself,
/// so a mislabelled upload still parses when the content is sound.
pub fn extract_grid(path: &Path) -> Result<ExtractedContent> {
    let mut workbook = open_workbook_auto(path).map_err(corrupt)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| corrupt("workbook has no sheets"))?
        .map_err(corrupt)?;

    let rows = range
        .rows()
        .take(MAX_SHEET_ROWS)
        .map(|row| row.iter().take(MAX_SHEET_COLS).map(cell_value).collect())
        .collect();

    Ok(ExtractedContent::Table { rows })
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if ts.time() == chrono::NaiveTime::MIN => {
                CellValue::Text(ts.format("%d/%m/%Y").to_string())
            }
            Some(ts) => CellValue::Text(ts.format("%d/%m/%Y %H:%M").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    /// Write an xlsx fixture with `rows` x `cols` numbered cells.
    pub(crate) fn write_xlsx_grid(dir: &Path, name: &str, rows: u32, cols: u16) -> std::path::PathBuf {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for r in 0..rows {
            for c in 0..cols {
                sheet
                    .write_string(r, c, format!("r{r}c{c}"))
                    .expect("write cell");
            }
        }
        let path = dir.join(name);
        workbook.save(&path).expect("save xlsx");
        path
    }

    #[test]
    fn reads_first_sheet_row_major() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_xlsx_grid(dir.path(), "small.xlsx", 3, 2);

        let ExtractedContent::Table { rows } = extract_grid(&path).expect("extract") else {
            panic!("expected table content");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], CellValue::Text("r0c0".into()));
        assert_eq!(rows[2][1], CellValue::Text("r2c1".into()));
    }

    #[test]
    fn grid_never_exceeds_row_and_column_caps() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_xlsx_grid(
            dir.path(),
            "big.xlsx",
            (MAX_SHEET_ROWS + 30) as u32,
            (MAX_SHEET_COLS + 10) as u16,
        );

        let ExtractedContent::Table { rows } = extract_grid(&path).expect("extract") else {
            panic!("expected table content");
        };
        assert_eq!(rows.len(), MAX_SHEET_ROWS);
        assert!(rows.iter().all(|r| r.len() <= MAX_SHEET_COLS));
    }

    #[test]
    fn numbers_survive_as_numbers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_number(0, 0, 42.0).expect("write");
        sheet.write_number(0, 1, 2.5).expect("write");
        let path = dir.path().join("nums.xlsx");
        workbook.save(&path).expect("save");

        let ExtractedContent::Table { rows } = extract_grid(&path).expect("extract") else {
            panic!("expected table content");
        };
        assert_eq!(rows[0][0], CellValue::Number(42.0));
        assert_eq!(rows[0][1], CellValue::Number(2.5));
    }

    #[test]
    fn garbage_bytes_degrade_to_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.xls");
        std::fs::write(&path, b"definitely not a workbook").expect("write");

        let err = extract_grid(&path).unwrap_err();
        assert!(matches!(err, AcervoError::Corrupt(_)));
    }
}
