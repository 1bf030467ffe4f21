// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Styled workbook encoding.
//
// Layout: merged title row (with the institutional logo anchored top-left
// when provided), bold shaded header, zebra-striped data rows with borders,
// word-wrap on long text columns, frozen header pane, an auto-filter range,
// fixed date formatting, and per-column widths.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Image, Workbook};

use acervo_core::error::{AcervoError, Result};

use super::{Field, REPORT_TITLE};
use crate::columns::ReportColumn;

const HEADER_SHADE: Color = Color::RGB(0xD9E1F2);
const ZEBRA_SHADE: Color = Color::RGB(0xF2F2F2);

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> AcervoError {
    AcervoError::RenderFailed(format!("xlsx: {e}"))
}

pub(super) fn encode(
    columns: &[ReportColumn],
    table: &[Vec<Field>],
    logo: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let last_col = (columns.len() - 1) as u16;

    // Title band.
    let title_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    if columns.len() > 1 {
        sheet
            .merge_range(0, 0, 0, last_col, REPORT_TITLE, &title_format)
            .map_err(xlsx_err)?;
    } else {
        sheet
            .write_with_format(0, 0, REPORT_TITLE, &title_format)
            .map_err(xlsx_err)?;
    }
    sheet.set_row_height(0, 28).map_err(xlsx_err)?;

    if let Some(bytes) = logo {
        let image = Image::new_from_buffer(bytes).map_err(xlsx_err)?;
        sheet.insert_image(0, 0, &image).map_err(xlsx_err)?;
    }

    // Header row.
    let header_format = Format::new()
        .set_bold()
        .set_background_color(HEADER_SHADE)
        .set_border(FormatBorder::Thin);
    for (c, column) in columns.iter().enumerate() {
        sheet
            .write_with_format(1, c as u16, column.label(), &header_format)
            .map_err(xlsx_err)?;
        sheet
            .set_column_width(c as u16, column.width())
            .map_err(xlsx_err)?;
    }

    // Data rows, zebra-striped.
    for (r, row) in table.iter().enumerate() {
        let sheet_row = (r + 2) as u32;
        let striped = r % 2 == 1;
        for (c, field) in row.iter().enumerate() {
            let format = cell_format(columns[c], striped);
            match field {
                Field::Int(v) => sheet
                    .write_number_with_format(sheet_row, c as u16, *v as f64, &format)
                    .map_err(xlsx_err)?,
                Field::Text(s) => sheet
                    .write_string_with_format(sheet_row, c as u16, s, &format)
                    .map_err(xlsx_err)?,
                Field::Date(Some(d)) => sheet
                    .write_datetime_with_format(sheet_row, c as u16, d, &format)
                    .map_err(xlsx_err)?,
                Field::Date(None) => sheet
                    .write_string_with_format(sheet_row, c as u16, "", &format)
                    .map_err(xlsx_err)?,
            };
        }
    }

    // Frozen header pane and the auto-filter range over header + data.
    sheet.set_freeze_panes(2, 0).map_err(xlsx_err)?;
    sheet
        .autofilter(1, 0, (1 + table.len()) as u32, last_col)
        .map_err(xlsx_err)?;

    workbook.save_to_buffer().map_err(xlsx_err)
}

fn cell_format(column: ReportColumn, striped: bool) -> Format {
    let mut format = Format::new().set_border(FormatBorder::Thin);
    if striped {
        format = format.set_background_color(ZEBRA_SHADE);
    }
    if column.wraps() {
        format = format.set_text_wrap();
    }
    if column == ReportColumn::Date {
        format = format.set_num_format("dd/mm/yyyy");
    }
    format
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Reader;
    use chrono::NaiveDate;

    #[test]
    fn workbook_round_trips_through_calamine() {
        let columns = [ReportColumn::Title, ReportColumn::Date];
        let table = vec![
            vec![
                Field::Text("Primeiro".into()),
                Field::Date(NaiveDate::from_ymd_opt(2024, 1, 2)),
            ],
            vec![Field::Text("Segundo".into()), Field::Date(None)],
        ];

        let bytes = encode(&columns, &table, None).expect("encode");
        let mut workbook =
            calamine::Xlsx::new(std::io::Cursor::new(bytes)).expect("open");
        let range = workbook
            .worksheet_range_at(0)
            .expect("sheet")
            .expect("range");

        let flat: Vec<String> = range
            .rows()
            .flat_map(|r| r.iter().map(|c| c.to_string()))
            .collect();
        assert!(flat.iter().any(|c| c == "Primeiro"));
        assert!(flat.iter().any(|c| c == "Segundo"));
        assert!(flat.iter().any(|c| c == "Título"));
    }

    #[test]
    fn invalid_logo_bytes_fail_the_encode() {
        let columns = [ReportColumn::Title];
        let err = encode(&columns, &[], Some(b"garbage")).unwrap_err();
        assert!(matches!(err, AcervoError::RenderFailed(_)));
    }
}
