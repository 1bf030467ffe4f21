// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CSV encoding — semicolon-delimited, every field quoted, UTF-8 with a
// byte-order mark so desktop spreadsheet tools pick the right charset and
// separator.

use acervo_core::error::{AcervoError, Result};

use super::Field;
use crate::columns::ReportColumn;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

fn csv_err(e: impl std::fmt::Display) -> AcervoError {
    AcervoError::Io(std::io::Error::other(e.to_string()))
}

pub(super) fn encode(columns: &[ReportColumn], table: &[Vec<Field>]) -> Result<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(::csv::QuoteStyle::Always)
        .from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(columns.iter().map(|c| c.label()))
        .map_err(csv_err)?;
    for row in table {
        writer
            .write_record(row.iter().map(Field::display))
            .map_err(csv_err)?;
    }

    writer.into_inner().map_err(csv_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_quoted_and_semicolon_separated() {
        let columns = [ReportColumn::Title, ReportColumn::Status];
        let table = vec![vec![
            Field::Text("Um; título \"difícil\"".into()),
            Field::Text("Publicado".into()),
        ]];

        let bytes = encode(&columns, &table).expect("encode");
        assert!(bytes.starts_with(&UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec()).expect("utf8");
        assert_eq!(text.lines().next(), Some("\"Título\";\"Status\""));
        // The embedded separator and quotes survive inside one field.
        assert!(text.contains("\"Um; título \"\"difícil\"\"\""));
    }

    #[test]
    fn empty_table_is_just_the_header() {
        let bytes = encode(&[ReportColumn::Id], &[]).expect("encode");
        let text = String::from_utf8(bytes[3..].to_vec()).expect("utf8");
        assert_eq!(text.trim_end(), "\"ID\"");
    }
}
