// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inline HTML preview — fast, in-process, never cached.
//
// This path never invokes the external converter: it exists so a catalog
// page can embed a readable fragment immediately. Extractor failures render
// as an inline message so the surrounding page keeps working.

use tracing::{debug, instrument};

use acervo_core::error::Result;
use acervo_core::messages::user_message;
use acervo_core::types::{CellValue, ExtractedContent, PublicationId};

use crate::extract::extract;
use crate::store::DocumentStore;

/// Render a bounded HTML fragment for the given publication.
///
/// Returns `NotFound` only when the catalog record or file is missing;
/// every extraction-level failure (unsupported format, corrupt content)
/// comes back as a displayable fragment instead of an error.
#[instrument(skip(store), fields(%id))]
pub fn render_preview(store: &DocumentStore, id: PublicationId) -> Result<String> {
    let doc = store.resolve(id)?;

    match extract(&doc.path, &doc.extension) {
        Ok(content) => {
            debug!(%id, "preview fragment rendered");
            Ok(fragment(&content))
        }
        Err(err) => Ok(error_fragment(&user_message(&err))),
    }
}

fn fragment(content: &ExtractedContent) -> String {
    match content {
        ExtractedContent::Text { paragraphs, truncated } => {
            let mut html = String::from("<div class=\"preview-documento\">");
            for p in paragraphs {
                html.push_str("<p>");
                html.push_str(&escape(p));
                html.push_str("</p>");
            }
            if *truncated {
                html.push_str("<p class=\"preview-truncado\">(conteúdo truncado)</p>");
            }
            html.push_str("</div>");
            html
        }
        ExtractedContent::Table { rows } => {
            // Header-less raw grid: the extractor assigns no meaning to the
            // first row, and neither does the preview.
            let mut html = String::from("<table class=\"preview-planilha\" border=\"1\">");
            for row in rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str("<td>");
                    if !matches!(cell, CellValue::Empty) {
                        html.push_str(&escape(&cell.to_string()));
                    }
                    html.push_str("</td>");
                }
                html.push_str("</tr>");
            }
            html.push_str("</table>");
            html
        }
    }
}

fn error_fragment(message: &str) -> String {
    format!("<div class=\"preview-erro\"><p>{}</p></div>", escape(message))
}

/// Escape text for embedding in HTML. The XML entity set from quick-xml
/// covers every character that matters here (& < > " ').
fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{Connection, params};

    fn store_with(path: &std::path::Path, title: &str) -> DocumentStore {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE publicacao (
                id_publicacao INTEGER PRIMARY KEY,
                titulo        TEXT NOT NULL,
                arquivo       TEXT NOT NULL
            );",
        )
        .expect("schema");
        conn.execute(
            "INSERT INTO publicacao (id_publicacao, titulo, arquivo) VALUES (1, ?1, ?2)",
            params![title, path.to_string_lossy()],
        )
        .expect("insert");
        DocumentStore::from_connection(conn)
    }

    #[test]
    fn word_preview_escapes_markup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = crate::extract::word::tests::write_docx(
            dir.path(),
            "x.docx",
            &["a &lt;b&gt; c"],
        );
        let store = store_with(&path, "Teste");

        let html = render_preview(&store, PublicationId(1)).expect("preview");
        assert!(html.contains("<p>a &lt;b&gt; c</p>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn sheet_preview_is_a_headerless_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = crate::extract::sheet::tests::write_xlsx_grid(dir.path(), "g.xlsx", 2, 2);
        let store = store_with(&path, "Planilha");

        let html = render_preview(&store, PublicationId(1)).expect("preview");
        assert!(html.starts_with("<table"));
        assert!(html.contains("<td>r0c0</td>"));
        assert!(!html.contains("<th>"));
    }

    #[test]
    fn corrupt_file_degrades_to_inline_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.docx");
        std::fs::write(&path, b"not a zip").expect("write");
        let store = store_with(&path, "Quebrado");

        let html = render_preview(&store, PublicationId(1)).expect("preview");
        assert!(html.contains("preview-erro"));
    }

    #[test]
    fn unsupported_extension_degrades_to_inline_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("imagem.png");
        std::fs::write(&path, b"\x89PNG").expect("write");
        let store = store_with(&path, "Imagem");

        let html = render_preview(&store, PublicationId(1)).expect("preview");
        assert!(html.contains("preview-erro"));
        assert!(html.contains("png"));
    }

    #[test]
    fn missing_record_is_an_error_not_a_fragment() {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE publicacao (
                id_publicacao INTEGER PRIMARY KEY,
                titulo        TEXT NOT NULL,
                arquivo       TEXT NOT NULL
            );",
        )
        .expect("schema");
        let store = DocumentStore::from_connection(conn);

        assert!(render_preview(&store, PublicationId(404)).is_err());
    }
}
