// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word-processor extraction — paragraphs from OOXML (`.docx`).
//
// A docx is a ZIP archive whose main part is `word/document.xml`. Paragraphs
// are `<w:p>` elements; the visible text lives in `<w:t>` runs. We walk the
// XML as a stream, concatenating runs per paragraph, skipping blanks, and
// stopping at the paragraph cap.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use tracing::warn;

use acervo_core::error::{AcervoError, Result};
use acervo_core::types::{ExtractedContent, MAX_PARAGRAPHS};

/// Upper bound on the decompressed size of `word/document.xml`.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

fn corrupt(detail: impl std::fmt::Display) -> AcervoError {
    AcervoError::Corrupt(detail.to_string())
}

/// Read the document in paragraph order, trimmed, blanks skipped, capped at
/// [`MAX_PARAGRAPHS`] with the truncation flag set exactly when more
/// non-empty paragraphs remained.
pub fn extract_paragraphs(path: &Path) -> Result<ExtractedContent> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(corrupt)?;

    let mut doc_xml = Vec::new();
    {
        let entry = archive
            .by_name("word/document.xml")
            .map_err(|_| corrupt("word/document.xml not found"))?;
        entry
            .take(MAX_XML_ENTRY_BYTES)
            .read_to_end(&mut doc_xml)
            .map_err(corrupt)?;
        if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
            return Err(corrupt("word/document.xml exceeds size limit"));
        }
    }

    paragraphs_from_xml(&doc_xml)
}

fn paragraphs_from_xml(xml: &[u8]) -> Result<ExtractedContent> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    let mut truncated = false;
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text_run = true,
                // Tabs and line breaks inside a paragraph become a space so
                // adjacent runs don't glue together.
                b"tab" | b"br" => current.push(' '),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"tab" | b"br") {
                    current.push(' ');
                }
            }
            Ok(Event::Text(t)) if in_text_run => {
                let text = t.unescape().unwrap_or_default();
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    let trimmed = current.trim();
                    if !trimmed.is_empty() {
                        if paragraphs.len() == MAX_PARAGRAPHS {
                            truncated = true;
                            break;
                        }
                        paragraphs.push(trimmed.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "docx XML walk aborted");
                return Err(corrupt(e));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(ExtractedContent::Text { paragraphs, truncated })
}
