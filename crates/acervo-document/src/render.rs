// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process fallback PDF renderer using `printpdf` 0.8.
//
// Used when the external converter is absent or fails. The output is a
// readable, lossy reconstruction: flowed paragraphs for word-processor
// sources, a bordered grid with a repeating header row for spreadsheets.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Polygon, PolygonRing, Pt, Rgb, TextItem, WindingOrder,
};
use tracing::{debug, instrument};

use acervo_core::error::Result;
use acervo_core::types::{CellValue, ExtractedContent, MAX_SHEET_COLS};

// A4 in millimetres.
const A4_W_MM: f32 = 210.0;
const A4_H_MM: f32 = 297.0;

const BODY_FONT_PT: f32 = 11.0;
const BODY_LINE_PT: f32 = 14.0;
const BODY_MARGIN_MM: f32 = 20.0;

const GRID_FONT_PT: f32 = 9.0;
const GRID_ROW_PT: f32 = 18.0;
const GRID_MARGIN_MM: f32 = 15.0;

// Average Helvetica glyph width is roughly 0.50 * font_size in pt.
const AVG_GLYPH_FACTOR: f32 = 0.50;

fn black() -> Color {
    Color::Rgb(Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        icc_profile: None,
    })
}

fn header_shade() -> Color {
    Color::Rgb(Rgb {
        r: 0.85,
        g: 0.87,
        b: 0.91,
        icc_profile: None,
    })
}

/// Render extracted content into a complete PDF byte buffer.
#[instrument(skip(content), fields(title))]
pub fn render_pdf(title: &str, content: &ExtractedContent) -> Result<Vec<u8>> {
    match content {
        ExtractedContent::Text { paragraphs, truncated } => {
            flow_pdf(title, paragraphs, *truncated)
        }
        ExtractedContent::Table { rows } => grid_pdf(title, rows),
    }
}

// -- Paragraph flow -----------------------------------------------------------

fn flow_pdf(title: &str, paragraphs: &[String], truncated: bool) -> Result<Vec<u8>> {
    let page_w = Mm(A4_W_MM);
    let page_h = Mm(A4_H_MM);
    let margin_pt = Mm(BODY_MARGIN_MM).into_pt().0;
    let page_h_pt = page_h.into_pt().0;

    let usable_width_mm = A4_W_MM - 2.0 * BODY_MARGIN_MM;
    let avg_char_width_mm = AVG_GLYPH_FACTOR * BODY_FONT_PT * 0.3528;
    let max_chars_per_line = (usable_width_mm / avg_char_width_mm) as usize;

    // One blank line between paragraphs; a trailing marker when the source
    // had more content than the extraction cap.
    let mut lines: Vec<String> = Vec::new();
    for (i, paragraph) in paragraphs.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(wrap_line(paragraph, max_chars_per_line));
    }
    if truncated {
        lines.push(String::new());
        lines.push("(conteúdo truncado)".to_string());
    }
    if lines.is_empty() {
        lines.push("(documento sem texto)".to_string());
    }

    let usable_height_pt = page_h_pt - 2.0 * margin_pt - BODY_LINE_PT;
    let lines_per_page = (usable_height_pt / BODY_LINE_PT).max(1.0) as usize;

    let mut doc = PdfDocument::new(title);
    let mut pages: Vec<PdfPage> = Vec::new();

    for (page_idx, chunk) in lines.chunks(lines_per_page).enumerate() {
        let mut ops: Vec<Op> = Vec::new();

        // Heading on the first page only.
        if page_idx == 0 {
            write_text(
                &mut ops,
                title,
                BuiltinFont::HelveticaBold,
                BODY_FONT_PT + 2.0,
                margin_pt,
                page_h_pt - margin_pt,
            );
        }

        for (line_idx, line) in chunk.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y_pt =
                page_h_pt - margin_pt - BODY_LINE_PT * 1.5 - (line_idx as f32 * BODY_LINE_PT);
            write_text(
                &mut ops,
                line,
                BuiltinFont::Helvetica,
                BODY_FONT_PT,
                margin_pt,
                y_pt,
            );
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    doc.with_pages(pages);
    debug!(total_lines = lines.len(), pages = doc.pages.len(), "paragraph layout complete");
    Ok(save(doc))
}

// -- Cell grid ----------------------------------------------------------------

fn grid_pdf(title: &str, rows: &[Vec<CellValue>]) -> Result<Vec<u8>> {
    // Landscape A4 — grids are wide.
    let page_w = Mm(A4_H_MM);
    let page_h = Mm(A4_W_MM);
    let margin_pt = Mm(GRID_MARGIN_MM).into_pt().0;
    let page_w_pt = page_w.into_pt().0;
    let page_h_pt = page_h.into_pt().0;

    let mut doc = PdfDocument::new(title);

    if rows.is_empty() {
        let mut ops = Vec::new();
        write_text(
            &mut ops,
            "(planilha vazia)",
            BuiltinFont::Helvetica,
            BODY_FONT_PT,
            margin_pt,
            page_h_pt - margin_pt,
        );
        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);
        return Ok(save(doc));
    }

    let ncols = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(1)
        .clamp(1, MAX_SHEET_COLS);
    let table_w_pt = page_w_pt - 2.0 * margin_pt;
    let col_w_pt = table_w_pt / ncols as f32;
    let max_chars_per_cell =
        ((col_w_pt / (AVG_GLYPH_FACTOR * GRID_FONT_PT)) as usize).saturating_sub(1).max(1);

    // First grid row doubles as the header and repeats on every page.
    let header = &rows[0];
    let data = &rows[1..];

    let usable_h_pt = page_h_pt - 2.0 * margin_pt;
    let data_rows_per_page = ((usable_h_pt / GRID_ROW_PT) as usize).saturating_sub(1).max(1);

    let mut pages: Vec<PdfPage> = Vec::new();
    let chunks: Vec<&[Vec<CellValue>]> = if data.is_empty() {
        vec![&[]]
    } else {
        data.chunks(data_rows_per_page).collect()
    };

    for chunk in chunks {
        let top_pt = page_h_pt - margin_pt;
        let rows_on_page = 1 + chunk.len();
        let bottom_pt = top_pt - rows_on_page as f32 * GRID_ROW_PT;
        let mut ops: Vec<Op> = Vec::new();

        // Shaded header band, then reset to black so text stays readable.
        ops.push(Op::SetFillColor { col: header_shade() });
        ops.push(filled_rect(margin_pt, top_pt - GRID_ROW_PT, table_w_pt, GRID_ROW_PT));
        ops.push(Op::SetFillColor { col: black() });

        draw_row(&mut ops, header, ncols, max_chars_per_cell, BuiltinFont::HelveticaBold, margin_pt, col_w_pt, top_pt);
        for (i, row) in chunk.iter().enumerate() {
            let row_top = top_pt - GRID_ROW_PT * (i + 1) as f32;
            draw_row(&mut ops, row, ncols, max_chars_per_cell, BuiltinFont::Helvetica, margin_pt, col_w_pt, row_top);
        }

        // Border grid.
        ops.push(Op::SetOutlineColor { col: black() });
        ops.push(Op::SetOutlineThickness { pt: Pt(0.75) });
        for r in 0..=rows_on_page {
            let y = top_pt - r as f32 * GRID_ROW_PT;
            ops.push(stroke_line(margin_pt, y, margin_pt + table_w_pt, y));
        }
        for c in 0..=ncols {
            let x = margin_pt + c as f32 * col_w_pt;
            ops.push(stroke_line(x, top_pt, x, bottom_pt));
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    doc.with_pages(pages);
    debug!(cols = ncols, pages = doc.pages.len(), "grid layout complete");
    Ok(save(doc))
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    ops: &mut Vec<Op>,
    row: &[CellValue],
    ncols: usize,
    max_chars: usize,
    font: BuiltinFont,
    margin_pt: f32,
    col_w_pt: f32,
    row_top_pt: f32,
) {
    let baseline = row_top_pt - GRID_ROW_PT + 5.0;
    for c in 0..ncols {
        let text = row.get(c).map(|v| v.to_string()).unwrap_or_default();
        if text.is_empty() {
            continue;
        }
        let x = margin_pt + c as f32 * col_w_pt + 2.0;
        write_text(ops, &clip_cell(&text, max_chars), font, GRID_FONT_PT, x, baseline);
    }
}

/// Truncate a cell to the estimated column capacity, ellipsis-marked.
fn clip_cell(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

// -- printpdf op helpers ------------------------------------------------------

fn write_text(ops: &mut Vec<Op>, text: &str, font: BuiltinFont, size_pt: f32, x_pt: f32, y_pt: f32) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x_pt),
            y: Pt(y_pt),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size_pt),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font,
    });
    ops.push(Op::EndTextSection);
}

fn stroke_line(x1: f32, y1: f32, x2: f32, y2: f32) -> Op {
    Op::DrawLine {
        line: Line {
            points: vec![line_point(x1, y1), line_point(x2, y2)],
            is_closed: false,
        },
    }
}

fn filled_rect(x: f32, y: f32, w: f32, h: f32) -> Op {
    Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    line_point(x, y),
                    line_point(x + w, y),
                    line_point(x + w, y + h),
                    line_point(x, y + h),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    }
}

fn line_point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn save(doc: PdfDocument) -> Vec<u8> {
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

/// Wrap a single paragraph so that no line exceeds `max_width` characters.
/// Words longer than `max_width` are force-broken.
fn wrap_line(paragraph: &str, max_width: usize) -> Vec<String> {
    let words: Vec<&str> = paragraph.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let mut result = Vec::new();
    let mut current = String::with_capacity(max_width);

    for word in words {
        if word.len() > max_width {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            let mut remaining = word;
            while remaining.len() > max_width {
                let split_at = floor_char_boundary(remaining, max_width);
                let (chunk, rest) = remaining.split_at(split_at);
                result.push(chunk.to_string());
                remaining = rest;
            }
            current.push_str(remaining);
        } else if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        result.push(current);
    }
    result
}

/// Largest char boundary at or below `index` (stable stand-in for
/// `str::floor_char_boundary`).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i.max(1)
}
