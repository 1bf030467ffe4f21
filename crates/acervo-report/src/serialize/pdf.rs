// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paginated PDF encoding — landscape A4 table with the header row repeated
// across page breaks, optional logo, zebra shading, and a full border grid.
//
// Any failure here (logo decoding, layout) is recoverable: the caller
// degrades the request to CSV.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData, RawImageFormat, Rgb,
    TextItem, WindingOrder, XObjectTransform,
};
use tracing::debug;

use acervo_core::error::{AcervoError, Result};

use super::{Field, REPORT_TITLE};
use crate::columns::ReportColumn;

// Landscape A4.
const PAGE_W_MM: f32 = 297.0;
const PAGE_H_MM: f32 = 210.0;
const MARGIN_MM: f32 = 12.0;

const ROW_PT: f32 = 16.0;
const FONT_PT: f32 = 9.0;
const TITLE_PT: f32 = 13.0;
const TITLE_BAND_PT: f32 = 34.0;
const AVG_GLYPH_FACTOR: f32 = 0.50;
const LOGO_DPI: f32 = 150.0;

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
        g: 0.88,
        b: 0.95,
        icc_profile: None,
    })
}

fn zebra_shade() -> Color {
    Color::Rgb(Rgb {
        r: 0.95,
        g: 0.95,
        b: 0.95,
        icc_profile: None,
    })
}

pub(super) fn encode(
    columns: &[ReportColumn],
    table: &[Vec<Field>],
    logo: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let page_w = Mm(PAGE_W_MM);
    let page_h = Mm(PAGE_H_MM);
    let margin_pt = Mm(MARGIN_MM).into_pt().0;
    let page_w_pt = page_w.into_pt().0;
    let page_h_pt = page_h.into_pt().0;

    let mut doc = PdfDocument::new(REPORT_TITLE);

    // Decode the logo up front so a bad image fails the whole encode before
    // any page is laid out.
    let logo_xobject = match logo {
        Some(bytes) => Some(add_logo(&mut doc, bytes)?),
        None => None,
    };

    // Column geometry: widths proportional to the per-column tuning used by
    // the spreadsheet output.
    let table_w_pt = page_w_pt - 2.0 * margin_pt;
    let total_weight: f32 = columns.iter().map(|c| c.width() as f32).sum();
    let widths: Vec<f32> = columns
        .iter()
        .map(|c| table_w_pt * c.width() as f32 / total_weight)
        .collect();
    let offsets: Vec<f32> = widths
        .iter()
        .scan(margin_pt, |x, w| {
            let here = *x;
            *x += w;
            Some(here)
        })
        .collect();

    // Pagination: the first page loses the title band.
    let first_capacity =
        (((page_h_pt - 2.0 * margin_pt - TITLE_BAND_PT) / ROW_PT) as usize).saturating_sub(1);
    let rest_capacity = (((page_h_pt - 2.0 * margin_pt) / ROW_PT) as usize).saturating_sub(1);
    let first_capacity = first_capacity.max(1);
    let rest_capacity = rest_capacity.max(1);

    let mut pages: Vec<PdfPage> = Vec::new();
    let mut cursor = 0usize;
    let mut page_idx = 0usize;
    loop {
        let capacity = if page_idx == 0 { first_capacity } else { rest_capacity };
        let chunk_end = (cursor + capacity).min(table.len());
        let chunk = &table[cursor..chunk_end];

        let mut ops: Vec<Op> = Vec::new();
        let mut top_pt = page_h_pt - margin_pt;

        if page_idx == 0 {
            if let Some((xobject_id, scale)) = &logo_xobject {
                ops.push(Op::UseXobject {
                    id: xobject_id.clone(),
                    transform: XObjectTransform {
                        translate_x: Some(Pt(margin_pt)),
                        translate_y: Some(Pt(page_h_pt - margin_pt - TITLE_BAND_PT + 4.0)),
                        scale_x: Some(*scale),
                        scale_y: Some(*scale),
                        dpi: Some(LOGO_DPI),
                        rotate: None,
                    },
                });
            }
            let title_x = if logo_xobject.is_some() {
                margin_pt + TITLE_BAND_PT + 8.0
            } else {
                margin_pt
            };
            write_text(
                &mut ops,
                REPORT_TITLE,
                BuiltinFont::HelveticaBold,
                TITLE_PT,
                title_x,
                page_h_pt - margin_pt - TITLE_PT,
            );
            top_pt -= TITLE_BAND_PT;
        }

        // Header band, shaded then re-inked for text.
        ops.push(Op::SetFillColor { col: header_shade() });
        ops.push(filled_rect(margin_pt, top_pt - ROW_PT, table_w_pt, ROW_PT));
        ops.push(Op::SetFillColor { col: black() });
        for (c, column) in columns.iter().enumerate() {
            let max_chars = chars_for(widths[c]);
            write_text(
                &mut ops,
                &clip(column.label(), max_chars),
                BuiltinFont::HelveticaBold,
                FONT_PT,
                offsets[c] + 2.0,
                top_pt - ROW_PT + 5.0,
            );
        }

        // Data rows with zebra shading on alternating global indices.
        for (i, row) in chunk.iter().enumerate() {
            let row_top = top_pt - ROW_PT * (i + 1) as f32;
            if (cursor + i) % 2 == 1 {
                ops.push(Op::SetFillColor { col: zebra_shade() });
                ops.push(filled_rect(margin_pt, row_top - ROW_PT, table_w_pt, ROW_PT));
                ops.push(Op::SetFillColor { col: black() });
            }
            for (c, field) in row.iter().enumerate() {
                let text = field.display();
                if text.is_empty() {
                    continue;
                }
                let max_chars = chars_for(widths[c]);
                write_text(
                    &mut ops,
                    &clip(&text, max_chars),
                    BuiltinFont::Helvetica,
                    FONT_PT,
                    offsets[c] + 2.0,
                    row_top - ROW_PT + 5.0,
                );
            }
        }

        // Border grid around header + data.
        let rows_on_page = 1 + chunk.len();
        let bottom_pt = top_pt - rows_on_page as f32 * ROW_PT;
        ops.push(Op::SetOutlineColor { col: black() });
        ops.push(Op::SetOutlineThickness { pt: Pt(0.75) });
        for r in 0..=rows_on_page {
            let y = top_pt - r as f32 * ROW_PT;
            ops.push(stroke_line(margin_pt, y, margin_pt + table_w_pt, y));
        }
        let mut x = margin_pt;
        for w in &widths {
            ops.push(stroke_line(x, top_pt, x, bottom_pt));
            x += w;
        }
        ops.push(stroke_line(x, top_pt, x, bottom_pt));

        pages.push(PdfPage::new(page_w, page_h, ops));
        cursor = chunk_end;
        page_idx += 1;
        if cursor >= table.len() {
            break;
        }
    }

    doc.with_pages(pages);
    debug!(pages = doc.pages.len(), "report PDF laid out");

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// Decode and register the logo; returns the XObject id and the scale that
/// fits it into the title band.
fn add_logo(doc: &mut PdfDocument, bytes: &[u8]) -> Result<(printpdf::XObjectId, f32)> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AcervoError::RenderFailed(format!("logo: {e}")))?;
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;
    let rgb = decoded.to_rgb8();

    let raw = RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width,
        height,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let id = doc.add_image(&raw);

    let native_h_pt = height as f32 / LOGO_DPI * 72.0;
    let scale = ((TITLE_BAND_PT - 8.0) / native_h_pt).min(1.0);
    Ok((id, scale))
}

fn chars_for(col_w_pt: f32) -> usize {
    ((col_w_pt / (AVG_GLYPH_FACTOR * FONT_PT)) as usize)
        .saturating_sub(1)
        .max(1)
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

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
