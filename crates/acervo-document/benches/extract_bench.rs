// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the format extractors. Benchmarks the docx
// paragraph walk on a synthetic document sized at the extraction cap, which
// is the worst case the pipeline is allowed to see.

use std::io::Write;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use acervo_document::extract::extract;

/// Build a docx with `count` short paragraphs and write it to `dir`.
fn docx_fixture(dir: &std::path::Path, count: usize) -> std::path::PathBuf {
    let mut body = String::new();
    for i in 0..count {
        body.push_str(&format!(
            "<w:p><w:r><w:t>Parágrafo número {i} com algum texto corrido.</w:t></w:r></w:p>"
        ));
    }
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut zw = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zw.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .expect("start zip entry");
    zw.write_all(xml.as_bytes()).expect("write zip entry");
    let bytes = zw.finish().expect("finish zip").into_inner();

    let path = dir.join("bench.docx");
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

fn bench_docx_extraction(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = docx_fixture(dir.path(), 120);

    c.bench_function("docx_extract (120 paragraphs)", |b| {
        b.iter(|| {
            let content = extract(black_box(&path), "docx").expect("extract");
            black_box(content);
        });
    });
}

criterion_group!(benches, bench_docx_extraction);
criterion_main!(benches);
