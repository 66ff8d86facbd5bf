//! Performance benchmarks for pdfmix.
//!
//! Run with: cargo bench
//!
//! Fixtures are generated in memory, so no files are needed.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lopdf::{Document, Object, Stream, dictionary};
use pdfmix::assemble::{DocumentAssembler, InterleaveMode, MetadataSanitizer, SourceSpec, interleave_documents};
use pdfmix::config::{Config, OverwriteMode};
use pdfmix::io::SourceDocument;
use pdfmix::ops::Operations;
use pdfmix::range::parse_page_ranges;
use tempfile::TempDir;

/// Build a document with `pages` pages sharing one font.
fn document(pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages);
    for n in 0..pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (page {n}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn source(pages: usize) -> SourceDocument {
    SourceDocument::from_document("bench.pdf", document(pages))
}

/// Benchmark: parse range expressions
fn bench_parse_ranges(c: &mut Criterion) {
    c.bench_function("parse_page_ranges", |b| {
        b.iter(|| parse_page_ranges(black_box("1-100, 250-200, 7, 7, 9999, x-y"), black_box(500)));
    });
}

/// Benchmark: assemble all pages, scaling by page count
fn bench_assemble_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_scaling");

    for pages in [10, 100, 500] {
        let source = source(pages);
        group.bench_with_input(BenchmarkId::from_parameter(pages), &source, |b, source| {
            b.iter(|| {
                DocumentAssembler::new()
                    .assemble(&[SourceSpec::all(black_box(source))])
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark: interleave two documents
fn bench_interleave(c: &mut Criterion) {
    let a = source(100);
    let b = source(100);

    c.bench_function("interleave_alternate_200", |bench| {
        bench.iter(|| interleave_documents(&a, &b, InterleaveMode::Alternate, 1).unwrap());
    });
}

/// Benchmark: rebuild without metadata
fn bench_sanitize(c: &mut Criterion) {
    let source = source(100);
    let sanitizer = MetadataSanitizer::new();

    c.bench_function("sanitize_100_pages", |b| {
        b.iter(|| sanitizer.sanitize(black_box(&source)).unwrap());
    });
}

/// Benchmark: merge from disk, including the sanitize pass
fn bench_merge_files(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let temp_dir = TempDir::new().unwrap();

    let inputs: Vec<_> = (0..3)
        .map(|i| {
            let path = temp_dir.path().join(format!("input_{i}.pdf"));
            document(50).save(&path).unwrap();
            path
        })
        .collect();
    let output = temp_dir.path().join("merged.pdf");

    let ops = Operations::new(Config {
        overwrite_mode: OverwriteMode::Force,
        quiet: true,
        ..Config::default()
    });

    c.bench_function("merge_3x50_pages", |b| {
        b.to_async(&rt).iter(|| async {
            ops.merge(black_box(&inputs), &output).await.unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_parse_ranges,
    bench_assemble_scaling,
    bench_interleave,
    bench_sanitize,
    bench_merge_files,
);

criterion_main!(benches);
