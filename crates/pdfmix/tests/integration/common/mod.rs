//! Fixture helpers shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, Stream, dictionary};
use pdfmix::config::{Config, OverwriteMode};

/// Page geometry of generated fixtures.
#[derive(Debug, Clone, Copy)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Build a document whose pages carry a `/Label` of `"{label}{n}"`, 1-based.
///
/// The document has an `/Info` dictionary, a catalog XMP stream, a
/// page-level XMP stream on the first page and an XMP stream on the shared
/// font's descriptor.
pub fn build_pdf(label: &str, pages: usize, orientation: Orientation) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_xmp = doc.add_object(Stream::new(
        dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
        b"<x:xmpmeta>font</x:xmpmeta>".to_vec(),
    ));
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "FontDescriptor" => dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "Helvetica",
            "Metadata" => font_xmp,
        },
    });
    let media_box: Vec<Object> = match orientation {
        Orientation::Portrait => vec![0.into(), 0.into(), 612.into(), 792.into()],
        Orientation::Landscape => vec![0.into(), 0.into(), 792.into(), 612.into()],
    };

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=pages {
        let text = format!("BT /F1 24 Tf 72 700 Td ({label}{n}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Label" => Object::string_literal(format!("{label}{n}")),
        };
        if n == 1 {
            let xmp = doc.add_object(Stream::new(
                dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
                b"<x:xmpmeta>page</x:xmpmeta>".to_vec(),
            ));
            page.set("Metadata", xmp);
        }
        kids.push(doc.add_object(page).into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => media_box,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let xmp = doc.add_object(Stream::new(
        dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
        b"<x:xmpmeta>document</x:xmpmeta>".to_vec(),
    ));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "Metadata" => xmp,
    });
    let info_id = doc.add_object(dictionary! {
        "Author" => Object::string_literal("Jane Doe"),
        "Producer" => Object::string_literal("Fixture Writer 1.0"),
    });

    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc
}

/// Write a portrait fixture into `dir`.
pub fn write_pdf(dir: &Path, file_name: &str, label: &str, pages: usize) -> PathBuf {
    write_pdf_with(dir, file_name, label, pages, Orientation::Portrait)
}

/// Write a fixture with the given orientation into `dir`.
pub fn write_pdf_with(
    dir: &Path,
    file_name: &str,
    label: &str,
    pages: usize,
    orientation: Orientation,
) -> PathBuf {
    let path = dir.join(file_name);
    build_pdf(label, pages, orientation)
        .save(&path)
        .expect("Failed to write fixture");
    path
}

/// Page labels of a file on disk, in page order.
pub fn labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("Page is not a dictionary");
            let label = page.get(b"Label").and_then(Object::as_str).expect("Page has no label");
            String::from_utf8_lossy(label).into_owned()
        })
        .collect()
}

/// Effective `/Rotate` of every page of a file on disk.
pub fn rotations(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .ok()
                .and_then(|page| page.get(b"Rotate").ok())
                .and_then(|rotate| rotate.as_i64().ok())
                .unwrap_or(0)
        })
        .collect()
}

/// Expected labels for `pages` pages labelled with `label`.
pub fn expected(label: &str, numbers: &[usize]) -> Vec<String> {
    numbers.iter().map(|n| format!("{label}{n}")).collect()
}

/// Configuration that overwrites outputs and prints nothing.
pub fn force_config() -> Config {
    Config {
        overwrite_mode: OverwriteMode::Force,
        quiet: true,
        ..Config::default()
    }
}
