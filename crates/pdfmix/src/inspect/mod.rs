//! Document inspection.
//!
//! Reports page geometry and whether any document metadata survives, which
//! is how a sanitized output is checked.

use std::path::{Path, PathBuf};

use lopdf::Document;
use serde::Serialize;

use crate::assemble::sanitizer::is_xmp_stream;
use crate::error::Result;
use crate::io::{PdfReader, SourceDocument};

/// One page of a [`DocumentReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    /// 1-based page number.
    pub number: usize,
    /// Effective MediaBox width in points.
    pub width: f64,
    /// Effective MediaBox height in points.
    pub height: f64,
    /// Effective rotation in degrees.
    pub rotation: i64,
}

/// Summary of a PDF file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    /// Inspected file.
    pub path: PathBuf,
    /// PDF header version.
    pub version: String,
    /// Number of pages.
    pub page_count: usize,
    /// File size in bytes.
    pub file_size: u64,
    /// Whether the trailer references an `/Info` dictionary.
    pub has_info: bool,
    /// Whether any XMP metadata stream is present.
    pub has_xmp: bool,
    /// Per-page geometry.
    pub pages: Vec<PageReport>,
}

impl DocumentReport {
    /// Build a report for an already loaded document.
    pub fn from_source(source: &SourceDocument) -> Self {
        let pages = (0..source.page_count())
            .filter_map(|index| {
                source.page_info(index).map(|info| PageReport {
                    number: index + 1,
                    width: info.width,
                    height: info.height,
                    rotation: info.rotation,
                })
            })
            .collect();

        let doc = source.document();
        Self {
            path: source.path().to_path_buf(),
            version: source.version().to_string(),
            page_count: source.page_count(),
            file_size: source.file_size(),
            has_info: doc.trailer.has(b"Info"),
            has_xmp: has_xmp(doc),
            pages,
        }
    }

    /// Whether the document carries no metadata at all.
    pub fn is_clean(&self) -> bool {
        !self.has_info && !self.has_xmp
    }
}

/// Load `path` and describe it.
pub async fn inspect(path: &Path) -> Result<DocumentReport> {
    let source = PdfReader::new().load(path).await?;
    Ok(DocumentReport::from_source(&source))
}

fn has_xmp(doc: &Document) -> bool {
    doc.objects.values().any(is_xmp_stream)
}
