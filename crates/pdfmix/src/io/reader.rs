//! PDF loading.
//!
//! Parsing is CPU-bound, so every load runs on tokio's blocking pool and the
//! async side only sequences the results.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmix::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let source = reader.load(Path::new("document.pdf")).await?;
//! println!("{} has {} pages", source.path().display(), source.page_count());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lopdf::{Document, ObjectId};
use tokio::task;
use tracing::debug;

use crate::assemble::pages::{self, PageInfo};
use crate::error::{PdfMixError, Result};

/// A PDF opened as the source of an operation.
///
/// Read-only once loaded; every operation builds its output from a fresh
/// document instead of editing this one.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    document: Document,
    page_ids: Vec<ObjectId>,
    file_size: u64,
    load_time: Duration,
}

impl SourceDocument {
    /// Wrap an in-memory document.
    ///
    /// `path` is only used to identify the document in messages.
    pub fn from_document(path: impl Into<PathBuf>, document: Document) -> Self {
        let page_ids = document.get_pages().into_values().collect();

        Self {
            path: path.into(),
            document,
            page_ids,
            file_size: 0,
            load_time: Duration::ZERO,
        }
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.document.version
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    /// Object id of the page at a zero-based index.
    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    /// Effective geometry of the page at a zero-based index.
    pub fn page_info(&self, index: usize) -> Option<PageInfo> {
        self.page_id(index)
            .map(|page_id| pages::page_info(&self.document, page_id))
    }

    /// Size of the source file in bytes (0 for in-memory documents).
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Time spent parsing the file.
    pub fn load_time(&self) -> Duration {
        self.load_time
    }
}

/// Loads PDF files into [`SourceDocument`]s, rejecting documents without pages.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or is not a regular file
    /// - The file is not a valid PDF
    /// - The PDF is encrypted
    /// - The PDF has no pages
    pub async fn load(&self, path: &Path) -> Result<SourceDocument> {
        let path_buf = path.to_path_buf();

        let metadata = tokio::fs::metadata(&path_buf).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PdfMixError::file_not_found(path_buf.clone())
            } else {
                PdfMixError::failed_to_load_pdf(path_buf.clone(), e.to_string())
            }
        })?;

        if !metadata.is_file() {
            return Err(PdfMixError::NotAFile { path: path_buf });
        }

        let file_size = metadata.len();

        let source = task::spawn_blocking(move || {
            let start = Instant::now();

            let document = Document::load(&path_buf).map_err(|e| {
                let err_msg = e.to_string();
                let lower = err_msg.to_lowercase();
                if lower.contains("encrypt") || lower.contains("password") {
                    PdfMixError::encrypted_pdf(path_buf.clone())
                } else {
                    PdfMixError::failed_to_load_pdf(path_buf.clone(), err_msg)
                }
            })?;

            if document.is_encrypted() {
                return Err(PdfMixError::encrypted_pdf(path_buf));
            }

            let mut source = SourceDocument::from_document(path_buf, document);

            if source.page_count() == 0 {
                return Err(PdfMixError::corrupted_pdf(
                    source.path,
                    "PDF has no pages",
                ));
            }

            source.file_size = file_size;
            source.load_time = start.elapsed();
            Ok::<_, PdfMixError>(source)
        })
        .await??;

        debug!(
            path = %source.path().display(),
            pages = source.page_count(),
            elapsed_ms = source.load_time().as_millis() as u64,
            "loaded pdf"
        );

        Ok(source)
    }

    /// Load several documents one after another, keeping input order.
    ///
    /// Fails with the first error encountered.
    pub async fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<SourceDocument>> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push(self.load(path).await?);
        }
        Ok(sources)
    }
}
