//! PDF writing.
//!
//! Writes are atomic: the document is serialised into a temporary sibling of
//! the destination and persisted over it only once fully flushed, so a failed
//! write never leaves a truncated file behind.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmix::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(doc, Path::new("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lopdf::Document;
use tempfile::NamedTempFile;
use tokio::task;
use tracing::debug;

use crate::config::CompressionLevel;
use crate::error::{PdfMixError, Result};
use crate::utils::format_file_size;

/// Suffix of intermediate files created next to an output.
pub const TEMP_SUFFIX: &str = ".__tmp__.pdf";

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Compression applied before serialising.
    pub compression: CompressionLevel,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::default(),
            buffer_size: 64 * 1024,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Compression that was applied.
    pub compression: CompressionLevel,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer using the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self {
            options: WriteOptions {
                compression,
                ..Default::default()
            },
        }
    }

    /// Save a PDF document to a file, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    pub async fn save(&self, doc: Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).await.map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    pub async fn save_with_stats(&self, mut doc: Document, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            match options.compression {
                CompressionLevel::None => {}
                CompressionLevel::Standard => doc.compress(),
                CompressionLevel::Maximum => {
                    doc.prune_objects();
                    doc.renumber_objects();
                    doc.compress();
                }
            }

            let mut temp = temp_sibling(&path_buf)?;

            {
                let mut writer = BufWriter::with_capacity(options.buffer_size, temp.as_file_mut());

                doc.save_to(&mut writer)
                    .map_err(|e| PdfMixError::FailedToWrite {
                        path: path_buf.clone(),
                        source: std::io::Error::other(e),
                    })?;

                writer.flush().map_err(|e| PdfMixError::FailedToWrite {
                    path: path_buf.clone(),
                    source: e,
                })?;
            }

            temp.persist(&path_buf)
                .map_err(|e| PdfMixError::FailedToWrite {
                    path: path_buf.clone(),
                    source: e.error,
                })?;

            let file_size = std::fs::metadata(&path_buf).map(|m| m.len()).unwrap_or(0);

            Ok::<_, PdfMixError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size,
                output_path: path_buf,
                compression: options.compression,
            })
        })
        .await??;

        debug!(
            path = %stats.output_path.display(),
            size = %stats.format_file_size(),
            "wrote pdf"
        );

        Ok(stats)
    }

    /// Check that the parent directory of `path` exists and is writable.
    ///
    /// Performs pre-flight checks without actually writing.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let parent = parent_dir(path);

        let metadata = tokio::fs::metadata(&parent).await.map_err(|_| {
            PdfMixError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            ))
        })?;

        if !metadata.is_dir() {
            return Err(PdfMixError::invalid_config(format!(
                "Output directory is not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(PdfMixError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

/// Directory a file will be written into; `.` for bare file names.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Create an empty temporary file next to `path`.
///
/// The file is removed when dropped unless persisted.
pub(crate) fn temp_sibling(path: &Path) -> Result<NamedTempFile> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    tempfile::Builder::new()
        .prefix(&format!(".{stem}."))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent_dir(path))
        .map_err(|e| PdfMixError::FailedToCreateOutput {
            path: path.to_path_buf(),
            source: e,
        })
}
