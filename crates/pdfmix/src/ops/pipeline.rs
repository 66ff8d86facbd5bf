//! Writing results to disk.
//!
//! Every operation ends the same way: the content file is written, then a
//! second pass rebuilds it without metadata and atomically replaces it. The
//! second pass is best-effort. If it fails at any step the content file is
//! left exactly as written and a warning is logged.

use std::path::Path;
use std::sync::Arc;

use lopdf::Document;
use tokio::task;
use tracing::{debug, warn};

use crate::assemble::{AssembledDocument, DocumentAssembler, MetadataSanitizer, PageTransform, SourceSpec};
use crate::config::{Config, OverwriteMode};
use crate::error::{PdfMixError, Result};
use crate::io::{PdfReader, PdfWriter, SourceDocument};

/// Callback receiving `(pages_done, pages_total)` during assembly.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// What happened in the metadata pass for one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeOutcome {
    /// Metadata was stripped and the file replaced.
    Sanitized,
    /// The pass is disabled in the configuration.
    Skipped,
    /// The pass failed; the content file was kept as written.
    Failed,
}

/// Shared reader, writer and sanitize pass used by every operation.
#[derive(Clone)]
pub struct OutputPipeline {
    config: Config,
    reader: PdfReader,
    writer: PdfWriter,
    sanitizer: MetadataSanitizer,
    progress: Option<ProgressFn>,
}

impl OutputPipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: Config) -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::with_compression(config.compression),
            sanitizer: MetadataSanitizer::new(),
            progress: None,
            config,
        }
    }

    /// Report assembly progress to `progress`.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reader used for inputs and for re-reading outputs.
    pub fn reader(&self) -> &PdfReader {
        &self.reader
    }

    /// Refuse to replace an existing file unless overwriting is forced.
    ///
    /// Interactive confirmation is the caller's job; by the time an
    /// operation runs, `Prompt` is treated like `NoClobber`.
    pub async fn ensure_writable(&self, path: &Path) -> Result<()> {
        if self.config.overwrite_mode != OverwriteMode::Force && self.writer.exists(path).await {
            return Err(PdfMixError::output_exists(path.to_path_buf()));
        }
        self.writer.can_write(path).await
    }

    /// Run the assembler on the blocking pool.
    ///
    /// `plan` turns the loaded sources into page selections; it runs on the
    /// same thread as the assembly so the selections can borrow them. Pass an
    /// `Arc<[SourceDocument]>` to assemble several outputs from one load.
    pub async fn assemble<F>(
        &self,
        sources: impl Into<Arc<[SourceDocument]>>,
        plan: F,
    ) -> Result<AssembledDocument>
    where
        F: for<'a> FnOnce(&'a [SourceDocument]) -> Result<Vec<SourceSpec<'a>>> + Send + 'static,
    {
        let sources: Arc<[SourceDocument]> = sources.into();
        let progress = self.progress.clone();

        task::spawn_blocking(move || {
            let specs = plan(sources.as_ref())?;
            DocumentAssembler::new().assemble_with_progress(&specs, |done, total| {
                if let Some(progress) = &progress {
                    progress(done, total);
                }
            })
        })
        .await?
    }

    /// Write `doc` to `path` as is.
    pub async fn write(&self, doc: Document, path: &Path) -> Result<()> {
        self.writer.save(doc, path).await
    }

    /// Write `doc` to `path`, then run the metadata pass over it.
    pub async fn finalize(&self, doc: Document, path: &Path) -> Result<SanitizeOutcome> {
        self.writer.save(doc, path).await?;
        Ok(self.sanitize_pass(path).await)
    }

    /// Best-effort metadata pass over an existing output.
    pub async fn sanitize_pass(&self, path: &Path) -> SanitizeOutcome {
        if !self.config.sanitize {
            return SanitizeOutcome::Skipped;
        }

        match self.sanitize_in_place(path).await {
            Ok(()) => SanitizeOutcome::Sanitized,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "sanitize pass failed, keeping content file");
                SanitizeOutcome::Failed
            }
        }
    }

    /// Rebuild `path` without metadata and atomically replace it.
    pub async fn sanitize_in_place(&self, path: &Path) -> Result<()> {
        let source = self
            .reader
            .load(path)
            .await
            .map_err(|e| PdfMixError::sanitize_failed(path.to_path_buf(), e.to_string()))?;

        let sanitizer = self.sanitizer.clone();
        let clean = task::spawn_blocking(move || sanitizer.sanitize(&source))
            .await?
            .map_err(|e| PdfMixError::sanitize_failed(path.to_path_buf(), e.to_string()))?;

        self.writer
            .save(clean, path)
            .await
            .map_err(|e| PdfMixError::sanitize_failed(path.to_path_buf(), e.to_string()))?;

        debug!(path = %path.display(), "sanitized output");
        Ok(())
    }

    /// Apply `transform` to every page of an existing file, replacing it.
    pub async fn transform_in_place(&self, path: &Path, transform: PageTransform) -> Result<()> {
        let source = self.reader.load(path).await?;
        let assembled = self
            .assemble(vec![source], move |sources| {
                Ok(sources
                    .iter()
                    .map(|source| SourceSpec::all(source).with_transform(transform))
                    .collect())
            })
            .await?;

        self.writer.save(assembled.into_document(), path).await
    }
}

impl std::fmt::Debug for OutputPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputPipeline")
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}
