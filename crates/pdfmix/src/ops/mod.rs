//! Page operations on PDF files.
//!
//! Each operation loads its inputs, assembles a fresh document from the
//! selected pages, writes it, and runs the metadata pass over the result:
//! - [`Operations::merge`] - concatenate whole files
//! - [`Operations::interleave`] - weave two files together
//! - [`Operations::extract`] - keep the selected pages, in selection order
//! - [`Operations::delete`] - keep everything but the selected pages
//! - [`Operations::rotate`] - rotate selected (or all) pages
//! - [`Operations::reverse`] - reverse page order
//! - [`Operations::split_every`] - cut into fixed-size parts
//! - [`Operations::sanitize_file`] - strip metadata only
//! - [`Operations::landscape_file`] - turn portrait pages sideways
//!
//! # Examples
//!
//! ```no_run
//! use pdfmix::config::Config;
//! use pdfmix::ops::Operations;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ops = Operations::new(Config::default());
//! let summary = ops
//!     .merge(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")], Path::new("ab.pdf"))
//!     .await?;
//! println!("{} pages", summary.pages_written);
//! # Ok(())
//! # }
//! ```

pub mod pipeline;

pub use pipeline::{OutputPipeline, ProgressFn, SanitizeOutcome};

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;
use tracing::{debug, info};

use crate::assemble::{
    AssembledDocument, InterleaveMode, MetadataSanitizer, PageTransform, SourceSpec, interleave_specs,
};
use crate::config::{Config, Rotation};
use crate::error::{PdfMixError, Result};
use crate::io::SourceDocument;
use crate::range::PageRange;
use crate::utils::file_stem_or_default;

/// What an operation wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationSummary {
    /// Pages written across all outputs.
    pub pages_written: usize,

    /// Files written, in creation order.
    pub outputs: Vec<PathBuf>,

    /// Outputs whose metadata pass failed; they hold the content as written.
    pub unsanitized: Vec<PathBuf>,
}

impl OperationSummary {
    fn record(&mut self, path: &Path, pages: usize, outcome: SanitizeOutcome) {
        self.pages_written += pages;
        self.outputs.push(path.to_path_buf());
        if outcome == SanitizeOutcome::Failed {
            self.unsanitized.push(path.to_path_buf());
        }
    }
}

/// Entry point for all page operations.
#[derive(Debug, Clone)]
pub struct Operations {
    pipeline: OutputPipeline,
}

impl Operations {
    /// Create operations using the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            pipeline: OutputPipeline::new(config),
        }
    }

    /// Report assembly progress to `progress`.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.pipeline = self.pipeline.with_progress(progress);
        self
    }

    /// Output pipeline shared with converters.
    pub fn pipeline(&self) -> &OutputPipeline {
        &self.pipeline
    }

    /// Concatenate whole documents in the given order.
    pub async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<OperationSummary> {
        if inputs.is_empty() {
            return Err(PdfMixError::NoInputs);
        }
        self.pipeline.ensure_writable(output).await?;

        let sources = self.pipeline.reader().load_all(inputs).await?;
        info!(files = sources.len(), output = %output.display(), "merging");

        let assembled = self
            .pipeline
            .assemble(sources, |sources| Ok(sources.iter().map(SourceSpec::all).collect()))
            .await?;

        self.write(assembled, output).await
    }

    /// Weave the pages of `a` and `b` according to `mode`.
    pub async fn interleave(
        &self,
        a: &Path,
        b: &Path,
        mode: InterleaveMode,
        start_from: usize,
        output: &Path,
    ) -> Result<OperationSummary> {
        self.pipeline.ensure_writable(output).await?;

        let sources = self
            .pipeline
            .reader()
            .load_all(&[a.to_path_buf(), b.to_path_buf()])
            .await?;
        info!(%mode, start_from, output = %output.display(), "interleaving");

        let assembled = self
            .pipeline
            .assemble(sources, move |sources| match sources {
                [a, b] => interleave_specs(a, b, mode, start_from),
                _ => Err(PdfMixError::assembly_failed("interleave needs exactly two documents")),
            })
            .await?;

        self.write(assembled, output).await
    }

    /// Keep only the pages named by `ranges`, in the order named.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMixError::EmptySelection`] when `ranges` selects nothing.
    pub async fn extract(&self, input: &Path, ranges: &str, output: &Path) -> Result<OperationSummary> {
        self.pipeline.ensure_writable(output).await?;
        let source = self.pipeline.reader().load(input).await?;

        let selection = PageRange::parse(ranges, source.page_count());
        if selection.is_empty() {
            return Err(PdfMixError::empty_selection("extract"));
        }
        debug!(pages = selection.len(), "extracting");

        let assembled = self
            .pipeline
            .assemble(vec![source], move |sources| {
                Ok(vec![SourceSpec::new(&sources[0], selection.into_indices())])
            })
            .await?;

        self.write(assembled, output).await
    }

    /// Remove the pages named by `ranges`, keeping the rest in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMixError::EmptySelection`] when `ranges` selects nothing
    /// or would remove every page.
    pub async fn delete(&self, input: &Path, ranges: &str, output: &Path) -> Result<OperationSummary> {
        self.pipeline.ensure_writable(output).await?;
        let source = self.pipeline.reader().load(input).await?;

        let selection = PageRange::parse(ranges, source.page_count());
        if selection.is_empty() {
            return Err(PdfMixError::empty_selection("delete"));
        }

        let keep = selection.complement();
        if keep.is_empty() {
            return Err(PdfMixError::empty_selection(
                "delete (every page would be removed)",
            ));
        }
        debug!(removed = selection.len(), kept = keep.len(), "deleting");

        let assembled = self
            .pipeline
            .assemble(vec![source], move |sources| {
                Ok(vec![SourceSpec::new(&sources[0], keep.into_indices())])
            })
            .await?;

        self.write(assembled, output).await
    }

    /// Rotate pages by `degrees` on top of their existing rotation.
    ///
    /// An empty or whitespace-only `ranges` rotates every page. Pages keep
    /// their position; unselected pages are copied unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMixError::InvalidRotation`] when `degrees` is not a
    /// multiple of 90, and [`PdfMixError::EmptySelection`] when a non-empty
    /// `ranges` selects nothing.
    pub async fn rotate(
        &self,
        input: &Path,
        ranges: &str,
        degrees: i64,
        output: &Path,
    ) -> Result<OperationSummary> {
        let rotation = Rotation::from_degrees(degrees)?;
        self.pipeline.ensure_writable(output).await?;
        let source = self.pipeline.reader().load(input).await?;

        let targets = if ranges.trim().is_empty() {
            PageRange::all(source.page_count())
        } else {
            PageRange::parse(ranges, source.page_count())
        };
        if targets.is_empty() {
            return Err(PdfMixError::empty_selection("rotate"));
        }
        debug!(degrees = rotation.as_degrees(), pages = targets.len(), "rotating");

        let assembled = self
            .pipeline
            .assemble(vec![source], move |sources| {
                Ok(vec![
                    SourceSpec::all(&sources[0]).rotate_where(rotation, targets.indices()),
                ])
            })
            .await?;

        self.write(assembled, output).await
    }

    /// Write the pages in reverse order.
    pub async fn reverse(&self, input: &Path, output: &Path) -> Result<OperationSummary> {
        self.pipeline.ensure_writable(output).await?;
        let source = self.pipeline.reader().load(input).await?;

        let assembled = self
            .pipeline
            .assemble(vec![source], |sources| {
                let source = &sources[0];
                Ok(vec![SourceSpec::new(source, (0..source.page_count()).rev())])
            })
            .await?;

        self.write(assembled, output).await
    }

    /// Cut `input` into consecutive parts of `pages_per_part` pages.
    ///
    /// Parts are written to `output_dir` as `<stem>_part_<first>-<last>.pdf`
    /// with 1-based page numbers; the last part may be shorter.
    pub async fn split_every(
        &self,
        input: &Path,
        pages_per_part: usize,
        output_dir: &Path,
    ) -> Result<OperationSummary> {
        if pages_per_part == 0 {
            return Err(PdfMixError::invalid_argument(
                "Pages per part must be at least 1",
            ));
        }

        let source = self.pipeline.reader().load(input).await?;
        let stem = file_stem_or_default(input);
        let chunks = split_chunks(source.page_count(), pages_per_part);
        let shared: Arc<[SourceDocument]> = Arc::from(vec![source]);

        let outputs: Vec<PathBuf> = chunks
            .iter()
            .map(|chunk| output_dir.join(part_file_name(&stem, chunk)))
            .collect();
        for output in &outputs {
            self.pipeline.ensure_writable(output).await?;
        }
        info!(parts = chunks.len(), input = %input.display(), "splitting");

        let mut summary = OperationSummary::default();
        for (chunk, output) in chunks.into_iter().zip(&outputs) {
            let assembled = self
                .pipeline
                .assemble(Arc::clone(&shared), move |sources| {
                    Ok(vec![SourceSpec::new(&sources[0], chunk)])
                })
                .await?;

            let pages = assembled.page_count();
            let outcome = self.pipeline.finalize(assembled.into_document(), output).await?;
            summary.record(output, pages, outcome);
        }

        Ok(summary)
    }

    /// Rewrite `input` without document metadata.
    pub async fn sanitize_file(&self, input: &Path, output: &Path) -> Result<OperationSummary> {
        self.pipeline.ensure_writable(output).await?;
        let source = self.pipeline.reader().load(input).await?;
        let pages = source.page_count();

        let clean = task::spawn_blocking(move || MetadataSanitizer::new().sanitize(&source)).await??;
        self.pipeline.write(clean, output).await?;

        let mut summary = OperationSummary::default();
        summary.record(output, pages, SanitizeOutcome::Sanitized);
        Ok(summary)
    }

    /// Rotate every portrait page by 90 degrees so all pages read as landscape.
    pub async fn landscape_file(&self, input: &Path, output: &Path) -> Result<OperationSummary> {
        self.pipeline.ensure_writable(output).await?;
        let source = self.pipeline.reader().load(input).await?;

        let assembled = self
            .pipeline
            .assemble(vec![source], |sources| {
                Ok(vec![
                    SourceSpec::all(&sources[0]).with_transform(PageTransform::Landscape),
                ])
            })
            .await?;

        self.write(assembled, output).await
    }

    async fn write(&self, assembled: AssembledDocument, output: &Path) -> Result<OperationSummary> {
        let pages = assembled.page_count();
        let outcome = self.pipeline.finalize(assembled.into_document(), output).await?;

        let mut summary = OperationSummary::default();
        summary.record(output, pages, outcome);
        Ok(summary)
    }
}

/// Zero-based page ranges of consecutive parts.
///
/// ```
/// use pdfmix::ops::split_chunks;
///
/// let sizes: Vec<usize> = split_chunks(25, 10).iter().map(|r| r.len()).collect();
/// assert_eq!(sizes, vec![10, 10, 5]);
/// ```
pub fn split_chunks(total_pages: usize, pages_per_part: usize) -> Vec<Range<usize>> {
    if pages_per_part == 0 {
        return Vec::new();
    }

    (0..total_pages)
        .step_by(pages_per_part)
        .map(|start| start..(start + pages_per_part).min(total_pages))
        .collect()
}

/// File name of one split part, numbered 1-based and inclusive.
pub fn part_file_name(stem: &str, chunk: &Range<usize>) -> String {
    format!("{stem}_part_{}-{}.pdf", chunk.start + 1, chunk.end)
}
