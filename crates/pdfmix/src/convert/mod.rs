//! Conversion of office documents and images into PDF.
//!
//! Converted files go through the same metadata pass as every other output.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmix::config::Config;
//! use pdfmix::convert::{ConverterChain, LandscapeMode, OfficeBatch, office::DocumentKind};
//! use pdfmix::ops::OutputPipeline;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = OutputPipeline::new(Config::default());
//! let converters = ConverterChain::probe();
//!
//! let report = OfficeBatch::new(&pipeline, &converters)
//!     .kind(DocumentKind::Excel)
//!     .landscape(LandscapeMode::Always)
//!     .run(&[PathBuf::from("budget.xlsx")], Path::new("out"), |_, _| {})
//!     .await?;
//! println!("{} converted", report.converted.len());
//! # Ok(())
//! # }
//! ```

pub mod images;
pub mod office;

pub use images::{ImageComposer, ImageLayout, PageSize, Placement};
pub use office::{ConverterChain, DocumentConverter, DocumentKind, LibreOfficeConverter};

use std::path::{Path, PathBuf};

use tokio::task;
use tracing::{debug, info, warn};

use crate::assemble::PageTransform;
use crate::config::BatchPolicy;
use crate::error::{PdfMixError, Result};
use crate::ops::{OperationSummary, OutputPipeline, SanitizeOutcome};
use crate::utils::file_stem_or_default;

/// One input that could not be converted.
#[derive(Debug)]
pub struct BatchFailure {
    /// Input document.
    pub input: PathBuf,
    /// Why it failed.
    pub error: PdfMixError,
}

/// Outcome of a conversion batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// PDFs written, in input order.
    pub converted: Vec<PathBuf>,
    /// Inputs skipped under [`BatchPolicy::ContinueOnFailure`].
    pub failed: Vec<BatchFailure>,
    /// Outputs whose metadata pass failed.
    pub unsanitized: Vec<PathBuf>,
}

impl BatchReport {
    /// Whether every input was converted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Which converted documents get their portrait pages turned to landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandscapeMode {
    /// Spreadsheets only.
    #[default]
    Spreadsheets,
    /// Every document.
    Always,
    /// No document.
    Never,
}

impl LandscapeMode {
    /// Whether a converted document of `kind` is turned to landscape.
    pub fn applies_to(self, kind: DocumentKind) -> bool {
        match self {
            Self::Spreadsheets => kind == DocumentKind::Excel,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// A batch of office documents converted into one folder.
#[derive(Debug)]
pub struct OfficeBatch<'a> {
    pipeline: &'a OutputPipeline,
    converters: &'a ConverterChain,
    kind: Option<DocumentKind>,
    landscape: LandscapeMode,
}

impl<'a> OfficeBatch<'a> {
    /// Batch writing through `pipeline` with `converters`.
    pub fn new(pipeline: &'a OutputPipeline, converters: &'a ConverterChain) -> Self {
        Self {
            pipeline,
            converters,
            kind: None,
            landscape: LandscapeMode::default(),
        }
    }

    /// Only accept inputs of this kind.
    pub fn kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Choose which results get their portrait pages rotated to landscape.
    pub fn landscape(mut self, landscape: LandscapeMode) -> Self {
        self.landscape = landscape;
        self
    }

    /// Convert `inputs` into `output_dir` as `<stem>.pdf`.
    ///
    /// `on_progress` receives `(converted, total)` after each success. A
    /// failing input aborts the batch or is recorded in the report,
    /// depending on the configured [`BatchPolicy`]. Errors that are not
    /// [recoverable](PdfMixError::is_recoverable), such as an existing
    /// output or a failed write, abort under either policy.
    pub async fn run<F>(&self, inputs: &[PathBuf], output_dir: &Path, mut on_progress: F) -> Result<BatchReport>
    where
        F: FnMut(usize, usize),
    {
        if inputs.is_empty() {
            return Err(PdfMixError::NoInputs);
        }
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| PdfMixError::FailedToCreateOutput {
                path: output_dir.to_path_buf(),
                source: e,
            })?;

        let policy = self.pipeline.config().batch_policy;
        let mut report = BatchReport::default();
        info!(files = inputs.len(), output_dir = %output_dir.display(), "converting office documents");

        for input in inputs {
            let output = output_dir.join(format!("{}.pdf", file_stem_or_default(input)));

            match self.convert_one(input, &output).await {
                Ok(outcome) => {
                    if outcome == SanitizeOutcome::Failed {
                        report.unsanitized.push(output.clone());
                    }
                    report.converted.push(output);
                    on_progress(report.converted.len(), inputs.len());
                }
                Err(error) => match policy {
                    BatchPolicy::ContinueOnFailure if error.is_recoverable() => {
                        warn!(input = %input.display(), %error, "skipping input");
                        report.failed.push(BatchFailure {
                            input: input.clone(),
                            error,
                        });
                    }
                    _ => return Err(error),
                },
            }
        }

        Ok(report)
    }

    async fn convert_one(&self, input: &Path, output: &Path) -> Result<SanitizeOutcome> {
        let kind = DocumentKind::from_path(input)
            .filter(|kind| self.kind.is_none_or(|expected| expected == *kind))
            .ok_or_else(|| PdfMixError::UnsupportedInput {
                path: input.to_path_buf(),
            })?;

        if !tokio::fs::try_exists(input).await.unwrap_or(false) {
            return Err(PdfMixError::file_not_found(input.to_path_buf()));
        }
        self.pipeline.ensure_writable(output).await?;

        self.converters.convert(input, output, kind).await?;

        if self.landscape.applies_to(kind)
            && let Err(e) = self
                .pipeline
                .transform_in_place(output, PageTransform::Landscape)
                .await
        {
            warn!(path = %output.display(), error = %e, "landscape pass failed, keeping converted file");
        }

        debug!(input = %input.display(), output = %output.display(), %kind, "converted");
        Ok(self.pipeline.sanitize_pass(output).await)
    }
}

/// Compose `inputs` into one PDF, one page per image.
pub async fn images_to_pdf(
    pipeline: &OutputPipeline,
    inputs: &[PathBuf],
    layout: ImageLayout,
    output: &Path,
) -> Result<OperationSummary> {
    if inputs.is_empty() {
        return Err(PdfMixError::NoInputs);
    }
    pipeline.ensure_writable(output).await?;

    let inputs = inputs.to_vec();
    let composer = ImageComposer::new(layout);
    let doc = task::spawn_blocking(move || composer.compose(&inputs)).await??;
    let pages = doc.get_pages().len();

    let outcome = pipeline.finalize(doc, output).await?;

    let mut summary = OperationSummary {
        pages_written: pages,
        outputs: vec![output.to_path_buf()],
        unsanitized: Vec::new(),
    };
    if outcome == SanitizeOutcome::Failed {
        summary.unsanitized.push(output.to_path_buf());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, OverwriteMode};
    use futures::future::BoxFuture;
    use lopdf::{Document, Object, dictionary};
    use rstest::rstest;

    /// Writes a one-page portrait PDF carrying an /Info dictionary.
    #[derive(Debug)]
    struct FakeConverter;

    impl DocumentConverter for FakeConverter {
        fn name(&self) -> &str {
            "Fake"
        }

        fn convert<'a>(
            &'a self,
            _input: &'a Path,
            output: &'a Path,
            _kind: DocumentKind,
        ) -> BoxFuture<'a, Result<()>> {
            Box::pin(async move {
                let mut doc = portrait_with_info();
                doc.save(output)?;
                Ok(())
            })
        }
    }

    fn portrait_with_info() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Author" => Object::string_literal("someone"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc
    }

    fn pipeline(policy: BatchPolicy) -> OutputPipeline {
        OutputPipeline::new(Config {
            overwrite_mode: OverwriteMode::Force,
            batch_policy: policy,
            ..Default::default()
        })
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"office bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn test_batch_converts_sanitizes_and_rotates() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "budget.xlsx");
        let out_dir = dir.path().join("out");

        let pipeline = pipeline(BatchPolicy::AbortOnFirstFailure);
        let converters = ConverterChain::new(vec![Box::new(FakeConverter)]);
        let mut progress = Vec::new();

        let report = OfficeBatch::new(&pipeline, &converters)
            .kind(DocumentKind::Excel)
            .run(&[input], &out_dir, |done, total| progress.push((done, total)))
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.converted, vec![out_dir.join("budget.pdf")]);
        assert_eq!(progress, vec![(1, 1)]);

        let doc = Document::load(out_dir.join("budget.pdf")).unwrap();
        assert!(!doc.trailer.has(b"Info"));
        let page_id = *doc.get_pages().values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        assert_eq!(page.get(b"Rotate").unwrap().as_i64().unwrap(), 90);
    }

    #[tokio::test]
    async fn test_batch_continue_records_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = touch(dir.path(), "letter.docx");
        let wrong_kind = touch(dir.path(), "slides.pptx");
        let missing = dir.path().join("missing.doc");

        let pipeline = pipeline(BatchPolicy::ContinueOnFailure);
        let converters = ConverterChain::new(vec![Box::new(FakeConverter)]);

        let report = OfficeBatch::new(&pipeline, &converters)
            .kind(DocumentKind::Word)
            .run(&[wrong_kind, good, missing], dir.path(), |_, _| {})
            .await
            .unwrap();

        assert_eq!(report.converted, vec![dir.path().join("letter.pdf")]);
        assert_eq!(report.failed.len(), 2);
        assert!(matches!(report.failed[0].error, PdfMixError::UnsupportedInput { .. }));
        assert!(matches!(report.failed[1].error, PdfMixError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_batch_abort_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bad = touch(dir.path(), "notes.txt");
        let good = touch(dir.path(), "letter.docx");

        let pipeline = pipeline(BatchPolicy::AbortOnFirstFailure);
        let converters = ConverterChain::new(vec![Box::new(FakeConverter)]);

        let err = OfficeBatch::new(&pipeline, &converters)
            .run(&[bad, good], dir.path(), |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PdfMixError::UnsupportedInput { .. }));
        assert!(!dir.path().join("letter.pdf").exists());
    }

    #[tokio::test]
    async fn test_batch_continue_still_stops_on_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let first = touch(dir.path(), "a.docx");
        let second = touch(dir.path(), "b.docx");
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        std::fs::write(out_dir.join("a.pdf"), b"keep me").unwrap();

        let pipeline = OutputPipeline::new(Config {
            overwrite_mode: OverwriteMode::NoClobber,
            batch_policy: BatchPolicy::ContinueOnFailure,
            ..Default::default()
        });
        let converters = ConverterChain::new(vec![Box::new(FakeConverter)]);

        let err = OfficeBatch::new(&pipeline, &converters)
            .run(&[first, second], &out_dir, |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PdfMixError::OutputExists { .. }));
        assert!(!err.is_recoverable());
        assert_eq!(std::fs::read(out_dir.join("a.pdf")).unwrap(), b"keep me");
        assert!(!out_dir.join("b.pdf").exists());
    }

    fn page_rotation(path: &Path) -> i64 {
        let doc = Document::load(path).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        doc.get_dictionary(page_id)
            .ok()
            .and_then(|page| page.get(b"Rotate").ok())
            .and_then(|rotate| rotate.as_i64().ok())
            .unwrap_or(0)
    }

    #[rstest]
    #[case(LandscapeMode::Spreadsheets, 90, 0)]
    #[case(LandscapeMode::Always, 90, 90)]
    #[case(LandscapeMode::Never, 0, 0)]
    #[tokio::test]
    async fn test_batch_landscape_decided_per_input(
        #[case] mode: LandscapeMode,
        #[case] sheet_rotation: i64,
        #[case] letter_rotation: i64,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let sheet = touch(dir.path(), "budget.xlsx");
        let letter = touch(dir.path(), "letter.docx");
        let out_dir = dir.path().join("out");

        let pipeline = pipeline(BatchPolicy::AbortOnFirstFailure);
        let converters = ConverterChain::new(vec![Box::new(FakeConverter)]);

        let report = OfficeBatch::new(&pipeline, &converters)
            .landscape(mode)
            .run(&[sheet, letter], &out_dir, |_, _| {})
            .await
            .unwrap();

        assert_eq!(report.converted.len(), 2);
        assert_eq!(page_rotation(&out_dir.join("budget.pdf")), sheet_rotation);
        assert_eq!(page_rotation(&out_dir.join("letter.pdf")), letter_rotation);
    }

    #[test]
    fn test_landscape_mode_defaults_to_spreadsheets() {
        let mode = LandscapeMode::default();
        assert!(mode.applies_to(DocumentKind::Excel));
        assert!(!mode.applies_to(DocumentKind::Word));
        assert!(!mode.applies_to(DocumentKind::Presentation));
    }

    #[tokio::test]
    async fn test_images_to_pdf_writes_one_page_per_image() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3])).save(&first).unwrap();
        image::RgbImage::from_pixel(8, 4, image::Rgb([4, 5, 6])).save(&second).unwrap();
        let output = dir.path().join("album.pdf");

        let summary = images_to_pdf(
            &pipeline(BatchPolicy::AbortOnFirstFailure),
            &[second, first],
            ImageLayout::default(),
            &output,
        )
        .await
        .unwrap();

        assert_eq!(summary.pages_written, 2);
        assert!(summary.unsanitized.is_empty());
        assert_eq!(Document::load(&output).unwrap().get_pages().len(), 2);
    }
}
