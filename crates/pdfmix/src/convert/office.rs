//! Office document to PDF conversion.
//!
//! Conversion is delegated to an external program. [`ConverterChain`] holds
//! the converters found on this machine in priority order and tries them in
//! turn; when all fail, their messages are combined into one
//! [`PdfMixError::ConversionFailed`].

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{PdfMixError, Result};
use crate::io::writer::parent_dir;
use crate::utils::{file_stem_or_default, has_extension};

/// Environment variable pointing at the `soffice` executable.
pub const SOFFICE_PATH_VAR: &str = "SOFFICE_PATH";

/// Default limit for a single conversion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

const WORD_EXTENSIONS: &[&str] = &["doc", "docx", "docm", "rtf"];
const EXCEL_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "xlt", "xltx", "csv"];
const PRESENTATION_EXTENSIONS: &[&str] = &["ppt", "pptx", "pps", "ppsx", "pot", "potx"];

/// Family of office document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Word processing documents.
    Word,
    /// Spreadsheets.
    Excel,
    /// Slide decks.
    Presentation,
}

impl DocumentKind {
    /// Detect the kind from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        [Self::Word, Self::Excel, Self::Presentation]
            .into_iter()
            .find(|kind| has_extension(path, kind.extensions()))
    }

    /// File extensions of this kind, without the dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Word => WORD_EXTENSIONS,
            Self::Excel => EXCEL_EXTENSIONS,
            Self::Presentation => PRESENTATION_EXTENSIONS,
        }
    }

    /// Lowercase name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Excel => "excel",
            Self::Presentation => "presentation",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can turn an office document into a PDF file.
pub trait DocumentConverter: Send + Sync + fmt::Debug {
    /// Short name shown in combined error messages.
    fn name(&self) -> &str;

    /// Convert `input` into a PDF written at `output`.
    fn convert<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
        kind: DocumentKind,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Converter driving a headless LibreOffice.
#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    program: PathBuf,
    timeout: Duration,
}

impl LibreOfficeConverter {
    /// Use the given `soffice` executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Find `soffice` on this machine.
    ///
    /// Looks at `SOFFICE_PATH`, then `PATH`, then the usual install locations.
    pub fn locate() -> Option<Self> {
        find_soffice().map(Self::new)
    }

    /// Change the per-document time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executable being run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn run(&self, input: &Path, output: &Path) -> Result<()> {
        let failed = |details: String| PdfMixError::conversion_failed(input.to_path_buf(), details);

        // Scratch directory next to the output so the final move is a rename.
        let scratch = tempfile::Builder::new()
            .prefix(".pdfmix-convert.")
            .tempdir_in(parent_dir(output))
            .map_err(|e| PdfMixError::FailedToCreateOutput {
                path: output.to_path_buf(),
                source: e,
            })?;

        let mut command = Command::new(&self.program);
        command
            .args(["--headless", "--nologo", "--nofirststartwizard"])
            .args(["--convert-to", "pdf"])
            .arg("--outdir")
            .arg(scratch.path())
            .arg(input)
            .kill_on_drop(true);

        debug!(program = %self.program.display(), input = %input.display(), "running soffice");
        let result = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| failed(format!("timed out after {} s", self.timeout.as_secs())))?
            .map_err(|e| failed(format!("could not start {}: {e}", self.program.display())))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(failed(format!(
                "soffice exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        let produced = scratch
            .path()
            .join(format!("{}.pdf", file_stem_or_default(input)));
        if !tokio::fs::try_exists(&produced).await.unwrap_or(false) {
            return Err(failed("soffice did not produce a PDF".to_string()));
        }

        tokio::fs::rename(&produced, output)
            .await
            .map_err(|e| PdfMixError::FailedToWrite {
                path: output.to_path_buf(),
                source: e,
            })
    }
}

impl DocumentConverter for LibreOfficeConverter {
    fn name(&self) -> &str {
        "LibreOffice"
    }

    fn convert<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
        _kind: DocumentKind,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.run(input, output))
    }
}

fn find_soffice() -> Option<PathBuf> {
    if let Some(configured) = env::var_os(SOFFICE_PATH_VAR)
        && !configured.is_empty()
    {
        let configured = PathBuf::from(configured);
        if configured.is_file() {
            return Some(configured);
        }
        warn!(path = %configured.display(), "{SOFFICE_PATH_VAR} does not point to a file");
    }

    if let Some(found) = search_path(["soffice", "soffice.exe"]) {
        return Some(found);
    }

    install_locations()
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

fn search_path<'a>(names: impl IntoIterator<Item = &'a str> + Clone) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;

    env::split_paths(&path).find_map(|dir| {
        names
            .clone()
            .into_iter()
            .map(|name| dir.join(OsStr::new(name)))
            .find(|candidate| candidate.is_file())
    })
}

fn install_locations() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\LibreOffice\program\soffice.exe",
            r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &["/Applications/LibreOffice.app/Contents/MacOS/soffice"]
    } else {
        &["/usr/bin/soffice", "/snap/bin/libreoffice", "/usr/bin/libreoffice"]
    }
}

/// Converters in priority order, tried until one succeeds.
#[derive(Debug, Default)]
pub struct ConverterChain {
    converters: Vec<Box<dyn DocumentConverter>>,
}

impl ConverterChain {
    /// Chain of the given converters, highest priority first.
    pub fn new(converters: Vec<Box<dyn DocumentConverter>>) -> Self {
        Self { converters }
    }

    /// Build the chain from what is installed.
    pub fn probe() -> Self {
        let mut converters: Vec<Box<dyn DocumentConverter>> = Vec::new();
        if let Some(libreoffice) = LibreOfficeConverter::locate() {
            debug!(program = %libreoffice.program().display(), "found LibreOffice");
            converters.push(Box::new(libreoffice));
        }
        Self { converters }
    }

    /// Whether no converter is available.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Names of the converters, in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    /// Convert with the first converter that succeeds.
    ///
    /// # Errors
    ///
    /// [`PdfMixError::NoConverterAvailable`] when the chain is empty, and
    /// [`PdfMixError::ConversionFailed`] listing every converter's error
    /// when all of them fail.
    pub async fn convert(&self, input: &Path, output: &Path, kind: DocumentKind) -> Result<()> {
        if self.converters.is_empty() {
            return Err(PdfMixError::NoConverterAvailable {
                reason: format!(
                    "LibreOffice (soffice) was not found; install it or set {SOFFICE_PATH_VAR}"
                ),
            });
        }

        let mut errors = Vec::new();
        for converter in &self.converters {
            match converter.convert(input, output, kind).await {
                Ok(()) => {
                    debug!(converter = converter.name(), input = %input.display(), %kind, "converted");
                    return Ok(());
                }
                Err(e) => {
                    debug!(converter = converter.name(), error = %e, "converter failed");
                    errors.push(format!("{} error: {e}", converter.name()));
                }
            }
        }

        Err(PdfMixError::conversion_failed(
            input.to_path_buf(),
            errors.join("\n\n"),
        ))
    }
}
