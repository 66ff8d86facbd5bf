//! Error types for pdfmix.
//!
//! Every fallible operation in the crate returns [`PdfMixError`]. Variants
//! carry the path or argument that caused the failure so messages can be
//! shown to the user without further context.
//!
//! # Error Categories
//!
//! - **Input errors**: missing files, unreadable or corrupted PDFs
//! - **Selection errors**: an empty page selection, bad arguments
//! - **Conversion errors**: office or image conversion failures
//! - **Write errors**: output cannot be created or written
//! - **Sanitize errors**: metadata stripping failed (never fatal to a pipeline)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pdfmix operations.
pub type Result<T> = std::result::Result<T, PdfMixError>;

/// Main error type for pdfmix operations.
#[derive(Debug, Error)]
pub enum PdfMixError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Failed to load PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or has invalid structure.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// No input files were provided.
    #[error("No input files specified")]
    NoInputs,

    /// A page selection resolved to no pages.
    #[error("No pages selected for {operation}")]
    EmptySelection {
        /// Operation that required a non-empty selection.
        operation: String,
    },

    /// An argument was outside its accepted domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// Rotation is not a multiple of 90 degrees.
    #[error("Invalid rotation: {degrees}. Must be a multiple of 90")]
    InvalidRotation {
        /// Requested rotation in degrees.
        degrees: i64,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Page tree could not be assembled.
    #[error("Assembly failed: {reason}")]
    AssemblyFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Metadata stripping failed.
    #[error("Failed to sanitize {}: {reason}", path.display())]
    SanitizeFailed {
        /// File being sanitized.
        path: PathBuf,
        /// Details about the failure.
        reason: String,
    },

    /// Every available converter failed for an input.
    #[error("Conversion failed: {}\n{details}", path.display())]
    ConversionFailed {
        /// Input document.
        path: PathBuf,
        /// Causes reported by each converter, in the order they were tried.
        details: String,
    },

    /// No converter is installed for this kind of document.
    #[error("No converter available: {reason}")]
    NoConverterAvailable {
        /// What was probed for.
        reason: String,
    },

    /// Input type is not handled by the requested operation.
    #[error("Unsupported input: {}", path.display())]
    UnsupportedInput {
        /// Offending path.
        path: PathBuf,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfMixError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for PdfMixError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::other(format!("Background task failed: {err}"))
    }
}

impl From<image::ImageError> for PdfMixError {
    fn from(err: image::ImageError) -> Self {
        Self::other(format!("Image error: {err}"))
    }
}

impl PdfMixError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an EmptySelection error.
    pub fn empty_selection(operation: impl Into<String>) -> Self {
        Self::EmptySelection {
            operation: operation.into(),
        }
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an AssemblyFailed error.
    pub fn assembly_failed(reason: impl Into<String>) -> Self {
        Self::AssemblyFailed {
            reason: reason.into(),
        }
    }

    /// Create a SanitizeFailed error.
    pub fn sanitize_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::SanitizeFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create a ConversionFailed error.
    pub fn conversion_failed(path: PathBuf, details: impl Into<String>) -> Self {
        Self::ConversionFailed {
            path,
            details: details.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if a batch may skip the failing item and carry on.
    ///
    /// Only per-item input and conversion failures qualify; write failures
    /// and cancellation always stop the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::NotAFile { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
                | Self::EncryptedPdf { .. }
                | Self::EmptySelection { .. }
                | Self::ConversionFailed { .. }
                | Self::UnsupportedInput { .. }
                | Self::SanitizeFailed { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::NotAFile { .. } => 2,
            Self::FailedToLoadPdf { .. }
            | Self::CorruptedPdf { .. }
            | Self::EncryptedPdf { .. } => 3,
            Self::NoInputs
            | Self::EmptySelection { .. }
            | Self::InvalidArgument { .. }
            | Self::InvalidRotation { .. }
            | Self::InvalidConfig { .. }
            | Self::UnsupportedInput { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } | Self::FailedToWrite { .. } | Self::Io { .. } => 5,
            Self::AssemblyFailed { .. } | Self::SanitizeFailed { .. } => 6,
            Self::ConversionFailed { .. } | Self::NoConverterAvailable { .. } => 7,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Other { .. } => 1,
        }
    }
}
