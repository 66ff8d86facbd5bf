//! pdfmix - Merge, interleave, split and sanitize PDF documents.
//!
//! This library rebuilds PDF files page by page. It supports:
//!
//! - Merging and interleaving documents
//! - Extracting, deleting, rotating and reversing pages
//! - Splitting into fixed-size parts
//! - Stripping document metadata from every output
//! - Converting office documents and images into PDF
//!
//! # Examples
//!
//! ## Page operations
//!
//! ```no_run
//! use pdfmix::config::{Config, OverwriteMode};
//! use pdfmix::ops::Operations;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     overwrite_mode: OverwriteMode::Force,
//!     ..Config::default()
//! };
//!
//! let summary = Operations::new(config)
//!     .extract(Path::new("report.pdf"), "1-3,10", Path::new("excerpt.pdf"))
//!     .await?;
//! println!("Wrote {} pages", summary.pages_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using individual components
//!
//! ```no_run
//! use pdfmix::assemble::{MetadataSanitizer, SourceSpec, DocumentAssembler};
//! use pdfmix::io::{PdfReader, PdfWriter};
//! use pdfmix::range::parse_page_ranges;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = PdfReader::new().load(Path::new("input.pdf")).await?;
//! let pages = parse_page_ranges("5-1", source.page_count());
//!
//! let assembled = DocumentAssembler::new().assemble(&[SourceSpec::new(&source, pages)])?;
//! PdfWriter::new().save(assembled.into_document(), Path::new("reversed.pdf")).await?;
//!
//! let clean = MetadataSanitizer::new().sanitize(&source)?;
//! PdfWriter::new().save(clean, Path::new("clean.pdf")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod config;
pub mod convert;
pub mod error;
pub mod inspect;
pub mod io;
pub mod ops;
pub mod output;
pub mod range;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfMixError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
