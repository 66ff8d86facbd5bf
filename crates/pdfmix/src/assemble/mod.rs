//! Page selection and document assembly.
//!
//! This module is the core of pdfmix:
//! - [`assembler`] builds fresh documents out of selected source pages
//! - [`interleave`] decides the page order when weaving two documents
//! - [`sanitizer`] rebuilds documents without metadata
//! - [`pages`] resolves inherited page attributes
//!
//! # Examples
//!
//! ```no_run
//! use pdfmix::assemble::{DocumentAssembler, SourceSpec};
//! use pdfmix::io::PdfReader;
//! use pdfmix::range::PageRange;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = PdfReader::new().load(Path::new("report.pdf")).await?;
//! let range = PageRange::parse("1-3,7", source.page_count());
//!
//! let assembled = DocumentAssembler::new()
//!     .assemble(&[SourceSpec::new(&source, range.into_indices())])?;
//! println!("{} pages", assembled.page_count());
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod interleave;
pub mod pages;
pub mod sanitizer;

pub use assembler::{
    AssembledDocument, DocumentAssembler, PROGRESS_BATCH, PageTransform, SourceSpec,
};
pub use interleave::{InterleaveMode, Side, interleave, interleave_documents, interleave_specs};
pub use pages::PageInfo;
pub use sanitizer::MetadataSanitizer;
