//! File I/O for pdfmix.
//!
//! This module handles loading source PDFs and writing assembled output:
//! - Loading PDF documents on the blocking pool
//! - Atomic writes through temporary siblings
//!
//! # Examples
//!
//! ```no_run
//! use pdfmix::io::{PdfReader, PdfWriter};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let source = reader.load(&PathBuf::from("input.pdf")).await?;
//!
//! let writer = PdfWriter::new();
//! writer.save(source.document().clone(), &PathBuf::from("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{PdfReader, SourceDocument};
pub use writer::{PdfWriter, WriteStatistics};
