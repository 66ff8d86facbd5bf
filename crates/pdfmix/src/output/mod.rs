//! User-facing output for pdfmix.
//!
//! This module handles everything printed for a person rather than a log:
//! - Status, warning and error messages (quiet/verbose aware)
//! - Operation and batch summaries
//! - A progress bar driven by the assembler's page reports
//!
//! Diagnostic events go through `tracing` instead.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmix::output::OutputFormatter;
//! use pdfmix::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};
