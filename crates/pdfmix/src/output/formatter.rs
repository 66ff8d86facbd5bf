//! Message formatting and display.
//!
//! Informational output goes to stdout and is silenced by quiet mode.
//! Warnings and errors go to stderr and are always shown.
//!
//! # Examples
//!
//! ```
//! use pdfmix::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Processing files...");
//! formatter.success("Operation completed");
//! formatter.error("Something went wrong");
//! ```

use std::io::{self, IsTerminal};

use crate::config::Config;
use crate::convert::BatchReport;
use crate::inspect::DocumentReport;
use crate::ops::OperationSummary;
use crate::utils::format_file_size;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("\x1b[32m"),
            Self::Warning => Some("\x1b[33m"),
            Self::Error => Some("\x1b[31m"),
            Self::Debug => Some("\x1b[36m"),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Create a quiet formatter (only warnings and errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.emit(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.emit(MessageLevel::Success, message);
        }
    }

    /// Print a warning message.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Print a message only shown in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.emit(MessageLevel::Debug, message);
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a `label: value` line. Suppressed in quiet mode.
    pub fn detail(&self, label: &str, value: &str) {
        if !self.quiet {
            println!("  {label}: {value}");
        }
    }

    /// Report what an operation produced.
    pub fn operation_summary(&self, action: &str, summary: &OperationSummary) {
        for path in &summary.unsanitized {
            self.warning(&format!(
                "Metadata could not be removed from {}; the file was kept as written",
                path.display()
            ));
        }

        match summary.outputs.as_slice() {
            [single] => self.success(&format!(
                "{action}: {} page(s) written to {}",
                summary.pages_written,
                single.display()
            )),
            outputs => {
                self.success(&format!(
                    "{action}: {} page(s) written to {} files",
                    summary.pages_written,
                    outputs.len()
                ));
                for output in outputs {
                    self.debug(&output.display().to_string());
                }
            }
        }
    }

    /// Report the outcome of a conversion batch.
    pub fn batch_report(&self, report: &BatchReport) {
        for failure in &report.failed {
            self.error(&format!("{}: {}", failure.input.display(), failure.error));
        }
        for path in &report.unsanitized {
            self.warning(&format!(
                "Metadata could not be removed from {}; the file was kept as written",
                path.display()
            ));
        }

        let message = format!(
            "Converted {} of {} file(s)",
            report.converted.len(),
            report.converted.len() + report.failed.len()
        );
        if report.failed.is_empty() {
            self.success(&message);
        } else {
            self.warning(&message);
        }
    }

    /// Print an inspection report in human-readable form.
    pub fn document_report(&self, report: &DocumentReport) {
        self.section(&report.path.display().to_string());
        self.detail("Version", &report.version);
        self.detail("Pages", &report.page_count.to_string());
        self.detail("Size", &format_file_size(report.file_size));
        self.detail("Info dictionary", yes_no(report.has_info));
        self.detail("XMP metadata", yes_no(report.has_xmp));

        if self.verbose {
            for page in &report.pages {
                println!(
                    "    {:>4}  {:>7.1} x {:<7.1} pt  rotate {}",
                    page.number, page.width, page.height, page.rotation
                );
            }
        }
    }

    /// Print a blank line. Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Check if non-error output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        let line = render(level, message, self.colored);
        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

/// Format one message line.
fn render(level: MessageLevel, message: &str, colored: bool) -> String {
    let prefix = level.prefix();
    match level.color() {
        Some(color) if colored => format!("{color}{prefix}{message}\x1b[0m"),
        _ => format!("{prefix}{message}"),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
