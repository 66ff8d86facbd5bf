//! CLI argument parsing for pdfmix.
//!
//! This module defines the command-line interface structure using `clap`.
//! Global flags apply to every subcommand and map onto [`Config`].

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use pdfmix::assemble::InterleaveMode;
use pdfmix::config::{BatchPolicy, CompressionLevel, Config, OverwriteMode};
use pdfmix::convert::{DocumentKind, ImageLayout, LandscapeMode, PageSize};
use pdfmix::error::{PdfMixError, Result};

/// Merge, interleave, split and sanitize PDF documents.
///
/// Every file pdfmix writes is rebuilt page by page and stripped of
/// document metadata (author, producer, XMP) before it is left on disk.
#[derive(Parser, Debug)]
#[command(name = "pdfmix")]
#[command(version)]
#[command(about = "Merge, interleave, split and sanitize PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Verbose output - show per-file details and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Overwrite existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for output PDFs
    ///
    /// - none: write streams as they are
    /// - standard: compress streams (default)
    /// - maximum: also drop unused objects and renumber
    #[arg(short, long, global = true, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Keep converting the remaining files when one fails
    #[arg(long, global = true)]
    pub continue_on_error: bool,

    /// Skip the metadata-stripping pass
    #[arg(long, global = true)]
    pub no_sanitize: bool,
}

/// Available operations.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate PDF files in the given order
    ///
    /// Directories are replaced by the PDF files they contain, sorted by name.
    ///
    /// Examples:
    ///   pdfmix merge a.pdf b.pdf -o ab.pdf
    ///   pdfmix merge 'chapters/*.pdf' -o book.pdf
    Merge {
        /// Input PDF files, directories or glob patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Weave the pages of two PDF files together
    ///
    /// Examples:
    ///   pdfmix interleave fronts.pdf backs.pdf -o scan.pdf
    ///   pdfmix interleave a.pdf b.pdf --mode a_odd_b_even -o out.pdf
    Interleave {
        /// First document (A)
        #[arg(value_name = "A")]
        first: PathBuf,

        /// Second document (B)
        #[arg(value_name = "B")]
        second: PathBuf,

        /// alternate, a_odd_b_even, a_even_b_odd, a_odd or b_even
        #[arg(short, long, default_value = "alternate", value_parser = parse_interleave_mode)]
        mode: InterleaveMode,

        /// First page number (1-based) to take from either document
        #[arg(long, value_name = "PAGE", default_value_t = 1)]
        start: usize,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Keep only the selected pages, in the order given
    ///
    /// Examples:
    ///   pdfmix extract report.pdf -p "1-3,10" -o excerpt.pdf
    ///   pdfmix extract report.pdf -p "10-1" -o backwards.pdf
    Extract {
        /// Input PDF file
        input: PathBuf,

        /// Pages to keep, 1-based (e.g. "1-3,7,12-10")
        #[arg(short, long, value_name = "RANGE")]
        pages: String,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Remove the selected pages
    Delete {
        /// Input PDF file
        input: PathBuf,

        /// Pages to remove, 1-based
        #[arg(short, long, value_name = "RANGE")]
        pages: String,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Rotate pages clockwise on top of their current rotation
    ///
    /// Examples:
    ///   pdfmix rotate scan.pdf -d 90 -o fixed.pdf
    ///   pdfmix rotate scan.pdf -d -90 -p "2,4" -o fixed.pdf
    Rotate {
        /// Input PDF file
        input: PathBuf,

        /// Degrees, a multiple of 90; negative turns counter-clockwise
        #[arg(short, long, allow_hyphen_values = true)]
        degrees: i64,

        /// Pages to rotate, 1-based; all pages when omitted
        #[arg(short, long, value_name = "RANGE", default_value = "")]
        pages: String,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Reverse the page order
    Reverse {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Cut a PDF into parts of N pages
    ///
    /// Parts are named <stem>_part_<first>-<last>.pdf.
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Pages per part
        #[arg(short = 'n', long, value_name = "N")]
        every: usize,

        /// Directory for the parts
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Rewrite a PDF without document metadata
    Sanitize {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Rotate portrait pages so every page reads as landscape
    Landscape {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Convert Word, Excel or PowerPoint files to PDF with LibreOffice
    ///
    /// Set SOFFICE_PATH if soffice is not on PATH. Spreadsheets are
    /// turned to landscape unless --no-landscape is given.
    Convert {
        /// Office documents or glob patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Directory for the PDFs
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Only accept documents of this kind
        #[arg(long, value_parser = ["word", "excel", "presentation"])]
        kind: Option<String>,

        /// Rotate portrait pages of every result to landscape
        #[arg(long, conflicts_with = "no_landscape")]
        landscape: bool,

        /// Keep every result in its original orientation, spreadsheets too
        #[arg(long)]
        no_landscape: bool,
    },

    /// Put images into a PDF, one page per image
    Images {
        /// Image files or glob patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Paper size: a4, a3, letter or legal
        #[arg(long, value_name = "SIZE", default_value = "a4")]
        page_size: String,

        /// Size each page to its image instead of a paper size
        #[arg(long, conflicts_with = "page_size")]
        no_resize: bool,

        /// Margin in millimetres
        #[arg(long, value_name = "MM", default_value_t = 10.0)]
        margin: f64,

        /// Stretch images to fill the area inside the margins
        #[arg(long)]
        stretch: bool,

        /// Place images at the top-left margin instead of centring them
        #[arg(long)]
        top_left: bool,

        /// Resolution used when pages are sized to their images
        #[arg(long, value_name = "DPI", default_value_t = 300)]
        dpi: u32,

        /// Keep the given order instead of sorting by file name
        #[arg(long)]
        no_sort: bool,
    },

    /// Show page count, page sizes and remaining metadata
    Info {
        /// PDF files, directories or glob patterns
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Convert the global flags into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is unknown or the
    /// resulting configuration is contradictory.
    pub fn to_config(&self) -> Result<Config> {
        let global = &self.global;

        let compression = CompressionLevel::from_str(&global.compression)
            .map_err(|e| PdfMixError::invalid_config(e.to_string()))?;

        let overwrite_mode = if global.force {
            OverwriteMode::Force
        } else if global.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            overwrite_mode,
            verbose: global.verbose,
            quiet: global.quiet,
            compression,
            batch_policy: BatchPolicy::from_continue_flag(global.continue_on_error),
            sanitize: !global.no_sanitize,
        };

        config.validate().map_err(|e| {
            PdfMixError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}

/// Image layout from the `images` subcommand flags.
pub fn image_layout(
    page_size: &str,
    no_resize: bool,
    margin: f64,
    stretch: bool,
    top_left: bool,
    dpi: u32,
    no_sort: bool,
) -> Result<ImageLayout> {
    let page_size = if no_resize {
        None
    } else {
        Some(PageSize::from_str(page_size)?)
    };

    let layout = ImageLayout {
        page_size,
        margin_mm: margin,
        keep_aspect: !stretch,
        center: !top_left,
        dpi,
        sort_by_name: !no_sort,
    };
    layout.validate()?;
    Ok(layout)
}

/// Office document kind from its `--kind` name.
pub fn document_kind(name: &str) -> Option<DocumentKind> {
    match name {
        "word" => Some(DocumentKind::Word),
        "excel" => Some(DocumentKind::Excel),
        "presentation" => Some(DocumentKind::Presentation),
        _ => None,
    }
}

/// Landscape handling from the `--landscape` and `--no-landscape` flags.
pub fn landscape_mode(landscape: bool, no_landscape: bool) -> LandscapeMode {
    match (landscape, no_landscape) {
        (true, _) => LandscapeMode::Always,
        (_, true) => LandscapeMode::Never,
        _ => LandscapeMode::Spreadsheets,
    }
}

fn parse_interleave_mode(value: &str) -> std::result::Result<InterleaveMode, String> {
    value.parse().map_err(|e: PdfMixError| e.to_string())
}
