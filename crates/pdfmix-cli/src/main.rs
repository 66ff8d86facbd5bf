//! pdfmix - Merge, interleave, split and sanitize PDF documents.
//!
//! Command-line front end for the pdfmix library.

mod cli;

use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, document_kind, image_layout, landscape_mode};
use pdfmix::config::{Config, OverwriteMode};
use pdfmix::convert::{self, ConverterChain, OfficeBatch};
use pdfmix::error::PdfMixError;
use pdfmix::inspect::{DocumentReport, inspect};
use pdfmix::ops::{OperationSummary, Operations, ProgressFn};
use pdfmix::output::{OutputFormatter, ProgressBar, ProgressStyle};
use pdfmix::utils::{collect_paths_for_patterns, collect_pdf_inputs};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "PDFMIX_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pdfmix=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfMixError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);
    debug!(?config, "starting");

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfmix::NAME, pdfmix::VERSION));
        formatter.blank_line();
    }

    match cli.command {
        Command::Merge { inputs, output } => {
            let inputs = collect_pdf_inputs(&inputs)?;
            formatter.debug(&format!("Merging {} file(s)", inputs.len()));
            let ops = operations(&config, &formatter, &output)?;
            let summary = ops.merge(&inputs, &output).await;
            finish("Merged", summary, &formatter)
        }
        Command::Interleave {
            first,
            second,
            mode,
            start,
            output,
        } => {
            let ops = operations(&config, &formatter, &output)?;
            let summary = ops.interleave(&first, &second, mode, start, &output).await;
            finish("Interleaved", summary, &formatter)
        }
        Command::Extract {
            input,
            pages,
            output,
        } => {
            let ops = operations(&config, &formatter, &output)?;
            finish("Extracted", ops.extract(&input, &pages, &output).await, &formatter)
        }
        Command::Delete {
            input,
            pages,
            output,
        } => {
            let ops = operations(&config, &formatter, &output)?;
            finish("Deleted pages", ops.delete(&input, &pages, &output).await, &formatter)
        }
        Command::Rotate {
            input,
            degrees,
            pages,
            output,
        } => {
            let ops = operations(&config, &formatter, &output)?;
            let summary = ops.rotate(&input, &pages, degrees, &output).await;
            finish("Rotated", summary, &formatter)
        }
        Command::Reverse { input, output } => {
            let ops = operations(&config, &formatter, &output)?;
            finish("Reversed", ops.reverse(&input, &output).await, &formatter)
        }
        Command::Split {
            input,
            every,
            out_dir,
        } => {
            tokio::fs::create_dir_all(&out_dir)
                .await
                .map_err(|e| PdfMixError::FailedToCreateOutput {
                    path: out_dir.clone(),
                    source: e,
                })?;
            let ops = with_progress(Operations::new(config.clone()), &formatter);
            let summary = ops.split_every(&input, every, &out_dir).await;
            finish("Split", summary, &formatter)
        }
        Command::Sanitize { input, output } => {
            let ops = operations(&config, &formatter, &output)?;
            finish("Sanitized", ops.sanitize_file(&input, &output).await, &formatter)
        }
        Command::Landscape { input, output } => {
            let ops = operations(&config, &formatter, &output)?;
            finish("Rotated to landscape", ops.landscape_file(&input, &output).await, &formatter)
        }
        Command::Convert {
            inputs,
            out_dir,
            kind,
            landscape,
            no_landscape,
        } => {
            let inputs = collect_paths_for_patterns(&inputs)?;
            let kind = kind.as_deref().and_then(document_kind);

            let converters = ConverterChain::probe();
            formatter.debug(&format!("Converters: {}", converters.names().join(", ")));

            let ops = Operations::new(config.clone());
            let mut batch = OfficeBatch::new(ops.pipeline(), &converters)
                .landscape(landscape_mode(landscape, no_landscape));
            if let Some(kind) = kind {
                batch = batch.kind(kind);
            }

            let report = batch
                .run(&inputs, &out_dir, |done, total| {
                    formatter.debug(&format!("Converted {done}/{total}"));
                })
                .await?;
            formatter.batch_report(&report);
            Ok(())
        }
        Command::Images {
            inputs,
            output,
            page_size,
            no_resize,
            margin,
            stretch,
            top_left,
            dpi,
            no_sort,
        } => {
            let inputs = collect_paths_for_patterns(&inputs)?;
            let layout =
                image_layout(&page_size, no_resize, margin, stretch, top_left, dpi, no_sort)?;
            let ops = operations(&config, &formatter, &output)?;
            let summary = convert::images_to_pdf(ops.pipeline(), &inputs, layout, &output).await;
            finish("Composed", summary, &formatter)
        }
        Command::Info { inputs, json } => {
            let inputs = collect_pdf_inputs(&inputs)?;
            if inputs.is_empty() {
                return Err(PdfMixError::NoInputs);
            }

            let mut reports: Vec<DocumentReport> = Vec::with_capacity(inputs.len());
            for input in &inputs {
                reports.push(inspect(input).await?);
            }

            if json {
                let text = serde_json::to_string_pretty(&reports)
                    .map_err(|e| PdfMixError::other(format!("Failed to encode report: {e}")))?;
                println!("{text}");
            } else {
                for report in &reports {
                    formatter.document_report(report);
                }
            }
            Ok(())
        }
    }
}

/// Operations for a command writing one output file.
///
/// Resolves an interactive overwrite prompt first.
fn operations(
    config: &Config,
    formatter: &OutputFormatter,
    output: &Path,
) -> Result<Operations, PdfMixError> {
    let config = confirm_overwrite(config, formatter, output)?;
    Ok(with_progress(Operations::new(config), formatter))
}

fn with_progress(ops: Operations, formatter: &OutputFormatter) -> Operations {
    if !formatter.should_print() {
        return ops;
    }

    let mut bar = ProgressBar::new(0, ProgressStyle::Bar);
    bar.set_message("Assembling");
    let bar = Mutex::new(bar);

    let progress: ProgressFn = Arc::new(move |done, total| {
        if let Ok(mut bar) = bar.lock() {
            bar.report(done, total);
            if done == total {
                bar.clear();
            }
        }
    });
    ops.with_progress(progress)
}

fn finish(
    action: &str,
    summary: Result<OperationSummary, PdfMixError>,
    formatter: &OutputFormatter,
) -> Result<(), PdfMixError> {
    let summary = summary?;
    formatter.operation_summary(action, &summary);
    Ok(())
}

/// Resolve [`OverwriteMode::Prompt`] for a single output file.
///
/// Returns a configuration that forces the overwrite when the user agrees.
fn confirm_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    output: &Path,
) -> Result<Config, PdfMixError> {
    if config.overwrite_mode != OverwriteMode::Prompt || !output.exists() {
        return Ok(config.clone());
    }

    // In quiet mode, treat as no-clobber
    if formatter.is_quiet() {
        return Err(PdfMixError::output_exists(output.to_path_buf()));
    }

    formatter.warning(&format!("Output file already exists: {}", output.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .map_err(|err| PdfMixError::other(format!("Failed to read input: {err}")))?;

    match response.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(Config {
            overwrite_mode: OverwriteMode::Force,
            ..config.clone()
        }),
        _ => Err(PdfMixError::Cancelled),
    }
}
