#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for turning vida laboral documents into episode tables.
//!
//! `parse` runs the whole pipeline on a PDF (or on a raw-row CSV previously
//! dumped with `rows`) and writes one record per worker and status event.
//! `rows` stops after table extraction, which is useful for inspecting what
//! the parser is fed.

mod input;
mod output;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use vida_laboral_parser::{ParserConfig, parse_rows};
use vida_laboral_pdf::{ExtractionStrategy, PdfError};

use crate::output::OutputFormat;

/// Errors from reading rows or writing results.
#[derive(Debug, thiserror::Error)]
pub enum RowsError {
    /// A CSV could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF extraction failed.
    #[error(transparent)]
    Pdf(#[from] PdfError),
}

#[derive(Parser)]
#[command(name = "vida_laboral", about = "Vida laboral episode extraction tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract employment episodes from a PDF or a raw-row CSV
    Parse {
        /// Input file (`.pdf`, or a CSV written by `rows`)
        input: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// TOML file overriding the reconstruction windows and sentinels
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the run report as JSON to stderr
        #[arg(long)]
        report: bool,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Dump the raw table rows extracted from a PDF as CSV
    Rows {
        /// Input PDF
        input: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// How PDF text is split into cells. Without flags, cells are separated by
/// runs of two or more spaces.
#[derive(Args)]
struct LayoutArgs {
    /// Comma-separated character positions where each column starts
    #[arg(long, requires = "column_names", conflicts_with = "delimiter")]
    column_starts: Option<String>,
    /// Comma-separated column labels, one per column start
    #[arg(long, requires = "column_starts")]
    column_names: Option<String>,
    /// Cell delimiter (e.g. "|")
    #[arg(long)]
    delimiter: Option<String>,
}

impl LayoutArgs {
    fn strategy(&self) -> Result<ExtractionStrategy, Box<dyn std::error::Error>> {
        if let Some(delimiter) = &self.delimiter {
            return Ok(ExtractionStrategy::Delimited {
                delimiter: delimiter.clone(),
            });
        }

        let (Some(starts), Some(names)) = (&self.column_starts, &self.column_names) else {
            return Ok(ExtractionStrategy::Gaps);
        };

        let column_starts = starts
            .split(',')
            .map(|s| s.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid --column-starts '{starts}': {e}"))?;
        let column_names: Vec<String> = names.split(',').map(|s| s.trim().to_owned()).collect();

        if column_starts.len() != column_names.len() {
            return Err(format!(
                "--column-starts has {} position(s) but --column-names has {} label(s)",
                column_starts.len(),
                column_names.len()
            )
            .into());
        }

        Ok(ExtractionStrategy::FixedColumns {
            column_starts,
            column_names,
        })
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, RowsError> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            format,
            output,
            config,
            report,
            layout,
        } => {
            let config = match config {
                Some(path) => ParserConfig::load(&path)?,
                None => ParserConfig::default(),
            };
            let rows = input::read_rows(&input, &layout.strategy()?)?;
            let outcome = parse_rows(&rows, &config);

            output::write_episodes(open_output(output.as_deref())?, &outcome.episodes, format)?;

            if report {
                eprintln!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                outcome.report.log();
            }
        }
        Commands::Rows {
            input,
            output,
            layout,
        } => {
            let rows = vida_laboral_pdf::extract_rows(&input, &layout.strategy()?)?;
            output::write_rows(open_output(output.as_deref())?, &rows)?;
        }
    }

    Ok(())
}
