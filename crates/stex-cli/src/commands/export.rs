//! Export command - re-serialize a saved JSON extraction.
//!
//! Operates purely on the in-memory rows parsed from the input file; no
//! network call is made and nothing is re-fetched.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use stex_core::{StexConfig, decode_transactions};

use super::extract::{OutputFormat, format_rows};

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Saved JSON extraction (array of transaction objects)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

pub async fn run(args: ExportArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.input)?;

    // The saved file carries the same shape as the wire contract, so the
    // contract decoder applies unchanged.
    let transactions = decode_transactions(&text)?;

    let min_rows = StexConfig::default().table.min_rows;
    let output = format_rows(&transactions, args.format, min_rows)?;

    if let Some(path) = &args.output {
        fs::write(path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
