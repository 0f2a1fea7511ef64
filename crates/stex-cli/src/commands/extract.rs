//! Extract command - run the full pipeline on a single statement file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use stex_core::export::CSV_FILE_NAME;
use stex_core::intake::media_type_for_extension;
use stex_core::{
    IntakeError, Session, StexConfig, StexError, Transaction, UploadedFile, export, render_text,
};
use stex_extract::{DocumentExtractor, GeminiExtractor, MockExtractor};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input statement file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout; CSV defaults to statement_export.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Model identifier on the hosted service
    #[arg(long)]
    model: Option<String>,

    /// API credential (default: GEMINI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Skip the hosted service and return no rows (dry run of the pipeline)
    #[arg(long)]
    offline: bool,

    /// Print advisory well-formedness warnings for extracted rows
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text table
    Table,
    /// Pretty-printed JSON array
    Json,
    /// Tab-separated text for spreadsheet pasting
    Tsv,
    /// RFC4180 CSV
    Csv,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        StexConfig::from_file(std::path::Path::new(path))?
    } else {
        StexConfig::default()
    };

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    // Intake: validate media type and size before anything else. A
    // rejection here leaves no session trace at all.
    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let media_type = media_type_for_extension(extension).ok_or_else(|| {
        StexError::from(IntakeError::UnknownExtension(args.input.display().to_string()))
    })?;

    let name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement")
        .to_string();

    let bytes = tokio::fs::read(&args.input).await?;
    let file = UploadedFile::new(name, media_type, bytes)?;

    println!("{} {}", style("ℹ").blue(), file.descriptor());

    let mut session = Session::new();
    session.select_file(file)?;

    // Create progress spinner for the single in-flight request
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting transactions...");

    session.begin_processing()?;

    let document = session
        .file()
        .ok_or_else(|| anyhow::anyhow!("no file selected"))?
        .encode();

    let result = if args.offline {
        MockExtractor::default().extract(&document).await
    } else {
        let api_key = resolve_api_key(&args, &config)?;
        let model = args
            .model
            .clone()
            .unwrap_or_else(|| config.extraction.model.clone());

        let extractor = GeminiExtractor::new(api_key)?
            .with_endpoint(config.extraction.endpoint.clone())
            .with_model(model)
            .with_timeout(Duration::from_secs(config.extraction.timeout_secs))?;

        extractor.extract(&document).await
    };

    let transactions = match result {
        Ok(rows) => {
            session.complete(rows)?;
            session.transactions().to_vec()
        }
        Err(e) => {
            let message = e.display_message();
            session.fail(message.clone())?;
            pb.finish_and_clear();
            anyhow::bail!(message);
        }
    };

    pb.finish_and_clear();

    println!(
        "{} Spreadsheet View ({} rows)",
        style("✓").green(),
        transactions.len()
    );

    // Print advisory warnings if requested
    if args.validate {
        for (i, tx) in transactions.iter().enumerate() {
            for issue in tx.validate() {
                eprintln!(
                    "{} row {}: {}",
                    style("warning:").yellow(),
                    i + 1,
                    issue
                );
            }
        }
    }

    // Format output
    let output = format_rows(&transactions, args.format, config.table.min_rows)?;

    // Write output. CSV with no explicit target mirrors the original's
    // fixed download name.
    let output_path = match (&args.output, args.format) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputFormat::Csv) => Some(PathBuf::from(CSV_FILE_NAME)),
        (None, _) => None,
    };

    if let Some(path) = output_path {
        fs::write(&path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Format decoded rows in one of the export/display formats.
pub(crate) fn format_rows(
    transactions: &[Transaction],
    format: OutputFormat,
    min_rows: usize,
) -> stex_core::Result<String> {
    let text = match format {
        OutputFormat::Table => render_text(transactions, min_rows),
        OutputFormat::Json => export::to_json(transactions)?,
        OutputFormat::Tsv => export::to_tsv(transactions),
        OutputFormat::Csv => export::to_csv(transactions)?,
    };
    Ok(text)
}

fn resolve_api_key(args: &ExtractArgs, config: &StexConfig) -> anyhow::Result<String> {
    if let Some(key) = &args.api_key {
        return Ok(key.clone());
    }
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }
    if let Some(key) = &config.extraction.api_key {
        return Ok(key.clone());
    }
    anyhow::bail!(
        "No API credential found. Pass --api-key, set GEMINI_API_KEY, \
         or set extraction.api_key in the config file."
    )
}
