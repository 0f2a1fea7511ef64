//! Export serialization of the decoded transaction sequence.
//!
//! All exports are pure transformations of the in-memory rows: no network,
//! no re-fetching, no state mutation. Presentation padding never appears
//! here; only real rows are serialized.

use csv::{QuoteStyle, WriterBuilder};
use rust_decimal::Decimal;

use crate::error::ExportError;
use crate::models::transaction::Transaction;

/// Default file name for the CSV export.
pub const CSV_FILE_NAME: &str = "statement_export.csv";

/// Header shared by the TSV and CSV exports, in fixed column order.
pub const EXPORT_HEADERS: [&str; 6] = ["Date", "Type", "Details", "Paid Out", "In", "Balance"];

/// Pretty-printed JSON array matching the wire shape of the rows.
pub fn to_json(transactions: &[Transaction]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(transactions)?)
}

fn amount_cell(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Replace characters that would break spreadsheet column alignment.
fn sanitize_for_tsv(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

/// Tab-separated export intended for pasting into a spreadsheet.
///
/// Optional fields render as empty strings, never the literal word "null".
/// Embedded tabs and newlines in free text are replaced with single spaces
/// so every value stays in its column.
pub fn to_tsv(transactions: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(transactions.len() + 1);
    lines.push(EXPORT_HEADERS.join("\t"));

    for tx in transactions {
        lines.push(
            [
                sanitize_for_tsv(&tx.date),
                tx.payment_type
                    .as_deref()
                    .map(sanitize_for_tsv)
                    .unwrap_or_default(),
                sanitize_for_tsv(&tx.details),
                amount_cell(tx.paid_out),
                amount_cell(tx.paid_in),
                amount_cell(tx.balance),
            ]
            .join("\t"),
        );
    }

    lines.join("\n")
}

/// RFC4180-style CSV export: comma-separated, every field double-quote
/// wrapped, literal quotes escaped by doubling, no trailing newline.
pub fn to_csv(transactions: &[Transaction]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;

    for tx in transactions {
        writer.write_record([
            tx.date.as_str(),
            tx.payment_type.as_deref().unwrap_or(""),
            tx.details.as_str(),
            &amount_cell(tx.paid_out),
            &amount_cell(tx.paid_in),
            &amount_cell(tx.balance),
        ])?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    let mut text = String::from_utf8(buffer)?;

    while text.ends_with('\n') || text.ends_with('\r') {
        text.pop();
    }

    Ok(text)
}
