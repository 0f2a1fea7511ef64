//! The extraction contract: the instruction block sent to the hosted model,
//! the structured-output schema constraining its response, and the decoding
//! of that response into typed transaction rows.
//!
//! The contract carries the semantics the whole system depends on: the
//! multi-line merge rule, the payment-code column separation, the null
//! policy for empty cells, and the debit/credit column alignment. Those
//! rules are executed by the hosted model, not locally; this module only
//! states them and validates the shape of what comes back.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::ContractError;
use crate::models::transaction::Transaction;

/// Natural-language extraction policy sent alongside the document.
pub const EXTRACTION_PROMPT: &str = r#"You are a high-precision financial data extractor. Your job is to digitize bank statements with 100% accuracy.

Analyze the document image/PDF and extract the transaction table.

### CRITICAL INSTRUCTIONS:

1. **Multi-line Description Handling (MOST IMPORTANT)**:
   - Bank statements often split long descriptions across multiple lines.
   - If a line of text appears under a transaction but has **NO Date** and **NO Amount**, it is a continuation of the previous row.
   - **MERGE** this text into the 'details' field of the previous transaction.
   - **DO NOT** create a new transaction entry for these continuation lines.

2. **Column Separation**:
   - **Date**: Extract exactly as visible (e.g., 11MAY18).
   - **Payment Type**: Identify the short code (e.g., CR, BP, DD, SO, VIS, TFR, CHQ) that often appears between the Date and the Description. Extract this code separately. If no code exists, return null.
   - **Details**: The main description of the transaction. *Exclude* the Payment Type code from this field.
   - **Paid Out**: The withdrawal/debit amount. If empty, return null.
   - **In**: The deposit/credit amount. If empty, return null.
   - **Balance**: The running balance amount. If empty, return null.

3. **Data Integrity**:
   - Do not hallucinate values. If a cell is visually empty, the JSON value must be null.
   - Ensure precise alignment of 'Paid Out' vs 'In' columns.

### EXAMPLE BEHAVIOR:

**Input Visual:**
15MAY18 CR A Tuakanangaro           1750.00
           4 RAILWAY COTTAGES

**Correct Output Object:**
{
  "date": "15MAY18",
  "paymentType": "CR",
  "details": "A Tuakanangaro 4 RAILWAY COTTAGES",
  "paidOut": null,
  "paidIn": 1750.00,
  "balance": null
}
"#;

/// The response-shape constraint passed to the extraction service.
///
/// Mirrors [`Transaction`]: an array of objects with `date` and `details`
/// required and the remaining four fields nullable.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "date": { "type": "STRING" },
                "paymentType": {
                    "type": "STRING",
                    "description": "Short payment code (CR, BP, DD, etc.) found before details",
                    "nullable": true
                },
                "details": {
                    "type": "STRING",
                    "description": "Full transaction description, including merged lines"
                },
                "paidOut": {
                    "type": "NUMBER",
                    "description": "Amount paid out",
                    "nullable": true
                },
                "paidIn": {
                    "type": "NUMBER",
                    "description": "Amount paid in (In)",
                    "nullable": true
                },
                "balance": {
                    "type": "NUMBER",
                    "description": "Balance",
                    "nullable": true
                }
            },
            "required": ["date", "details"]
        }
    })
}

/// Decode response text into typed transaction rows.
///
/// An empty or whitespace-only body decodes to an empty sequence: "no
/// transactions found" is a legitimate outcome distinct from a hard
/// failure. Anything non-empty must parse as an array of rows matching the
/// contract, or the whole attempt fails with a single decode error.
pub fn decode_transactions(text: &str) -> Result<Vec<Transaction>, ContractError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        debug!("empty response body, decoding as zero transactions");
        return Ok(Vec::new());
    }

    let rows: Vec<Transaction> = serde_json::from_str(trimmed)?;
    debug!("decoded {} transaction rows", rows.len());
    Ok(rows)
}
