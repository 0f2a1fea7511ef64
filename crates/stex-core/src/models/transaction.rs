//! The transaction row model shared by the wire contract and all exports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One extracted ledger line.
///
/// Field names on the wire are camelCase to match the structured-output
/// schema sent to the extraction service. `date` is preserved verbatim as
/// shown on the source document; no normalization to ISO form is attempted
/// because the format varies by bank and locale.
///
/// The three money fields are independently optional. A visually empty cell
/// decodes to `None`, never to zero; the extracting service is instructed
/// accordingly and this model enforces no cross-field invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Date exactly as printed on the statement (e.g. "15MAY18").
    pub date: String,

    /// Short payment code (CR, BP, DD, SO, VIS, TFR, CHQ, ...) when one
    /// appears between the date and the description.
    #[serde(default)]
    pub payment_type: Option<String>,

    /// Free-text description, with continuation lines already merged in
    /// by the extraction step.
    pub details: String,

    /// Withdrawal/debit amount.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub paid_out: Option<Decimal>,

    /// Deposit/credit amount.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub paid_in: Option<Decimal>,

    /// Running balance when shown for this row.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
}

impl Transaction {
    /// Advisory well-formedness check. Returns issues rather than failing:
    /// the extracting service is trusted, so nothing here is enforced.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.date.trim().is_empty() {
            issues.push("empty date".to_string());
        }

        if self.details.trim().is_empty() {
            issues.push("empty details".to_string());
        }

        if let Some(out) = self.paid_out {
            if out.is_sign_negative() {
                issues.push(format!("negative paid-out amount: {}", out));
            }
        }

        if let Some(in_) = self.paid_in {
            if in_.is_sign_negative() {
                issues.push(format!("negative paid-in amount: {}", in_));
            }
        }

        issues
    }
}
