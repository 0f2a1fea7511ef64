//! Result table rendering: fixed column order, currency formatting and
//! presentation padding.
//!
//! Columns are always {#, Date, Type, Details, Paid Out, In, Balance}.
//! The three money columns carry two fixed decimals with thousands
//! grouping; paid-out is shown signed negative, paid-in signed positive,
//! balance unsigned. Padding rows exist purely for the spreadsheet feel
//! and never reach an export.

use rust_decimal::Decimal;

use crate::models::transaction::Transaction;

/// Minimum visual row count; shorter non-empty results are padded with
/// blank placeholder rows.
pub const MIN_VISUAL_ROWS: usize = 15;

/// Placeholder text rendered when the decoded sequence is empty.
pub const EMPTY_PLACEHOLDER: &str = "No transactions found in this document.";

/// One fully formatted display row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based row number, continuing through padding rows.
    pub number: usize,
    pub date: String,
    pub payment_type: String,
    pub details: String,
    pub paid_out: String,
    pub paid_in: String,
    pub balance: String,
    /// Presentation-only filler carrying no data.
    pub padding: bool,
}

/// Format an amount with two fixed decimals and thousands grouping,
/// e.g. `1234.5` -> `1,234.50`.
pub fn format_amount(value: Decimal) -> String {
    let text = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

fn signed(value: Option<Decimal>, sign: &str) -> String {
    match value {
        Some(v) => format!("{sign}{}", format_amount(v)),
        None => String::new(),
    }
}

/// Build display rows in document order, padded with blank rows up to
/// `min_rows` when the sequence is non-empty. An empty sequence yields no
/// rows; callers render [`EMPTY_PLACEHOLDER`] instead.
pub fn build_rows(transactions: &[Transaction], min_rows: usize) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| TableRow {
            number: i + 1,
            date: tx.date.clone(),
            payment_type: tx.payment_type.clone().unwrap_or_default(),
            details: tx.details.clone(),
            paid_out: signed(tx.paid_out, "-"),
            paid_in: signed(tx.paid_in, "+"),
            balance: tx.balance.map(format_amount).unwrap_or_default(),
            padding: false,
        })
        .collect();

    if !rows.is_empty() {
        for number in rows.len() + 1..=min_rows {
            rows.push(TableRow {
                number,
                date: String::new(),
                payment_type: String::new(),
                details: String::new(),
                paid_out: String::new(),
                paid_in: String::new(),
                balance: String::new(),
                padding: true,
            });
        }
    }

    rows
}

const HEADERS: [&str; 7] = ["#", "Date", "Type", "Details", "Paid Out", "In", "Balance"];

/// Render the sequence as a plain-text table.
pub fn render_text(transactions: &[Transaction], min_rows: usize) -> String {
    let rows = build_rows(transactions, min_rows);

    if rows.is_empty() {
        return format!("{}\n", EMPTY_PLACEHOLDER);
    }

    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|r| {
            [
                r.number.to_string(),
                r.date.clone(),
                r.payment_type.clone(),
                r.details.clone(),
                r.paid_out.clone(),
                r.paid_in.clone(),
                r.balance.clone(),
            ]
        })
        .collect();

    let mut widths = [0usize; 7];
    for (i, header) in HEADERS.iter().enumerate() {
        widths[i] = header.chars().count();
    }
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);

    let rule: [String; 7] = std::array::from_fn(|i| "-".repeat(widths[i]));
    push_line(&mut out, &rule, &widths);

    for row in &cells {
        push_line(&mut out, row, &widths);
    }

    out
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let pad = widths[i].saturating_sub(cell.chars().count());
        // Row number and money columns are right-aligned.
        if i == 0 || i >= 4 {
            for _ in 0..pad {
                out.push(' ');
            }
            out.push_str(cell);
        } else {
            out.push_str(cell);
            for _ in 0..pad {
                out.push(' ');
            }
        }
    }
    // Trim trailing spaces left by empty right-side cells.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tx(
        date: &str,
        code: Option<&str>,
        details: &str,
        out: Option<Decimal>,
        in_: Option<Decimal>,
        balance: Option<Decimal>,
    ) -> Transaction {
        Transaction {
            date: date.to_string(),
            payment_type: code.map(str::to_string),
            details: details.to_string(),
            paid_out: out,
            paid_in: in_,
            balance,
        }
    }

    #[test]
    fn test_format_amount_two_decimals() {
        assert_eq!(format_amount(Decimal::new(1255, 1)), "125.50");
        assert_eq!(format_amount(Decimal::new(5, 0)), "5.00");
    }

    #[test]
    fn test_format_amount_thousands_grouping() {
        assert_eq!(format_amount(Decimal::new(1000, 0)), "1,000.00");
        assert_eq!(format_amount(Decimal::new(1234567891, 2)), "12,345,678.91");
    }

    #[test]
    fn test_signed_rendering() {
        let rows = build_rows(
            &[tx(
                "15MAY18",
                Some("CR"),
                "A Tuakanangaro 4 RAILWAY COTTAGES",
                None,
                Some(Decimal::new(1750, 0)),
                None,
            )],
            MIN_VISUAL_ROWS,
        );

        assert_eq!(rows[0].paid_in, "+1,750.00");
        assert_eq!(rows[0].paid_out, "");
        assert_eq!(rows[0].balance, "");
    }

    #[test]
    fn test_paid_out_negative_balance_unsigned() {
        let rows = build_rows(
            &[tx(
                "11MAY18",
                Some("DD"),
                "DEPOSIT PROTECTION",
                Some(Decimal::new(1255, 1)),
                None,
                Some(Decimal::new(1000, 0)),
            )],
            MIN_VISUAL_ROWS,
        );

        assert_eq!(rows[0].paid_out, "-125.50");
        assert_eq!(rows[0].balance, "1,000.00");
    }

    #[test]
    fn test_pads_to_minimum_visual_rows() {
        let rows = build_rows(
            &[tx("11MAY18", None, "x", None, None, None)],
            MIN_VISUAL_ROWS,
        );

        assert_eq!(rows.len(), MIN_VISUAL_ROWS);
        assert!(!rows[0].padding);
        assert!(rows[1..].iter().all(|r| r.padding));
        // Numbering continues through padding.
        assert_eq!(rows[14].number, 15);
    }

    #[test]
    fn test_no_padding_at_or_above_minimum() {
        let data: Vec<Transaction> = (0..16)
            .map(|i| tx(&format!("{i:02}MAY18"), None, "x", None, None, None))
            .collect();

        let rows = build_rows(&data, MIN_VISUAL_ROWS);
        assert_eq!(rows.len(), 16);
        assert!(rows.iter().all(|r| !r.padding));
    }

    #[test]
    fn test_empty_sequence_builds_no_rows() {
        assert!(build_rows(&[], MIN_VISUAL_ROWS).is_empty());
        assert!(render_text(&[], MIN_VISUAL_ROWS).contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn test_render_text_contains_headers_and_values() {
        let text = render_text(
            &[tx(
                "15MAY18",
                Some("CR"),
                "rent",
                None,
                Some(Decimal::new(1750, 0)),
                None,
            )],
            1,
        );

        let mut lines = text.lines();
        let header = lines.next().expect("header line");
        for column in ["Date", "Type", "Details", "Paid Out", "In", "Balance"] {
            assert!(header.contains(column), "missing column {column}");
        }
        assert!(text.contains("+1,750.00"));
        assert!(text.contains("15MAY18"));
    }
}
