//! Pipe-delimited ledger balance file.
//!
//! One line per account: `code|name|opening|debits|credits|ending`.
//! No header, no quoting; a pipe inside a name makes the file
//! unwritable rather than silently corrupt.

use rust_decimal::Decimal;

use super::error::InterchangeError;
use crate::reports::TrialBalance;

const FIELDS: usize = 6;

/// One parsed balance line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Opening balance.
    pub opening: Decimal,
    /// Period debits.
    pub debits: Decimal,
    /// Period credits.
    pub credits: Decimal,
    /// Ending balance.
    pub ending: Decimal,
}

/// Renders a trial balance as pipe-delimited lines.
///
/// # Errors
///
/// Returns `DelimiterInField` if any code or name contains a pipe.
pub fn write_balance_lines(trial_balance: &TrialBalance) -> Result<String, InterchangeError> {
    let mut out = String::new();
    for row in &trial_balance.rows {
        for field in [&row.code, &row.name] {
            if field.contains('|') {
                return Err(InterchangeError::DelimiterInField {
                    value: field.clone(),
                });
            }
        }
        out.push_str(&format!(
            "{}|{}|{}|{}|{}|{}\n",
            row.code, row.name, row.opening, row.debits, row.credits, row.ending
        ));
    }
    Ok(out)
}

/// Parses pipe-delimited balance lines.
///
/// Blank lines are not tolerated except for a trailing newline. Every
/// row must carry exactly six fields with parseable amounts.
///
/// # Errors
///
/// Returns `MalformedRow` or `InvalidAmount` with the 1-indexed row.
pub fn read_balance_lines(input: &str) -> Result<Vec<BalanceLine>, InterchangeError> {
    let mut lines = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let row = index + 1;
        let fields: Vec<&str> = raw.split('|').collect();
        if fields.len() != FIELDS {
            return Err(InterchangeError::MalformedRow {
                row,
                reason: format!("expected {FIELDS} fields, found {}", fields.len()),
            });
        }
        if fields[0].is_empty() {
            return Err(InterchangeError::MalformedRow {
                row,
                reason: "empty account code".to_string(),
            });
        }
        let amount = |value: &str| -> Result<Decimal, InterchangeError> {
            value
                .trim()
                .parse()
                .map_err(|_| InterchangeError::InvalidAmount {
                    row,
                    value: value.to_string(),
                })
        };
        lines.push(BalanceLine {
            code: fields[0].to_string(),
            name: fields[1].to_string(),
            opening: amount(fields[2])?,
            debits: amount(fields[3])?,
            credits: amount(fields[4])?,
            ending: amount(fields[5])?,
        });
    }
    Ok(lines)
}
