//! Balance and line-shape validation for journal entries.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{round_minor_units, JournalLine};

/// Validates a set of lines for storage.
///
/// Each line must carry exactly one positive side, and a line in a
/// currency other than `entry_currency` must carry a positive exchange
/// rate. The debit and credit totals, expressed in the entry currency
/// and rounded to `decimal_places` minor units, must match. Applies to
/// drafts too: an unbalanced entry never enters the system in any
/// status.
///
/// # Errors
///
/// Returns the first shape violation found, or `Unbalanced` with both
/// totals.
pub fn validate_lines(
    lines: &[JournalLine],
    entry_currency: &str,
    decimal_places: u32,
) -> Result<(), LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::EmptyEntry);
    }

    for (index, line) in lines.iter().enumerate() {
        let line_no = index + 1;
        match (line.debit, line.credit) {
            (Some(_), Some(_)) => return Err(LedgerError::BothSidesSet { line: line_no }),
            (None, None) => return Err(LedgerError::NoSideSet { line: line_no }),
            (Some(amount), None) | (None, Some(amount)) => {
                if amount <= Decimal::ZERO {
                    return Err(LedgerError::NonPositiveAmount { line: line_no });
                }
            }
        }
        if line
            .currency
            .as_deref()
            .is_some_and(|c| c != entry_currency)
        {
            match line.exchange_rate {
                None => return Err(LedgerError::MissingExchangeRate { line: line_no }),
                Some(rate) if rate <= Decimal::ZERO => {
                    return Err(LedgerError::NonPositiveExchangeRate { line: line_no });
                }
                Some(_) => {}
            }
        }
    }

    let (debit, credit) = entry_totals(lines, entry_currency, decimal_places);
    if debit != credit {
        return Err(LedgerError::Unbalanced { debit, credit });
    }

    Ok(())
}

/// Sums debit and credit totals in the entry currency, each converted
/// line rounded to minor units.
#[must_use]
pub fn entry_totals(
    lines: &[JournalLine],
    entry_currency: &str,
    decimal_places: u32,
) -> (Decimal, Decimal) {
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    for line in lines {
        if let Some(amount) = line.base_debit(entry_currency) {
            debit += round_minor_units(amount, decimal_places);
        }
        if let Some(amount) = line.base_credit(entry_currency) {
            credit += round_minor_units(amount, decimal_places);
        }
    }
    (debit, credit)
}
