//! Reversal entry construction.

use chrono::{NaiveDate, Utc};

use contara_shared::types::JournalEntryId;

use super::error::LedgerError;
use super::types::{EntryStatus, EntryType, JournalEntry, JournalLine};

/// Builds the reversal of a posted entry.
///
/// The reversal mirrors every line with debit and credit swapped, is
/// typed `Adjustment`, references the original through `reversal_of`,
/// and starts life as a draft dated into `entry_date` (the earliest
/// open period at or after the original's period; the caller resolves
/// that date). The original entry is left untouched.
///
/// # Errors
///
/// Returns `NotReversible` unless the original is posted or approved.
pub fn build_reversal(
    original: &JournalEntry,
    entry_number: u32,
    entry_date: NaiveDate,
) -> Result<JournalEntry, LedgerError> {
    if !original.affects_balances() {
        return Err(LedgerError::NotReversible);
    }

    let lines = original
        .lines
        .iter()
        .map(|line| JournalLine {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            currency: line.currency.clone(),
            exchange_rate: line.exchange_rate,
            description: line.description.clone(),
        })
        .collect();

    Ok(JournalEntry {
        id: JournalEntryId::new(),
        organization_id: original.organization_id,
        entry_number,
        entry_date,
        description: format!("Reversal of entry #{}", original.entry_number),
        currency: original.currency.clone(),
        entry_type: EntryType::Adjustment,
        status: EntryStatus::Draft,
        lines,
        source_rule_id: None,
        source_event_id: None,
        reversal_of: Some(original.id),
        created_at: Utc::now(),
        posted_at: None,
        posted_by: None,
        approved_by: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use contara_shared::types::{AccountId, OrganizationId};

    use crate::ledger::validation::validate_lines;

    fn posted_entry() -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::new(),
            organization_id: OrganizationId::new(),
            entry_number: 7,
            entry_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            description: "Vendor invoice".to_string(),
            currency: "MXN".to_string(),
            entry_type: EntryType::Manual,
            status: EntryStatus::Posted,
            lines: vec![
                JournalLine::debit(AccountId::new(), dec!(1160), "Inventory"),
                JournalLine::debit(AccountId::new(), dec!(185.60), "VAT receivable"),
                JournalLine::credit(AccountId::new(), dec!(1345.60), "Accounts payable"),
            ],
            source_rule_id: None,
            source_event_id: None,
            reversal_of: None,
            created_at: Utc::now(),
            posted_at: Some(Utc::now()),
            posted_by: None,
            approved_by: None,
        }
    }

    #[test]
    fn test_reversal_swaps_sides_and_links_original() {
        let original = posted_entry();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let reversal = build_reversal(&original, 8, date).unwrap();

        assert_eq!(reversal.reversal_of, Some(original.id));
        assert_eq!(reversal.entry_type, EntryType::Adjustment);
        assert_eq!(reversal.status, EntryStatus::Draft);
        assert_eq!(reversal.lines.len(), 3);
        assert_eq!(reversal.lines[0].credit, Some(dec!(1160)));
        assert_eq!(reversal.lines[0].debit, None);
        assert_eq!(reversal.lines[2].debit, Some(dec!(1345.60)));
        // A reversal of a balanced entry is itself balanced.
        assert!(validate_lines(&reversal.lines, "MXN", 2).is_ok());
    }

    #[test]
    fn test_draft_cannot_be_reversed() {
        let mut original = posted_entry();
        original.status = EntryStatus::Draft;
        let date = original.entry_date;
        assert!(matches!(
            build_reversal(&original, 8, date),
            Err(LedgerError::NotReversible)
        ));
    }

    #[test]
    fn test_cancelled_cannot_be_reversed() {
        let mut original = posted_entry();
        original.status = EntryStatus::Cancelled;
        let date = original.entry_date;
        assert!(matches!(
            build_reversal(&original, 8, date),
            Err(LedgerError::NotReversible)
        ));
    }
}
