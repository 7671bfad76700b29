//! Property tests for balance validation and reversal.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use contara_shared::types::{AccountId, JournalEntryId, OrganizationId};

use super::reversal::build_reversal;
use super::types::{round_minor_units, EntryStatus, EntryType, JournalEntry, JournalLine};
use super::validation::{entry_totals, validate_lines};

/// Positive amounts with two decimal places, up to ten million.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// A balanced line set: 1-8 debit lines mirrored by one credit line.
fn balanced_lines() -> impl Strategy<Value = Vec<JournalLine>> {
    proptest::collection::vec(amount(), 1..=8).prop_map(|amounts| {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<JournalLine> = amounts
            .into_iter()
            .map(|a| JournalLine::debit(AccountId::new(), a, ""))
            .collect();
        lines.push(JournalLine::credit(AccountId::new(), total, ""));
        lines
    })
}

fn posted(lines: Vec<JournalLine>) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::new(),
        organization_id: OrganizationId::new(),
        entry_number: 1,
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: String::new(),
        currency: "MXN".to_string(),
        entry_type: EntryType::Manual,
        status: EntryStatus::Posted,
        lines,
        source_rule_id: None,
        source_event_id: None,
        reversal_of: None,
        created_at: Utc::now(),
        posted_at: Some(Utc::now()),
        posted_by: None,
        approved_by: None,
    }
}

proptest! {
    #[test]
    fn balanced_lines_always_validate(lines in balanced_lines()) {
        prop_assert!(validate_lines(&lines, "MXN", 2).is_ok());
    }

    #[test]
    fn perturbed_lines_never_validate(lines in balanced_lines(), bump in 1i64..=10_000) {
        let mut broken = lines;
        // Bump the credit line so totals cannot match.
        let last = broken.len() - 1;
        if let Some(credit) = broken[last].credit.as_mut() {
            *credit += Decimal::new(bump, 2);
        }
        prop_assert!(validate_lines(&broken, "MXN", 2).is_err());
    }

    #[test]
    fn reversal_of_balanced_entry_is_balanced(lines in balanced_lines()) {
        let entry = posted(lines);
        let date = entry.entry_date;
        let reversal = build_reversal(&entry, 2, date).unwrap();
        prop_assert!(validate_lines(&reversal.lines, "MXN", 2).is_ok());

        // Totals swap sides exactly.
        let (debit, credit) = entry_totals(&entry.lines, "MXN", 2);
        let (rev_debit, rev_credit) = entry_totals(&reversal.lines, "MXN", 2);
        prop_assert_eq!(debit, rev_credit);
        prop_assert_eq!(credit, rev_debit);
    }

    #[test]
    fn rounding_is_idempotent(cents in 1i64..=1_000_000_000) {
        let value = Decimal::new(cents, 4);
        let once = round_minor_units(value, 2);
        prop_assert_eq!(once, round_minor_units(once, 2));
    }
}
