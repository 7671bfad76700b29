//! Journal entry and line types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use contara_shared::types::{
    AccountId, EventId, JournalEntryId, OrganizationId, RuleId, UserId,
};

/// Rounds an amount to the currency's minor units using banker's
/// rounding, so repeated aggregation does not drift upward.
#[must_use]
pub fn round_minor_units(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// How an entry came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Keyed in by a user.
    Manual,
    /// Generated by an automation rule.
    Auto,
    /// Correction, including reversals.
    Adjustment,
    /// Period-close entry.
    Closing,
}

/// Entry lifecycle state.
///
/// `Draft -> Posted -> Approved` is the forward path; `Cancelled` is
/// terminal and reachable from `Draft` always, and from `Posted` only
/// when the organization does not require approval for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Editable, not yet in any balance.
    Draft,
    /// Counted in balances; immutable.
    Posted,
    /// Posted and signed off.
    Approved,
    /// Terminal; never counted in balances.
    Cancelled,
}

/// One line of a journal entry. Exactly one of `debit` and `credit` is
/// set, and it is strictly positive. Amounts are stated in the line
/// currency; lines in a currency other than the entry's carry the
/// exchange rate used to express them in the entry currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// The account this line hits. Must allow transactions.
    pub account_id: AccountId,
    /// Debit amount, if this is a debit line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit: Option<Decimal>,
    /// Credit amount, if this is a credit line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<Decimal>,
    /// Line currency; `None` means the entry currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Units of entry currency per unit of line currency. Required when
    /// the line currency differs from the entry currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    /// Line description.
    pub description: String,
}

impl JournalLine {
    /// A debit line in the entry currency.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            debit: Some(amount),
            credit: None,
            currency: None,
            exchange_rate: None,
            description: description.into(),
        }
    }

    /// A credit line in the entry currency.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            account_id,
            debit: None,
            credit: Some(amount),
            currency: None,
            exchange_rate: None,
            description: description.into(),
        }
    }

    /// Restates the line in a foreign currency at the given rate.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>, exchange_rate: Decimal) -> Self {
        self.currency = Some(currency.into());
        self.exchange_rate = Some(exchange_rate);
        self
    }

    /// Conversion factor into the entry currency. Identity for lines in
    /// the entry currency; for stored entries the rate is guaranteed
    /// present by validation.
    fn base_rate(&self, entry_currency: &str) -> Decimal {
        match (&self.currency, self.exchange_rate) {
            (Some(currency), Some(rate)) if currency != entry_currency => rate,
            _ => Decimal::ONE,
        }
    }

    /// Debit amount expressed in the entry currency.
    #[must_use]
    pub fn base_debit(&self, entry_currency: &str) -> Option<Decimal> {
        self.debit.map(|a| a * self.base_rate(entry_currency))
    }

    /// Credit amount expressed in the entry currency.
    #[must_use]
    pub fn base_credit(&self, entry_currency: &str) -> Option<Decimal> {
        self.credit.map(|a| a * self.base_rate(entry_currency))
    }
}

/// A journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Sequential number within the organization and fiscal period.
    /// Assigned at creation and never reused, even after cancellation.
    pub entry_number: u32,
    /// Accounting date; determines the fiscal period.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Entry currency (ISO 4217); the organization's base currency.
    pub currency: String,
    /// How the entry came to exist.
    pub entry_type: EntryType,
    /// Lifecycle state.
    pub status: EntryStatus,
    /// Balanced set of lines, at least two.
    pub lines: Vec<JournalLine>,
    /// The rule that generated this entry, for `Auto` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_rule_id: Option<RuleId>,
    /// The event that generated this entry, for `Auto` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_event_id: Option<EventId>,
    /// The entry this one reverses, if it is a reversal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversal_of: Option<JournalEntryId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Set when the entry is posted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
    /// Who posted the entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<UserId>,
    /// Who approved the entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<UserId>,
}

impl JournalEntry {
    /// The fiscal period this entry dates into, as `(year, month)`.
    #[must_use]
    pub fn period(&self) -> (i32, u32) {
        use chrono::Datelike;
        (self.entry_date.year(), self.entry_date.month())
    }

    /// Whether this entry counts toward account balances.
    #[must_use]
    pub const fn affects_balances(&self) -> bool {
        matches!(self.status, EntryStatus::Posted | EntryStatus::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    // Midpoints round to even, not always up.
    #[rstest]
    #[case(dec!(2.675), 2, dec!(2.68))]
    #[case(dec!(2.665), 2, dec!(2.66))]
    #[case(dec!(2.5), 0, dec!(2))]
    #[case(dec!(3.5), 0, dec!(4))]
    fn test_round_minor_units_bankers(
        #[case] amount: Decimal,
        #[case] decimal_places: u32,
        #[case] expected: Decimal,
    ) {
        assert_eq!(round_minor_units(amount, decimal_places), expected);
    }

    #[test]
    fn test_period_from_entry_date() {
        let entry = JournalEntry {
            id: JournalEntryId::new(),
            organization_id: OrganizationId::new(),
            entry_number: 1,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: String::new(),
            currency: "MXN".to_string(),
            entry_type: EntryType::Manual,
            status: EntryStatus::Draft,
            lines: vec![],
            source_rule_id: None,
            source_event_id: None,
            reversal_of: None,
            created_at: Utc::now(),
            posted_at: None,
            posted_by: None,
            approved_by: None,
        };
        assert_eq!(entry.period(), (2026, 3));
    }

    #[test]
    fn test_foreign_line_converts_at_rate() {
        let line = JournalLine::debit(AccountId::new(), dec!(100), "USD invoice")
            .with_currency("USD", dec!(17.25));
        assert_eq!(line.base_debit("MXN"), Some(dec!(1725.00)));
        assert_eq!(line.base_credit("MXN"), None);
    }

    #[test]
    fn test_same_currency_line_ignores_rate() {
        let line = JournalLine::credit(AccountId::new(), dec!(100), "")
            .with_currency("MXN", dec!(2));
        assert_eq!(line.base_credit("MXN"), Some(dec!(100)));
    }
}
