//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use contara_shared::types::JournalEntryId;

use crate::fiscal::PeriodStatus;

/// Errors raised while creating, posting, or reversing journal entries.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Debits and credits do not match at minor-unit precision.
    #[error("Entry is unbalanced: debits {debit} != credits {credit}")]
    Unbalanced {
        /// Total of debit lines.
        debit: Decimal,
        /// Total of credit lines.
        credit: Decimal,
    },

    /// An entry needs at least two lines.
    #[error("Entry must contain at least two lines")]
    EmptyEntry,

    /// A line set both a debit and a credit amount.
    #[error("Line {line} sets both debit and credit")]
    BothSidesSet {
        /// 1-indexed line number.
        line: usize,
    },

    /// A line set neither debit nor credit.
    #[error("Line {line} sets neither debit nor credit")]
    NoSideSet {
        /// 1-indexed line number.
        line: usize,
    },

    /// A line amount was zero or negative.
    #[error("Line {line} amount must be positive")]
    NonPositiveAmount {
        /// 1-indexed line number.
        line: usize,
    },

    /// A foreign-currency line carries no exchange rate.
    #[error("Line {line} is in a foreign currency but has no exchange rate")]
    MissingExchangeRate {
        /// 1-indexed line number.
        line: usize,
    },

    /// A line's exchange rate was zero or negative.
    #[error("Line {line} exchange rate must be positive")]
    NonPositiveExchangeRate {
        /// 1-indexed line number.
        line: usize,
    },

    /// The target fiscal period does not accept postings.
    #[error("Fiscal period {year}-{month:02} is {status}, not open")]
    PeriodNotOpen {
        /// Period year.
        year: i32,
        /// Period month.
        month: u32,
        /// The period's current status.
        status: PeriodStatus,
    },

    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// The entry's status does not allow the requested transition.
    #[error("Cannot {action} an entry in status {status}")]
    InvalidTransition {
        /// Requested action, e.g. "post" or "cancel".
        action: &'static str,
        /// The entry's current status.
        status: &'static str,
    },

    /// Direct cancellation of a posted entry is disabled for this
    /// organization; a reversal entry is required instead.
    #[error("Posted entries require a reversal; direct cancellation is disabled")]
    ReversalRequired,

    /// Only posted or approved entries can be reversed.
    #[error("Only posted entries can be reversed")]
    NotReversible,

    /// No open period exists at or after the original entry's period.
    #[error("No open fiscal period available for the reversal")]
    NoOpenPeriod,
}

impl LedgerError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::BothSidesSet { .. } => "BOTH_SIDES_SET",
            Self::NoSideSet { .. } => "NO_SIDE_SET",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::MissingExchangeRate { .. } => "MISSING_EXCHANGE_RATE",
            Self::NonPositiveExchangeRate { .. } => "NON_POSITIVE_EXCHANGE_RATE",
            Self::PeriodNotOpen { .. } => "PERIOD_NOT_OPEN",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::ReversalRequired => "REVERSAL_REQUIRED",
            Self::NotReversible => "NOT_REVERSIBLE",
            Self::NoOpenPeriod => "NO_OPEN_PERIOD",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EntryNotFound(_) => 404,
            Self::PeriodNotOpen { .. }
            | Self::InvalidTransition { .. }
            | Self::ReversalRequired
            | Self::NotReversible
            | Self::NoOpenPeriod => 409,
            _ => 400,
        }
    }
}
