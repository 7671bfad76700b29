//! Journal ledger: entries, lines, balance validation, and reversals.
//!
//! Every entry is double-entry balanced at the currency's minor-unit
//! precision before it can be stored, and posted entries are immutable;
//! corrections happen through reversal entries, never edits.

pub mod error;
pub mod reversal;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;

pub use error::LedgerError;
pub use reversal::build_reversal;
pub use types::{round_minor_units, EntryStatus, EntryType, JournalEntry, JournalLine};
pub use validation::{entry_totals, validate_lines};
