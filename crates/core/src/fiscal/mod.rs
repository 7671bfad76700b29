//! Fiscal period lifecycle: open, closed, locked.
//!
//! Periods gate what the ledger may post into. Closing runs through a
//! checklist; locking is a one-way hardening step reversible only by an
//! audited admin unlock.

pub mod error;
pub mod types;

pub use error::FiscalError;
pub use types::{
    AuditAction, AuditRecord, ClosingChecklist, ClosingTask, FiscalPeriod, PeriodStatus,
};
