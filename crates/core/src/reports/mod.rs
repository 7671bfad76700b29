//! Financial statement aggregation.
//!
//! All statements are deterministic folds over a snapshot of accounts
//! and posted entries taken under the organization's read guard; only
//! posted and approved entries count, drafts and cancellations never
//! appear.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{balance_sheet, cash_flow, income_statement, trial_balance};
pub use types::{
    BalanceSheet, BalanceSheetLine, BalanceSheetSection, CashFlow, CashFlowLine, IncomeStatement,
    StatementLine, TrialBalance, TrialBalanceRow,
};
