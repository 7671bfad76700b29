//! Report output types.

use rust_decimal::Decimal;
use serde::Serialize;

use contara_shared::types::AccountId;

use crate::registry::AccountType;

/// One account row of a trial balance.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Balance carried in from before the period, in the account's
    /// natural sign.
    pub opening: Decimal,
    /// Total debits within the period.
    pub debits: Decimal,
    /// Total credits within the period.
    pub credits: Decimal,
    /// `opening` plus the period movement, in the account's natural
    /// sign.
    pub ending: Decimal,
}

/// Trial balance for one fiscal period.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalance {
    /// Period year.
    pub year: i32,
    /// Period month.
    pub month: u32,
    /// One row per account with activity or a carried balance, sorted
    /// by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of period debits across all rows.
    pub total_debits: Decimal,
    /// Sum of period credits across all rows.
    pub total_credits: Decimal,
}

/// A labelled amount inside a statement section.
#[derive(Debug, Clone, Serialize)]
pub struct StatementLine {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Amount in the section's natural sign.
    pub amount: Decimal,
}

/// One line of a balance sheet section.
pub type BalanceSheetLine = StatementLine;

/// A balance sheet section with its total.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetSection {
    /// Account lines, sorted by code.
    pub lines: Vec<BalanceSheetLine>,
    /// Section total.
    pub total: Decimal,
}

/// Balance sheet as of the end of a fiscal period.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    /// Period year.
    pub year: i32,
    /// Period month.
    pub month: u32,
    /// Current assets.
    pub current_assets: BalanceSheetSection,
    /// Non-current assets.
    pub non_current_assets: BalanceSheetSection,
    /// `current_assets` plus `non_current_assets`.
    pub total_assets: Decimal,
    /// Current liabilities.
    pub current_liabilities: BalanceSheetSection,
    /// Non-current liabilities.
    pub non_current_liabilities: BalanceSheetSection,
    /// Total of both liability sections.
    pub total_liabilities: Decimal,
    /// Equity account balances, excluding the running result.
    pub equity: BalanceSheetSection,
    /// Fiscal-year-to-date result, shown in equity so the sheet
    /// balances before closing entries run.
    pub period_result: Decimal,
    /// `equity.total` plus `period_result`.
    pub total_equity: Decimal,
    /// Must equal `total_assets`.
    pub total_liabilities_and_equity: Decimal,
}

/// Income statement over an inclusive period range.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatement {
    /// Range start year.
    pub from_year: i32,
    /// Range start month.
    pub from_month: u32,
    /// Range end year.
    pub to_year: i32,
    /// Range end month.
    pub to_month: u32,
    /// Income lines, sorted by code.
    pub income: Vec<StatementLine>,
    /// Total income.
    pub total_income: Decimal,
    /// Expense lines, sorted by code.
    pub expenses: Vec<StatementLine>,
    /// Total expenses.
    pub total_expenses: Decimal,
    /// `total_income` minus `total_expenses`.
    pub net_result: Decimal,
}

/// One adjustment line of the cash flow statement.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Contribution to cash, already signed.
    pub amount: Decimal,
}

/// Cash flow statement over an inclusive period range, indirect method.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlow {
    /// Range start year.
    pub from_year: i32,
    /// Range start month.
    pub from_month: u32,
    /// Range end year.
    pub to_year: i32,
    /// Range end month.
    pub to_month: u32,
    /// Net result the statement starts from.
    pub net_result: Decimal,
    /// Working-capital adjustments: non-cash current assets and
    /// current liabilities.
    pub operating: Vec<CashFlowLine>,
    /// `net_result` plus operating adjustments.
    pub net_operating: Decimal,
    /// Non-current asset movements.
    pub investing: Vec<CashFlowLine>,
    /// Investing total.
    pub net_investing: Decimal,
    /// Non-current liability and equity movements.
    pub financing: Vec<CashFlowLine>,
    /// Financing total.
    pub net_financing: Decimal,
    /// Sum of the three activities; equals the cash accounts' delta.
    pub net_change_in_cash: Decimal,
}
