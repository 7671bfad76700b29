//! Statement builders.

use std::collections::HashMap;

use rust_decimal::Decimal;

use contara_shared::types::AccountId;

use crate::ledger::JournalEntry;
use crate::registry::{Account, AccountType};

use super::types::{
    BalanceSheet, BalanceSheetSection, CashFlow, CashFlowLine, IncomeStatement, StatementLine,
    TrialBalance, TrialBalanceRow,
};

type Movements = HashMap<AccountId, (Decimal, Decimal)>;

fn fold_movements<F>(entries: &[JournalEntry], mut in_scope: F) -> Movements
where
    F: FnMut(&JournalEntry) -> bool,
{
    let mut movements: Movements = HashMap::new();
    for entry in entries {
        if !entry.affects_balances() || !in_scope(entry) {
            continue;
        }
        for line in &entry.lines {
            let slot = movements
                .entry(line.account_id)
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            if let Some(amount) = line.base_debit(&entry.currency) {
                slot.0 += amount;
            }
            if let Some(amount) = line.base_credit(&entry.currency) {
                slot.1 += amount;
            }
        }
    }
    movements
}

fn movement(movements: &Movements, account_id: AccountId) -> (Decimal, Decimal) {
    movements
        .get(&account_id)
        .copied()
        .unwrap_or((Decimal::ZERO, Decimal::ZERO))
}

fn sorted_by_code(accounts: &[Account]) -> Vec<&Account> {
    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.code.cmp(&b.code));
    sorted
}

/// Builds the trial balance for one fiscal period.
///
/// Opening balances aggregate every posted entry dated before the
/// period; rows appear for accounts with either a carried balance or
/// period activity, sorted by code.
#[must_use]
pub fn trial_balance(
    accounts: &[Account],
    entries: &[JournalEntry],
    year: i32,
    month: u32,
) -> TrialBalance {
    let before = fold_movements(entries, |e| e.period() < (year, month));
    let within = fold_movements(entries, |e| e.period() == (year, month));

    let mut rows = Vec::new();
    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for account in sorted_by_code(accounts) {
        let (od, oc) = movement(&before, account.id);
        let (debits, credits) = movement(&within, account.id);
        let opening = account.account_type.balance_change(od, oc);
        if opening == Decimal::ZERO && debits == Decimal::ZERO && credits == Decimal::ZERO {
            continue;
        }
        let ending = opening + account.account_type.balance_change(debits, credits);
        total_debits += debits;
        total_credits += credits;
        rows.push(TrialBalanceRow {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            opening,
            debits,
            credits,
            ending,
        });
    }

    TrialBalance {
        year,
        month,
        rows,
        total_debits,
        total_credits,
    }
}

fn section<F>(accounts: &[&Account], balances: &Movements, mut include: F) -> BalanceSheetSection
where
    F: FnMut(&Account) -> bool,
{
    let mut lines = Vec::new();
    let mut total = Decimal::ZERO;
    for account in accounts {
        if !include(account) {
            continue;
        }
        let (debits, credits) = movement(balances, account.id);
        let amount = account.account_type.balance_change(debits, credits);
        if amount == Decimal::ZERO {
            continue;
        }
        total += amount;
        lines.push(StatementLine {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            amount,
        });
    }
    BalanceSheetSection { lines, total }
}

/// Builds the balance sheet as of the end of a fiscal period.
///
/// The running result (cumulative income minus expenses not yet swept
/// into equity by closing entries) is reported inside equity, so
/// assets always equal liabilities plus equity.
#[must_use]
pub fn balance_sheet(
    accounts: &[Account],
    entries: &[JournalEntry],
    year: i32,
    month: u32,
) -> BalanceSheet {
    let cumulative = fold_movements(entries, |e| e.period() <= (year, month));
    let sorted = sorted_by_code(accounts);

    let current_assets = section(&sorted, &cumulative, |a| {
        a.account_type == AccountType::Asset && a.is_current
    });
    let non_current_assets = section(&sorted, &cumulative, |a| {
        a.account_type == AccountType::Asset && !a.is_current
    });
    let current_liabilities = section(&sorted, &cumulative, |a| {
        a.account_type == AccountType::Liability && a.is_current
    });
    let non_current_liabilities = section(&sorted, &cumulative, |a| {
        a.account_type == AccountType::Liability && !a.is_current
    });
    let equity = section(&sorted, &cumulative, |a| {
        a.account_type == AccountType::Equity
    });

    let mut period_result = Decimal::ZERO;
    for account in &sorted {
        let (debits, credits) = movement(&cumulative, account.id);
        match account.account_type {
            AccountType::Income => {
                period_result += account.account_type.balance_change(debits, credits);
            }
            AccountType::Expense => {
                period_result -= account.account_type.balance_change(debits, credits);
            }
            _ => {}
        }
    }

    let total_assets = current_assets.total + non_current_assets.total;
    let total_liabilities = current_liabilities.total + non_current_liabilities.total;
    let total_equity = equity.total + period_result;

    BalanceSheet {
        year,
        month,
        current_assets,
        non_current_assets,
        total_assets,
        current_liabilities,
        non_current_liabilities,
        total_liabilities,
        equity,
        period_result,
        total_equity,
        total_liabilities_and_equity: total_liabilities + total_equity,
    }
}

/// Builds the income statement over an inclusive period range; a
/// single-period statement passes the same period twice.
#[must_use]
pub fn income_statement(
    accounts: &[Account],
    entries: &[JournalEntry],
    from: (i32, u32),
    to: (i32, u32),
) -> IncomeStatement {
    let within = fold_movements(entries, |e| {
        let period = e.period();
        period >= from && period <= to
    });

    let mut income = Vec::new();
    let mut expenses = Vec::new();
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for account in sorted_by_code(accounts) {
        let (debits, credits) = movement(&within, account.id);
        let amount = account.account_type.balance_change(debits, credits);
        if amount == Decimal::ZERO {
            continue;
        }
        let line = StatementLine {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            amount,
        };
        match account.account_type {
            AccountType::Income => {
                total_income += amount;
                income.push(line);
            }
            AccountType::Expense => {
                total_expenses += amount;
                expenses.push(line);
            }
            _ => {}
        }
    }

    IncomeStatement {
        from_year: from.0,
        from_month: from.1,
        to_year: to.0,
        to_month: to.1,
        income,
        total_income,
        expenses,
        total_expenses,
        net_result: total_income - total_expenses,
    }
}

/// Cash accounts are current assets recognized by name, covering the
/// languages of the supported jurisdictions.
fn is_cash_account(account: &Account) -> bool {
    if account.account_type != AccountType::Asset || !account.is_current {
        return false;
    }
    let name = account.name.to_lowercase();
    ["cash", "bank", "caja", "banco", "caixa"]
        .iter()
        .any(|needle| name.contains(needle))
}

/// Builds the cash flow statement over an inclusive period range,
/// indirect method: start from the range's net result and adjust by the
/// range's balance-sheet deltas. The three activity totals sum to the
/// cash accounts' own delta.
#[must_use]
pub fn cash_flow(
    accounts: &[Account],
    entries: &[JournalEntry],
    from: (i32, u32),
    to: (i32, u32),
) -> CashFlow {
    let within = fold_movements(entries, |e| {
        let period = e.period();
        period >= from && period <= to
    });
    let statement = income_statement(accounts, entries, from, to);
    let net_result = statement.net_result;

    let mut operating = Vec::new();
    let mut investing = Vec::new();
    let mut financing = Vec::new();

    for account in sorted_by_code(accounts) {
        let (debits, credits) = movement(&within, account.id);
        let delta = account.account_type.balance_change(debits, credits);
        if delta == Decimal::ZERO {
            continue;
        }
        // An asset growing consumes cash; a liability or equity
        // balance growing provides it.
        let (bucket, amount) = match account.account_type {
            AccountType::Asset if is_cash_account(account) => continue,
            AccountType::Asset if account.is_current => (&mut operating, -delta),
            AccountType::Asset => (&mut investing, -delta),
            AccountType::Liability if account.is_current => (&mut operating, delta),
            AccountType::Liability | AccountType::Equity => (&mut financing, delta),
            AccountType::Income | AccountType::Expense => continue,
        };
        bucket.push(CashFlowLine {
            code: account.code.clone(),
            name: account.name.clone(),
            amount,
        });
    }

    let operating_adjustments: Decimal = operating.iter().map(|l| l.amount).sum();
    let net_operating = net_result + operating_adjustments;
    let net_investing: Decimal = investing.iter().map(|l| l.amount).sum();
    let net_financing: Decimal = financing.iter().map(|l| l.amount).sum();

    CashFlow {
        from_year: from.0,
        from_month: from.1,
        to_year: to.0,
        to_month: to.1,
        net_result,
        operating,
        net_operating,
        investing,
        net_investing,
        financing,
        net_financing,
        net_change_in_cash: net_operating + net_investing + net_financing,
    }
}
