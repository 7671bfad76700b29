use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use contara_shared::types::{AccountId, JournalEntryId, OrganizationId};

use crate::ledger::{EntryStatus, EntryType, JournalEntry, JournalLine};
use crate::registry::{Account, AccountType};

use super::service::{balance_sheet, cash_flow, income_statement, trial_balance};

struct Fixture {
    accounts: Vec<Account>,
    entries: Vec<JournalEntry>,
    cash: AccountId,
}

fn account(
    org: OrganizationId,
    code: &str,
    name: &str,
    account_type: AccountType,
    is_current: bool,
) -> Account {
    Account {
        id: AccountId::new(),
        organization_id: org,
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        parent_id: None,
        allows_transactions: true,
        is_current,
        is_active: true,
    }
}

fn entry(
    org: OrganizationId,
    number: u32,
    date: (i32, u32, u32),
    status: EntryStatus,
    lines: Vec<JournalLine>,
) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::new(),
        organization_id: org,
        entry_number: number,
        entry_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        description: String::new(),
        currency: "MXN".to_string(),
        entry_type: EntryType::Manual,
        status,
        lines,
        source_rule_id: None,
        source_event_id: None,
        reversal_of: None,
        created_at: Utc::now(),
        posted_at: None,
        posted_by: None,
        approved_by: None,
    }
}

/// January: 50,000 opening capital into cash. February: 280,000 sales
/// received in cash, 100,000 rent paid, 150,000 equipment bought. Plus
/// one draft and one cancelled entry that must never show up.
fn fixture() -> Fixture {
    let org = OrganizationId::new();
    let cash = account(org, "100", "Cash and banks", AccountType::Asset, true);
    let receivable = account(org, "120", "Accounts receivable", AccountType::Asset, true);
    let equipment = account(org, "150", "Equipment", AccountType::Asset, false);
    let payable = account(org, "200", "Accounts payable", AccountType::Liability, true);
    let capital = account(org, "300", "Share capital", AccountType::Equity, false);
    let sales = account(org, "400", "Sales revenue", AccountType::Income, false);
    let rent = account(org, "500", "Rent expense", AccountType::Expense, false);

    let entries = vec![
        entry(
            org,
            1,
            (2026, 1, 5),
            EntryStatus::Posted,
            vec![
                JournalLine::debit(cash.id, dec!(50000), "Initial capital"),
                JournalLine::credit(capital.id, dec!(50000), "Initial capital"),
            ],
        ),
        entry(
            org,
            1,
            (2026, 2, 3),
            EntryStatus::Posted,
            vec![
                JournalLine::debit(cash.id, dec!(280000), "Cash sales"),
                JournalLine::credit(sales.id, dec!(280000), "Cash sales"),
            ],
        ),
        entry(
            org,
            2,
            (2026, 2, 10),
            EntryStatus::Approved,
            vec![
                JournalLine::debit(rent.id, dec!(100000), "Office rent"),
                JournalLine::credit(cash.id, dec!(100000), "Office rent"),
            ],
        ),
        entry(
            org,
            3,
            (2026, 2, 20),
            EntryStatus::Posted,
            vec![
                JournalLine::debit(equipment.id, dec!(150000), "Machinery"),
                JournalLine::credit(cash.id, dec!(150000), "Machinery"),
            ],
        ),
        entry(
            org,
            4,
            (2026, 2, 25),
            EntryStatus::Draft,
            vec![
                JournalLine::debit(rent.id, dec!(999), ""),
                JournalLine::credit(cash.id, dec!(999), ""),
            ],
        ),
        entry(
            org,
            5,
            (2026, 2, 26),
            EntryStatus::Cancelled,
            vec![
                JournalLine::debit(receivable.id, dec!(777), ""),
                JournalLine::credit(sales.id, dec!(777), ""),
            ],
        ),
    ];

    let cash_id = cash.id;
    Fixture {
        accounts: vec![cash, receivable, equipment, payable, capital, sales, rent],
        entries,
        cash: cash_id,
    }
}

#[test]
fn test_trial_balance_opening_movement_ending() {
    let f = fixture();
    let tb = trial_balance(&f.accounts, &f.entries, 2026, 2);

    let cash_row = tb.rows.iter().find(|r| r.account_id == f.cash).unwrap();
    assert_eq!(cash_row.opening, dec!(50000));
    assert_eq!(cash_row.debits, dec!(280000));
    assert_eq!(cash_row.credits, dec!(250000));
    assert_eq!(cash_row.ending, dec!(80000));
}

#[test]
fn test_trial_balance_totals_match() {
    let f = fixture();
    let tb = trial_balance(&f.accounts, &f.entries, 2026, 2);
    assert_eq!(tb.total_debits, tb.total_credits);
    assert_eq!(tb.total_debits, dec!(530000));
}

#[test]
fn test_trial_balance_rows_sorted_and_quiet_accounts_omitted() {
    let f = fixture();
    let tb = trial_balance(&f.accounts, &f.entries, 2026, 2);
    let codes: Vec<&str> = tb.rows.iter().map(|r| r.code.as_str()).collect();
    // Receivable and payable never moved; draft and cancelled entries
    // do not count as movement.
    assert_eq!(codes, vec!["100", "150", "300", "400", "500"]);
}

#[test]
fn test_income_statement_net_result() {
    let f = fixture();
    let is = income_statement(&f.accounts, &f.entries, (2026, 2), (2026, 2));
    assert_eq!(is.total_income, dec!(280000));
    assert_eq!(is.total_expenses, dec!(100000));
    assert_eq!(is.net_result, dec!(180000));
}

#[test]
fn test_income_statement_scoped_to_period() {
    let f = fixture();
    let is = income_statement(&f.accounts, &f.entries, (2026, 1), (2026, 1));
    assert_eq!(is.total_income, Decimal::ZERO);
    assert_eq!(is.net_result, Decimal::ZERO);
}

#[test]
fn test_income_statement_over_range() {
    let f = fixture();
    // January has no income or expense activity, so the two-month range
    // matches February alone.
    let range = income_statement(&f.accounts, &f.entries, (2026, 1), (2026, 2));
    assert_eq!(range.total_income, dec!(280000));
    assert_eq!(range.total_expenses, dec!(100000));
    assert_eq!(range.net_result, dec!(180000));
    assert_eq!(range.from_month, 1);
    assert_eq!(range.to_month, 2);
}

#[test]
fn test_balance_sheet_balances() {
    let f = fixture();
    let bs = balance_sheet(&f.accounts, &f.entries, 2026, 2);

    assert_eq!(bs.current_assets.total, dec!(80000));
    assert_eq!(bs.non_current_assets.total, dec!(150000));
    assert_eq!(bs.total_assets, dec!(230000));
    assert_eq!(bs.equity.total, dec!(50000));
    assert_eq!(bs.period_result, dec!(180000));
    assert_eq!(bs.total_equity, dec!(230000));
    assert_eq!(bs.total_assets, bs.total_liabilities_and_equity);
}

#[test]
fn test_cash_flow_explains_cash_delta() {
    let f = fixture();
    let cf = cash_flow(&f.accounts, &f.entries, (2026, 2), (2026, 2));

    assert_eq!(cf.net_result, dec!(180000));
    assert_eq!(cf.net_operating, dec!(180000));
    assert_eq!(cf.net_investing, dec!(-150000));
    assert_eq!(cf.net_financing, Decimal::ZERO);
    // Cash went from 50,000 to 80,000 during February.
    assert_eq!(cf.net_change_in_cash, dec!(30000));
    assert!(cf.investing.iter().any(|l| l.code == "150"));
}

#[test]
fn test_cash_flow_financing_from_capital_injection() {
    let f = fixture();
    let cf = cash_flow(&f.accounts, &f.entries, (2026, 1), (2026, 1));
    assert_eq!(cf.net_result, Decimal::ZERO);
    assert_eq!(cf.net_financing, dec!(50000));
    assert_eq!(cf.net_change_in_cash, dec!(50000));
}

#[test]
fn test_cash_flow_over_range_explains_full_cash_delta() {
    let f = fixture();
    // Cash went from nothing to 80,000 over January and February:
    // 180,000 operating, -150,000 equipment, +50,000 capital.
    let cf = cash_flow(&f.accounts, &f.entries, (2026, 1), (2026, 2));
    assert_eq!(cf.net_operating, dec!(180000));
    assert_eq!(cf.net_investing, dec!(-150000));
    assert_eq!(cf.net_financing, dec!(50000));
    assert_eq!(cf.net_change_in_cash, dec!(80000));
}
