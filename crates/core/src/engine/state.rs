//! Per-organization mutable state.

use std::collections::{HashMap, HashSet};

use contara_shared::types::{AccountId, EventId, RuleId};

use crate::catalog::{CatalogType, Mapping, OfficialCatalog};
use crate::fiscal::{AuditRecord, FiscalPeriod};
use crate::ledger::{EntryStatus, JournalEntry};
use crate::organization::Organization;
use crate::registry::Account;
use crate::rules::AutomationRule;

/// Everything one organization owns. Guarded by a single lock; all
/// invariants that span collections (entry numbering, idempotency,
/// period gating) hold because mutation happens under one write guard.
#[derive(Debug)]
pub struct OrgState {
    /// The organization record.
    pub organization: Organization,
    /// Chart of accounts.
    pub accounts: Vec<Account>,
    /// Catalog mappings across all catalog types.
    pub mappings: Vec<Mapping>,
    /// Loaded official catalogs.
    pub catalogs: HashMap<CatalogType, OfficialCatalog>,
    /// Automation rules.
    pub rules: Vec<AutomationRule>,
    /// Journal entries, in creation order.
    pub entries: Vec<JournalEntry>,
    /// Fiscal periods.
    pub periods: Vec<FiscalPeriod>,
    /// Rule/event pairs already applied; replays become no-ops.
    pub applied_events: HashSet<(RuleId, EventId)>,
    /// Audit trail for privileged actions.
    pub audit_log: Vec<AuditRecord>,
    /// Next entry number per fiscal period. Counters only grow, so a
    /// cancelled entry's number is never handed out again.
    entry_counters: HashMap<(i32, u32), u32>,
}

impl OrgState {
    /// Fresh state for a new organization.
    #[must_use]
    pub fn new(organization: Organization) -> Self {
        Self {
            organization,
            accounts: Vec::new(),
            mappings: Vec::new(),
            catalogs: HashMap::new(),
            rules: Vec::new(),
            entries: Vec::new(),
            periods: Vec::new(),
            applied_events: HashSet::new(),
            audit_log: Vec::new(),
            entry_counters: HashMap::new(),
        }
    }

    /// Hands out the next entry number for a period. Numbers start at 1
    /// and are never reused.
    pub fn next_entry_number(&mut self, year: i32, month: u32) -> u32 {
        let counter = self.entry_counters.entry((year, month)).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Account by id.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Account by code.
    #[must_use]
    pub fn account_by_code(&self, code: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.code == code)
    }

    /// Period for a year and month.
    #[must_use]
    pub fn period(&self, year: i32, month: u32) -> Option<&FiscalPeriod> {
        self.periods
            .iter()
            .find(|p| p.year == year && p.month == month)
    }

    /// Mutable period lookup.
    pub fn period_mut(&mut self, year: i32, month: u32) -> Option<&mut FiscalPeriod> {
        self.periods
            .iter_mut()
            .find(|p| p.year == year && p.month == month)
    }

    /// Whether the account still blocks deactivation: referenced by a
    /// non-cancelled entry in an open period, or by an active rule.
    /// Cancelled entries, closed and locked periods, and switched-off
    /// rules do not count.
    #[must_use]
    pub fn account_in_use(&self, id: AccountId) -> bool {
        let in_entries = self
            .entries
            .iter()
            .filter(|e| e.status != EntryStatus::Cancelled)
            .filter(|e| {
                let (year, month) = e.period();
                self.period(year, month).map_or(true, FiscalPeriod::is_open)
            })
            .flat_map(|e| e.lines.iter())
            .any(|l| l.account_id == id);
        let in_rules = self
            .rules
            .iter()
            .filter(|r| r.is_active)
            .flat_map(|r| r.lines.iter())
            .any(|l| l.account_id == id);
        in_entries || in_rules
    }
}
