//! The accounting engine.
//!
//! One `AccountingEngine` serves every organization. Organizations are
//! sharded across a concurrent map; each one's books sit behind a
//! read/write lock, so operations on different organizations never
//! contend and operations on the same organization serialize.

use std::sync::{Arc, RwLock};

use chrono::{Datelike, NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use contara_shared::types::{
    AccountId, JournalEntryId, MappingId, OrganizationId, RuleId, UserId,
};

use crate::catalog::{
    auto_map, AutoMapOutcome, CatalogError, CatalogType, Mapping, MappingOrigin, OfficialCatalog,
};
use crate::fiscal::{AuditRecord, ClosingTask, FiscalError, FiscalPeriod, PeriodStatus};
use crate::interchange::{
    read_mapping_csv, write_balance_lines, write_mapping_csv, MappingRow,
};
use crate::ledger::{
    build_reversal, validate_lines, EntryStatus, EntryType, JournalEntry, JournalLine, LedgerError,
};
use crate::organization::Organization;
use crate::registry::{
    validate_new_account, Account, AccountTree, Country, NewAccount, RegistryError,
};
use crate::reports::{
    balance_sheet, cash_flow, income_statement, trial_balance, BalanceSheet, CashFlow,
    IncomeStatement, TrialBalance,
};
use crate::rules::{
    matching_rules, resolve_lines, validate_rule, AmountFormula, AutomationRule, BusinessEvent,
    Condition, NewRule, RuleError, RuleLine, Side,
};

use super::error::EngineError;
use super::state::OrgState;

type EngineResult<T> = Result<T, EngineError>;

/// What applying one business event produced.
#[derive(Debug, Default)]
pub struct EventOutcome {
    /// Draft entries created, one per newly fired rule.
    pub created: Vec<JournalEntry>,
    /// Rules skipped because this event was already applied to them.
    /// A replay is a benign no-op, not an error.
    pub replayed: Vec<RuleId>,
}

/// Multi-organization accounting engine.
pub struct AccountingEngine {
    orgs: DashMap<OrganizationId, Arc<RwLock<OrgState>>>,
    auto_map_threshold: Decimal,
}

impl AccountingEngine {
    /// An empty engine. `auto_map_threshold` is the minimum confidence
    /// an automatic catalog mapping needs.
    #[must_use]
    pub fn new(auto_map_threshold: Decimal) -> Self {
        Self {
            orgs: DashMap::new(),
            auto_map_threshold,
        }
    }

    fn org(&self, id: OrganizationId) -> EngineResult<Arc<RwLock<OrgState>>> {
        self.orgs
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(EngineError::OrganizationNotFound(id))
    }

    fn read<T>(
        &self,
        id: OrganizationId,
        f: impl FnOnce(&OrgState) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let org = self.org(id)?;
        let state = org.read().map_err(|_| EngineError::Poisoned)?;
        f(&state)
    }

    fn write<T>(
        &self,
        id: OrganizationId,
        f: impl FnOnce(&mut OrgState) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let org = self.org(id)?;
        let mut state = org.write().map_err(|_| EngineError::Poisoned)?;
        f(&mut state)
    }

    // ---- organizations ----

    /// Registers an organization and returns it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth` for a fiscal year start outside 1-12.
    pub fn create_organization(
        &self,
        name: impl Into<String>,
        country: Country,
        base_currency: impl Into<String>,
        fiscal_year_start_month: u32,
    ) -> EngineResult<Organization> {
        if !(1..=12).contains(&fiscal_year_start_month) {
            return Err(FiscalError::InvalidMonth(fiscal_year_start_month).into());
        }
        let organization =
            Organization::new(name, country, base_currency, fiscal_year_start_month);
        let snapshot = organization.clone();
        self.orgs.insert(
            organization.id,
            Arc::new(RwLock::new(OrgState::new(organization))),
        );
        Ok(snapshot)
    }

    /// Organization by id.
    pub fn get_organization(&self, id: OrganizationId) -> EngineResult<Organization> {
        self.read(id, |state| Ok(state.organization.clone()))
    }

    /// Every registered organization, unordered.
    #[must_use]
    pub fn list_organizations(&self) -> Vec<Organization> {
        self.orgs
            .iter()
            .filter_map(|entry| entry.value().read().ok().map(|s| s.organization.clone()))
            .collect()
    }

    /// Toggles the approval requirement for cancelling posted entries.
    pub fn set_require_approval(
        &self,
        id: OrganizationId,
        require_approval: bool,
    ) -> EngineResult<Organization> {
        self.write(id, |state| {
            state.organization.settings.require_approval = require_approval;
            Ok(state.organization.clone())
        })
    }

    // ---- account registry ----

    /// Creates an account after hierarchy validation under the
    /// organization's country segmentation rule.
    pub fn create_account(
        &self,
        org_id: OrganizationId,
        spec: NewAccount,
    ) -> EngineResult<Account> {
        self.write(org_id, |state| {
            let segmentation = state.organization.country.segmentation();
            validate_new_account(&state.accounts, &spec, segmentation)?;
            let account = Account {
                id: AccountId::new(),
                organization_id: org_id,
                code: spec.code,
                name: spec.name,
                account_type: spec.account_type,
                parent_id: spec.parent_id,
                allows_transactions: spec.allows_transactions,
                is_current: spec.is_current,
                is_active: true,
            };
            state.accounts.push(account.clone());
            Ok(account)
        })
    }

    /// The chart of accounts in preorder: by code, parents first.
    pub fn account_tree(&self, org_id: OrganizationId) -> EngineResult<Vec<Account>> {
        self.read(org_id, |state| {
            let tree = AccountTree::from_accounts(&state.accounts);
            Ok(tree.preorder().cloned().collect())
        })
    }

    /// Account by code.
    pub fn resolve_by_code(&self, org_id: OrganizationId, code: &str) -> EngineResult<Account> {
        self.read(org_id, |state| {
            state
                .account_by_code(code)
                .cloned()
                .ok_or_else(|| RegistryError::CodeNotFound(code.to_string()).into())
        })
    }

    /// Deactivates an account. Refused while journal lines or rules
    /// reference it.
    pub fn deactivate_account(
        &self,
        org_id: OrganizationId,
        account_id: AccountId,
    ) -> EngineResult<Account> {
        self.write(org_id, |state| {
            if state.account(account_id).is_none() {
                return Err(RegistryError::AccountNotFound(account_id).into());
            }
            if state.account_in_use(account_id) {
                return Err(RegistryError::AccountInUse(account_id).into());
            }
            let account = state
                .accounts
                .iter_mut()
                .find(|a| a.id == account_id)
                .ok_or(RegistryError::AccountNotFound(account_id))?;
            account.is_active = false;
            Ok(account.clone())
        })
    }

    // ---- catalog mapping ----

    /// Loads (or replaces) an official catalog for the organization.
    pub fn load_catalog(
        &self,
        org_id: OrganizationId,
        catalog: OfficialCatalog,
    ) -> EngineResult<()> {
        self.write(org_id, |state| {
            state.catalogs.insert(catalog.catalog_type, catalog);
            Ok(())
        })
    }

    /// Runs an auto-mapping pass for one catalog type. Created (and
    /// refreshed) mappings replace older automatic ones; manual
    /// mappings stay pinned.
    pub fn auto_map_catalog(
        &self,
        org_id: OrganizationId,
        catalog_type: CatalogType,
    ) -> EngineResult<AutoMapOutcome> {
        let threshold = self.auto_map_threshold;
        self.write(org_id, |state| {
            let catalog = state
                .catalogs
                .get(&catalog_type)
                .ok_or(CatalogError::CatalogUnavailable { catalog_type })?;

            let outcome = auto_map(&state.accounts, &state.mappings, catalog, threshold);

            for mapping in &outcome.created {
                state.mappings.retain(|m| {
                    !(m.account_id == mapping.account_id && m.catalog_type == catalog_type)
                });
                state.mappings.push(mapping.clone());
            }
            Ok(outcome)
        })
    }

    /// Pins a manual mapping from an account to an official code,
    /// replacing whatever mapping existed for that account and catalog.
    pub fn set_manual_mapping(
        &self,
        org_id: OrganizationId,
        account_id: AccountId,
        catalog_type: CatalogType,
        official_code: &str,
    ) -> EngineResult<Mapping> {
        self.write(org_id, |state| {
            if state.account(account_id).is_none() {
                return Err(RegistryError::AccountNotFound(account_id).into());
            }
            let catalog = state
                .catalogs
                .get(&catalog_type)
                .ok_or(CatalogError::CatalogUnavailable { catalog_type })?;
            let entry = catalog
                .entry(official_code)
                .ok_or_else(|| CatalogError::OfficialCodeNotFound(official_code.to_string()))?;

            let mapping = Mapping {
                id: MappingId::new(),
                organization_id: org_id,
                account_id,
                catalog_type,
                official_code: entry.code.clone(),
                official_name: entry.name.clone(),
                origin: MappingOrigin::Manual,
                confidence: None,
                usage: String::new(),
            };
            state
                .mappings
                .retain(|m| !(m.account_id == account_id && m.catalog_type == catalog_type));
            state.mappings.push(mapping.clone());
            Ok(mapping)
        })
    }

    /// The current mapping for one account and catalog type.
    pub fn get_mapping(
        &self,
        org_id: OrganizationId,
        account_id: AccountId,
        catalog_type: CatalogType,
    ) -> EngineResult<Mapping> {
        self.read(org_id, |state| {
            state
                .mappings
                .iter()
                .find(|m| m.account_id == account_id && m.catalog_type == catalog_type)
                .cloned()
                .ok_or_else(|| {
                    CatalogError::MappingNotFound {
                        account_id,
                        catalog_type,
                    }
                    .into()
                })
        })
    }

    /// All mappings for one catalog type.
    pub fn list_mappings(
        &self,
        org_id: OrganizationId,
        catalog_type: CatalogType,
    ) -> EngineResult<Vec<Mapping>> {
        self.read(org_id, |state| {
            Ok(state
                .mappings
                .iter()
                .filter(|m| m.catalog_type == catalog_type)
                .cloned()
                .collect())
        })
    }

    /// Exports one catalog's mappings as `official,internal,usage` CSV.
    pub fn export_mapping_csv(
        &self,
        org_id: OrganizationId,
        catalog_type: CatalogType,
    ) -> EngineResult<String> {
        self.read(org_id, |state| {
            let mut rows = Vec::new();
            for mapping in state.mappings.iter().filter(|m| m.catalog_type == catalog_type) {
                let account = state
                    .account(mapping.account_id)
                    .ok_or(RegistryError::AccountNotFound(mapping.account_id))?;
                rows.push(MappingRow {
                    official: mapping.official_code.clone(),
                    internal: account.code.clone(),
                    usage: mapping.usage.clone(),
                });
            }
            Ok(write_mapping_csv(&rows)?)
        })
    }

    /// Imports a mapping CSV as manual mappings. The whole file is
    /// resolved before anything is written, so a bad row changes
    /// nothing.
    pub fn import_mapping_csv(
        &self,
        org_id: OrganizationId,
        catalog_type: CatalogType,
        text: &str,
    ) -> EngineResult<Vec<Mapping>> {
        self.write(org_id, |state| {
            let rows = read_mapping_csv(text)?;
            let catalog = state
                .catalogs
                .get(&catalog_type)
                .ok_or(CatalogError::CatalogUnavailable { catalog_type })?;

            let mut incoming = Vec::with_capacity(rows.len());
            for row in rows {
                let account = state
                    .account_by_code(&row.internal)
                    .ok_or_else(|| RegistryError::CodeNotFound(row.internal.clone()))?;
                let entry = catalog
                    .entry(&row.official)
                    .ok_or_else(|| CatalogError::OfficialCodeNotFound(row.official.clone()))?;
                incoming.push(Mapping {
                    id: MappingId::new(),
                    organization_id: org_id,
                    account_id: account.id,
                    catalog_type,
                    official_code: entry.code.clone(),
                    official_name: entry.name.clone(),
                    origin: MappingOrigin::Manual,
                    confidence: None,
                    usage: row.usage,
                });
            }

            for mapping in &incoming {
                state
                    .mappings
                    .retain(|m| !(m.account_id == mapping.account_id && m.catalog_type == catalog_type));
            }
            state.mappings.extend(incoming.clone());
            Ok(incoming)
        })
    }

    // ---- automation rules ----

    /// Parses, validates, and stores a rule.
    pub fn create_rule(&self, org_id: OrganizationId, spec: NewRule) -> EngineResult<AutomationRule> {
        self.write(org_id, |state| {
            let condition = spec
                .condition
                .as_deref()
                .map(Condition::parse)
                .transpose()?;

            let mut lines = Vec::with_capacity(spec.lines.len());
            for line in spec.lines {
                check_postable(state, line.account_id)?;
                lines.push(RuleLine {
                    side: line.side,
                    account_id: line.account_id,
                    formula: AmountFormula::parse(&line.formula)?,
                    description: line.description,
                });
            }

            let rule = AutomationRule {
                id: RuleId::new(),
                organization_id: org_id,
                name: spec.name,
                trigger: spec.trigger,
                condition,
                is_active: true,
                priority: spec.priority,
                lines,
            };
            validate_rule(&rule)?;
            state.rules.push(rule.clone());
            Ok(rule)
        })
    }

    /// Replaces a rule's definition. The new condition and formulas go
    /// through the same parsing and trial balancing as at creation; a
    /// failure leaves the stored rule untouched. The rule keeps its id
    /// and active flag, so already-applied `(rule, event)` pairs stay
    /// deduplicated.
    pub fn update_rule(
        &self,
        org_id: OrganizationId,
        rule_id: RuleId,
        spec: NewRule,
    ) -> EngineResult<AutomationRule> {
        self.write(org_id, |state| {
            let index = state
                .rules
                .iter()
                .position(|r| r.id == rule_id)
                .ok_or(RuleError::RuleNotFound(rule_id))?;

            let condition = spec
                .condition
                .as_deref()
                .map(Condition::parse)
                .transpose()?;

            let mut lines = Vec::with_capacity(spec.lines.len());
            for line in spec.lines {
                check_postable(state, line.account_id)?;
                lines.push(RuleLine {
                    side: line.side,
                    account_id: line.account_id,
                    formula: AmountFormula::parse(&line.formula)?,
                    description: line.description,
                });
            }

            let rule = AutomationRule {
                id: rule_id,
                organization_id: org_id,
                name: spec.name,
                trigger: spec.trigger,
                condition,
                is_active: state.rules[index].is_active,
                priority: spec.priority,
                lines,
            };
            validate_rule(&rule)?;
            state.rules[index] = rule.clone();
            Ok(rule)
        })
    }

    /// Every rule of the organization, by priority.
    pub fn list_rules(&self, org_id: OrganizationId) -> EngineResult<Vec<AutomationRule>> {
        self.read(org_id, |state| {
            let mut rules = state.rules.clone();
            rules.sort_by_key(|r| r.priority);
            Ok(rules)
        })
    }

    /// Activates or deactivates a rule.
    pub fn set_rule_active(
        &self,
        org_id: OrganizationId,
        rule_id: RuleId,
        is_active: bool,
    ) -> EngineResult<AutomationRule> {
        self.write(org_id, |state| {
            let rule = state
                .rules
                .iter_mut()
                .find(|r| r.id == rule_id)
                .ok_or(RuleError::RuleNotFound(rule_id))?;
            rule.is_active = is_active;
            Ok(rule.clone())
        })
    }

    /// Applies a business event: one draft entry per matching rule.
    ///
    /// The whole application is atomic under the organization's write
    /// guard. Rule/event pairs already applied are skipped as benign
    /// no-ops; any resolution failure rolls the entire event back.
    pub fn apply_event(
        &self,
        org_id: OrganizationId,
        event: &BusinessEvent,
        event_date: NaiveDate,
    ) -> EngineResult<EventOutcome> {
        self.write(org_id, |state| {
            let minor_units = state.organization.minor_units();
            let currency = state.organization.base_currency.clone();
            let mut outcome = EventOutcome::default();
            let mut fired: Vec<(RuleId, Vec<JournalLine>, String)> = Vec::new();

            for rule in matching_rules(&state.rules, event) {
                if state.applied_events.contains(&(rule.id, event.id)) {
                    outcome.replayed.push(rule.id);
                    continue;
                }
                let resolved = resolve_lines(rule, event, minor_units)?;
                let lines: Vec<JournalLine> = resolved
                    .into_iter()
                    .map(|r| JournalLine {
                        account_id: r.account_id,
                        debit: (r.side == Side::Debit).then_some(r.amount),
                        credit: (r.side == Side::Credit).then_some(r.amount),
                        currency: None,
                        exchange_rate: None,
                        description: r.description,
                    })
                    .collect();
                validate_lines(&lines, &currency, minor_units)?;
                fired.push((rule.id, lines, rule.name.clone()));
            }

            // All rules resolved; commit.
            for (rule_id, lines, name) in fired {
                let (year, month) = (event_date.year(), event_date.month());
                ensure_period(state, year, month)?;
                let entry = JournalEntry {
                    id: JournalEntryId::new(),
                    organization_id: org_id,
                    entry_number: state.next_entry_number(year, month),
                    entry_date: event_date,
                    description: name,
                    currency: currency.clone(),
                    entry_type: EntryType::Auto,
                    status: EntryStatus::Draft,
                    lines,
                    source_rule_id: Some(rule_id),
                    source_event_id: Some(event.id),
                    reversal_of: None,
                    created_at: Utc::now(),
                    posted_at: None,
                    posted_by: None,
                    approved_by: None,
                };
                state.applied_events.insert((rule_id, event.id));
                state.entries.push(entry.clone());
                outcome.created.push(entry);
            }
            Ok(outcome)
        })
    }

    // ---- journal ledger ----

    /// Creates a manual draft entry.
    pub fn create_draft(
        &self,
        org_id: OrganizationId,
        entry_date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<JournalLine>,
    ) -> EngineResult<JournalEntry> {
        self.write(org_id, |state| {
            let minor_units = state.organization.minor_units();
            let currency = state.organization.base_currency.clone();
            validate_lines(&lines, &currency, minor_units)?;
            for line in &lines {
                check_postable(state, line.account_id)?;
            }
            let (year, month) = (entry_date.year(), entry_date.month());
            ensure_period(state, year, month)?;
            let entry = JournalEntry {
                id: JournalEntryId::new(),
                organization_id: org_id,
                entry_number: state.next_entry_number(year, month),
                entry_date,
                description: description.into(),
                currency,
                entry_type: EntryType::Manual,
                status: EntryStatus::Draft,
                lines,
                source_rule_id: None,
                source_event_id: None,
                reversal_of: None,
                created_at: Utc::now(),
                posted_at: None,
                posted_by: None,
                approved_by: None,
            };
            state.entries.push(entry.clone());
            Ok(entry)
        })
    }

    /// Entry by id.
    pub fn get_entry(
        &self,
        org_id: OrganizationId,
        entry_id: JournalEntryId,
    ) -> EngineResult<JournalEntry> {
        self.read(org_id, |state| {
            state
                .entries
                .iter()
                .find(|e| e.id == entry_id)
                .cloned()
                .ok_or_else(|| LedgerError::EntryNotFound(entry_id).into())
        })
    }

    /// Entries in creation order, optionally filtered to one period.
    pub fn list_entries(
        &self,
        org_id: OrganizationId,
        period: Option<(i32, u32)>,
    ) -> EngineResult<Vec<JournalEntry>> {
        self.read(org_id, |state| {
            Ok(state
                .entries
                .iter()
                .filter(|e| period.is_none() || period == Some(e.period()))
                .cloned()
                .collect())
        })
    }

    /// Posts a draft. The target period must be open; the balance is
    /// re-checked so nothing unbalanced can slip in between draft and
    /// post.
    pub fn post_entry(
        &self,
        org_id: OrganizationId,
        entry_id: JournalEntryId,
        by: UserId,
    ) -> EngineResult<JournalEntry> {
        self.write(org_id, |state| {
            let minor_units = state.organization.minor_units();
            let (year, month) = {
                let entry = find_entry(state, entry_id)?;
                if entry.status != EntryStatus::Draft {
                    return Err(LedgerError::InvalidTransition {
                        action: "post",
                        status: status_name(entry.status),
                    }
                    .into());
                }
                validate_lines(&entry.lines, &entry.currency, minor_units)?;
                entry.period()
            };

            let period = state
                .period(year, month)
                .ok_or(FiscalError::PeriodNotFound { year, month })?;
            if !period.is_open() {
                return Err(LedgerError::PeriodNotOpen {
                    year,
                    month,
                    status: period.status,
                }
                .into());
            }

            let entry = find_entry_mut(state, entry_id)?;
            entry.status = EntryStatus::Posted;
            entry.posted_at = Some(Utc::now());
            entry.posted_by = Some(by);
            Ok(entry.clone())
        })
    }

    /// Approves a posted entry, recording the approver.
    pub fn approve_entry(
        &self,
        org_id: OrganizationId,
        entry_id: JournalEntryId,
        by: UserId,
    ) -> EngineResult<JournalEntry> {
        self.write(org_id, |state| {
            let entry = find_entry_mut(state, entry_id)?;
            if entry.status != EntryStatus::Posted {
                return Err(LedgerError::InvalidTransition {
                    action: "approve",
                    status: status_name(entry.status),
                }
                .into());
            }
            entry.status = EntryStatus::Approved;
            entry.approved_by = Some(by);
            Ok(entry.clone())
        })
    }

    /// Cancels an entry. Drafts cancel freely. Posted entries cancel
    /// directly only when the organization does not require approval;
    /// approved entries always go through a reversal.
    pub fn cancel_entry(
        &self,
        org_id: OrganizationId,
        entry_id: JournalEntryId,
    ) -> EngineResult<JournalEntry> {
        self.write(org_id, |state| {
            let require_approval = state.organization.settings.require_approval;
            let entry = find_entry_mut(state, entry_id)?;
            match entry.status {
                EntryStatus::Draft => {}
                EntryStatus::Posted if !require_approval => {}
                EntryStatus::Posted | EntryStatus::Approved => {
                    return Err(LedgerError::ReversalRequired.into());
                }
                EntryStatus::Cancelled => {
                    return Err(LedgerError::InvalidTransition {
                        action: "cancel",
                        status: status_name(entry.status),
                    }
                    .into());
                }
            }
            entry.status = EntryStatus::Cancelled;
            Ok(entry.clone())
        })
    }

    /// Reverses a posted entry with a mirrored draft dated into the
    /// earliest open period at or after the original's. The original
    /// stays untouched.
    pub fn reverse_entry(
        &self,
        org_id: OrganizationId,
        entry_id: JournalEntryId,
    ) -> EngineResult<JournalEntry> {
        self.write(org_id, |state| {
            let (original, original_period) = {
                let entry = find_entry(state, entry_id)?;
                (entry.clone(), entry.period())
            };

            let target = state
                .periods
                .iter()
                .filter(|p| p.is_open() && (p.year, p.month) >= original_period)
                .map(|p| (p.year, p.month))
                .min()
                .ok_or(LedgerError::NoOpenPeriod)?;

            let entry_date = if target == original_period {
                original.entry_date
            } else {
                NaiveDate::from_ymd_opt(target.0, target.1, 1)
                    .ok_or(FiscalError::InvalidMonth(target.1))?
            };

            let number = state.next_entry_number(target.0, target.1);
            let reversal = build_reversal(&original, number, entry_date)?;
            state.entries.push(reversal.clone());
            Ok(reversal)
        })
    }

    // ---- fiscal periods ----

    /// Opens a period, or returns the existing one.
    pub fn open_period(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
    ) -> EngineResult<FiscalPeriod> {
        self.write(org_id, |state| {
            if !(1..=12).contains(&month) {
                return Err(FiscalError::InvalidMonth(month).into());
            }
            ensure_period(state, year, month)?;
            state
                .period(year, month)
                .cloned()
                .ok_or_else(|| FiscalError::PeriodNotFound { year, month }.into())
        })
    }

    /// Periods sorted by year and month.
    pub fn list_periods(&self, org_id: OrganizationId) -> EngineResult<Vec<FiscalPeriod>> {
        self.read(org_id, |state| {
            let mut periods = state.periods.clone();
            periods.sort_by_key(|p| (p.year, p.month));
            Ok(periods)
        })
    }

    /// Ticks one closing-checklist task.
    pub fn complete_closing_task(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
        task: ClosingTask,
    ) -> EngineResult<FiscalPeriod> {
        self.write(org_id, |state| {
            let period = state
                .period_mut(year, month)
                .ok_or(FiscalError::PeriodNotFound { year, month })?;
            if period.status != PeriodStatus::Open {
                return Err(FiscalError::InvalidTransition {
                    from: period.status,
                    action: "update checklist of",
                }
                .into());
            }
            period.checklist.complete(task);
            Ok(period.clone())
        })
    }

    /// Closes a period; the checklist must be complete.
    pub fn close_period(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
        by: UserId,
    ) -> EngineResult<FiscalPeriod> {
        self.write(org_id, |state| {
            let period = state
                .period_mut(year, month)
                .ok_or(FiscalError::PeriodNotFound { year, month })?;
            let audit = period.close(by)?;
            let snapshot = period.clone();
            state.audit_log.push(audit);
            Ok(snapshot)
        })
    }

    /// Locks a closed period.
    pub fn lock_period(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
        by: UserId,
    ) -> EngineResult<FiscalPeriod> {
        self.write(org_id, |state| {
            let period = state
                .period_mut(year, month)
                .ok_or(FiscalError::PeriodNotFound { year, month })?;
            let audit = period.lock(by)?;
            let snapshot = period.clone();
            state.audit_log.push(audit);
            Ok(snapshot)
        })
    }

    /// Admin override: reopens a locked period and records the action
    /// in the audit log.
    pub fn unlock_period(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
        by: UserId,
        reason: impl Into<String>,
    ) -> EngineResult<FiscalPeriod> {
        let reason = reason.into();
        self.write(org_id, |state| {
            let period = state
                .period_mut(year, month)
                .ok_or(FiscalError::PeriodNotFound { year, month })?;
            let audit = period.unlock(by, reason)?;
            let snapshot = period.clone();
            state.audit_log.push(audit);
            Ok(snapshot)
        })
    }

    /// The audit trail, oldest first.
    pub fn audit_log(&self, org_id: OrganizationId) -> EngineResult<Vec<AuditRecord>> {
        self.read(org_id, |state| Ok(state.audit_log.clone()))
    }

    // ---- financial statements ----

    /// Trial balance for one period.
    pub fn trial_balance(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
    ) -> EngineResult<TrialBalance> {
        self.read(org_id, |state| {
            Ok(trial_balance(&state.accounts, &state.entries, year, month))
        })
    }

    /// Balance sheet as of a period's end.
    pub fn balance_sheet(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
    ) -> EngineResult<BalanceSheet> {
        self.read(org_id, |state| {
            Ok(balance_sheet(&state.accounts, &state.entries, year, month))
        })
    }

    /// Income statement over an inclusive period range.
    pub fn income_statement(
        &self,
        org_id: OrganizationId,
        from: (i32, u32),
        to: (i32, u32),
    ) -> EngineResult<IncomeStatement> {
        validate_range(from, to)?;
        self.read(org_id, |state| {
            Ok(income_statement(&state.accounts, &state.entries, from, to))
        })
    }

    /// Cash flow statement over an inclusive period range.
    pub fn cash_flow(
        &self,
        org_id: OrganizationId,
        from: (i32, u32),
        to: (i32, u32),
    ) -> EngineResult<CashFlow> {
        validate_range(from, to)?;
        self.read(org_id, |state| {
            Ok(cash_flow(&state.accounts, &state.entries, from, to))
        })
    }

    /// Trial balance rendered in the pipe-delimited interchange format.
    pub fn export_balance_lines(
        &self,
        org_id: OrganizationId,
        year: i32,
        month: u32,
    ) -> EngineResult<String> {
        self.read(org_id, |state| {
            let tb = trial_balance(&state.accounts, &state.entries, year, month);
            Ok(write_balance_lines(&tb)?)
        })
    }
}

/// Both endpoints must be real months and the start must not follow
/// the end.
fn validate_range(from: (i32, u32), to: (i32, u32)) -> Result<(), EngineError> {
    if !(1..=12).contains(&from.1) {
        return Err(FiscalError::InvalidMonth(from.1).into());
    }
    if !(1..=12).contains(&to.1) {
        return Err(FiscalError::InvalidMonth(to.1).into());
    }
    if from > to {
        return Err(FiscalError::InvalidRange {
            from_year: from.0,
            from_month: from.1,
            to_year: to.0,
            to_month: to.1,
        }
        .into());
    }
    Ok(())
}

/// The account must exist, be active, and accept transactions.
fn check_postable(state: &OrgState, account_id: AccountId) -> Result<(), RegistryError> {
    let account = state
        .account(account_id)
        .ok_or(RegistryError::AccountNotFound(account_id))?;
    if !account.is_active {
        return Err(RegistryError::AccountInactive(account_id));
    }
    if !account.allows_transactions {
        return Err(RegistryError::NoTransactionsAllowed(account_id));
    }
    Ok(())
}

/// Creates the period on first use. An existing period is left alone
/// whatever its status; gating happens at post time.
fn ensure_period(state: &mut OrgState, year: i32, month: u32) -> Result<(), EngineError> {
    if !(1..=12).contains(&month) {
        return Err(FiscalError::InvalidMonth(month).into());
    }
    if state.period(year, month).is_none() {
        let period = FiscalPeriod::open(state.organization.id, year, month);
        state.periods.push(period);
    }
    Ok(())
}

fn find_entry(state: &OrgState, id: JournalEntryId) -> Result<&JournalEntry, LedgerError> {
    state
        .entries
        .iter()
        .find(|e| e.id == id)
        .ok_or(LedgerError::EntryNotFound(id))
}

fn find_entry_mut(
    state: &mut OrgState,
    id: JournalEntryId,
) -> Result<&mut JournalEntry, LedgerError> {
    state
        .entries
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or(LedgerError::EntryNotFound(id))
}

const fn status_name(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Draft => "DRAFT",
        EntryStatus::Posted => "POSTED",
        EntryStatus::Approved => "APPROVED",
        EntryStatus::Cancelled => "CANCELLED",
    }
}
