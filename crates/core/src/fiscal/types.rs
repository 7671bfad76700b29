//! Fiscal period, closing checklist, and audit types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use contara_shared::types::{FiscalPeriodId, OrganizationId, UserId};

use super::error::FiscalError;

/// Fiscal period lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    /// Accepts postings.
    Open,
    /// Closed; no postings, unlockable checklist already ran.
    Closed,
    /// Hardened; only an audited admin unlock reopens it.
    Locked,
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Locked => "LOCKED",
        };
        f.write_str(s)
    }
}

/// The tasks that must be ticked off before a period closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClosingTask {
    /// Depreciation run posted.
    Depreciation,
    /// Balance reclassifications reviewed.
    Reclassifications,
    /// Period tax calculated.
    TaxCalculation,
    /// Closing entries posted.
    ClosingEntries,
    /// Period result transferred to equity.
    ResultTransfer,
}

impl ClosingTask {
    /// Every task, in the order the close runs them.
    pub const ALL: [Self; 5] = [
        Self::Depreciation,
        Self::Reclassifications,
        Self::TaxCalculation,
        Self::ClosingEntries,
        Self::ResultTransfer,
    ];
}

/// Per-period closing checklist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClosingChecklist {
    /// Completed tasks.
    completed: Vec<ClosingTask>,
}

impl ClosingChecklist {
    /// Marks a task done. Idempotent.
    pub fn complete(&mut self, task: ClosingTask) {
        if !self.completed.contains(&task) {
            self.completed.push(task);
        }
    }

    /// Whether a specific task is done.
    #[must_use]
    pub fn is_done(&self, task: ClosingTask) -> bool {
        self.completed.contains(&task)
    }

    /// Whether every task is done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ClosingTask::ALL.iter().all(|t| self.completed.contains(t))
    }

    /// Tasks still outstanding, in close order.
    #[must_use]
    pub fn missing(&self) -> Vec<ClosingTask> {
        ClosingTask::ALL
            .iter()
            .copied()
            .filter(|t| !self.completed.contains(t))
            .collect()
    }
}

/// A fiscal period, one calendar month of one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Unique identifier.
    pub id: FiscalPeriodId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 through 12.
    pub month: u32,
    /// Lifecycle state.
    pub status: PeriodStatus,
    /// Closing checklist; relevant while open.
    pub checklist: ClosingChecklist,
    /// Set when closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Who closed the period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<UserId>,
    /// Set when locked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<DateTime<Utc>>,
    /// Who locked the period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<UserId>,
}

impl FiscalPeriod {
    /// An open period with an empty checklist.
    #[must_use]
    pub fn open(organization_id: OrganizationId, year: i32, month: u32) -> Self {
        Self {
            id: FiscalPeriodId::new(),
            organization_id,
            year,
            month,
            status: PeriodStatus::Open,
            checklist: ClosingChecklist::default(),
            closed_at: None,
            closed_by: None,
            locked_at: None,
            locked_by: None,
        }
    }

    /// Whether the period accepts postings.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, PeriodStatus::Open)
    }

    /// Closes the period and returns the audit record the caller must
    /// persist. Requires the full checklist and `Open`.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistIncomplete` with the outstanding tasks, or
    /// `InvalidTransition` if not open.
    pub fn close(&mut self, by: UserId) -> Result<AuditRecord, FiscalError> {
        if self.status != PeriodStatus::Open {
            return Err(FiscalError::InvalidTransition {
                from: self.status,
                action: "close",
            });
        }
        if !self.checklist.is_complete() {
            return Err(FiscalError::ChecklistIncomplete {
                missing: self.checklist.missing(),
            });
        }
        self.status = PeriodStatus::Closed;
        self.closed_at = Some(Utc::now());
        self.closed_by = Some(by);
        Ok(self.audit(AuditAction::PeriodClosed, by, String::new()))
    }

    /// Locks a closed period and returns the audit record the caller
    /// must persist.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the period is closed.
    pub fn lock(&mut self, by: UserId) -> Result<AuditRecord, FiscalError> {
        if self.status != PeriodStatus::Closed {
            return Err(FiscalError::InvalidTransition {
                from: self.status,
                action: "lock",
            });
        }
        self.status = PeriodStatus::Locked;
        self.locked_at = Some(Utc::now());
        self.locked_by = Some(by);
        Ok(self.audit(AuditAction::PeriodLocked, by, String::new()))
    }

    /// Admin override: reopens a locked period and returns the audit
    /// record the caller must persist.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the period is locked.
    pub fn unlock(&mut self, by: UserId, reason: String) -> Result<AuditRecord, FiscalError> {
        if self.status != PeriodStatus::Locked {
            return Err(FiscalError::InvalidTransition {
                from: self.status,
                action: "unlock",
            });
        }
        self.status = PeriodStatus::Open;
        self.locked_at = None;
        self.locked_by = None;
        self.closed_at = None;
        self.closed_by = None;
        Ok(self.audit(AuditAction::PeriodUnlocked, by, reason))
    }

    fn audit(&self, action: AuditAction, actor: UserId, reason: String) -> AuditRecord {
        AuditRecord {
            organization_id: self.organization_id,
            year: self.year,
            month: self.month,
            action,
            actor,
            reason,
            at: Utc::now(),
        }
    }
}

/// Audited period actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A period was closed.
    PeriodClosed,
    /// A closed period was locked.
    PeriodLocked,
    /// A locked period was reopened.
    PeriodUnlocked,
}

/// One audit log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Period year.
    pub year: i32,
    /// Period month.
    pub month: u32,
    /// What happened.
    pub action: AuditAction,
    /// Who did it.
    pub actor: UserId,
    /// Stated justification.
    pub reason: String,
    /// When it happened.
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_period() -> FiscalPeriod {
        FiscalPeriod::open(OrganizationId::new(), 2026, 1)
    }

    #[test]
    fn test_close_requires_full_checklist() {
        let mut period = open_period();
        period.checklist.complete(ClosingTask::Depreciation);

        match period.close(UserId::new()) {
            Err(FiscalError::ChecklistIncomplete { missing }) => {
                assert_eq!(missing.len(), 4);
                assert!(!missing.contains(&ClosingTask::Depreciation));
            }
            other => panic!("expected ChecklistIncomplete, got {other:?}"),
        }
        assert_eq!(period.status, PeriodStatus::Open);
    }

    #[test]
    fn test_full_lifecycle_open_close_lock_unlock() {
        let mut period = open_period();
        for task in ClosingTask::ALL {
            period.checklist.complete(task);
        }
        let admin = UserId::new();

        let closed = period.close(admin).unwrap();
        assert_eq!(period.status, PeriodStatus::Closed);
        assert!(period.closed_at.is_some());
        assert_eq!(closed.action, AuditAction::PeriodClosed);

        let locked = period.lock(admin).unwrap();
        assert_eq!(period.status, PeriodStatus::Locked);
        assert_eq!(locked.action, AuditAction::PeriodLocked);

        let audit = period.unlock(admin, "late vendor invoice".to_string()).unwrap();
        assert_eq!(period.status, PeriodStatus::Open);
        assert_eq!(audit.action, AuditAction::PeriodUnlocked);
        assert_eq!(audit.actor, admin);
    }

    #[test]
    fn test_lock_requires_closed() {
        let mut period = open_period();
        assert!(matches!(
            period.lock(UserId::new()),
            Err(FiscalError::InvalidTransition { from: PeriodStatus::Open, .. })
        ));
    }

    #[test]
    fn test_unlock_requires_locked() {
        let mut period = open_period();
        assert!(matches!(
            period.unlock(UserId::new(), String::new()),
            Err(FiscalError::InvalidTransition { from: PeriodStatus::Open, .. })
        ));
    }

    #[test]
    fn test_checklist_complete_is_idempotent() {
        let mut checklist = ClosingChecklist::default();
        checklist.complete(ClosingTask::TaxCalculation);
        checklist.complete(ClosingTask::TaxCalculation);
        assert_eq!(checklist.missing().len(), 4);
        assert!(checklist.is_done(ClosingTask::TaxCalculation));
    }
}
