//! Fiscal period error types.

use thiserror::Error;

use super::types::{ClosingTask, PeriodStatus};

/// Errors raised while managing fiscal periods.
#[derive(Debug, Error)]
pub enum FiscalError {
    /// No period exists for the given year and month.
    #[error("Fiscal period {year}-{month:02} not found")]
    PeriodNotFound {
        /// Period year.
        year: i32,
        /// Period month.
        month: u32,
    },

    /// The closing checklist has outstanding tasks.
    #[error("Closing checklist incomplete: {missing:?}")]
    ChecklistIncomplete {
        /// Outstanding tasks, in close order.
        missing: Vec<ClosingTask>,
    },

    /// The period's status does not allow the requested action.
    #[error("Cannot {action} a {from} period")]
    InvalidTransition {
        /// Current period status.
        from: PeriodStatus,
        /// Requested action.
        action: &'static str,
    },

    /// The month is outside 1 through 12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// The period range's end precedes its start.
    #[error("Invalid period range: {from_year}-{from_month:02} to {to_year}-{to_month:02}")]
    InvalidRange {
        /// Range start year.
        from_year: i32,
        /// Range start month.
        from_month: u32,
        /// Range end year.
        to_year: i32,
        /// Range end month.
        to_month: u32,
    },
}

impl FiscalError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PeriodNotFound { .. } => "PERIOD_NOT_FOUND",
            Self::ChecklistIncomplete { .. } => "CHECKLIST_INCOMPLETE",
            Self::InvalidTransition { .. } => "INVALID_PERIOD_TRANSITION",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::InvalidRange { .. } => "INVALID_PERIOD_RANGE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::PeriodNotFound { .. } => 404,
            Self::ChecklistIncomplete { .. } | Self::InvalidTransition { .. } => 409,
            Self::InvalidMonth(_) | Self::InvalidRange { .. } => 400,
        }
    }
}
