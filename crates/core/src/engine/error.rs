//! Unified engine error.

use thiserror::Error;

use contara_shared::types::OrganizationId;

use crate::catalog::CatalogError;
use crate::fiscal::FiscalError;
use crate::interchange::InterchangeError;
use crate::ledger::LedgerError;
use crate::registry::RegistryError;
use crate::rules::RuleError;

/// Any error an engine operation can surface. Wraps the per-module
/// error enums so the API layer maps one type into the response
/// envelope.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown organization.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// A lock was poisoned by a panicking writer.
    #[error("Organization state lock poisoned")]
    Poisoned,

    /// Chart-of-accounts error.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Catalog mapping error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Automation rule error.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Journal ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Fiscal period error.
    #[error(transparent)]
    Fiscal(#[from] FiscalError),

    /// Interchange format error.
    #[error(transparent)]
    Interchange(#[from] InterchangeError),
}

impl EngineError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::OrganizationNotFound(_) => "ORGANIZATION_NOT_FOUND",
            Self::Poisoned => "INTERNAL_ERROR",
            Self::Registry(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
            Self::Rule(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Fiscal(e) => e.error_code(),
            Self::Interchange(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::OrganizationNotFound(_) => 404,
            Self::Poisoned => 500,
            Self::Registry(e) => e.http_status_code(),
            Self::Catalog(e) => e.http_status_code(),
            Self::Rule(e) => e.http_status_code(),
            Self::Ledger(e) => e.http_status_code(),
            Self::Fiscal(e) => e.http_status_code(),
            Self::Interchange(e) => e.http_status_code(),
        }
    }
}
