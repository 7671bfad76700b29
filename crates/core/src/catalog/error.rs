//! Catalog mapping error types.

use thiserror::Error;

use contara_shared::types::AccountId;

use super::types::CatalogType;

/// Errors that can occur during catalog mapping operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No catalog of the requested type is loaded for the organization's
    /// country.
    #[error("No {catalog_type:?} catalog available for this organization")]
    CatalogUnavailable {
        /// The requested catalog family.
        catalog_type: CatalogType,
    },

    /// The official code does not exist in the catalog.
    #[error("Official code not found in catalog: {0}")]
    OfficialCodeNotFound(String),

    /// No mapping exists for the account and catalog type.
    #[error("No mapping for account {account_id} in catalog {catalog_type:?}")]
    MappingNotFound {
        /// The internal account.
        account_id: AccountId,
        /// The catalog family.
        catalog_type: CatalogType,
    },
}

impl CatalogError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            Self::OfficialCodeNotFound(_) => "OFFICIAL_CODE_NOT_FOUND",
            Self::MappingNotFound { .. } => "MAPPING_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::CatalogUnavailable { .. } => 400,
            Self::OfficialCodeNotFound(_) | Self::MappingNotFound { .. } => 404,
        }
    }
}
