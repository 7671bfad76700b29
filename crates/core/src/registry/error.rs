//! Registry error types.

use thiserror::Error;

use contara_shared::types::AccountId;

/// Errors that can occur during chart-of-accounts operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Code does not extend the parent's code under the country rule.
    #[error("Code {code} does not extend parent code {parent_code} under the country's segmentation rule")]
    InvalidHierarchy {
        /// The offending code.
        code: String,
        /// The parent's code.
        parent_code: String,
    },

    /// Code already exists in the organization.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No account carries this code.
    #[error("No account with code {0}")]
    CodeNotFound(String),

    /// Account is referenced by journal lines or active rules.
    #[error("Account {0} is referenced by journal lines or active rules and cannot be deactivated")]
    AccountInUse(AccountId),

    /// Account does not allow transactions (non-leaf account).
    #[error("Account {0} does not allow transactions")]
    NoTransactionsAllowed(AccountId),

    /// Account is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),
}

impl RegistryError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidHierarchy { .. } => "INVALID_HIERARCHY",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CodeNotFound(_) => "ACCOUNT_CODE_NOT_FOUND",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
            Self::NoTransactionsAllowed(_) => "NO_TRANSACTIONS_ALLOWED",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidHierarchy { .. }
            | Self::DuplicateCode(_)
            | Self::NoTransactionsAllowed(_)
            | Self::AccountInactive(_) => 400,
            Self::ParentNotFound(_) | Self::AccountNotFound(_) | Self::CodeNotFound(_) => 404,
            Self::AccountInUse(_) => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RegistryError::DuplicateCode("101".into()).error_code(),
            "DUPLICATE_CODE"
        );
        assert_eq!(
            RegistryError::AccountInUse(AccountId::new()).http_status_code(),
            409
        );
    }
}
