//! Rule engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

use contara_shared::types::RuleId;

/// Errors that can occur when saving or firing automation rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule must contain at least two lines.
    #[error("Rule must contain at least two lines")]
    TooFewLines,

    /// The condition expression could not be parsed.
    #[error("Unparsable condition expression: {0}")]
    InvalidCondition(String),

    /// The amount formula could not be parsed.
    #[error("Unparsable amount formula: {0}")]
    InvalidFormula(String),

    /// A percent-of-line formula references a line at or after itself.
    #[error("Line formula references line {line}, which is not an earlier line")]
    ForwardLineReference {
        /// The referenced 1-indexed line number.
        line: usize,
    },

    /// The rule's lines cannot produce a balanced entry.
    #[error("Rule lines cannot balance: debits {debit} != credits {credit} on trial evaluation")]
    UnbalancedRule {
        /// Trial debit total.
        debit: Decimal,
        /// Trial credit total.
        credit: Decimal,
    },

    /// A fired rule produced an unbalanced entry.
    #[error("Rule output is unbalanced: debits {debit} != credits {credit}")]
    UnbalancedRuleOutput {
        /// Resolved debit total.
        debit: Decimal,
        /// Resolved credit total.
        credit: Decimal,
    },

    /// The event payload has no numeric `amount` field.
    #[error("Event payload has no base amount")]
    MissingBaseAmount,

    /// A resolved line amount was zero or negative.
    #[error("Line {line} resolved to a non-positive amount")]
    NonPositiveLineAmount {
        /// The offending 1-indexed line number.
        line: usize,
    },

    /// Rule not found.
    #[error("Rule not found: {0}")]
    RuleNotFound(RuleId),
}

impl RuleError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewLines => "RULE_TOO_FEW_LINES",
            Self::InvalidCondition(_) => "INVALID_CONDITION",
            Self::InvalidFormula(_) => "INVALID_FORMULA",
            Self::ForwardLineReference { .. } => "FORWARD_LINE_REFERENCE",
            Self::UnbalancedRule { .. } => "UNBALANCED_RULE",
            Self::UnbalancedRuleOutput { .. } => "UNBALANCED_RULE_OUTPUT",
            Self::MissingBaseAmount => "MISSING_BASE_AMOUNT",
            Self::NonPositiveLineAmount { .. } => "NON_POSITIVE_LINE_AMOUNT",
            Self::RuleNotFound(_) => "RULE_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::RuleNotFound(_) => 404,
            Self::UnbalancedRuleOutput { .. } => 422,
            _ => 400,
        }
    }
}
