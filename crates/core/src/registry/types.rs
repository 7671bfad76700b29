//! Account and jurisdiction types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contara_shared::types::{AccountId, OrganizationId};

/// Supported jurisdictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    /// Mexico.
    Mx,
    /// Brazil.
    Br,
    /// United States.
    Us,
    /// Canada.
    Ca,
    /// Colombia.
    Co,
    /// Chile.
    Cl,
}

impl Country {
    /// The segmentation rule internal account codes follow in this country.
    ///
    /// Brazil-style charts nest with dots (`1.1.2`); the others extend a
    /// numeric prefix (`5001` under `5000`).
    #[must_use]
    pub const fn segmentation(self) -> CodeSegmentation {
        match self {
            Self::Br | Self::Co | Self::Cl => CodeSegmentation::Dotted,
            Self::Mx | Self::Us | Self::Ca => CodeSegmentation::Prefix,
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::Mx => "MX",
            Self::Br => "BR",
            Self::Us => "US",
            Self::Ca => "CA",
            Self::Co => "CO",
            Self::Cl => "CL",
        };
        write!(f, "{code}")
    }
}

/// How a child account code must extend its parent's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeSegmentation {
    /// Child appends exactly one dot-separated segment: `1.1` -> `1.1.2`.
    Dotted,
    /// Child strictly extends the parent's code as a string prefix:
    /// `50` -> `5001`.
    Prefix,
}

impl CodeSegmentation {
    /// Returns true if `child` is a strict extension of `parent` under
    /// this rule.
    #[must_use]
    pub fn extends(self, parent: &str, child: &str) -> bool {
        match self {
            Self::Dotted => match child.strip_prefix(parent) {
                Some(rest) => {
                    rest.len() > 1 && rest.starts_with('.') && !rest[1..].contains('.')
                }
                None => false,
            },
            Self::Prefix => child.len() > parent.len() && child.starts_with(parent),
        }
    }
}

/// Account classification.
///
/// In double-entry bookkeeping:
/// - Asset/Expense accounts are debit-normal (debits increase the balance)
/// - Liability/Equity/Income accounts are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Income account.
    Income,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// Returns true for debit-normal accounts (Asset, Expense).
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Signed balance change for a movement on an account of this type.
    ///
    /// Debit-normal: `debit - credit`; credit-normal: `credit - debit`.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }
}

/// A chart-of-accounts entry.
///
/// Accounts form a tree expressed as a flat collection with `parent_id`
/// references; parent/child indexes are rebuilt on demand (see
/// [`super::hierarchy::AccountTree`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Hierarchical code, unique within the organization.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Parent account; root accounts have none.
    pub parent_id: Option<AccountId>,
    /// Whether journal lines may reference this account (leaf accounts).
    pub allows_transactions: bool,
    /// Whether this account is a current (short-term) item. Used by the
    /// balance sheet split; not computed by the aggregator.
    pub is_current: bool,
    /// Soft-deactivation flag. Referenced accounts are never hard-deleted.
    pub is_active: bool,
}

/// Specification for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Hierarchical code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Parent account reference, if not a root.
    pub parent_id: Option<AccountId>,
    /// Whether journal lines may reference this account.
    pub allows_transactions: bool,
    /// Current vs non-current classification.
    #[serde(default)]
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dotted_extension() {
        let seg = CodeSegmentation::Dotted;
        assert!(seg.extends("1.1", "1.1.2"));
        assert!(seg.extends("1", "1.1"));
        assert!(!seg.extends("1.1", "1.1"));
        assert!(!seg.extends("1.1", "1.1.2.3"));
        assert!(!seg.extends("1.1", "1.12"));
        assert!(!seg.extends("1.1", "1.1."));
    }

    #[test]
    fn test_prefix_extension() {
        let seg = CodeSegmentation::Prefix;
        assert!(seg.extends("50", "5001"));
        assert!(!seg.extends("50", "50"));
        assert!(!seg.extends("50", "4001"));
    }

    #[test]
    fn test_country_segmentation() {
        assert_eq!(Country::Br.segmentation(), CodeSegmentation::Dotted);
        assert_eq!(Country::Mx.segmentation(), CodeSegmentation::Prefix);
    }

    #[test]
    fn test_balance_change_signs() {
        assert_eq!(
            AccountType::Asset.balance_change(dec!(100), dec!(30)),
            dec!(70)
        );
        assert_eq!(
            AccountType::Liability.balance_change(dec!(30), dec!(100)),
            dec!(70)
        );
        assert_eq!(
            AccountType::Income.balance_change(dec!(100), dec!(0)),
            dec!(-100)
        );
    }
}
