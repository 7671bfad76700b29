//! Organization and organization-level settings.
//!
//! The organization owns every other entity and is the unit of isolation
//! for concurrency and access control.

use serde::{Deserialize, Serialize};

use contara_shared::types::OrganizationId;

use crate::registry::Country;

/// An organization (legal entity) keeping books in one jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Country of incorporation. Decides the chart-of-accounts
    /// segmentation rule and which official catalogs apply.
    pub country: Country,
    /// Base currency code (ISO 4217).
    pub base_currency: String,
    /// First month of the fiscal year (1-12).
    pub fiscal_year_start_month: u32,
    /// Organization-level accounting settings.
    pub settings: OrgSettings,
}

/// Accounting settings that change ledger behavior.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrgSettings {
    /// When true, posted entries require an approval step and can no
    /// longer be cancelled directly.
    pub require_approval: bool,
}

impl Organization {
    /// Minor units of the base currency. The Chilean peso carries none;
    /// every other supported currency uses two.
    #[must_use]
    pub fn minor_units(&self) -> u32 {
        if self.base_currency == "CLP" {
            0
        } else {
            2
        }
    }

    /// Creates an organization with default settings.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        country: Country,
        base_currency: impl Into<String>,
        fiscal_year_start_month: u32,
    ) -> Self {
        Self {
            id: OrganizationId::new(),
            name: name.into(),
            country,
            base_currency: base_currency.into(),
            fiscal_year_start_month,
            settings: OrgSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_organization_defaults() {
        let org = Organization::new("Acme MX", Country::Mx, "MXN", 1);
        assert_eq!(org.base_currency, "MXN");
        assert!(!org.settings.require_approval);
    }
}
