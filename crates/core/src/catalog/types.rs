//! Catalog and mapping types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contara_shared::types::{AccountId, MappingId, OrganizationId};

use crate::registry::Country;

/// Official catalog families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogType {
    /// Mexican SAT chart of accounts.
    Sat,
    /// Brazilian Plano de Contas Referencial.
    PlanoContas,
    /// US GAAP reference chart.
    Gaap,
    /// IFRS reference chart.
    Ifrs,
}

/// One entry of an official catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficialEntry {
    /// Official code (e.g. "601.56").
    pub code: String,
    /// Official name.
    pub name: String,
}

/// A jurisdiction-mandated reference catalog.
///
/// Supplied to the core as read-only reference data; never computed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficialCatalog {
    /// Catalog family.
    pub catalog_type: CatalogType,
    /// Jurisdiction this catalog belongs to.
    pub country: Country,
    /// The catalog entries.
    pub entries: Vec<OfficialEntry>,
}

impl OfficialCatalog {
    /// Looks up an entry by official code.
    #[must_use]
    pub fn entry(&self, code: &str) -> Option<&OfficialEntry> {
        self.entries.iter().find(|e| e.code == code)
    }
}

/// How a mapping came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MappingOrigin {
    /// Created by the matcher; carries a confidence score.
    Auto,
    /// Set by a person; pinned, never re-auto-mapped.
    Manual,
}

/// A link from one internal account to one official catalog code.
///
/// An internal account maps to at most one official code per catalog
/// type; several internal accounts may map to the same official code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    /// Unique identifier.
    pub id: MappingId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// The internal account.
    pub account_id: AccountId,
    /// Catalog family this mapping belongs to.
    pub catalog_type: CatalogType,
    /// The official code.
    pub official_code: String,
    /// The official name, denormalized for display and export.
    pub official_name: String,
    /// Mapping origin.
    pub origin: MappingOrigin,
    /// Confidence in [0,1]. Present exactly when `origin` is `Auto`.
    pub confidence: Option<Decimal>,
    /// Free-text usage descriptor, round-tripped through the CSV format.
    pub usage: String,
}

impl Mapping {
    /// Returns true if this mapping is pinned against auto-remapping.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        matches!(self.origin, MappingOrigin::Manual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_mapping_is_pinned() {
        let mapping = Mapping {
            id: MappingId::new(),
            organization_id: OrganizationId::new(),
            account_id: AccountId::new(),
            catalog_type: CatalogType::Sat,
            official_code: "601.56".into(),
            official_name: "Mantenimiento y conservación".into(),
            origin: MappingOrigin::Manual,
            confidence: None,
            usage: "Mantenimiento".into(),
        };
        assert!(mapping.is_pinned());
    }
}
