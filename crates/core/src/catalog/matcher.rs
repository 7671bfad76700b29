//! Auto-mapping matcher.
//!
//! Matches internal accounts against official catalog entries by longest
//! common numeric code prefix and name-token overlap. The confidence is
//! `0.6 * prefix_ratio + 0.4 * name_jaccard`, both components in [0,1].

use std::collections::HashSet;

use rust_decimal::Decimal;

use contara_shared::types::{AccountId, MappingId};

use super::types::{Mapping, MappingOrigin, OfficialCatalog, OfficialEntry};
use crate::registry::Account;

const PREFIX_WEIGHT: Decimal = Decimal::from_parts(6, 0, 0, false, 1); // 0.6
const NAME_WEIGHT: Decimal = Decimal::from_parts(4, 0, 0, false, 1); // 0.4

/// Result of one auto-mapping pass.
#[derive(Debug, Default)]
pub struct AutoMapOutcome {
    /// Mappings created (or refreshed) by this pass.
    pub created: Vec<Mapping>,
    /// Accounts whose best match fell below the threshold; surfaced for
    /// manual resolution.
    pub unmapped: Vec<AccountId>,
}

/// Confidence score for one account/entry pair.
#[must_use]
pub fn confidence(account: &Account, entry: &OfficialEntry) -> Decimal {
    let prefix = numeric_prefix_ratio(&account.code, &entry.code);
    let name = token_jaccard(&account.name, &entry.name);
    PREFIX_WEIGHT * prefix + NAME_WEIGHT * name
}

/// Runs an auto-mapping pass over `accounts` against one catalog.
///
/// Accounts holding a MANUAL mapping for this catalog type are never
/// touched. Existing AUTO mappings are refreshed. Matches below
/// `threshold` are not created; those accounts are reported back as
/// unmapped instead.
#[must_use]
pub fn auto_map(
    accounts: &[Account],
    existing: &[Mapping],
    catalog: &OfficialCatalog,
    threshold: Decimal,
) -> AutoMapOutcome {
    let mut outcome = AutoMapOutcome::default();

    for account in accounts.iter().filter(|a| a.is_active) {
        let pinned = existing.iter().any(|m| {
            m.account_id == account.id
                && m.catalog_type == catalog.catalog_type
                && m.is_pinned()
        });
        if pinned {
            continue;
        }

        let best = catalog
            .entries
            .iter()
            .map(|entry| (entry, confidence(account, entry)))
            .max_by_key(|(_, score)| *score);

        match best {
            Some((entry, score)) if score >= threshold => {
                outcome.created.push(Mapping {
                    id: MappingId::new(),
                    organization_id: account.organization_id,
                    account_id: account.id,
                    catalog_type: catalog.catalog_type,
                    official_code: entry.code.clone(),
                    official_name: entry.name.clone(),
                    origin: MappingOrigin::Auto,
                    confidence: Some(score),
                    usage: String::new(),
                });
            }
            _ => outcome.unmapped.push(account.id),
        }
    }

    outcome
}

/// Ratio of the longest common numeric prefix to the longer code.
///
/// Non-digit characters (dots, dashes) are ignored so `601.56` and
/// `60156` compare equal.
fn numeric_prefix_ratio(internal: &str, official: &str) -> Decimal {
    let a: Vec<char> = internal.chars().filter(char::is_ascii_digit).collect();
    let b: Vec<char> = official.chars().filter(char::is_ascii_digit).collect();

    let longest = a.len().max(b.len());
    if longest == 0 {
        return Decimal::ZERO;
    }

    let common = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    Decimal::from(common) / Decimal::from(longest)
}

/// Jaccard similarity of lowercased name tokens.
fn token_jaccard(internal: &str, official: &str) -> Decimal {
    let a = tokens(internal);
    let b = tokens(official);

    if a.is_empty() && b.is_empty() {
        return Decimal::ZERO;
    }

    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    Decimal::from(intersection) / Decimal::from(union)
}

fn tokens(name: &str) -> HashSet<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
