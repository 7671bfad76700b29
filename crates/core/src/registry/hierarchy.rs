//! Hierarchy validation and ordered traversal.
//!
//! The account set is a flat collection keyed by id with explicit
//! `parent_id` references; the parent-to-children index is derived here,
//! rebuilt on demand, so concurrent readers never share a mutable tree.

use std::collections::HashMap;

use contara_shared::types::AccountId;

use super::error::RegistryError;
use super::types::{Account, CodeSegmentation, NewAccount};

/// Validates a new account against the existing set.
///
/// Checks that the code is unique within the organization and, for
/// non-root accounts, that it strictly extends the parent's code under
/// the given segmentation rule.
///
/// # Errors
///
/// Returns `DuplicateCode`, `ParentNotFound`, or `InvalidHierarchy`.
pub fn validate_new_account(
    existing: &[Account],
    spec: &NewAccount,
    segmentation: CodeSegmentation,
) -> Result<(), RegistryError> {
    if existing.iter().any(|a| a.code == spec.code) {
        return Err(RegistryError::DuplicateCode(spec.code.clone()));
    }

    if let Some(parent_id) = spec.parent_id {
        let parent = existing
            .iter()
            .find(|a| a.id == parent_id)
            .ok_or(RegistryError::ParentNotFound(parent_id))?;

        if !segmentation.extends(&parent.code, &spec.code) {
            return Err(RegistryError::InvalidHierarchy {
                code: spec.code.clone(),
                parent_code: parent.code.clone(),
            });
        }
    }

    Ok(())
}

/// A derived, read-only view over a flat account set.
///
/// Built on demand from a snapshot; traversal yields accounts ordered by
/// code with parents before children, as a lazy sequence rather than a
/// nested tree object.
#[derive(Debug)]
pub struct AccountTree<'a> {
    roots: Vec<&'a Account>,
    children: HashMap<AccountId, Vec<&'a Account>>,
}

impl<'a> AccountTree<'a> {
    /// Builds the index from a snapshot of accounts.
    #[must_use]
    pub fn from_accounts(accounts: &'a [Account]) -> Self {
        let mut roots: Vec<&Account> = Vec::new();
        let mut children: HashMap<AccountId, Vec<&Account>> = HashMap::new();

        for account in accounts {
            match account.parent_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(account),
                None => roots.push(account),
            }
        }

        roots.sort_by(|a, b| a.code.cmp(&b.code));
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| a.code.cmp(&b.code));
        }

        Self { roots, children }
    }

    /// Direct children of the given account, ordered by code.
    #[must_use]
    pub fn children_of(&self, id: AccountId) -> &[&'a Account] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Depth-first traversal: ordered by code, parents before children.
    pub fn preorder(&self) -> impl Iterator<Item = &'a Account> + '_ {
        Preorder {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

struct Preorder<'t, 'a> {
    tree: &'t AccountTree<'a>,
    stack: Vec<&'a Account>,
}

impl<'a> Iterator for Preorder<'_, 'a> {
    type Item = &'a Account;

    fn next(&mut self) -> Option<Self::Item> {
        let account = self.stack.pop()?;
        for child in self.tree.children_of(account.id).iter().rev() {
            self.stack.push(child);
        }
        Some(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::types::AccountType;
    use contara_shared::types::OrganizationId;

    fn make_account(code: &str, parent: Option<&Account>) -> Account {
        Account {
            id: AccountId::new(),
            organization_id: OrganizationId::from_uuid(uuid::Uuid::nil()),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountType::Asset,
            parent_id: parent.map(|p| p.id),
            allows_transactions: parent.is_some(),
            is_current: true,
            is_active: true,
        }
    }

    fn spec_for(code: &str, parent: Option<&Account>) -> NewAccount {
        NewAccount {
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountType::Asset,
            parent_id: parent.map(|p| p.id),
            allows_transactions: true,
            is_current: true,
        }
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let root = make_account("100", None);
        let existing = vec![root];
        let result =
            validate_new_account(&existing, &spec_for("100", None), CodeSegmentation::Prefix);
        assert!(matches!(result, Err(RegistryError::DuplicateCode(_))));
    }

    #[test]
    fn test_invalid_hierarchy_rejected() {
        let root = make_account("100", None);
        let spec = spec_for("200.01", Some(&root));
        let existing = vec![root];
        let result = validate_new_account(&existing, &spec, CodeSegmentation::Prefix);
        assert!(matches!(result, Err(RegistryError::InvalidHierarchy { .. })));
    }

    #[test]
    fn test_valid_child_accepted() {
        let root = make_account("100", None);
        let spec = spec_for("100.01", Some(&root));
        let existing = vec![root];
        assert!(validate_new_account(&existing, &spec, CodeSegmentation::Prefix).is_ok());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let orphan_parent = make_account("900", None);
        let spec = spec_for("900.01", Some(&orphan_parent));
        let result = validate_new_account(&[], &spec, CodeSegmentation::Prefix);
        assert!(matches!(result, Err(RegistryError::ParentNotFound(_))));
    }

    #[test]
    fn test_preorder_parents_before_children() {
        let root1 = make_account("100", None);
        let child_a = make_account("101", Some(&root1));
        let child_b = make_account("102", Some(&root1));
        let root2 = make_account("200", None);
        let grandchild = make_account("101.01", Some(&child_a));

        // Insertion order is deliberately scrambled.
        let accounts = vec![child_b, root2, grandchild, root1, child_a];
        let tree = AccountTree::from_accounts(&accounts);

        let codes: Vec<&str> = tree.preorder().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["100", "101", "101.01", "102", "200"]);
    }

    #[test]
    fn test_children_of_ordered_by_code() {
        let root = make_account("1", None);
        let b = make_account("1.2", Some(&root));
        let a = make_account("1.1", Some(&root));
        let root_id = root.id;

        let accounts = vec![b, a, root];
        let tree = AccountTree::from_accounts(&accounts);

        let codes: Vec<&str> = tree
            .children_of(root_id)
            .iter()
            .map(|a| a.code.as_str())
            .collect();
        assert_eq!(codes, vec!["1.1", "1.2"]);
    }
}
