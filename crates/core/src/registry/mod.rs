//! Chart of accounts registry.
//!
//! Owns the account hierarchy per organization/country: code segmentation
//! rules, hierarchy validation, ordered traversal, and the normal-balance
//! classification used by the aggregator.

pub mod error;
pub mod hierarchy;
pub mod types;

pub use error::RegistryError;
pub use hierarchy::{validate_new_account, AccountTree};
pub use types::{Account, AccountType, CodeSegmentation, Country, NewAccount};
