//! Official jurisdiction catalog mapping.
//!
//! Links internal accounts to official catalog codes (SAT, Plano de
//! Contas, ...) either automatically with a confidence score or by manual
//! assignment, which permanently pins the mapping.

pub mod error;
pub mod matcher;
pub mod types;

pub use error::CatalogError;
pub use matcher::{auto_map, confidence, AutoMapOutcome};
pub use types::{CatalogType, Mapping, MappingOrigin, OfficialCatalog, OfficialEntry};
