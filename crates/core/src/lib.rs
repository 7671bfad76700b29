//! Core accounting logic for Contara.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `registry` - Chart of accounts per organization/country
//! - `catalog` - Official jurisdiction catalog mapping
//! - `rules` - Automation rules turning business events into draft entries
//! - `ledger` - Double-entry journal and posting state machine
//! - `fiscal` - Fiscal period lifecycle and closing workflow
//! - `reports` - Trial balance and financial statement aggregation
//! - `interchange` - Tabular import/export formats
//! - `engine` - Organization-scoped state and orchestration

pub mod catalog;
pub mod engine;
pub mod fiscal;
pub mod interchange;
pub mod ledger;
pub mod organization;
pub mod registry;
pub mod reports;
pub mod rules;
