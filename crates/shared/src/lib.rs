//! Shared types and configuration for Contara.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - The uniform API response envelope
//! - Configuration management

pub mod config;
pub mod envelope;
pub mod types;

pub use config::AppConfig;
pub use envelope::{ApiError, ApiResponse, Pagination};
