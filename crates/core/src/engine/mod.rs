//! Organization-scoped state and orchestration.
//!
//! Each organization's books live behind their own lock; every
//! multi-step operation (posting, closing, rule application) runs under
//! a single write guard so observers never see a half-applied change.

pub mod error;
pub mod service;
pub mod state;


pub use error::EngineError;
pub use service::{AccountingEngine, EventOutcome};
pub use state::OrgState;
