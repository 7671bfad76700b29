//! Automation rule engine.
//!
//! Business events (invoice received, payment made, ...) are matched
//! against per-organization rules; each matching rule yields one draft
//! journal entry with amounts computed from the rule's line formulas.

pub mod engine;
pub mod error;
pub mod expr;
pub mod types;

pub use engine::{matching_rules, resolve_lines, validate_rule, ResolvedRuleLine};
pub use error::RuleError;
pub use expr::{AmountFormula, CompareOp, Condition, Literal};
pub use types::{
    AutomationRule, BusinessEvent, NewRule, NewRuleLine, PayloadValue, RuleLine, Side,
    TriggerEvent,
};
