//! Automation rule and business event types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contara_shared::types::{AccountId, EventId, OrganizationId, RuleId};

use super::expr::{AmountFormula, Condition};

/// Business event kinds that can trigger rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerEvent {
    /// A vendor invoice was received.
    InvoiceReceived,
    /// A customer invoice was issued.
    InvoiceIssued,
    /// A customer payment came in.
    PaymentReceived,
    /// A payment went out.
    PaymentMade,
    /// A payroll run completed.
    Payroll,
    /// A bank transaction was imported.
    BankTransaction,
}

/// A typed value inside an event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    /// Numeric value (amounts, counts).
    Number(Decimal),
    /// Text value.
    Text(String),
    /// Boolean flag.
    Bool(bool),
}

/// An external business event entering the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessEvent {
    /// Unique event identifier; part of the idempotency key.
    pub id: EventId,
    /// Organization this event belongs to.
    pub organization_id: OrganizationId,
    /// The event kind.
    pub event_type: TriggerEvent,
    /// Typed payload fields conditions and formulas evaluate against.
    pub payload: BTreeMap<String, PayloadValue>,
}

impl BusinessEvent {
    /// The payload's base amount, used by percent-of-base formulas.
    #[must_use]
    pub fn base_amount(&self) -> Option<Decimal> {
        match self.payload.get("amount") {
            Some(PayloadValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Which side of the entry a rule line posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

/// One line template inside a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleLine {
    /// Debit or credit.
    pub side: Side,
    /// Target account. Must allow transactions.
    pub account_id: AccountId,
    /// Amount formula applied to the event's base amount.
    pub formula: AmountFormula,
    /// Line description template.
    pub description: String,
}

/// Request payload for a new rule line; the formula arrives as text.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRuleLine {
    /// Debit or credit.
    pub side: Side,
    /// Target account.
    pub account_id: AccountId,
    /// Formula text, e.g. `100%` or `16% of line 1`.
    pub formula: String,
    /// Line description template.
    #[serde(default)]
    pub description: String,
}

/// Request payload for a new rule.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRule {
    /// Display name.
    pub name: String,
    /// Event kind that fires this rule.
    pub trigger: TriggerEvent,
    /// Condition text, e.g. `amount > 10000 and currency = "MXN"`.
    #[serde(default)]
    pub condition: Option<String>,
    /// Lower values are evaluated first.
    #[serde(default)]
    pub priority: i32,
    /// Ordered line templates.
    pub lines: Vec<NewRuleLine>,
}

/// An automation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRule {
    /// Unique identifier.
    pub id: RuleId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Event kind that fires this rule.
    pub trigger: TriggerEvent,
    /// Optional condition over payload fields. Unsatisfied conditions
    /// exclude the rule, they never fail the event.
    pub condition: Option<Condition>,
    /// Rules are evaluated only while active.
    pub is_active: bool,
    /// Lower values are evaluated first.
    pub priority: i32,
    /// Ordered line templates; at least two, capable of balancing.
    pub lines: Vec<RuleLine>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_amount_reads_amount_field() {
        let mut payload = BTreeMap::new();
        payload.insert("amount".to_string(), PayloadValue::Number(dec!(5000)));
        payload.insert(
            "vendor".to_string(),
            PayloadValue::Text("Acme".to_string()),
        );

        let event = BusinessEvent {
            id: EventId::new(),
            organization_id: OrganizationId::new(),
            event_type: TriggerEvent::InvoiceReceived,
            payload,
        };
        assert_eq!(event.base_amount(), Some(dec!(5000)));
    }

    #[test]
    fn test_base_amount_missing() {
        let event = BusinessEvent {
            id: EventId::new(),
            organization_id: OrganizationId::new(),
            event_type: TriggerEvent::Payroll,
            payload: BTreeMap::new(),
        };
        assert_eq!(event.base_amount(), None);
    }
}
