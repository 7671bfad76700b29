//! Rule matching, save-time validation, and line resolution.
//!
//! The stateful part (idempotency keys, draft construction) lives in
//! `crate::engine`; this module is pure and takes everything it needs as
//! arguments.

use rust_decimal::Decimal;

use super::error::RuleError;
use super::types::{AutomationRule, BusinessEvent, RuleLine, Side};
use crate::ledger::round_minor_units;

/// A rule line with its amount resolved for a concrete event.
#[derive(Debug, Clone)]
pub struct ResolvedRuleLine {
    /// Debit or credit.
    pub side: Side,
    /// Target account.
    pub account_id: contara_shared::types::AccountId,
    /// Resolved amount, rounded to the currency's minor units.
    pub amount: Decimal,
    /// Line description from the rule.
    pub description: String,
}

/// Neutral base amount used for save-time trial evaluation.
const NEUTRAL_BASE: Decimal = Decimal::ONE_HUNDRED;

/// Validates a rule at save time.
///
/// Checks line count, that percent-of-line formulas only reference
/// earlier lines, and that a trial evaluation against a neutral payload
/// balances. Unbalanced rules are rejected here, not discovered at fire
/// time.
///
/// # Errors
///
/// Returns `TooFewLines`, `ForwardLineReference`, or `UnbalancedRule`.
pub fn validate_rule(rule: &AutomationRule) -> Result<(), RuleError> {
    if rule.lines.len() < 2 {
        return Err(RuleError::TooFewLines);
    }

    for (index, line) in rule.lines.iter().enumerate() {
        if let super::expr::AmountFormula::PercentOfLine { line: referenced, .. } = line.formula {
            if referenced > index {
                return Err(RuleError::ForwardLineReference { line: referenced });
            }
        }
    }

    let resolved = resolve_amounts(&rule.lines, NEUTRAL_BASE, 2)?;
    let (debit, credit) = side_totals(&rule.lines, &resolved);
    if debit != credit {
        return Err(RuleError::UnbalancedRule { debit, credit });
    }

    Ok(())
}

/// Selects the active rules matching an event, condition-filtered and
/// ordered by priority ascending.
///
/// Unsatisfied (or absent-field) conditions exclude a rule; they never
/// fail the operation.
#[must_use]
pub fn matching_rules<'a>(
    rules: &'a [AutomationRule],
    event: &BusinessEvent,
) -> Vec<&'a AutomationRule> {
    let mut matched: Vec<&AutomationRule> = rules
        .iter()
        .filter(|r| r.is_active && r.organization_id == event.organization_id)
        .filter(|r| r.trigger == event.event_type)
        .filter(|r| {
            r.condition
                .as_ref()
                .map_or(true, |c| c.evaluate(&event.payload))
        })
        .collect();
    matched.sort_by_key(|r| r.priority);
    matched
}

/// Resolves a rule's lines for a concrete event.
///
/// Amounts are rounded to `decimal_places` minor units. After resolution
/// the debit and credit totals are summed independently and compared; a
/// mismatch is surfaced as `UnbalancedRuleOutput`, never silently
/// dropped.
///
/// # Errors
///
/// Returns `MissingBaseAmount`, `NonPositiveLineAmount`, or
/// `UnbalancedRuleOutput`.
pub fn resolve_lines(
    rule: &AutomationRule,
    event: &BusinessEvent,
    decimal_places: u32,
) -> Result<Vec<ResolvedRuleLine>, RuleError> {
    let base = event.base_amount().ok_or(RuleError::MissingBaseAmount)?;

    let amounts = resolve_amounts(&rule.lines, base, decimal_places)?;

    for (index, amount) in amounts.iter().enumerate() {
        if *amount <= Decimal::ZERO {
            return Err(RuleError::NonPositiveLineAmount { line: index + 1 });
        }
    }

    let (debit, credit) = side_totals(&rule.lines, &amounts);
    if debit != credit {
        return Err(RuleError::UnbalancedRuleOutput { debit, credit });
    }

    Ok(rule
        .lines
        .iter()
        .zip(amounts)
        .map(|(line, amount)| ResolvedRuleLine {
            side: line.side,
            account_id: line.account_id,
            amount,
            description: line.description.clone(),
        })
        .collect())
}

fn resolve_amounts(
    lines: &[RuleLine],
    base: Decimal,
    decimal_places: u32,
) -> Result<Vec<Decimal>, RuleError> {
    let mut resolved: Vec<Decimal> = Vec::with_capacity(lines.len());
    for line in lines {
        let amount = line.formula.evaluate(base, &resolved)?;
        resolved.push(round_minor_units(amount, decimal_places));
    }
    Ok(resolved)
}

fn side_totals(lines: &[RuleLine], amounts: &[Decimal]) -> (Decimal, Decimal) {
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    for (line, amount) in lines.iter().zip(amounts) {
        match line.side {
            Side::Debit => debit += *amount,
            Side::Credit => credit += *amount,
        }
    }
    (debit, credit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    use super::super::expr::{AmountFormula, Condition};
    use super::super::types::{PayloadValue, TriggerEvent};
    use contara_shared::types::{AccountId, EventId, OrganizationId, RuleId};

    fn line(side: Side, formula: AmountFormula) -> RuleLine {
        RuleLine {
            side,
            account_id: AccountId::new(),
            formula,
            description: String::new(),
        }
    }

    fn rule(
        org: OrganizationId,
        trigger: TriggerEvent,
        condition: Option<Condition>,
        priority: i32,
        lines: Vec<RuleLine>,
    ) -> AutomationRule {
        AutomationRule {
            id: RuleId::new(),
            organization_id: org,
            name: "test rule".to_string(),
            trigger,
            condition,
            is_active: true,
            priority,
            lines,
        }
    }

    fn event(org: OrganizationId, trigger: TriggerEvent, amount: Decimal) -> BusinessEvent {
        let mut payload = BTreeMap::new();
        payload.insert("amount".to_string(), PayloadValue::Number(amount));
        BusinessEvent {
            id: EventId::new(),
            organization_id: org,
            event_type: trigger,
            payload,
        }
    }

    #[test]
    fn test_validate_rule_too_few_lines() {
        let org = OrganizationId::new();
        let r = rule(
            org,
            TriggerEvent::InvoiceReceived,
            None,
            1,
            vec![line(
                Side::Debit,
                AmountFormula::PercentOfBase {
                    percent: dec!(100),
                },
            )],
        );
        assert!(matches!(validate_rule(&r), Err(RuleError::TooFewLines)));
    }

    #[test]
    fn test_validate_rule_unbalanced() {
        let org = OrganizationId::new();
        // 100% debit vs 116% credit can never balance.
        let r = rule(
            org,
            TriggerEvent::InvoiceReceived,
            None,
            1,
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase { percent: dec!(16) },
                ),
            ],
        );
        assert!(matches!(
            validate_rule(&r),
            Err(RuleError::UnbalancedRule { .. })
        ));
    }

    #[test]
    fn test_validate_rule_balanced_with_line_reference() {
        let org = OrganizationId::new();
        // Debit 100% + debit 16% of line 1 vs credit 116%.
        let r = rule(
            org,
            TriggerEvent::InvoiceReceived,
            None,
            1,
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
                line(
                    Side::Debit,
                    AmountFormula::PercentOfLine {
                        line: 1,
                        percent: dec!(16),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(116),
                    },
                ),
            ],
        );
        assert!(validate_rule(&r).is_ok());
    }

    #[test]
    fn test_validate_rule_forward_reference() {
        let org = OrganizationId::new();
        let r = rule(
            org,
            TriggerEvent::InvoiceReceived,
            None,
            1,
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfLine {
                        line: 2,
                        percent: dec!(50),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase { percent: dec!(50) },
                ),
            ],
        );
        assert!(matches!(
            validate_rule(&r),
            Err(RuleError::ForwardLineReference { line: 2 })
        ));
    }

    #[test]
    fn test_matching_rules_filters_and_orders() {
        let org = OrganizationId::new();
        let balanced = || {
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
            ]
        };

        let mut inactive = rule(org, TriggerEvent::InvoiceReceived, None, 0, balanced());
        inactive.is_active = false;
        let wrong_trigger = rule(org, TriggerEvent::Payroll, None, 0, balanced());
        let conditional = rule(
            org,
            TriggerEvent::InvoiceReceived,
            Some(Condition::parse("amount > 10000").unwrap()),
            0,
            balanced(),
        );
        let second = rule(org, TriggerEvent::InvoiceReceived, None, 5, balanced());
        let first = rule(org, TriggerEvent::InvoiceReceived, None, 1, balanced());

        let rules = vec![inactive, wrong_trigger, conditional, second, first];
        let e = event(org, TriggerEvent::InvoiceReceived, dec!(5000));

        let matched = matching_rules(&rules, &e);
        let priorities: Vec<i32> = matched.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![1, 5]);
    }

    #[test]
    fn test_resolve_lines_spec_example() {
        // INVOICE_RECEIVED with {amount: 5000}: 100% debit Inventory,
        // 100% credit Accounts Payable.
        let org = OrganizationId::new();
        let r = rule(
            org,
            TriggerEvent::InvoiceReceived,
            None,
            1,
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
            ],
        );
        let e = event(org, TriggerEvent::InvoiceReceived, dec!(5000));

        let resolved = resolve_lines(&r, &e, 2).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].side, Side::Debit);
        assert_eq!(resolved[0].amount, dec!(5000));
        assert_eq!(resolved[1].side, Side::Credit);
        assert_eq!(resolved[1].amount, dec!(5000));
    }

    #[test]
    fn test_resolve_lines_missing_base() {
        let org = OrganizationId::new();
        let r = rule(
            org,
            TriggerEvent::Payroll,
            None,
            1,
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
            ],
        );
        let e = BusinessEvent {
            id: EventId::new(),
            organization_id: org,
            event_type: TriggerEvent::Payroll,
            payload: BTreeMap::new(),
        };
        assert!(matches!(
            resolve_lines(&r, &e, 2),
            Err(RuleError::MissingBaseAmount)
        ));
    }

    #[test]
    fn test_resolve_lines_surfaces_unbalanced_output() {
        // Bypasses save-time validation on purpose: a rule edited into an
        // unbalanced shape must fail loudly at fire time too.
        let org = OrganizationId::new();
        let r = rule(
            org,
            TriggerEvent::InvoiceReceived,
            None,
            1,
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(100),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase { percent: dec!(80) },
                ),
            ],
        );
        let e = event(org, TriggerEvent::InvoiceReceived, dec!(1000));
        assert!(matches!(
            resolve_lines(&r, &e, 2),
            Err(RuleError::UnbalancedRuleOutput { .. })
        ));
    }

    #[test]
    fn test_resolved_amounts_rounded_to_minor_units() {
        let org = OrganizationId::new();
        let r = rule(
            org,
            TriggerEvent::InvoiceReceived,
            None,
            1,
            vec![
                line(
                    Side::Debit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(33.333),
                    },
                ),
                line(
                    Side::Credit,
                    AmountFormula::PercentOfBase {
                        percent: dec!(33.333),
                    },
                ),
            ],
        );
        let e = event(org, TriggerEvent::InvoiceReceived, dec!(100));
        let resolved = resolve_lines(&r, &e, 2).unwrap();
        assert_eq!(resolved[0].amount, dec!(33.33));
    }
}
