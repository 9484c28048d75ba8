use serde::{Deserialize, Serialize};
use tracing::debug;

use super::condition::{Condition, ConditionRegistry, EvaluationContext};
use super::error::{BonusError, RuleConfigError};
use super::rules::{ConditionalRule, RuleSet};
use super::timestamp::TransactionTime;

/// Trail label for the unconditional accrual step.
pub const BASE_RATE_LABEL: &str = "base rate";

/// One step of the contribution trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub rule: String,
    pub bonus: i64,
}

/// Rounded total plus the ordered contributions that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusResult {
    #[serde(rename = "total bonus")]
    pub total_bonus: i64,
    #[serde(rename = "applied rules")]
    pub applied_rules: Vec<AppliedRule>,
}

impl BonusResult {
    /// Sum of the individually rounded trail entries. May differ from
    /// `total_bonus` by one unit because each entry is rounded on its own.
    pub fn trail_sum(&self) -> i64 {
        self.applied_rules.iter().map(|entry| entry.bonus).sum()
    }
}

/// Folds a rule set over a transaction, compounding each firing rule on the
/// running total.
#[derive(Debug, Clone, Default)]
pub struct BonusEvaluator {
    registry: ConditionRegistry,
}

impl BonusEvaluator {
    pub fn new(registry: ConditionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConditionRegistry {
        &self.registry
    }

    pub fn evaluate(
        &self,
        amount: f64,
        timestamp: &str,
        customer_status: &str,
        rules: &RuleSet,
    ) -> Result<BonusResult, BonusError> {
        let time = TransactionTime::parse(timestamp)?;
        self.evaluate_at(amount, &time, customer_status, rules)
    }

    /// Evaluate against an already resolved timestamp.
    pub fn evaluate_at(
        &self,
        amount: f64,
        time: &TransactionTime,
        customer_status: &str,
        rules: &RuleSet,
    ) -> Result<BonusResult, BonusError> {
        rules.validate()?;
        let steps = self.resolve_steps(rules)?;

        let context = EvaluationContext {
            amount,
            time,
            customer_status,
        };

        let base_bonus = floor_div(amount, rules.base.per_dollars) * rules.base.bonus;
        let mut total = base_bonus;
        let mut applied_rules = vec![AppliedRule {
            rule: BASE_RATE_LABEL.to_string(),
            bonus: checked_round(base_bonus, BASE_RATE_LABEL)?,
        }];

        for (rule, condition) in steps {
            if !condition.holds(&context) {
                continue;
            }

            let delta = total * rule.multiplier - total;
            total += delta;
            let rounded = checked_round(delta, &rule.name)?;
            debug!(
                rule = %rule.name,
                kind = %rule.kind,
                order = rule.order,
                delta,
                total,
                "bonus rule applied"
            );
            applied_rules.push(AppliedRule {
                rule: rule.name.clone(),
                bonus: rounded,
            });
        }

        Ok(BonusResult {
            total_bonus: checked_round(total, "total")?,
            applied_rules,
        })
    }

    /// Confirm every rule `type` has a registered condition.
    pub fn check_kinds(&self, rules: &RuleSet) -> Result<(), RuleConfigError> {
        self.resolve_steps(rules).map(|_| ())
    }

    fn resolve_steps<'r>(
        &'r self,
        rules: &'r RuleSet,
    ) -> Result<Vec<(&'r ConditionalRule, &'r dyn Condition)>, RuleConfigError> {
        rules
            .ordered_rules()
            .into_iter()
            .map(|rule| {
                self.registry
                    .get(&rule.kind)
                    .map(|condition| (rule, condition))
                    .ok_or_else(|| RuleConfigError::UnknownRuleType {
                        rule: rule.name.clone(),
                        kind: rule.kind.clone(),
                    })
            })
            .collect()
    }
}

/// Evaluate with the standard `weekend`/`vip` conditions.
pub fn evaluate(
    amount: f64,
    timestamp: &str,
    customer_status: &str,
    rules: &RuleSet,
) -> Result<BonusResult, BonusError> {
    BonusEvaluator::default().evaluate(amount, timestamp, customer_status, rules)
}

/// Floor division on floats: whole multiples of `divisor`, rounded toward
/// negative infinity, computed from the remainder so exact multiples are not
/// lost to division error.
pub(crate) fn floor_div(dividend: f64, divisor: f64) -> f64 {
    let remainder = dividend % divisor;
    let mut quotient = (dividend - remainder) / divisor;
    if remainder != 0.0 && (remainder < 0.0) != (divisor < 0.0) {
        quotient -= 1.0;
    }
    if quotient == 0.0 {
        return 0.0;
    }
    let floored = quotient.floor();
    if quotient - floored > 0.5 {
        floored + 1.0
    } else {
        floored
    }
}

/// Round half to even. `None` when the value is not finite or does not fit
/// an `i64`.
pub(crate) fn round_bonus(value: f64) -> Option<i64> {
    let rounded = value.round_ties_even();
    // i64::MAX is not representable; 2^63 is the first value out of range.
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

fn checked_round(value: f64, step: &str) -> Result<i64, BonusError> {
    round_bonus(value).ok_or_else(|| BonusError::Overflow {
        step: step.to_string(),
    })
}
