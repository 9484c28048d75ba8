use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::timestamp::TransactionTime;

pub const WEEKEND: &str = "weekend";
pub const VIP: &str = "vip";

/// Facts about one transaction that rule conditions are checked against.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub amount: f64,
    pub time: &'a TransactionTime,
    pub customer_status: &'a str,
}

impl EvaluationContext<'_> {
    pub fn is_weekend(&self) -> bool {
        self.time.is_weekend()
    }

    pub fn is_vip(&self) -> bool {
        self.customer_status == VIP
    }
}

/// Predicate backing a rule `type` tag.
pub trait Condition: Send + Sync {
    fn holds(&self, context: &EvaluationContext<'_>) -> bool;
}

/// Holds on Saturdays and Sundays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCondition;

impl Condition for WeekendCondition {
    fn holds(&self, context: &EvaluationContext<'_>) -> bool {
        context.is_weekend()
    }
}

/// Holds when the customer status is exactly `vip`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VipCondition;

impl Condition for VipCondition {
    fn holds(&self, context: &EvaluationContext<'_>) -> bool {
        context.is_vip()
    }
}

/// Maps rule `type` tags to the condition that decides whether the rule fires.
#[derive(Clone)]
pub struct ConditionRegistry {
    conditions: BTreeMap<String, Arc<dyn Condition>>,
}

impl ConditionRegistry {
    pub fn empty() -> Self {
        Self {
            conditions: BTreeMap::new(),
        }
    }

    /// Registry with the `weekend` and `vip` conditions installed.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry
            .register(WEEKEND, WeekendCondition)
            .register(VIP, VipCondition);
        registry
    }

    /// Install or replace the condition for `kind`.
    pub fn register<C>(&mut self, kind: impl Into<String>, condition: C) -> &mut Self
    where
        C: Condition + 'static,
    {
        self.conditions.insert(kind.into(), Arc::new(condition));
        self
    }

    pub fn get(&self, kind: &str) -> Option<&dyn Condition> {
        self.conditions.get(kind).map(|condition| &**condition)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.conditions.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ConditionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}
