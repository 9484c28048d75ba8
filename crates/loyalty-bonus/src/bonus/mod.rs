//! Loyalty bonus calculation over a configurable, ordered rule set.
//!
//! A [`RuleSet`] carries the base accrual rate and the conditional rules. The
//! [`BonusEvaluator`] folds the rules over the running total and records every
//! contribution so the result can be audited step by step.

pub mod condition;
mod error;
pub mod evaluator;
pub mod loader;
pub mod provider;
pub mod router;
pub mod rules;
pub mod service;
pub mod timestamp;

#[cfg(test)]
mod tests;

pub use condition::{
    Condition, ConditionRegistry, EvaluationContext, VipCondition, WeekendCondition,
};
pub use error::{BonusError, RuleConfigError};
pub use evaluator::{evaluate, AppliedRule, BonusEvaluator, BonusResult, BASE_RATE_LABEL};
pub use loader::{InMemoryLoader, JsonFileLoader, RuleSetLoader};
pub use provider::{RefreshPolicy, RuleSetProvider};
pub use router::bonus_router;
pub use rules::{BaseRate, ConditionalRule, RuleSet};
pub use service::{BonusRequest, BonusService};
pub use timestamp::TransactionTime;
