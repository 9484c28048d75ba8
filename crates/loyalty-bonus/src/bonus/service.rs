use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{BonusError, RuleConfigError};
use super::evaluator::{BonusEvaluator, BonusResult};
use super::loader::RuleSetLoader;
use super::provider::RuleSetProvider;
use super::rules::RuleSet;
use super::timestamp::TransactionTime;

/// Transaction submitted for a bonus calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRequest {
    pub transaction_amount: f64,
    pub timestamp: String,
    pub customer_status: String,
}

/// Service pairing the rule provider with the evaluator.
pub struct BonusService<L> {
    rules: Arc<RuleSetProvider<L>>,
    evaluator: Arc<BonusEvaluator>,
    load_timeout: Option<Duration>,
}

impl<L> BonusService<L>
where
    L: RuleSetLoader + 'static,
{
    pub fn new(rules: RuleSetProvider<L>) -> Self {
        Self::with_evaluator(rules, BonusEvaluator::default())
    }

    pub fn with_evaluator(rules: RuleSetProvider<L>, evaluator: BonusEvaluator) -> Self {
        Self {
            rules: Arc::new(rules),
            evaluator: Arc::new(evaluator),
            load_timeout: None,
        }
    }

    /// Bound the time spent loading rules; expiry fails the evaluation.
    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn rules(&self) -> &RuleSetProvider<L> {
        &self.rules
    }

    /// Calculate the bonus for a transaction. The timestamp is checked before
    /// any rule loading happens.
    pub async fn calculate(&self, request: &BonusRequest) -> Result<BonusResult, BonusError> {
        let time = TransactionTime::parse(&request.timestamp)?;
        let rules = self.snapshot().await?;
        self.evaluator.evaluate_at(
            request.transaction_amount,
            &time,
            &request.customer_status,
            &rules,
        )
    }

    /// Fetch a rule set snapshot off the async workers.
    pub async fn snapshot(&self) -> Result<Arc<RuleSet>, RuleConfigError> {
        let rules = Arc::clone(&self.rules);
        let task = tokio::task::spawn_blocking(move || rules.current());

        let joined = match self.load_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| RuleConfigError::Timeout(limit))?,
            None => task.await,
        };

        joined.map_err(|err| RuleConfigError::Unavailable(err.to_string()))?
    }
}
