use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::bonus::{BaseRate, ConditionalRule, RuleConfigError, RuleSet, RuleSetLoader};

pub(super) const SATURDAY: &str = "2024-01-06T10:00:00Z";
pub(super) const SUNDAY: &str = "2024-01-07T15:30:00+00:00";
pub(super) const MONDAY: &str = "2024-01-08T10:00:00Z";

pub(super) fn rule_set(per_dollars: f64, bonus: f64, additional: Vec<ConditionalRule>) -> RuleSet {
    RuleSet {
        base: BaseRate { per_dollars, bonus },
        additional,
    }
}

pub(super) fn rule(name: &str, kind: &str, multiplier: f64, order: i64) -> ConditionalRule {
    ConditionalRule {
        name: name.to_string(),
        kind: kind.to_string(),
        multiplier,
        order,
    }
}

pub(super) fn weekend_doubler() -> RuleSet {
    rule_set(10.0, 1.0, vec![rule("Weekend x2", "weekend", 2.0, 1)])
}

/// Loader whose rule set can be replaced between calls; counts loads.
pub(super) struct SwappableLoader {
    rules: Mutex<RuleSet>,
    loads: AtomicUsize,
    fail: Mutex<bool>,
}

impl SwappableLoader {
    pub(super) fn new(rules: RuleSet) -> Self {
        Self {
            rules: Mutex::new(rules),
            loads: AtomicUsize::new(0),
            fail: Mutex::new(false),
        }
    }

    pub(super) fn replace(&self, rules: RuleSet) {
        *self.rules.lock().expect("rules mutex poisoned") = rules;
    }

    pub(super) fn set_failing(&self, fail: bool) {
        *self.fail.lock().expect("fail mutex poisoned") = fail;
    }

    pub(super) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl RuleSetLoader for SwappableLoader {
    fn load(&self) -> Result<RuleSet, RuleConfigError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().expect("fail mutex poisoned") {
            return Err(RuleConfigError::Unavailable("store offline".to_string()));
        }
        Ok(self.rules.lock().expect("rules mutex poisoned").clone())
    }

    fn describe(&self) -> String {
        "swappable".to_string()
    }
}

/// Loader that blocks before answering.
pub(super) struct SlowLoader {
    pub(super) delay: Duration,
}

impl RuleSetLoader for SlowLoader {
    fn load(&self) -> Result<RuleSet, RuleConfigError> {
        std::thread::sleep(self.delay);
        Ok(weekend_doubler())
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}
