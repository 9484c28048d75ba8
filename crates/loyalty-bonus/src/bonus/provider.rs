use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::RuleConfigError;
use super::loader::RuleSetLoader;
use super::rules::RuleSet;

/// When rule configuration is (re)read from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Read the source for every evaluation so edits apply immediately.
    #[default]
    PerEvaluation,
    /// Read once and serve the cached snapshot until [`RuleSetProvider::reload`].
    Startup,
}

impl RefreshPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            RefreshPolicy::PerEvaluation => "per_evaluation",
            RefreshPolicy::Startup => "startup",
        }
    }
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per_evaluation" | "per-evaluation" | "always" => Ok(Self::PerEvaluation),
            "startup" | "once" => Ok(Self::Startup),
            other => Err(format!(
                "unknown refresh policy '{other}' (expected per_evaluation or startup)"
            )),
        }
    }
}

/// Hands out immutable rule set snapshots according to a [`RefreshPolicy`].
///
/// Cached snapshots are replaced with a single atomic swap, so a concurrent
/// reader observes either the previous or the new rule set in full.
pub struct RuleSetProvider<L> {
    loader: L,
    policy: RefreshPolicy,
    cached: ArcSwapOption<RuleSet>,
}

impl<L> RuleSetProvider<L>
where
    L: RuleSetLoader,
{
    pub fn new(loader: L, policy: RefreshPolicy) -> Self {
        Self {
            loader,
            policy,
            cached: ArcSwapOption::empty(),
        }
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Snapshot to evaluate against.
    pub fn current(&self) -> Result<Arc<RuleSet>, RuleConfigError> {
        match self.policy {
            RefreshPolicy::PerEvaluation => self.reload(),
            RefreshPolicy::Startup => match self.cached.load_full() {
                Some(snapshot) => Ok(snapshot),
                None => self.reload(),
            },
        }
    }

    /// Read the source and swap the result in. On failure the previous
    /// snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<RuleSet>, RuleConfigError> {
        let snapshot = match self.loader.load() {
            Ok(rules) => Arc::new(rules),
            Err(err) => {
                warn!(source = %self.loader.describe(), error = %err, "rule set load failed");
                return Err(err);
            }
        };

        let previous = self.cached.swap(Some(Arc::clone(&snapshot)));
        if self.policy == RefreshPolicy::Startup || previous.is_none() {
            info!(
                source = %self.loader.describe(),
                rules = snapshot.additional.len(),
                policy = %self.policy,
                "rule set loaded"
            );
        }
        Ok(snapshot)
    }

    /// Most recently loaded snapshot, if any load has succeeded.
    pub fn cached(&self) -> Option<Arc<RuleSet>> {
        self.cached.load_full()
    }
}

impl<L> fmt::Debug for RuleSetProvider<L>
where
    L: RuleSetLoader,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSetProvider")
            .field("source", &self.loader.describe())
            .field("policy", &self.policy)
            .field("cached", &self.cached.load().is_some())
            .finish()
    }
}
