use std::path::PathBuf;
use std::time::Duration;

/// Failure to obtain a usable rule set from the configuration source.
#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("unable to read rule configuration {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rule configuration is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid rule configuration value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("rule '{rule}' uses unknown condition type '{kind}'")]
    UnknownRuleType { rule: String, kind: String },
    #[error("rule configuration load timed out after {0:?}")]
    Timeout(Duration),
    #[error("rule configuration unavailable: {0}")]
    Unavailable(String),
}

impl RuleConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised by a single bonus evaluation.
#[derive(Debug, thiserror::Error)]
pub enum BonusError {
    #[error("invalid timestamp '{value}': use ISO 8601")]
    InvalidTimestamp { value: String },
    #[error("bonus for step '{step}' is outside the representable range")]
    Overflow { step: String },
    #[error(transparent)]
    Config(#[from] RuleConfigError),
}

impl BonusError {
    /// True when the failure stems from caller input rather than configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BonusError::InvalidTimestamp { .. } | BonusError::Overflow { .. }
        )
    }
}
