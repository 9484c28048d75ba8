use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::RuleConfigError;
use super::rules::RuleSet;

/// Source of validated rule sets. Implementations may hit the file system or
/// a remote store; callers treat every call as potentially blocking.
pub trait RuleSetLoader: Send + Sync {
    fn load(&self) -> Result<RuleSet, RuleConfigError>;

    /// Human readable origin used in logs.
    fn describe(&self) -> String;
}

impl<T> RuleSetLoader for Arc<T>
where
    T: RuleSetLoader + ?Sized,
{
    fn load(&self) -> Result<RuleSet, RuleConfigError> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Reads the JSON rule document from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleSetLoader for JsonFileLoader {
    fn load(&self) -> Result<RuleSet, RuleConfigError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| RuleConfigError::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        RuleSet::from_json_str(&raw)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Serves a fixed rule set, useful for embedding and tests.
#[derive(Debug, Clone)]
pub struct InMemoryLoader {
    rules: RuleSet,
}

impl InMemoryLoader {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }
}

impl RuleSetLoader for InMemoryLoader {
    fn load(&self) -> Result<RuleSet, RuleConfigError> {
        self.rules.validate()?;
        Ok(self.rules.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
