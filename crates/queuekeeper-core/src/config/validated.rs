//! Read-only view over a validated config tree

use crate::error::QueueKeeperError;
use crate::result::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Config tree that passed validation: every declared field is present and
/// satisfies its constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    root: Value,
}

impl ValidatedConfig {
    /// Wrap a tree produced by [`crate::validate::validate`]
    pub(crate) fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Value at a dotted path, e.g. `"server.port"`
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        dotted
            .split('.')
            .try_fold(&self.root, |value, segment| match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    pub fn str_at(&self, dotted: &str) -> Option<&str> {
        self.get(dotted).and_then(Value::as_str)
    }

    pub fn bool_at(&self, dotted: &str) -> Option<bool> {
        self.get(dotted).and_then(Value::as_bool)
    }

    pub fn u64_at(&self, dotted: &str) -> Option<u64> {
        self.get(dotted).and_then(Value::as_u64)
    }

    pub fn f64_at(&self, dotted: &str) -> Option<f64> {
        self.get(dotted).and_then(Value::as_f64)
    }

    /// Deserialize the subtree at `dotted` into a typed section
    pub fn section<T: DeserializeOwned>(&self, dotted: &str) -> Result<T> {
        let value = self.get(dotted).ok_or_else(|| {
            QueueKeeperError::config_error(format!("missing config section '{dotted}'"))
        })?;
        serde_json::from_value(value.clone()).map_err(|e| {
            QueueKeeperError::config_error(format!("config section '{dotted}': {e}"))
        })
    }

    /// This instance's identity for coordination: the account username
    pub fn identity(&self) -> &str {
        self.str_at("account.username").unwrap_or_default()
    }
}
