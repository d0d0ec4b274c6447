//! Bulk saver configuration.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Default maximum records per create, update or upsert call.
pub const DEFAULT_SAVE_LIMIT: usize = 200;
/// Default maximum identifiers per delete call.
pub const DEFAULT_DELETE_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkSaverConfig {
    /// Maximum records submitted in one create, update or upsert call.
    pub save_limit: usize,
    /// Maximum identifiers submitted in one delete call.
    pub delete_limit: usize,
}

impl Default for BulkSaverConfig {
    fn default() -> Self {
        Self {
            save_limit: DEFAULT_SAVE_LIMIT,
            delete_limit: DEFAULT_DELETE_LIMIT,
        }
    }
}

impl BulkSaverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save_limit(mut self, limit: usize) -> Self {
        self.save_limit = limit;
        self
    }

    pub fn with_delete_limit(mut self, limit: usize) -> Self {
        self.delete_limit = limit;
        self
    }

    /// Reads `BULK_SAVE_LIMIT` and `BULK_DELETE_LIMIT`, keeping defaults for
    /// unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: usize| {
            get(key)
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(default)
        };
        Self {
            save_limit: read("BULK_SAVE_LIMIT", DEFAULT_SAVE_LIMIT),
            delete_limit: read("BULK_DELETE_LIMIT", DEFAULT_DELETE_LIMIT),
        }
    }

    /// Parses a YAML document; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_limit(self.save_limit, "save_limit")?;
        check_limit(self.delete_limit, "delete_limit")
    }
}

pub(crate) fn check_limit(limit: usize, key: &str) -> Result<()> {
    if limit == 0 {
        return Err(Error::configuration_with_context(
            "batch limit must be at least 1",
            ErrorContext::new()
                .with_field_path(format!("config.{}", key))
                .with_details("got 0")
                .with_source("bulk_saver_config"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = BulkSaverConfig::default();
        assert_eq!(config.save_limit, 200);
        assert_eq!(config.delete_limit, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BulkSaverConfig::new().with_save_limit(50).with_delete_limit(10);
        assert_eq!(config.save_limit, 50);
        assert_eq!(config.delete_limit, 10);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> =
            [("BULK_SAVE_LIMIT", "25"), ("BULK_DELETE_LIMIT", "not-a-number")].into();
        let config = BulkSaverConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.save_limit, 25);
        assert_eq!(config.delete_limit, DEFAULT_DELETE_LIMIT);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = BulkSaverConfig::from_yaml_str("save_limit: 100\n").unwrap();
        assert_eq!(config.save_limit, 100);
        assert_eq!(config.delete_limit, DEFAULT_DELETE_LIMIT);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = BulkSaverConfig::from_yaml_str("delete_limit: 0\n").unwrap_err();
        match err {
            Error::Configuration { context, .. } => {
                assert_eq!(context.field_path.as_deref(), Some("config.delete_limit"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
