//! core::config
//!
//! Configuration schema for the coordination core.
//!
//! # Scope
//!
//! How settings reach the process (environment, files, flags) is the
//! embedding application's concern. This module only defines the typed
//! schema, its defaults, and validation after parsing.
//!
//! # Example
//!
//! ```toml
//! lock_store_key = "document_locks"
//! default_ttl_minutes = 30
//! default_max_results = 100
//!
//! [seeds]
//! "/" = "9b3bb45b-0d2a-45ff-bbb4-5b0d2aa5ffb1"
//! "/sites" = "f5902ac4-5c77-48fd-902a-c45c77e8fd88"
//! "/sites/swsdp" = "b4cff62a-664d-4d45-9302-98723eac1319"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration parsing and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse the TOML document.
    #[error("failed to parse settings: {0}")]
    ParseError(String),

    /// A parsed value failed validation.
    #[error("invalid setting: {0}")]
    InvalidValue(String),
}

fn default_lock_store_key() -> String {
    "document_locks".to_string()
}

fn default_ttl_minutes() -> u32 {
    30
}

fn default_max_results() -> usize {
    100
}

/// Settings for the coordination core.
///
/// All fields have defaults, so an empty document parses to a usable
/// configuration with no seeds.
///
/// # Example
///
/// ```
/// use carrel::core::config::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.lock_store_key, "document_locks");
/// assert_eq!(settings.default_ttl_minutes, 30);
/// assert_eq!(settings.default_max_results, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Well-known path to node-id entries used to shortcut resolution.
    ///
    /// Not a cache: entries never expire and are never added at runtime.
    /// Keys are normalized when the seed map is built, so `/sites` and
    /// `sites/` address the same entry.
    pub seeds: BTreeMap<String, String>,

    /// Store key under which the lock table snapshot is persisted.
    pub lock_store_key: String,

    /// TTL applied to lock acquisitions that do not specify one.
    pub default_ttl_minutes: u32,

    /// Result cap applied to searches that do not specify one.
    pub default_max_results: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seeds: BTreeMap::new(),
            lock_store_key: default_lock_store_key(),
            default_ttl_minutes: default_ttl_minutes(),
            default_max_results: default_max_results(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML document and validate them.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ParseError`] if the document is not valid TOML
    ///   or contains unknown fields
    /// - [`ConfigError::InvalidValue`] if a parsed value fails validation
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock_store_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "lock_store_key cannot be empty".into(),
            ));
        }

        // A zero default would make every lock born expired.
        if self.default_ttl_minutes == 0 {
            return Err(ConfigError::InvalidValue(
                "default_ttl_minutes must be at least 1".into(),
            ));
        }

        if self.default_max_results == 0 {
            return Err(ConfigError::InvalidValue(
                "default_max_results must be at least 1".into(),
            ));
        }

        for (path, node_id) in &self.seeds {
            if node_id.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "seed entry for '{}' has an empty node id",
                    path
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_parses_to_defaults() {
        let settings = Settings::from_toml_str("").expect("parse empty");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn full_document_parses() {
        let content = r#"
            lock_store_key = "locks"
            default_ttl_minutes = 15
            default_max_results = 50

            [seeds]
            "/" = "root-node"
            "/sites" = "sites-node"
        "#;

        let settings = Settings::from_toml_str(content).expect("parse");
        assert_eq!(settings.lock_store_key, "locks");
        assert_eq!(settings.default_ttl_minutes, 15);
        assert_eq!(settings.default_max_results, 50);
        assert_eq!(settings.seeds.len(), 2);
        assert_eq!(settings.seeds["/sites"], "sites-node");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Settings::from_toml_str("unknown_field = true");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn zero_default_ttl_is_rejected() {
        let result = Settings::from_toml_str("default_ttl_minutes = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn zero_max_results_is_rejected() {
        let result = Settings::from_toml_str("default_max_results = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn empty_seed_node_id_is_rejected() {
        let content = r#"
            [seeds]
            "/sites" = ""
        "#;
        let result = Settings::from_toml_str(content);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn error_display_formatting() {
        let err = ConfigError::ParseError("bad toml".into());
        assert!(err.to_string().contains("parse"));

        let err = ConfigError::InvalidValue("bad value".into());
        assert!(err.to_string().contains("invalid"));
    }
}
