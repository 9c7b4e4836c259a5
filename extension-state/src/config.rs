//! Configuration for an extension's state layer
//!
//! Usually built in code; it can also be read from the JSON configuration
//! block of an extension manifest, where every field is optional.

use serde::Deserialize;

use crate::error::{Result, StateError};
use crate::logging::LoggingMode;
use crate::model::DocumentScope;

/// Settings shared by the action creators of one extension
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionConfig {
    /// Document collection holding setting documents
    /// Default: "Settings"
    pub settings_collection: String,

    /// Visibility of setting documents
    /// Default: Shared
    pub settings_scope: DocumentScope,

    /// Sort fetched lists by display name, ignoring case
    /// Default: true
    pub sort_results: bool,

    /// Logging installed by `ExtensionContext::init_logging`
    /// Default: Silent
    pub logging_mode: LoggingMode,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            settings_collection: "Settings".to_string(),
            settings_scope: DocumentScope::Shared,
            sort_results: true,
            logging_mode: LoggingMode::Silent,
        }
    }
}

impl ExtensionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings stored per user instead of per project collection
    pub fn per_user() -> Self {
        Self {
            settings_scope: DocumentScope::User,
            ..Default::default()
        }
    }

    /// Parse a manifest configuration block and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settings_collection.trim().is_empty() {
            return Err(StateError::Config(
                "Settings collection must not be empty".to_string(),
            ));
        }

        if self.settings_collection.contains('/') {
            return Err(StateError::Config(format!(
                "Settings collection must not contain '/': {}",
                self.settings_collection
            )));
        }

        Ok(())
    }

    pub fn with_settings_collection(mut self, collection: impl Into<String>) -> Self {
        self.settings_collection = collection.into();
        self
    }

    pub fn with_settings_scope(mut self, scope: DocumentScope) -> Self {
        self.settings_scope = scope;
        self
    }

    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.sort_results = enabled;
        self
    }

    pub fn with_logging_mode(mut self, mode: LoggingMode) -> Self {
        self.logging_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtensionConfig::default();
        assert_eq!(config.settings_collection, "Settings");
        assert_eq!(config.settings_scope, DocumentScope::Shared);
        assert!(config.sort_results);
        assert_eq!(config.logging_mode, LoggingMode::Silent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let empty = ExtensionConfig::new().with_settings_collection("  ");
        assert!(matches!(empty.validate(), Err(StateError::Config(_))));

        let nested = ExtensionConfig::new().with_settings_collection("a/b");
        assert!(nested.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            ExtensionConfig::from_json(r#"{"settingsScope":"user","loggingMode":"debug"}"#).unwrap();
        assert_eq!(config.settings_scope, DocumentScope::User);
        assert_eq!(config.logging_mode, LoggingMode::Debug);
        assert_eq!(config.settings_collection, "Settings");
        assert_eq!(config, ExtensionConfig::per_user().with_logging_mode(LoggingMode::Debug));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            ExtensionConfig::from_json(r#"{"settingsCollection":""}"#),
            Err(StateError::Config(_))
        ));
        assert!(matches!(
            ExtensionConfig::from_json("not json"),
            Err(StateError::Serialization(_))
        ));
    }
}
