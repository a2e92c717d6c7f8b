//! Engine settings.
//!
//! All operational knobs live in one immutable [`Settings`] value,
//! constructed once at process start and shared by reference into every
//! component; no component reads ambient global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Result, TabflowError};

/// Immutable engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Time-to-live for ingested dataset entries.
    pub dataset_ttl: Duration,

    /// Time-to-live for computed node results. Shorter than the dataset TTL:
    /// intermediate results are cheap to recompute and likely to be
    /// superseded by graph edits.
    pub node_result_ttl: Duration,

    /// Maximum accepted upload size in bytes, for the ingestion collaborator.
    pub max_upload_bytes: u64,

    /// Comma-separated extension allow-list for the ingestion collaborator.
    pub allowed_file_extensions: String,

    /// Maximum ancestry depth walked before a node resolves. Exceeding it
    /// (or revisiting a node on the walk) fails fast instead of recursing
    /// without bound.
    pub max_resolve_depth: usize,

    /// Maximum number of entries held by the in-memory cache store.
    pub store_max_capacity: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_ttl: Duration::from_secs(3600),
            node_result_ttl: Duration::from_secs(1800),
            max_upload_bytes: 100_000_000,
            allowed_file_extensions: "csv,json,xlsx,txt".to_string(),
            max_resolve_depth: 64,
            store_max_capacity: 10_000,
        }
    }
}

impl Settings {
    /// Create a settings builder seeded with the defaults.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dataset_ttl.is_zero() {
            return Err(config_error("dataset_ttl must be positive"));
        }
        if self.node_result_ttl.is_zero() {
            return Err(config_error("node_result_ttl must be positive"));
        }
        if self.max_resolve_depth == 0 {
            return Err(config_error("max_resolve_depth must be greater than 0"));
        }
        if self.store_max_capacity == 0 {
            return Err(config_error("store_max_capacity must be greater than 0"));
        }
        Ok(())
    }

    /// The extension allow-list as a trimmed vector.
    pub fn allowed_extensions(&self) -> Vec<String> {
        self.allowed_file_extensions
            .split(',')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn config_error(message: &str) -> TabflowError {
    TabflowError::Config {
        message: message.to_string(),
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Create a builder seeded with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset entry TTL.
    pub fn dataset_ttl(mut self, ttl: Duration) -> Self {
        self.settings.dataset_ttl = ttl;
        self
    }

    /// Set the node result TTL.
    pub fn node_result_ttl(mut self, ttl: Duration) -> Self {
        self.settings.node_result_ttl = ttl;
        self
    }

    /// Set the maximum upload size in bytes.
    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.settings.max_upload_bytes = bytes;
        self
    }

    /// Set the comma-separated extension allow-list.
    pub fn allowed_file_extensions(mut self, extensions: impl Into<String>) -> Self {
        self.settings.allowed_file_extensions = extensions.into();
        self
    }

    /// Set the ancestry depth bound.
    pub fn max_resolve_depth(mut self, depth: usize) -> Self {
        self.settings.max_resolve_depth = depth;
        self
    }

    /// Set the cache store entry capacity.
    pub fn store_max_capacity(mut self, capacity: u64) -> Self {
        self.settings.store_max_capacity = capacity;
        self
    }

    /// Build the settings without validation.
    pub fn build(self) -> Settings {
        self.settings
    }

    /// Build and validate the settings.
    pub fn build_validated(self) -> Result<Settings> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.dataset_ttl, Duration::from_secs(3600));
        assert_eq!(settings.node_result_ttl, Duration::from_secs(1800));
        assert_eq!(settings.max_resolve_depth, 64);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let settings = Settings::builder()
            .dataset_ttl(Duration::from_secs(60))
            .node_result_ttl(Duration::from_millis(500))
            .max_resolve_depth(8)
            .build();
        assert_eq!(settings.dataset_ttl, Duration::from_secs(60));
        assert_eq!(settings.node_result_ttl, Duration::from_millis(500));
        assert_eq!(settings.max_resolve_depth, 8);
    }

    #[test]
    fn test_validation_rejects_zero() {
        let settings = Settings::builder()
            .node_result_ttl(Duration::ZERO)
            .build();
        assert!(settings.validate().is_err());

        let settings = Settings::builder().max_resolve_depth(0).build();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_allowed_extensions_parsing() {
        let settings = Settings::builder()
            .allowed_file_extensions(" csv, json ,xlsx,,txt ")
            .build();
        assert_eq!(settings.allowed_extensions(), vec!["csv", "json", "xlsx", "txt"]);
    }
}
