//! Named format strings loaded from YAML.
//!
//! A configuration is a flat map from a key to a raw format string:
//!
//! ```yaml
//! folder_format: "%2C %t %N %F %2l %-8.8u %-8.8g %8s %d %i"
//! status_format: "%>-%r"
//! ```
//!
//! Applications seed built-in defaults with [`FormatConfig::with_default`]
//! and overlay the user's file with [`FormatConfig::merge`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatConfig {
    formats: BTreeMap<String, String>,
    #[serde(skip)]
    source_path: Option<PathBuf>,
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a built-in format, keeping any value already set for `key`.
    pub fn with_default(mut self, key: impl Into<String>, format: impl Into<String>) -> Self {
        self.formats.entry(key.into()).or_insert_with(|| format.into());
        self
    }

    /// Parses a YAML map of strings. An empty document is an empty config.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let formats: Option<BTreeMap<String, String>> = serde_yaml::from_str(yaml)?;
        Ok(Self {
            formats: formats.unwrap_or_default(),
            source_path: None,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Overlays every entry of `other` on this config.
    pub fn merge(&mut self, other: &FormatConfig) {
        for (key, format) in &other.formats {
            self.formats.insert(key.clone(), format.clone());
        }
        if other.source_path.is_some() {
            self.source_path.clone_from(&other.source_path);
        }
    }

    pub fn get(&self, key: &str) -> Result<&str, ConfigError> {
        self.formats
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    /// Sets `key`, returning the previous format if there was one.
    pub fn set(&mut self, key: impl Into<String>, format: impl Into<String>) -> Option<String> {
        self.formats.insert(key.into(), format.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// The file this config was read from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(&self.formats)?)
    }
}
