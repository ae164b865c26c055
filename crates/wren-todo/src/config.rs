//! Application Configuration
//!
//! Optional JSON file plus environment overrides. Every field has a default,
//! so an empty object (or no file at all) is a valid configuration.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use wren_a11y::Politeness;

use crate::TodoError;

/// Environment variable overriding `storage_path`
pub const ENV_STORAGE: &str = "WREN_STORAGE";
/// Environment variable overriding `log_filter`
pub const ENV_LOG: &str = "WREN_LOG";

/// Runtime settings for the to-do app
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding the saved items
    pub storage_path: PathBuf,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// `aria-live` level of the announcement region
    pub politeness: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("todo.items.json"),
            log_filter: "info".to_string(),
            politeness: "polite".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (if any), then apply environment overrides
    ///
    /// A missing file falls back to the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, TodoError> {
        let mut config = match path {
            Some(path) => match fs::read_to_string(path) {
                Ok(text) => Self::from_json(&text)?,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    tracing::warn!("config {} not found, using defaults", path.display());
                    Self::default()
                }
                Err(err) => return Err(err.into()),
            },
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.politeness()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, TodoError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `WREN_STORAGE` / `WREN_LOG` as resolved by `lookup`
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_STORAGE).filter(|v| !v.is_empty()) {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            self.log_filter = filter;
        }
    }

    /// Parsed politeness level
    pub fn politeness(&self) -> Result<Politeness, TodoError> {
        self.politeness
            .parse()
            .map_err(|err: wren_a11y::A11yError| TodoError::Config(err.to_string()))
    }
}
