//! Configuration loading and representation.
//!
//! Values come from built-in defaults, then a JSON file (optional), then
//! `CMDB_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cmdb_core::RequestContext;

const DEFAULT_OWNER_ID: &str = "0";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_LOG_FILTER: &str = "info";

pub const ENV_OWNER_ID: &str = "CMDB_OWNER_ID";
pub const ENV_LANGUAGE: &str = "CMDB_LANGUAGE";
pub const ENV_USER: &str = "CMDB_USER";
pub const ENV_LOG_FILTER: &str = "CMDB_LOG_FILTER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for talking to the object model on behalf of one caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Owner (`bk_supplier_account`) requests are scoped to.
    pub owner_id: String,
    pub language: String,
    pub user: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            owner_id: DEFAULT_OWNER_ID.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            user: String::new(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ModelConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// File contents overridden by the process environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::parse_file(path)?.with_overrides(|key| std::env::var(key).ok())
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `CMDB_*` overrides from `lookup`, then validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(owner_id) = lookup(ENV_OWNER_ID) {
            self.owner_id = owner_id;
        }
        if let Some(language) = lookup(ENV_LANGUAGE) {
            self.language = language;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.user = user;
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_id.trim().is_empty() {
            return Err(ConfigError::Invalid("owner_id must not be empty".into()));
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".into()));
        }
        Ok(())
    }

    /// A fresh request context for the configured caller.
    pub fn default_context(&self) -> RequestContext {
        RequestContext::new(self.owner_id.as_str())
            .with_language(self.language.as_str())
            .with_user(self.user.as_str())
    }
}
