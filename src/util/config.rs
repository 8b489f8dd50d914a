//! Configuration file support for metasync.
//!
//! Two configuration file locations are consulted:
//! - Global: `~/.metasync/config.toml` - User-wide defaults
//! - Project: `<project>/.metasync/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. The `SF_API_VERSION`
//! environment variable overrides the manifest API version from either file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ops::deploy::TestLevel;

/// API version written into manifests when nothing else is configured.
pub const DEFAULT_API_VERSION: &str = "59.0";

/// Environment variable that overrides the configured API version.
pub const API_VERSION_ENV: &str = "SF_API_VERSION";

/// metasync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Metadata API settings
    pub api: ApiConfig,

    /// Deploy defaults
    pub deploy: DeployConfig,
}

/// Metadata API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Version string used verbatim in the manifest envelope
    pub version: Option<String>,
}

/// Deploy defaults applied when the caller does not specify them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Retry once without failing components (default: true)
    pub auto_retry: Option<bool>,

    /// Default test level (NoTestRun, RunSpecifiedTests, ...)
    pub test_level: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.api.version.is_some() {
            self.api.version = other.api.version;
        }

        if other.deploy.auto_retry.is_some() {
            self.deploy.auto_retry = other.deploy.auto_retry;
        }
        if other.deploy.test_level.is_some() {
            self.deploy.test_level = other.deploy.test_level;
        }
    }

    /// The API version for manifest envelopes.
    pub fn api_version(&self) -> &str {
        self.api.version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// Whether deploys retry once without failing components.
    pub fn auto_retry(&self) -> bool {
        self.deploy.auto_retry.unwrap_or(true)
    }

    /// Parse the default test level from config string.
    pub fn test_level(&self) -> Option<TestLevel> {
        self.deploy.test_level.as_ref().and_then(|s| s.parse().ok())
    }

    /// Apply environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_api_version_override(std::env::var(API_VERSION_ENV).ok());
    }

    fn apply_api_version_override(&mut self, value: Option<String>) {
        if let Some(version) = value.filter(|v| !v.trim().is_empty()) {
            self.api.version = Some(version);
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. `SF_API_VERSION` (API version only)
/// 2. Project config (.metasync/config.toml)
/// 3. Global config (~/.metasync/config.toml)
/// 4. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config.apply_env();
    config
}

/// Get the global metasync config directory (~/.metasync).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".metasync"))
}

/// Get the project config path (.metasync/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".metasync").join("config.toml")
}
