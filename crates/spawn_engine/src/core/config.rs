//! # Engine Configuration
//!
//! Configuration for the pooling engine and its subsystems: resource
//! search paths and the prewarm table applied after startup. Supports
//! TOML config files with strong typing, builders, and validation.
//!
//! ```toml
//! log_level = "info"
//!
//! [resources]
//! search_paths = ["Prefabs", "Prefabs/UI"]
//!
//! [[pool.prewarm]]
//! key = "Bullet"
//! count = 32
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents were not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The parsed configuration is structurally invalid
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Resource lookup configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Search-path prefixes installed at initialize, in lookup order
    #[serde(default)]
    pub search_paths: Vec<String>,
}

impl ResourceConfig {
    /// Add a search path
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.search_paths.push(path.into());
        self
    }
}

/// One prewarm table entry: pre-create `count` instances for `key`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrewarmEntry {
    /// Pool key to prewarm
    pub key: String,
    /// Number of instances to pre-create
    pub count: usize,
}

/// Pool engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Keys prewarmed after orchestrator initialization. Keys without
    /// a registered template at that point are skipped silently.
    #[serde(default)]
    pub prewarm: Vec<PrewarmEntry>,
}

impl PoolConfig {
    /// Add a prewarm entry
    #[must_use]
    pub fn with_prewarm(mut self, key: impl Into<String>, count: usize) -> Self {
        self.prewarm.push(PrewarmEntry {
            key: key.into(),
            count,
        });
        self
    }
}

/// Top-level configuration for the pooling engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log level filter used by the demo binary's logger setup
    pub log_level: String,

    /// Resource lookup settings
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Pool engine settings
    #[serde(default)]
    pub pool: PoolConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            resources: ResourceConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Replace the resource configuration
    #[must_use]
    pub fn with_resources(mut self, resources: ResourceConfig) -> Self {
        self.resources = resources;
        self
    }

    /// Replace the pool configuration
    #[must_use]
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_owned()));
        }
        for entry in &self.pool.prewarm {
            if entry.key.is_empty() {
                return Err(ConfigError::Invalid(
                    "prewarm entries must name a key".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
