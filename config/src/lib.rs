//! # Configuration Management for SheetQuery
//!
//! This crate provides the configuration structures for the query compiler.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{AppConfig, QuerySettings};
//!
//! let config = AppConfig {
//!     query: QuerySettings::new("zamp_".to_string(), Some(32), Some(4), Some(1000)),
//! };
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [query]
//! param_prefix = "zamp_"
//! max_filter_depth = 32
//! max_subquery_depth = 4
//! max_page_size = 1000
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from sheetquery.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./sheetquery.toml";
const CONFIG_PATH_VAR: &str = "SHEETQUERY_CONFIG";
const DEFAULT_PARAM_PREFIX: &str = "zamp_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub query: QuerySettings,
}

/// Query compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Prefix of the template variables naming datasets
    pub param_prefix: String,
    /// Deepest filter tree accepted per query level, unset for no limit
    pub max_filter_depth: Option<usize>,
    /// Most nested query levels accepted, unset for no limit
    pub max_subquery_depth: Option<usize>,
    /// Largest page size accepted, unset for no limit
    pub max_page_size: Option<u64>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            param_prefix: DEFAULT_PARAM_PREFIX.to_string(),
            max_filter_depth: None,
            max_subquery_depth: None,
            max_page_size: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env, the default path, or built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        // a missing .env file is fine, the variable may come from the environment
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let query = &self.query;

        if query.param_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "Query param_prefix cannot be empty".to_string(),
            ));
        }
        if !query
            .param_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::Invalid(format!(
                "Query param_prefix '{}' may only contain alphanumeric characters and underscores",
                query.param_prefix
            )));
        }
        if query.max_filter_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "Query max_filter_depth must be greater than 0".to_string(),
            ));
        }
        if query.max_subquery_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "Query max_subquery_depth must be greater than 0".to_string(),
            ));
        }
        if query.max_page_size == Some(0) {
            return Err(ConfigError::Invalid(
                "Query max_page_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl QuerySettings {
    /// Create a new query configuration
    pub fn new(
        param_prefix: String,
        max_filter_depth: Option<usize>,
        max_subquery_depth: Option<usize>,
        max_page_size: Option<u64>,
    ) -> Self {
        Self {
            param_prefix,
            max_filter_depth,
            max_subquery_depth,
            max_page_size,
        }
    }
}
