//! Configuration System
//!
//! Layered configuration for the storefront: built-in defaults, the global
//! config file, workspace config files and `STOREFRONT__*` environment
//! overrides, validated as a whole before use.

use serde::{Deserialize, Serialize};

pub use crate::cache::CacheConfig;
pub use crate::client::GraphqlConfig;
pub use crate::logging::LoggingConfig;
pub use crate::page::PagesConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::environment as default_environment;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// GraphQL backend connection
    #[serde(default)]
    pub graphql: GraphqlConfig,

    /// Normalized cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Page generation settings
    #[serde(default)]
    pub pages: PagesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Graphql(String),
    Cache(String),
    Pages(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Graphql(msg) => write!(f, "GraphQL: {}", msg),
            ValidationError::Cache(msg) => write!(f, "Cache: {}", msg),
            ValidationError::Pages(msg) => write!(f, "Pages: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StorefrontConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.graphql.validate() {
            errors.push(ValidationError::Graphql(e));
        }
        if let Err(e) = self.cache.validate() {
            errors.push(ValidationError::Cache(e));
        }
        if let Err(e) = self.pages.validate() {
            errors.push(ValidationError::Pages(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn to_toml(&self) -> Result<String, crate::error::ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
