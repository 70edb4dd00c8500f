//! Configuration loader: assembles the layered sources into a `StorefrontConfig`.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{environment, global_file, workspace_file};
use super::StorefrontConfig;
use crate::error::ApiError;
use config::{Environment, File};
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file,
    /// `config/config.toml`, `config/{STOREFRONT_ENV}.toml`, environment.
    pub fn load(workspace_root: &Path) -> Result<StorefrontConfig, ApiError> {
        Self::load_with_environment(workspace_root, environment::environment())
    }

    /// Same as [`ConfigLoader::load`] with an explicit environment source.
    pub fn load_with_environment(
        workspace_root: &Path,
        env: Environment,
    ) -> Result<StorefrontConfig, ApiError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder, env);

        let config: StorefrontConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace_root = %workspace_root.display(),
            endpoint = %config.graphql.endpoint,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load a single config file over the built-in defaults.
    pub fn load_from_file(path: &Path) -> Result<StorefrontConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
