//! CLI route: single route table and run context. Dispatches to the page runtime and presentation.

use crate::cache::CacheStore;
use crate::client::{HttpTransport, Transport};
use crate::config::{ConfigLoader, StorefrontConfig};
use crate::error::ApiError;
use crate::page::{PageContext, PageOrchestrator};
use crate::pages::PageRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::cli::command_name;
use crate::cli::parse::{Commands, ConfigCommands, ConfigFormat, OutputFormat};
use crate::cli::presentation::{
    format_config_validation_text, format_page_outcome_json, format_page_outcome_text,
    format_routes_json, format_routes_text,
};

/// Runtime context for CLI execution: effective config, page registry, and async runtime.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: StorefrontConfig,
    registry: PageRegistry,
    runtime: Runtime,
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(config, workspace_root, config_path)
    }

    pub fn with_config(
        config: StorefrontConfig,
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            registry: PageRegistry::storefront(),
            runtime,
            workspace_root,
            config_path,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        let result = self.execute_inner(command);
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(command = %name, duration_ms, "Command finished"),
            Err(e) => warn!(command = %name, duration_ms, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Build {
                route,
                params,
                locale,
                format,
            } => self.handle_build(route, params, locale.as_deref(), *format),
            Commands::Pages { format } => {
                let routes = self.registry.routes();
                Ok(match format {
                    OutputFormat::Text => format_routes_text(&routes),
                    OutputFormat::Json => format_routes_json(&routes),
                })
            }
            Commands::Config { command } => self.handle_config(command),
        }
    }

    fn handle_build(
        &self,
        route: &str,
        params: &[String],
        locale: Option<&str>,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        self.ensure_valid_config()?;

        let mut ctx = PageContext::new();
        for raw in params {
            let (key, value) = parse_param(raw)?;
            ctx = ctx.with_param(key, value);
        }
        ctx = ctx.with_locale(locale.unwrap_or(self.config.graphql.locale.as_str()));

        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&self.config.graphql)?);
        let orchestrator = PageOrchestrator::new(
            Arc::new(CacheStore::new(&self.config.cache)),
            transport,
            self.config.cache.clone(),
            &self.config.pages,
        )
        .with_store_codes(self.config.graphql.store_codes());

        let outcome = self
            .runtime
            .block_on(orchestrator.load_route(&self.registry, route, &ctx))?;

        match format {
            OutputFormat::Json => format_page_outcome_json(&outcome),
            OutputFormat::Text => Ok(format_page_outcome_text(route, &outcome)),
        }
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show { format } => match format {
                ConfigFormat::Toml => self.config.to_toml(),
                ConfigFormat::Json => Ok(serde_json::to_string_pretty(&self.config)?),
            },
            ConfigCommands::Validate => {
                let source = match &self.config_path {
                    Some(path) => path.display().to_string(),
                    None => self.workspace_root.display().to_string(),
                };
                match self.config.validate() {
                    Ok(()) => Ok(format!(
                        "{} ({})",
                        format_config_validation_text(&[]),
                        source
                    )),
                    Err(errors) => Err(ApiError::ConfigError(format_config_validation_text(
                        &errors,
                    ))),
                }
            }
        }
    }

    fn ensure_valid_config(&self) -> Result<(), ApiError> {
        self.config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}

/// Parse a `key=value` route parameter.
pub fn parse_param(raw: &str) -> Result<(String, String), ApiError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ApiError::ConfigError(format!(
            "Invalid route param '{}' (expected key=value)",
            raw
        ))),
    }
}
