//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key; tables merge rather than replace.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("graphql.store_code", "default")?
        .set_default("graphql.locale", "en")?
        .set_default("pages.revalidate_secs", 60 * 20)?
        .set_default("logging.output", "stderr")
}
