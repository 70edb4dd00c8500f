//! Environment source: STOREFRONT__SECTION__KEY overrides.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const PREFIX: &str = "STOREFRONT";
const SEPARATOR: &str = "__";

/// `STOREFRONT__GRAPHQL__ENDPOINT` maps to `graphql.endpoint`.
pub fn environment() -> Environment {
    Environment::with_prefix(PREFIX)
        .prefix_separator(SEPARATOR)
        .separator(SEPARATOR)
        .try_parsing(true)
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    environment: Environment,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(environment)
}
