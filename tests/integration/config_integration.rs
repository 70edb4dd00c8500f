//! Integration tests for layered configuration

use std::collections::HashMap;
use std::time::Duration;
use storefront::config::{default_environment, ConfigLoader, StorefrontConfig};
use tempfile::TempDir;

fn no_env() -> config::Environment {
    default_environment().source(Some(HashMap::new()))
}

fn write_workspace_config(root: &std::path::Path, name: &str, contents: &str) {
    let config_dir = root.join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join(name), contents).unwrap();
}

#[test]
fn test_empty_workspace_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::load_with_environment(temp_dir.path(), no_env()).unwrap();
    assert_eq!(config.pages.revalidate_secs, 1200);
    assert_eq!(config.graphql.store_code, "default");
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        r#"
[graphql]
endpoint = "https://shop.example.com/graphql"
connect_timeout_secs = 3

[cache]
ttl_secs = 600
key_fields = ["uid", "id"]
"#,
    );

    let config = ConfigLoader::load_with_environment(temp_dir.path(), no_env()).unwrap();
    assert_eq!(config.graphql.endpoint, "https://shop.example.com/graphql");
    assert_eq!(config.graphql.connect_timeout(), Duration::from_secs(3));
    assert_eq!(config.graphql.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.cache.ttl(), Some(Duration::from_secs(600)));
    assert_eq!(config.cache.key_fields, vec!["uid".to_string(), "id".to_string()]);
}

#[test]
fn test_storefront_tables_map_locales_to_store_codes() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        r#"
[graphql]
locale = "en"
store_code = "uk"

[[graphql.storefront]]
locale = "nl"
store_code = "nl_NL"

[[graphql.storefront]]
locale = "de"
store_code = "de_DE"
"#,
    );

    let config = ConfigLoader::load_with_environment(temp_dir.path(), no_env()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.graphql.storefronts.len(), 2);
    assert_eq!(config.graphql.store_code_for("en"), Some("uk"));
    assert_eq!(config.graphql.store_code_for("nl"), Some("nl_NL"));
    assert_eq!(config.graphql.store_codes().len(), 3);
}

#[test]
fn test_environment_overrides_workspace_file() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        r#"
[pages]
revalidate_secs = 300
"#,
    );

    let mut vars = HashMap::new();
    vars.insert("STOREFRONT__PAGES__REVALIDATE_SECS".to_string(), "90".to_string());
    vars.insert("STOREFRONT__GRAPHQL__STORE_CODE".to_string(), "uk".to_string());
    let env = default_environment().source(Some(vars));

    let config = ConfigLoader::load_with_environment(temp_dir.path(), env).unwrap();
    assert_eq!(config.pages.revalidate_secs, 90);
    assert_eq!(config.graphql.store_code, "uk");
}

#[test]
fn test_invalid_values_are_reported_by_validation() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        r#"
[graphql]
endpoint = "not a url"
request_timeout_secs = 0

[logging]
format = "xml"
"#,
    );

    let config = ConfigLoader::load_with_environment(temp_dir.path(), no_env()).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_show_renders_loadable_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config = StorefrontConfig::default();
    let path = temp_dir.path().join("effective.toml");
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();

    let reloaded = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(reloaded, config);
}
