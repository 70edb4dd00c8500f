//! GraphQL endpoint settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlConfig {
    /// GraphQL endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Magento store view code, sent as the `Store` header
    #[serde(default = "default_store_code")]
    pub store_code: String,

    /// Locale served by `store_code`
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Further store views, one `[[graphql.storefront]]` table per locale
    #[serde(default, rename = "storefront")]
    pub storefronts: Vec<StoreView>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// A locale and the Magento store view that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreView {
    pub locale: String,
    pub store_code: String,
}

fn default_endpoint() -> String {
    "https://vanilla.gtech.co.uk/graphql".to_string()
}

fn default_store_code() -> String {
    "default".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            store_code: default_store_code(),
            locale: default_locale(),
            storefronts: Vec::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            headers: BTreeMap::new(),
        }
    }
}

impl GraphqlConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Store code for `locale`; the top-level pair answers for its own locale
    /// unless a storefront entry overrides it.
    pub fn store_code_for(&self, locale: &str) -> Option<&str> {
        self.storefronts
            .iter()
            .find(|view| view.locale == locale)
            .map(|view| view.store_code.as_str())
            .or_else(|| (locale == self.locale).then_some(self.store_code.as_str()))
    }

    /// Every configured locale mapped to its store code.
    pub fn store_codes(&self) -> BTreeMap<String, String> {
        let mut codes = BTreeMap::new();
        codes.insert(self.locale.clone(), self.store_code.clone());
        for view in &self.storefronts {
            codes.insert(view.locale.clone(), view.store_code.clone());
        }
        codes
    }

    pub fn validate(&self) -> Result<(), String> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| format!("Invalid endpoint URL '{}': {}", self.endpoint, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if self.store_code.trim().is_empty() {
            return Err("store_code cannot be empty".to_string());
        }
        if self.locale.trim().is_empty() {
            return Err("locale cannot be empty".to_string());
        }
        let mut seen = std::collections::BTreeSet::new();
        for view in &self.storefronts {
            if view.locale.trim().is_empty() || view.store_code.trim().is_empty() {
                return Err("storefront entries need a locale and a store_code".to_string());
            }
            if !seen.insert(view.locale.as_str()) {
                return Err(format!("Duplicate storefront locale '{}'", view.locale));
            }
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("Timeouts must be greater than 0".to_string());
        }
        Ok(())
    }
}
