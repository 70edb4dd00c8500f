//! Cache store settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Age after which a cached root entry is stale for `cache-first`. Unset: never stale.
    #[serde(default)]
    pub ttl_secs: Option<u64>,

    /// Fields identifying an entity, tried in order after `__typename`.
    #[serde(default = "default_key_fields")]
    pub key_fields: Vec<String>,
}

fn default_key_fields() -> Vec<String> {
    vec!["id".to_string(), "uid".to_string(), "identifier".to_string()]
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: None,
            key_fields: default_key_fields(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.key_fields.is_empty() {
            return Err("key_fields cannot be empty".to_string());
        }
        if self.key_fields.iter().any(|f| f.trim().is_empty()) {
            return Err("key_fields cannot contain empty names".to_string());
        }
        if self.ttl_secs == Some(0) {
            return Err("ttl_secs must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}
