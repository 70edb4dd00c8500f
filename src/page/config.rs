//! Page generation settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Seconds a generated page may be served before regeneration
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,
}

fn default_revalidate_secs() -> u64 {
    60 * 20
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            revalidate_secs: default_revalidate_secs(),
        }
    }
}

impl PagesConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.revalidate_secs == 0 {
            return Err("revalidate_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
