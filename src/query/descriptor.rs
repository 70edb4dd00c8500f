//! Query descriptors: a named, parameterized request plus its cache policy.

use crate::types::{QueryKey, Variables};
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Rule governing whether an execution may reuse a stored result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Serve a fresh cached entry, otherwise fetch and store.
    #[default]
    CacheFirst,
    /// Always fetch; overwrite the cache on success.
    NetworkOnly,
    /// Never fetch; fail with `CacheMiss` when nothing is stored.
    CacheOnly,
}

impl CachePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CachePolicy::CacheFirst => "cache-first",
            CachePolicy::NetworkOnly => "network-only",
            CachePolicy::CacheOnly => "cache-only",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cache-first" => Ok(CachePolicy::CacheFirst),
            "network-only" => Ok(CachePolicy::NetworkOnly),
            "cache-only" => Ok(CachePolicy::CacheOnly),
            other => Err(format!(
                "Invalid cache policy: '{}' (must be 'cache-first', 'network-only' or 'cache-only')",
                other
            )),
        }
    }
}

/// Identifies a remote operation. Built with the `with_*` methods, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    name: String,
    document: String,
    variables: Variables,
    policy: CachePolicy,
    root_fields: Vec<String>,
    presence_field: Option<String>,
}

impl QueryDescriptor {
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
            variables: Variables::new(),
            policy: CachePolicy::default(),
            root_fields: Vec::new(),
            presence_field: None,
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Declare a root field selected by the document.
    pub fn selects(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.root_fields.contains(&field) {
            self.root_fields.push(field);
        }
        self
    }

    /// Declare a root field whose `null` value means the entity does not exist.
    /// The field is also declared as selected.
    pub fn require_present(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self = self.selects(field.clone());
        self.presence_field = Some(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn root_fields(&self) -> &[String] {
        &self.root_fields
    }

    pub fn presence_field(&self) -> Option<&str> {
        self.presence_field.as_deref()
    }

    /// Variables as key-sorted JSON; empty string when there are none.
    pub fn canonical_variables(&self) -> String {
        if self.variables.is_empty() {
            return String::new();
        }
        // serde_json::Map is ordered by key, nested maps included
        Value::Object(self.variables.clone()).to_string()
    }

    /// QueryKey = hash("name:" || name || "vars:" || canonical variables)
    pub fn key(&self) -> QueryKey {
        let mut hasher = Hasher::new();
        hasher.update(b"name:");
        hasher.update(self.name.as_bytes());
        hasher.update(b"vars:");
        hasher.update(self.canonical_variables().as_bytes());
        QueryKey::from_bytes(*hasher.finalize().as_bytes())
    }

    /// Same descriptor under a different cache policy.
    pub fn under_policy(&self, policy: CachePolicy) -> Self {
        let mut copy = self.clone();
        copy.policy = policy;
        copy
    }
}
