//! Page definitions: which queries a page needs, on which client, and which
//! props each query owns.

use crate::client::ClientScope;
use crate::error::PageError;
use crate::query::QueryDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Props key reserved for the hydration snapshot.
pub const HYDRATION_KEY: &str = "apolloState";

/// Whether a query gates the page's renderability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Required,
    Optional,
}

/// Explicit claim of one result field, optionally under another props key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldClaim {
    pub source: String,
    pub target: String,
}

/// How a query's data reaches the props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldOwnership {
    /// Every root field, without overriding fields already present.
    Spread,
    /// Only the claimed fields; claims override spread fields.
    Fields(Vec<FieldClaim>),
    /// No props; the data reaches the client through the hydration snapshot.
    SnapshotOnly,
}

#[derive(Debug, Clone)]
pub struct PageQuery {
    pub descriptor: QueryDescriptor,
    pub scope: ClientScope,
    pub requirement: Requirement,
    pub ownership: FieldOwnership,
}

impl PageQuery {
    pub fn required(descriptor: QueryDescriptor, scope: ClientScope) -> Self {
        Self {
            descriptor,
            scope,
            requirement: Requirement::Required,
            ownership: FieldOwnership::Spread,
        }
    }

    pub fn optional(descriptor: QueryDescriptor, scope: ClientScope) -> Self {
        Self {
            requirement: Requirement::Optional,
            ..Self::required(descriptor, scope)
        }
    }

    pub fn spread(mut self) -> Self {
        self.ownership = FieldOwnership::Spread;
        self
    }

    pub fn snapshot_only(mut self) -> Self {
        self.ownership = FieldOwnership::SnapshotOnly;
        self
    }

    /// Claim `source` under the same props key.
    pub fn field(self, source: &str) -> Self {
        self.alias(source, source)
    }

    /// Claim `source` under props key `target`.
    pub fn alias(mut self, source: &str, target: &str) -> Self {
        let claim = FieldClaim {
            source: source.to_string(),
            target: target.to_string(),
        };
        match &mut self.ownership {
            FieldOwnership::Fields(claims) => claims.push(claim),
            _ => self.ownership = FieldOwnership::Fields(vec![claim]),
        }
        self
    }

    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }
}

/// Route parameters handed over by the static-generation runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Selects the store view the page is loaded from.
    #[serde(default)]
    pub locale: Option<String>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct PageDefinition {
    route: String,
    queries: Vec<PageQuery>,
}

impl PageDefinition {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            queries: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: PageQuery) -> Self {
        self.queries.push(query);
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Queries in declaration order.
    pub fn queries(&self) -> &[PageQuery] {
        &self.queries
    }

    pub fn validate(&self) -> Result<(), PageError> {
        if self.route.trim().is_empty() {
            return Err(PageError::InvalidDefinition(
                "Page route cannot be empty".to_string(),
            ));
        }
        if self.queries.is_empty() {
            return Err(PageError::InvalidDefinition(format!(
                "Page '{}' declares no queries",
                self.route
            )));
        }

        let mut claimed = HashSet::new();
        for query in &self.queries {
            let FieldOwnership::Fields(claims) = &query.ownership else {
                continue;
            };
            for claim in claims {
                if claim.target == HYDRATION_KEY {
                    return Err(PageError::InvalidDefinition(format!(
                        "Page '{}': query '{}' claims reserved key '{}'",
                        self.route,
                        query.name(),
                        HYDRATION_KEY
                    )));
                }
                if !query
                    .descriptor
                    .root_fields()
                    .iter()
                    .any(|f| f == &claim.source)
                {
                    return Err(PageError::InvalidDefinition(format!(
                        "Page '{}': query '{}' does not select field '{}'",
                        self.route,
                        query.name(),
                        claim.source
                    )));
                }
                if !claimed.insert(claim.target.as_str()) {
                    return Err(PageError::InvalidDefinition(format!(
                        "Page '{}': props key '{}' is claimed twice",
                        self.route, claim.target
                    )));
                }
            }
        }
        Ok(())
    }
}
