//! Transport seam between query clients and the remote schema provider.

use crate::error::QueryError;
use crate::query::QueryDescriptor;
use crate::types::Variables;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Wire body of a GraphQL operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub operation_name: String,
    pub query: String,
    pub variables: Variables,
    /// Store view to address; travels as a header, never in the body.
    #[serde(skip)]
    pub store_code: Option<String>,
}

impl GraphQLRequest {
    pub fn from_descriptor(descriptor: &QueryDescriptor) -> Self {
        Self {
            operation_name: descriptor.name().to_string(),
            query: descriptor.document().to_string(),
            variables: descriptor.variables().clone(),
            store_code: None,
        }
    }

    pub fn with_store_code(mut self, store_code: Option<String>) -> Self {
        self.store_code = store_code;
        self
    }
}

/// Executes one named operation and returns its `data` object.
///
/// Implementations own timeouts and classify every failure into a
/// [`QueryError`]; nothing is allowed to escape as a panic.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &GraphQLRequest) -> Result<Value, QueryError>;

    /// Endpoint description for logs.
    fn endpoint(&self) -> &str;
}
