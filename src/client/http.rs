//! reqwest-backed GraphQL transport.

use crate::client::config::GraphqlConfig;
use crate::client::transport::{GraphQLRequest, Transport};
use crate::error::{ApiError, QueryError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Error category the commerce backend uses for unknown identifiers.
pub const NO_SUCH_ENTITY_CATEGORY: &str = "graphql-no-such-entity";

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQLErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLErrorEntry {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphQLErrorEntry {
    fn category(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("category")?.as_str()
    }
}

/// Turn a decoded envelope into the `data` object or a classified failure.
pub fn classify_response(operation: &str, response: GraphQLResponse) -> Result<Value, QueryError> {
    if !response.errors.is_empty() {
        let messages = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        if response
            .errors
            .iter()
            .any(|e| e.category() == Some(NO_SUCH_ENTITY_CATEGORY))
        {
            return Err(QueryError::NotFoundByIdentifier(format!(
                "{}: {}",
                operation, messages
            )));
        }
        return Err(QueryError::RemoteError(format!("{}: {}", operation, messages)));
    }

    match response.data {
        Some(data @ Value::Object(_)) => Ok(data),
        _ => Err(QueryError::SchemaError(format!(
            "{}: response contained no data object",
            operation
        ))),
    }
}

/// Classify a non-2xx HTTP answer. GraphQL error bodies are honored when present.
pub fn classify_status(operation: &str, status: u16, body: &str) -> QueryError {
    if let Ok(response) = serde_json::from_str::<GraphQLResponse>(body) {
        if !response.errors.is_empty() {
            if let Err(err) = classify_response(operation, response) {
                return err;
            }
        }
    }
    QueryError::TransportError(format!(
        "{}: request failed with status {}",
        operation, status
    ))
}

fn map_http_error(operation: &str, error: reqwest::Error) -> QueryError {
    if error.is_timeout() {
        QueryError::Timeout(format!("{}: {}", operation, error))
    } else if error.is_decode() {
        QueryError::SchemaError(format!("{}: failed to decode response: {}", operation, error))
    } else if error.is_connect() {
        QueryError::TransportError(format!("{}: connection error: {}", operation, error))
    } else {
        QueryError::TransportError(format!("{}: HTTP error: {}", operation, error))
    }
}

/// POSTs operations to a single GraphQL endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    store_code: String,
    headers: BTreeMap<String, String>,
}

impl HttpTransport {
    pub fn new(config: &GraphqlConfig) -> Result<Self, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            store_code: config.store_code.clone(),
            headers: config.headers.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &GraphQLRequest) -> Result<Value, QueryError> {
        let operation = request.operation_name.as_str();
        let store = request.store_code.as_deref().unwrap_or(&self.store_code);
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Store", store)
            .json(request);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(operation, store, endpoint = %self.endpoint, "Sending GraphQL request");
        let response = builder
            .send()
            .await
            .map_err(|e| map_http_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(operation, status.as_u16(), &body));
        }

        let envelope: GraphQLResponse = response
            .json()
            .await
            .map_err(|e| map_http_error(operation, e))?;
        classify_response(operation, envelope)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
