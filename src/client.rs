//! Query Clients
//!
//! A query client pairs a cache store with a transport and applies cache
//! policies. Pages run against a [`QueryClientPair`]: a process-wide shared
//! client whose cache is snapshotted for hydration, and a render-scoped
//! client whose cache lives only for one invocation.

pub mod config;
pub mod http;
pub mod transport;

pub use config::{GraphqlConfig, StoreView};
pub use http::HttpTransport;
pub use transport::{GraphQLRequest, Transport};

use crate::cache::{CacheConfig, CacheLookup, CacheSnapshot, CacheStore};
use crate::error::QueryError;
use crate::query::{CachePolicy, QueryDescriptor};
use crate::types::QueryKey;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Outcome of executing a descriptor: data on success, classified failure otherwise.
pub type QueryResult = Result<Value, QueryError>;

type SharedFetch = Shared<BoxFuture<'static, QueryResult>>;

/// Which client of a pair a query runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientScope {
    /// Cross-page data; its cache is snapshotted for hydration.
    Shared,
    /// Scoped to the current render pass.
    Render,
}

impl fmt::Display for ClientScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientScope::Shared => f.write_str("shared"),
            ClientScope::Render => f.write_str("render"),
        }
    }
}

/// Executes descriptors against one cache store.
#[derive(Clone)]
pub struct QueryClient {
    scope: ClientScope,
    cache: Arc<CacheStore>,
    transport: Arc<dyn Transport>,
    store_code: Option<String>,
    inflight: Arc<Mutex<HashMap<QueryKey, SharedFetch>>>,
}

impl QueryClient {
    pub fn new(scope: ClientScope, cache: Arc<CacheStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            scope,
            cache,
            transport,
            store_code: None,
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Send every request to `store_code` instead of the transport's default store.
    pub fn with_store_code(mut self, store_code: Option<String>) -> Self {
        self.store_code = store_code;
        self
    }

    pub fn store_code(&self) -> Option<&str> {
        self.store_code.as_deref()
    }

    pub fn scope(&self) -> ClientScope {
        self.scope
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Execute under the descriptor's own cache policy.
    pub async fn execute(&self, descriptor: &QueryDescriptor) -> QueryResult {
        self.execute_with(descriptor, descriptor.policy()).await
    }

    /// Execute under an explicit cache policy.
    pub async fn execute_with(&self, descriptor: &QueryDescriptor, policy: CachePolicy) -> QueryResult {
        let key = descriptor.key();
        debug!(
            query = descriptor.name(),
            query_key = %key.short(),
            policy = %policy,
            scope = %self.scope,
            "Executing query"
        );

        match policy {
            CachePolicy::CacheOnly => match self.cache.read(descriptor) {
                CacheLookup::Fresh(data) | CacheLookup::Stale(data) => Ok(data),
                CacheLookup::Miss => Err(QueryError::CacheMiss(format!(
                    "{} has no cached entry",
                    descriptor.name()
                ))),
            },
            CachePolicy::CacheFirst => {
                if let CacheLookup::Fresh(data) = self.cache.read(descriptor) {
                    debug!(query = descriptor.name(), scope = %self.scope, "Cache hit");
                    return Ok(data);
                }
                self.join_or_start_fetch(descriptor, key).await
            }
            CachePolicy::NetworkOnly => self.spawn_fetch(descriptor.clone(), None).await,
        }
    }

    /// Point-in-time copy of this client's cache.
    pub fn extract_snapshot(&self) -> CacheSnapshot {
        self.cache.extract()
    }

    fn join_or_start_fetch(&self, descriptor: &QueryDescriptor, key: QueryKey) -> SharedFetch {
        let mut inflight = self.inflight.lock();
        if let Some(existing) = inflight.get(&key) {
            debug!(query = descriptor.name(), query_key = %key.short(), "Joining in-flight fetch");
            return existing.clone();
        }
        let fetch = self
            .spawn_fetch(descriptor.clone(), Some(key))
            .boxed()
            .shared();
        inflight.insert(key, fetch.clone());
        fetch
    }

    /// Start the fetch as its own task so that dropping the caller does not
    /// cancel it; the task still writes the cache when it completes.
    fn spawn_fetch(
        &self,
        descriptor: QueryDescriptor,
        inflight_key: Option<QueryKey>,
    ) -> impl Future<Output = QueryResult> + Send + 'static {
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let inflight = Arc::clone(&self.inflight);
        let name = descriptor.name().to_string();
        let request =
            GraphQLRequest::from_descriptor(&descriptor).with_store_code(self.store_code.clone());

        let handle = tokio::spawn(async move {
            let result =
                fetch_and_store(transport.as_ref(), cache.as_ref(), &descriptor, &request).await;
            if let Some(key) = inflight_key {
                inflight.lock().remove(&key);
            }
            result
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                Err(QueryError::TransportError(format!(
                    "{}: fetch task failed: {}",
                    name, e
                )))
            })
        }
    }
}

async fn fetch_and_store(
    transport: &dyn Transport,
    cache: &CacheStore,
    descriptor: &QueryDescriptor,
    request: &GraphQLRequest,
) -> QueryResult {
    let data = transport.fetch(request).await?;
    check_response_shape(descriptor, &data)?;
    cache.write(descriptor, &data)?;
    Ok(data)
}

/// Presence field null or missing: entity absent. Declared field missing: schema error.
fn check_response_shape(descriptor: &QueryDescriptor, data: &Value) -> Result<(), QueryError> {
    let object = data.as_object().ok_or_else(|| {
        QueryError::SchemaError(format!("{}: response data is not an object", descriptor.name()))
    })?;

    if let Some(field) = descriptor.presence_field() {
        if object.get(field).map_or(true, Value::is_null) {
            return Err(QueryError::NotFoundByIdentifier(format!(
                "{}: {} is null for variables {}",
                descriptor.name(),
                field,
                descriptor.canonical_variables()
            )));
        }
    }

    if let Some(missing) = descriptor
        .root_fields()
        .iter()
        .find(|field| !object.contains_key(field.as_str()))
    {
        return Err(QueryError::SchemaError(format!(
            "{}: response is missing field '{}'",
            descriptor.name(),
            missing
        )));
    }
    Ok(())
}

/// The two clients used by one page invocation.
#[derive(Clone)]
pub struct QueryClientPair {
    shared: QueryClient,
    render: QueryClient,
}

impl QueryClientPair {
    /// Reuses the process-wide `shared_cache`; the render-scoped cache is new.
    pub fn new(
        shared_cache: Arc<CacheStore>,
        transport: Arc<dyn Transport>,
        cache_config: &CacheConfig,
    ) -> Self {
        let render_cache = Arc::new(CacheStore::new(cache_config));
        Self {
            shared: QueryClient::new(ClientScope::Shared, shared_cache, Arc::clone(&transport)),
            render: QueryClient::new(ClientScope::Render, render_cache, transport),
        }
    }

    /// Route both clients to one store view.
    pub fn with_store_code(self, store_code: Option<String>) -> Self {
        Self {
            shared: self.shared.with_store_code(store_code.clone()),
            render: self.render.with_store_code(store_code),
        }
    }

    pub fn shared(&self) -> &QueryClient {
        &self.shared
    }

    pub fn render(&self) -> &QueryClient {
        &self.render
    }

    pub fn client(&self, scope: ClientScope) -> &QueryClient {
        match scope {
            ClientScope::Shared => &self.shared,
            ClientScope::Render => &self.render,
        }
    }

    /// Snapshot of the shared cache, for client-side hydration.
    pub fn extract_snapshot(&self) -> CacheSnapshot {
        self.shared.extract_snapshot()
    }
}
