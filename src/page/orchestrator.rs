//! Page data orchestrator: runs a page definition against a fresh client pair.
//! Dispatches every query at once, waits for all of them to settle, then
//! decides between a rendered page, not-found, and a propagated failure.

use crate::cache::{CacheConfig, CacheStore};
use crate::client::{QueryClientPair, QueryResult, Transport};
use crate::error::{ApiError, PageError, QueryError};
use crate::page::config::PagesConfig;
use crate::page::definition::{PageContext, PageDefinition, PageQuery, HYDRATION_KEY};
use crate::page::merge::merge_props;
use crate::page::outcome::{PageOutcome, RenderedPage};
use crate::pages::PageRegistry;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct PageOrchestrator {
    shared_cache: Arc<CacheStore>,
    /// Shared caches of store views other than the transport's default.
    store_caches: Mutex<HashMap<String, Arc<CacheStore>>>,
    /// Locale to store code.
    store_codes: BTreeMap<String, String>,
    transport: Arc<dyn Transport>,
    cache_config: CacheConfig,
    revalidate_after_seconds: u64,
}

impl PageOrchestrator {
    pub fn new(
        shared_cache: Arc<CacheStore>,
        transport: Arc<dyn Transport>,
        cache_config: CacheConfig,
        pages: &PagesConfig,
    ) -> Self {
        Self {
            shared_cache,
            store_caches: Mutex::new(HashMap::new()),
            store_codes: BTreeMap::new(),
            transport,
            cache_config,
            revalidate_after_seconds: pages.revalidate_secs,
        }
    }

    /// Locales this orchestrator serves, mapped to their store codes
    /// (see [`GraphqlConfig::store_codes`](crate::client::GraphqlConfig::store_codes)).
    pub fn with_store_codes(mut self, store_codes: BTreeMap<String, String>) -> Self {
        self.store_codes = store_codes;
        self
    }

    /// Store code for the context's locale; `None` when no locale is given.
    pub fn store_code_for(&self, ctx: &PageContext) -> Result<Option<String>, ApiError> {
        match ctx.locale.as_deref() {
            None => Ok(None),
            Some(locale) => self
                .store_codes
                .get(locale)
                .cloned()
                .map(Some)
                .ok_or_else(|| {
                    ApiError::ConfigError(format!(
                        "No storefront configured for locale '{}'",
                        locale
                    ))
                }),
        }
    }

    /// Process-wide shared cache of a store view. Store views never share entries.
    pub fn shared_cache_for(&self, store_code: Option<&str>) -> Arc<CacheStore> {
        match store_code {
            None => Arc::clone(&self.shared_cache),
            Some(code) => Arc::clone(
                self.store_caches
                    .lock()
                    .entry(code.to_string())
                    .or_insert_with(|| Arc::new(CacheStore::new(&self.cache_config))),
            ),
        }
    }

    /// Resolve `route` in the registry and load it for the context's locale.
    pub async fn load_route(
        &self,
        registry: &PageRegistry,
        route: &str,
        ctx: &PageContext,
    ) -> Result<PageOutcome, ApiError> {
        let definition = registry.resolve(route, ctx)?;
        let store_code = self.store_code_for(ctx)?;
        Ok(self.load_for_store(&definition, store_code).await?)
    }

    /// Load against the transport's default store view.
    pub async fn load(&self, page: &PageDefinition) -> Result<PageOutcome, PageError> {
        self.load_for_store(page, None).await
    }

    pub async fn load_for_store(
        &self,
        page: &PageDefinition,
        store_code: Option<String>,
    ) -> Result<PageOutcome, PageError> {
        page.validate()?;
        let route = page.route();
        let clients = QueryClientPair::new(
            self.shared_cache_for(store_code.as_deref()),
            Arc::clone(&self.transport),
            &self.cache_config,
        )
        .with_store_code(store_code.clone());

        info!(
            page = route,
            store = store_code.as_deref().unwrap_or("default"),
            queries = page.queries().len(),
            "Dispatching page queries"
        );
        let mut pending = FuturesUnordered::new();
        for (index, query) in page.queries().iter().enumerate() {
            let client = clients.client(query.scope);
            pending.push(async move { (index, client.execute(&query.descriptor).await) });
        }

        let mut settled: Vec<Option<QueryResult>> = vec![None; page.queries().len()];
        while let Some((index, result)) = pending.next().await {
            debug!(
                page = route,
                query = page.queries()[index].name(),
                ok = result.is_ok(),
                "Query settled"
            );
            settled[index] = Some(result);
        }
        drop(pending);

        let results: Vec<(&PageQuery, QueryResult)> = page
            .queries()
            .iter()
            .zip(settled)
            .map(|(query, result)| {
                let result = result.unwrap_or_else(|| {
                    Err(QueryError::TransportError(format!(
                        "{}: query did not settle",
                        query.name()
                    )))
                });
                (query, result)
            })
            .collect();

        self.decide(route, &results, &clients)
    }

    fn decide(
        &self,
        route: &str,
        results: &[(&PageQuery, QueryResult)],
        clients: &QueryClientPair,
    ) -> Result<PageOutcome, PageError> {
        let required_failures = results.iter().filter_map(|(query, result)| match result {
            Err(err) if query.is_required() => Some((*query, err)),
            _ => None,
        });

        if let Some((query, err)) = required_failures.clone().find(|(_, err)| err.is_not_found()) {
            warn!(
                page = route,
                query = query.name(),
                error_kind = %err.kind(),
                error = %err,
                "Required entity does not exist, page not found"
            );
            return Ok(PageOutcome::NotFound);
        }

        if let Some((query, err)) = required_failures.clone().next() {
            error!(
                page = route,
                query = query.name(),
                error_kind = %err.kind(),
                error = %err,
                "Required query failed, page not rendered"
            );
            return Err(PageError::QueryFailed {
                page: route.to_string(),
                descriptor: query.name().to_string(),
                source: err.clone(),
            });
        }

        for (query, result) in results {
            if let Err(err) = result {
                warn!(
                    page = route,
                    query = query.name(),
                    error_kind = %err.kind(),
                    error = %err,
                    "Optional query failed, omitting its fields"
                );
            }
        }

        let successes = results
            .iter()
            .filter_map(|(query, result)| result.as_ref().ok().map(|data| (*query, data)));
        let mut props = merge_props(route, successes);
        let snapshot = clients.extract_snapshot();
        props.insert(HYDRATION_KEY.to_string(), snapshot.to_value());

        info!(
            page = route,
            props = props.len(),
            snapshot_entries = snapshot.len(),
            revalidate = self.revalidate_after_seconds,
            "Page rendered"
        );
        Ok(PageOutcome::Rendered(RenderedPage {
            route: route.to_string(),
            props,
            revalidate_after_seconds: self.revalidate_after_seconds,
            generated_at: Utc::now(),
        }))
    }
}
