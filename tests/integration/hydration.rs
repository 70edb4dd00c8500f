//! Hydration snapshot: extraction, client-side restore, reset.

use super::test_utils::{orchestrator_with_cache, store_config_data, MockTransport};
use std::sync::Arc;
use storefront::cache::{CacheSnapshot, CacheStore};
use storefront::client::{ClientScope, QueryClient, Transport};
use storefront::error::QueryError;
use storefront::page::{PageContext, HYDRATION_KEY};
use storefront::pages::about_us_page;
use storefront::query::{documents, CachePolicy};

#[tokio::test]
async fn snapshot_restores_into_a_client_side_cache() {
    let shared = Arc::new(CacheStore::default());
    let transport = Arc::new(MockTransport::storefront());
    let page = orchestrator_with_cache(Arc::clone(&transport), shared)
        .load(&about_us_page(&PageContext::new()).unwrap())
        .await
        .unwrap()
        .into_rendered()
        .unwrap();

    let serialized = serde_json::to_string(&page.props[HYDRATION_KEY]).unwrap();
    let snapshot: CacheSnapshot = serde_json::from_str(&serialized).unwrap();

    let offline = Arc::new(MockTransport::new().respond(
        "StoreConfig",
        Err(QueryError::TransportError("offline".to_string())),
    ));
    let browser_cache = Arc::new(CacheStore::default());
    browser_cache.restore(&snapshot).unwrap();
    let client = QueryClient::new(
        ClientScope::Shared,
        browser_cache,
        Arc::clone(&offline) as Arc<dyn Transport>,
    );

    let data = client
        .execute_with(&documents::store_config(), CachePolicy::CacheOnly)
        .await
        .unwrap();
    assert_eq!(data, store_config_data());

    let data = client.execute(&documents::store_config()).await.unwrap();
    assert_eq!(data, store_config_data());
    assert_eq!(offline.total_calls(), 0);
}

#[tokio::test]
async fn snapshot_extraction_is_idempotent() {
    let shared = Arc::new(CacheStore::default());
    let transport = Arc::new(MockTransport::storefront());
    orchestrator_with_cache(transport, Arc::clone(&shared))
        .load(&about_us_page(&PageContext::new()).unwrap())
        .await
        .unwrap();

    let first = shared.extract();
    let second = shared.extract();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn reset_forces_the_next_invocation_to_refetch() {
    let shared = Arc::new(CacheStore::default());
    let transport = Arc::new(MockTransport::storefront());
    let orchestrator = orchestrator_with_cache(Arc::clone(&transport), Arc::clone(&shared));
    let page = about_us_page(&PageContext::new()).unwrap();

    orchestrator.load(&page).await.unwrap();
    shared.reset();
    assert!(shared.extract().is_empty());

    orchestrator.load(&page).await.unwrap();
    assert_eq!(transport.calls("StoreConfig"), 2);
}
