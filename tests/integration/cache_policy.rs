//! Cache policy conformance of the query client.

use super::test_utils::{cms_page_data, layout_data, MockTransport};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use storefront::cache::{CacheConfig, CacheStore};
use storefront::client::{ClientScope, QueryClient, QueryClientPair, Transport};
use storefront::error::{ErrorKind, QueryError};
use storefront::query::{documents, CachePolicy, QueryDescriptor};

fn client(transport: &Arc<MockTransport>) -> QueryClient {
    QueryClient::new(
        ClientScope::Render,
        Arc::new(CacheStore::default()),
        Arc::clone(transport) as Arc<dyn Transport>,
    )
}

#[tokio::test]
async fn cache_first_issues_at_most_one_fetch() {
    let transport = Arc::new(MockTransport::storefront());
    let client = client(&transport);
    let layout = documents::layout();

    let first = client.execute_with(&layout, CachePolicy::CacheFirst).await.unwrap();
    let second = client.execute_with(&layout, CachePolicy::CacheFirst).await.unwrap();

    assert_eq!(first, layout_data());
    assert_eq!(second, first);
    assert_eq!(transport.calls("Layout"), 1);
}

#[tokio::test]
async fn cache_first_reuses_entries_of_descriptors_without_declared_fields() {
    let transport =
        Arc::new(MockTransport::new().respond("Ping", Ok(json!({"ping": {"ok": true}}))));
    let client = client(&transport);
    let ping = QueryDescriptor::new("Ping", "query Ping { ping { ok } }");

    let first = client.execute(&ping).await.unwrap();
    let second = client.execute(&ping).await.unwrap();

    assert_eq!(second, first);
    assert_eq!(transport.calls("Ping"), 1);
    assert_eq!(
        client.execute_with(&ping, CachePolicy::CacheOnly).await.unwrap(),
        json!({"ping": {"ok": true}})
    );
}

#[tokio::test]
async fn network_only_fetches_every_time_and_overwrites() {
    let transport = Arc::new(MockTransport::storefront());
    let client = client(&transport);
    let cms = documents::cms_page("about-us");

    client.execute_with(&cms, CachePolicy::NetworkOnly).await.unwrap();
    transport.set_response(
        "CmsPage",
        Ok(cms_page_data("about-us", "About Gtech", "<p>Updated</p>")),
    );
    let refreshed = client.execute_with(&cms, CachePolicy::NetworkOnly).await.unwrap();
    assert_eq!(refreshed["cmsPage"]["title"], "About Gtech");
    assert_eq!(transport.calls("CmsPage"), 2);

    let cached = client.execute_with(&cms, CachePolicy::CacheOnly).await.unwrap();
    assert_eq!(cached["cmsPage"]["title"], "About Gtech");
    assert_eq!(transport.calls("CmsPage"), 2);
}

#[tokio::test]
async fn concurrent_network_only_calls_are_not_coalesced() {
    let transport =
        Arc::new(MockTransport::storefront().with_delay("Layout", Duration::from_millis(10)));
    let client = client(&transport);
    let layout = documents::layout();

    let (a, b) = futures::join!(
        client.execute_with(&layout, CachePolicy::NetworkOnly),
        client.execute_with(&layout, CachePolicy::NetworkOnly)
    );
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(transport.calls("Layout"), 2);
}

#[tokio::test]
async fn cache_only_miss_never_fetches() {
    let transport = Arc::new(MockTransport::storefront());
    let client = client(&transport);

    let err = client
        .execute_with(&documents::store_config(), CachePolicy::CacheOnly)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CacheMiss);
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn identity_includes_variables() {
    let transport = Arc::new(MockTransport::storefront());
    let client = client(&transport);

    client.execute(&documents::cms_page("about-us")).await.unwrap();
    let err = client
        .execute_with(&documents::cms_page("shipping"), CachePolicy::CacheOnly)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::CacheMiss(_)));
}

#[tokio::test]
async fn stale_entries_are_refetched_by_cache_first_but_served_by_cache_only() {
    let transport = Arc::new(MockTransport::storefront());
    let cache = Arc::new(CacheStore::with_settings(
        CacheConfig::default().key_fields,
        Some(Duration::from_millis(20)),
    ));
    let client = QueryClient::new(
        ClientScope::Render,
        cache,
        Arc::clone(&transport) as Arc<dyn Transport>,
    );
    let layout = documents::layout();

    client.execute(&layout).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;

    client.execute_with(&layout, CachePolicy::CacheOnly).await.unwrap();
    assert_eq!(transport.calls("Layout"), 1);

    client.execute_with(&layout, CachePolicy::CacheFirst).await.unwrap();
    assert_eq!(transport.calls("Layout"), 2);
}

#[tokio::test]
async fn failed_fetches_leave_the_cache_untouched() {
    let transport = Arc::new(
        MockTransport::storefront().respond("CmsPage", Ok(json!({"cmsPage": null}))),
    );
    let client = client(&transport);
    let cms = documents::cms_page("about-us");

    let err = client.execute(&cms).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn missing_declared_field_is_a_schema_error() {
    let transport =
        Arc::new(MockTransport::storefront().respond("Layout", Ok(json!({"menu": {"items": []}}))));
    let client = client(&transport);

    let err = client.execute(&documents::layout()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaError);
}

#[tokio::test]
async fn pair_uses_a_fresh_render_cache_per_invocation() {
    let transport = Arc::new(MockTransport::storefront());
    let shared = Arc::new(CacheStore::default());
    let config = CacheConfig::default();

    let first = QueryClientPair::new(
        Arc::clone(&shared),
        Arc::clone(&transport) as Arc<dyn Transport>,
        &config,
    );
    first.render().execute(&documents::layout()).await.unwrap();
    first.shared().execute(&documents::store_config()).await.unwrap();

    let second = QueryClientPair::new(
        Arc::clone(&shared),
        Arc::clone(&transport) as Arc<dyn Transport>,
        &config,
    );
    assert!(second.render().cache().is_empty());
    assert!(!second.shared().cache().is_empty());
    assert_eq!(second.extract_snapshot(), first.extract_snapshot());
}
