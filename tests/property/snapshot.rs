//! Snapshot invariants: last write wins per entity field, reads are idempotent.

use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use storefront::cache::CacheStore;
use storefront::query::QueryDescriptor;

const ITEM_DOCUMENT: &str = "query Item($n: Int!) { item(n: $n) { __typename id x y z } }";

/// (entity id, field, value) writes.
fn writes() -> impl Strategy<Value = Vec<(u8, String, i64)>> {
    vec((0u8..4, "[xyz]", any::<i64>()), 1..20)
}

fn write_all(cache: &CacheStore, writes: &[(u8, String, i64)]) {
    for (n, (id, field, value)) in writes.iter().enumerate() {
        let descriptor = QueryDescriptor::new("Item", ITEM_DOCUMENT)
            .with_variable("n", n as u64)
            .selects("item");
        let data = json!({
            "item": { "__typename": "Item", "id": format!("i{}", id), field.as_str(): value }
        });
        cache.write(&descriptor, &data).unwrap();
    }
}

#[test]
fn test_last_write_wins_by_key_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&writes(), |writes| {
            let cache = CacheStore::default();
            write_all(&cache, &writes);

            let mut expected: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
            for (id, field, value) in &writes {
                expected
                    .entry(format!("Item:i{}", id))
                    .or_default()
                    .insert(field.clone(), *value);
            }

            let snapshot = cache.extract();
            prop_assert_eq!(snapshot.len(), expected.len() + 1);
            for (key, fields) in &expected {
                let entity = snapshot.get(key);
                prop_assert!(entity.is_some());
                let entity = entity.unwrap_or(&Value::Null);
                for (field, value) in fields {
                    prop_assert_eq!(&entity[field.as_str()], &Value::from(*value));
                }
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_extract_and_restore_are_idempotent_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&writes(), |writes| {
            let cache = CacheStore::default();
            write_all(&cache, &writes);

            let first = cache.extract();
            let second = cache.extract();
            prop_assert_eq!(&first, &second);

            let restored = CacheStore::default();
            restored.restore(&first).unwrap();
            prop_assert_eq!(restored.extract(), first);
            Ok(())
        })
        .unwrap();
}
