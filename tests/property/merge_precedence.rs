//! Prop merging: explicit claims win, earlier spreads win among spreads.

use proptest::collection::btree_map;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use storefront::client::ClientScope;
use storefront::page::merge::merge_props;
use storefront::page::{PageQuery, HYDRATION_KEY};
use storefront::query::QueryDescriptor;

fn fields() -> impl Strategy<Value = BTreeMap<String, i64>> {
    btree_map("[a-e]", any::<i64>(), 0..5)
}

fn as_data(fields: &BTreeMap<String, i64>) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(*v)))
        .collect();
    Value::Object(map)
}

fn spread_query(name: &str) -> PageQuery {
    PageQuery::required(
        QueryDescriptor::new(name, format!("query {} {{ a b c d e }}", name)),
        ClientScope::Render,
    )
    .spread()
}

#[test]
fn test_earlier_spread_wins_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(fields(), fields(), fields()), |(first, second, third)| {
            let queries = [spread_query("First"), spread_query("Second"), spread_query("Third")];
            let data = [as_data(&first), as_data(&second), as_data(&third)];
            let props = merge_props("prop", queries.iter().zip(data.iter()));

            for key in ["a", "b", "c", "d", "e"] {
                let expected = first
                    .get(key)
                    .or_else(|| second.get(key))
                    .or_else(|| third.get(key))
                    .map(|v| Value::from(*v));
                prop_assert_eq!(props.get(key).cloned(), expected);
            }
            prop_assert!(!props.contains_key(HYDRATION_KEY));
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_explicit_claim_overrides_spread_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(fields(), any::<i64>(), "[a-e]"),
            |(spread_fields, claimed_value, claimed_key)| {
                let spread = spread_query("Spread");
                let claimed = PageQuery::required(
                    QueryDescriptor::new("Claimed", "query Claimed { value }").selects("value"),
                    ClientScope::Render,
                )
                .alias("value", &claimed_key);

                let spread_data = as_data(&spread_fields);
                let claimed_data = serde_json::json!({ "value": claimed_value });
                let props = merge_props(
                    "prop",
                    [(&spread, &spread_data), (&claimed, &claimed_data)],
                );

                prop_assert_eq!(props.get(&claimed_key), Some(&Value::from(claimed_value)));
                for (key, value) in &spread_fields {
                    if key != &claimed_key {
                        prop_assert_eq!(props.get(key), Some(&Value::from(*value)));
                    }
                }
                Ok(())
            },
        )
        .unwrap();
}
