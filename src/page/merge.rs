//! Merging query results into page props.
//!
//! Explicit claims are applied first, in declaration order, and own their
//! keys. Spread fields then fill the remaining keys; the earliest declared
//! query wins a collision.

use crate::page::definition::{FieldOwnership, PageQuery, HYDRATION_KEY};
use crate::types::Props;
use serde_json::Value;
use tracing::{debug, warn};

pub fn merge_props<'a, I>(page: &str, results: I) -> Props
where
    I: IntoIterator<Item = (&'a PageQuery, &'a Value)>,
{
    let results: Vec<(&PageQuery, &Value)> = results.into_iter().collect();
    let mut props = Props::new();

    for (query, data) in &results {
        let FieldOwnership::Fields(claims) = &query.ownership else {
            continue;
        };
        for claim in claims {
            if let Some(value) = data.get(&claim.source) {
                props.insert(claim.target.clone(), value.clone());
            }
        }
    }

    for (query, data) in &results {
        if query.ownership != FieldOwnership::Spread {
            continue;
        }
        let Some(fields) = data.as_object() else {
            continue;
        };
        for (field, value) in fields {
            if field == HYDRATION_KEY {
                warn!(page, query = query.name(), field = %field, "Dropping field named like the hydration key");
                continue;
            }
            if props.contains_key(field) {
                debug!(page, query = query.name(), field = %field, "Props key already owned, skipping");
                continue;
            }
            props.insert(field.clone(), value.clone());
        }
    }

    props
}
