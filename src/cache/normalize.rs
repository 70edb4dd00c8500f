//! Normalization of query results into keyed entities, and the reverse.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Entity key holding root field entries in a snapshot.
pub const ROOT_QUERY: &str = "ROOT_QUERY";

/// Field name marking a reference to a normalized entity.
pub const REF_FIELD: &str = "__ref";

const TYPENAME_FIELD: &str = "__typename";

/// Entity key for an object: `<Typename>:<key>`, using the first key field present.
pub fn entity_key(object: &Map<String, Value>, key_fields: &[String]) -> Option<String> {
    let typename = object.get(TYPENAME_FIELD)?.as_str()?;
    for field in key_fields {
        match object.get(field) {
            Some(Value::String(id)) if !id.is_empty() => {
                return Some(format!("{}:{}", typename, id));
            }
            Some(Value::Number(id)) => return Some(format!("{}:{}", typename, id)),
            _ => {}
        }
    }
    None
}

/// Key of a root field entry: `field` or `field({canonical variables})`.
pub fn root_field_key(field: &str, canonical_variables: &str) -> String {
    if canonical_variables.is_empty() {
        field.to_string()
    } else {
        format!("{}({})", field, canonical_variables)
    }
}

pub fn reference(key: &str) -> Value {
    json!({ REF_FIELD: key })
}

/// The referenced key if `value` is exactly `{"__ref": "<key>"}`.
pub fn as_reference(value: &Value) -> Option<&str> {
    match value {
        Value::Object(object) if object.len() == 1 => object.get(REF_FIELD)?.as_str(),
        _ => None,
    }
}

/// Replace identifiable objects with references, collecting the entities in
/// the order they were encountered (inner entities first).
pub fn normalize(
    value: &Value,
    key_fields: &[String],
    entities: &mut Vec<(String, Map<String, Value>)>,
) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| normalize(item, key_fields, entities))
                .collect(),
        ),
        Value::Object(object) => {
            let mut normalized = Map::new();
            for (field, inner) in object {
                normalized.insert(field.clone(), normalize(inner, key_fields, entities));
            }
            match entity_key(object, key_fields) {
                Some(key) => {
                    let stub = reference(&key);
                    entities.push((key, normalized));
                    stub
                }
                None => Value::Object(normalized),
            }
        }
        other => other.clone(),
    }
}

/// Resolve references against `entities`. Returns `None` on a dangling reference.
/// A reference back into the entity currently being resolved is left as-is.
pub fn denormalize(
    value: &Value,
    entities: &BTreeMap<String, Value>,
    resolving: &mut Vec<String>,
) -> Option<Value> {
    if let Some(key) = as_reference(value) {
        if resolving.iter().any(|k| k == key) {
            return Some(value.clone());
        }
        let entity = entities.get(key)?;
        resolving.push(key.to_string());
        let resolved = denormalize(entity, entities, resolving);
        resolving.pop();
        return resolved;
    }

    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| denormalize(item, entities, resolving))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        Value::Object(object) => {
            let mut resolved = Map::new();
            for (field, inner) in object {
                resolved.insert(field.clone(), denormalize(inner, entities, resolving)?);
            }
            Some(Value::Object(resolved))
        }
        other => Some(other.clone()),
    }
}

/// Field-level merge; incoming fields win.
pub fn merge_entity(existing: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (field, value) in incoming {
        existing.insert(field, value);
    }
}
