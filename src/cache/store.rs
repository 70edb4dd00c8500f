//! Normalized in-memory result cache.
//!
//! One store backs the process-wide shared client; each page invocation
//! creates its own store for the render-scoped client.

use crate::cache::config::CacheConfig;
use crate::cache::normalize::{
    denormalize, merge_entity, normalize, root_field_key, ROOT_QUERY,
};
use crate::cache::snapshot::CacheSnapshot;
use crate::error::QueryError;
use crate::query::QueryDescriptor;
use crate::types::QueryKey;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of looking a descriptor up in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Fresh(Value),
    /// Present but older than the store's TTL.
    Stale(Value),
    Miss,
}

#[derive(Debug, Clone)]
struct RootEntry {
    value: Value,
    written_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    root: BTreeMap<String, RootEntry>,
    entities: BTreeMap<String, Value>,
    /// Root fields last written per query, for descriptors that declare none.
    written_fields: HashMap<QueryKey, Vec<String>>,
}

#[derive(Debug)]
pub struct CacheStore {
    state: RwLock<CacheState>,
    key_fields: Vec<String>,
    ttl: Option<Duration>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl CacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_settings(config.key_fields.clone(), config.ttl())
    }

    pub fn with_settings(key_fields: Vec<String>, ttl: Option<Duration>) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            key_fields,
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Store every root field of `data` under the descriptor's variables.
    pub fn write(&self, descriptor: &QueryDescriptor, data: &Value) -> Result<(), QueryError> {
        let fields = data.as_object().ok_or_else(|| {
            QueryError::SchemaError(format!(
                "{}: response data is not an object",
                descriptor.name()
            ))
        })?;

        let variables = descriptor.canonical_variables();
        let mut entities = Vec::new();
        let mut roots = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            let normalized = normalize(value, &self.key_fields, &mut entities);
            roots.push((root_field_key(field, &variables), normalized));
        }

        let now = Instant::now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        for (key, entity) in entities {
            match state.entities.get_mut(&key) {
                Some(Value::Object(existing)) => merge_entity(existing, entity),
                _ => {
                    state.entities.insert(key, Value::Object(entity));
                }
            }
        }
        state
            .written_fields
            .insert(descriptor.key(), fields.keys().cloned().collect());
        for (key, value) in roots {
            state.root.insert(
                key,
                RootEntry {
                    value,
                    written_at: now,
                },
            );
        }
        debug!(
            query = descriptor.name(),
            entities = state.entities.len(),
            "Cache write"
        );
        Ok(())
    }

    /// Reconstruct the descriptor's root fields from the store.
    ///
    /// Declared root fields are read directly. A descriptor that declares none
    /// reads back the fields its last write stored; restored snapshots carry
    /// no such record, so those descriptors miss until written again.
    pub fn read(&self, descriptor: &QueryDescriptor) -> CacheLookup {
        let variables = descriptor.canonical_variables();
        let state = self.state.read();
        let fields = if descriptor.root_fields().is_empty() {
            match state.written_fields.get(&descriptor.key()) {
                Some(fields) => fields.as_slice(),
                None => return CacheLookup::Miss,
            }
        } else {
            descriptor.root_fields()
        };

        let mut data = Map::new();
        let mut stale = false;
        for field in fields {
            let Some(entry) = state.root.get(&root_field_key(field, &variables)) else {
                return CacheLookup::Miss;
            };
            if let Some(ttl) = self.ttl {
                stale |= entry.written_at.elapsed() > ttl;
            }
            let Some(value) = denormalize(&entry.value, &state.entities, &mut Vec::new()) else {
                return CacheLookup::Miss;
            };
            data.insert(field.clone(), value);
        }

        if stale {
            CacheLookup::Stale(Value::Object(data))
        } else {
            CacheLookup::Fresh(Value::Object(data))
        }
    }

    /// Point-in-time copy of the store's contents.
    pub fn extract(&self) -> CacheSnapshot {
        let state = self.state.read();
        let mut entries = state.entities.clone();
        if !state.root.is_empty() {
            let root: Map<String, Value> = state
                .root
                .iter()
                .map(|(k, entry)| (k.clone(), entry.value.clone()))
                .collect();
            entries.insert(ROOT_QUERY.to_string(), Value::Object(root));
        }
        CacheSnapshot::from_entries(entries)
    }

    /// Replace the store's contents with a snapshot. Restored entries are fresh.
    pub fn restore(&self, snapshot: &CacheSnapshot) -> Result<(), QueryError> {
        let now = Instant::now();
        let mut root = BTreeMap::new();
        let mut entities = BTreeMap::new();
        for (key, value) in snapshot.entries() {
            if !value.is_object() {
                return Err(QueryError::SchemaError(format!(
                    "snapshot entry '{}' is not an object",
                    key
                )));
            }
            if key == ROOT_QUERY {
                if let Value::Object(fields) = value {
                    for (field, value) in fields {
                        root.insert(
                            field.clone(),
                            RootEntry {
                                value: value.clone(),
                                written_at: now,
                            },
                        );
                    }
                }
            } else {
                entities.insert(key.clone(), value.clone());
            }
        }

        let mut state = self.state.write();
        state.root = root;
        state.entities = entities;
        state.written_fields.clear();
        Ok(())
    }

    /// Drop everything (e.g. on deploy).
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.root.clear();
        state.entities.clear();
        state.written_fields.clear();
    }

    /// Number of root entries plus entities.
    pub fn len(&self) -> usize {
        let state = self.state.read();
        state.root.len() + state.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
