//! # In-Memory Document Store

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use super::document::{DocumentStore, Filter};
use super::errors::{StoreError, StoreResult};

/// In-process document store.
///
/// Collections preserve insertion order, so `get_one` returns the earliest
/// inserted match.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Whether a collection holds no documents
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

/// Assign an `id` field when the document does not carry one.
fn assign_id(doc: &mut Value) -> StoreResult<String> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| StoreError::InvalidDocument("document must be an object".into()))?;

    if let Some(id) = obj.get("id").and_then(Value::as_str) {
        return Ok(id.to_string());
    }

    let id = Uuid::new_v4().to_string();
    obj.insert("id".to_string(), Value::String(id.clone()));
    Ok(id)
}

impl DocumentStore for MemoryStore {
    fn get_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;

        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    fn add(&self, collection: &str, mut doc: Value) -> StoreResult<String> {
        let id = assign_id(&mut doc)?;

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;
        collections.entry(collection.to_string()).or_default().push(doc);

        Ok(id)
    }

    fn upsert(&self, collection: &str, filter: &Filter, mut doc: Value) -> StoreResult<String> {
        let id = assign_id(&mut doc)?;

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = docs.iter_mut().find(|d| filter.matches(d)) {
            *existing = doc;
        } else {
            docs.push(doc);
        }

        Ok(id)
    }
}
