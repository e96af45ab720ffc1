//! # Document Store Boundary
//!
//! The engine reads function definitions from, and appends invocation logs
//! to, a schemaless document store. Only the operations the engine actually
//! issues are part of this boundary: find-one, find, insert, upsert.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::errors::StoreResult;

/// Equality filter over top-level document fields.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: BTreeMap<String, Value>,
}

impl Filter {
    /// Filter on a single field
    pub fn field(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().with(key, value)
    }

    /// Add another field to the filter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Whether the document satisfies every field of the filter
    pub fn matches(&self, doc: &Value) -> bool {
        self.fields
            .iter()
            .all(|(key, expected)| doc.get(key) == Some(expected))
    }

    /// Whether the filter has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Backend trait for document storage
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Return the first document in the collection matching the filter.
    ///
    /// "First" is the backend's stored order; backends in this crate preserve
    /// insertion order.
    fn get_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>>;

    /// Return every document in the collection matching the filter
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>>;

    /// Append a document to the collection, returning its assigned id
    fn add(&self, collection: &str, doc: Value) -> StoreResult<String>;

    /// Replace the first document matching the filter, or append when none
    /// matches. Returns the id of the stored document.
    fn upsert(&self, collection: &str, filter: &Filter, doc: Value) -> StoreResult<String>;
}

/// Handle over a document store, issuing one lookup per call.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<dyn DocumentStore>,
}

impl Database {
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self { inner }
    }

    /// Access a collection by name
    pub fn collection<'a>(&'a self, name: &'a str) -> Collection<'a> {
        Collection {
            store: self.inner.as_ref(),
            name,
        }
    }

    /// The underlying store handle
    pub fn raw(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.inner)
    }
}

/// A named collection within a document store
#[derive(Debug, Clone, Copy)]
pub struct Collection<'a> {
    store: &'a dyn DocumentStore,
    name: &'a str,
}

impl<'a> Collection<'a> {
    /// Narrow the collection by a filter
    pub fn filter(self, filter: Filter) -> Query<'a> {
        Query {
            collection: self,
            filter,
        }
    }

    /// Append a document, returning its assigned id
    pub fn add(&self, doc: Value) -> StoreResult<String> {
        self.store.add(self.name, doc)
    }

    /// Replace the first match of the filter, or append
    pub fn upsert(&self, filter: &Filter, doc: Value) -> StoreResult<String> {
        self.store.upsert(self.name, filter, doc)
    }
}

/// A filtered read over one collection
#[derive(Debug)]
pub struct Query<'a> {
    collection: Collection<'a>,
    filter: Filter,
}

impl Query<'_> {
    /// First matching document, if any
    pub fn get_one(&self) -> StoreResult<Option<Value>> {
        self.collection
            .store
            .get_one(self.collection.name, &self.filter)
    }

    /// Every matching document
    pub fn find(&self) -> StoreResult<Vec<Value>> {
        self.collection.store.find(self.collection.name, &self.filter)
    }
}
