//! # Shared Preference Store
//!
//! Process-wide mutable key-value memory, visible to every invocation for
//! the life of the process. No eviction, no TTL, no persistence. Single gets
//! and puts are atomic; compound read-modify-write sequences are the
//! caller's responsibility and race under concurrency (last write wins).
//!
//! Unbounded growth: keys are only removed when a function removes them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

/// Cross-invocation shared key-value store.
///
/// Cloning hands out another handle to the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences {
    inner: Arc<RwLock<HashMap<String, Value>>>,
}

impl SharedPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        match self.inner.read() {
            Ok(guard) => guard,
            // A poisoned map is still the map; keep serving it.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Read a value by key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Store a value, returning the previous one if any
    pub fn put(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.write().insert(key.into(), value)
    }

    /// Remove a key, returning its value if present
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
