//! # JSON File Document Store
//!
//! Durable storage for small deployments and the CLI: every collection lives
//! in one JSON file, rewritten on each mutation. Reads load the file fresh,
//! so concurrent processes see last-write-wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use uuid::Uuid;

use super::document::{DocumentStore, Filter};
use super::errors::{StoreError, StoreResult};

/// JSON file-backed document store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes load-modify-save cycles within one process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<BTreeMap<String, Vec<Value>>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::IoError(format!("Failed to read store: {}", e)))?;

        if content.is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StoreError::Serialization(format!("Failed to parse store: {}", e)))
    }

    fn save(&self, collections: &BTreeMap<String, Vec<Value>>) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(collections)
            .map_err(|e| StoreError::Serialization(format!("Failed to serialize store: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::IoError(format!("Failed to create store directory: {}", e)))?;
        }

        fs::write(&self.path, content)
            .map_err(|e| StoreError::IoError(format!("Failed to write store: {}", e)))
    }
}

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

impl DocumentStore for FileStore {
    fn get_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let collections = self.load()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let collections = self.load()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    fn add(&self, collection: &str, mut doc: Value) -> StoreResult<String> {
        let id = assign_id(&mut doc)?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;

        let mut collections = self.load()?;
        collections.entry(collection.to_string()).or_default().push(doc);
        self.save(&collections)?;

        Ok(id)
    }

    fn upsert(&self, collection: &str, filter: &Filter, mut doc: Value) -> StoreResult<String> {
        let id = assign_id(&mut doc)?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;

        let mut collections = self.load()?;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = docs.iter_mut().find(|d| filter.matches(d)) {
            *existing = doc;
        } else {
            docs.push(doc);
        }

        self.save(&collections)?;
        Ok(id)
    }
}
