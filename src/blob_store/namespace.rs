//! # Namespaced Blob Handle
//!
//! The storage capability handed to a running function. The namespace is
//! pinned at construction, so a function cannot reach another namespace's
//! blobs through this handle.

use std::sync::Arc;

use super::backend::BlobBackend;
use super::errors::BlobResult;

/// Per-invocation blob storage handle scoped to one namespace
#[derive(Debug, Clone)]
pub struct NamespacedBlobs {
    backend: Arc<dyn BlobBackend>,
    namespace: String,
}

impl NamespacedBlobs {
    pub fn new(backend: Arc<dyn BlobBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// The namespace this handle is scoped to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Write a blob
    pub fn put(&self, key: &str, data: &[u8]) -> BlobResult<()> {
        self.backend.put(&self.namespace, key, data)
    }

    /// Read a blob
    pub fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        self.backend.get(&self.namespace, key)
    }

    /// Delete a blob
    pub fn delete(&self, key: &str) -> BlobResult<()> {
        self.backend.delete(&self.namespace, key)
    }

    /// Check whether a blob exists
    pub fn exists(&self, key: &str) -> BlobResult<bool> {
        self.backend.exists(&self.namespace, key)
    }

    /// List every key in this namespace
    pub fn list(&self) -> BlobResult<Vec<String>> {
        self.backend.list(&self.namespace)
    }
}
