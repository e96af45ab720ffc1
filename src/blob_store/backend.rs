//! # Blob Backend Trait

use super::errors::BlobResult;

/// Backend trait for namespaced blob storage.
///
/// Every operation takes the namespace explicitly; per-invocation scoping is
/// layered on top by [`super::NamespacedBlobs`].
pub trait BlobBackend: Send + Sync + std::fmt::Debug {
    /// Write a blob under `namespace/key`
    fn put(&self, namespace: &str, key: &str, data: &[u8]) -> BlobResult<()>;

    /// Read the blob at `namespace/key`
    fn get(&self, namespace: &str, key: &str) -> BlobResult<Vec<u8>>;

    /// Delete the blob at `namespace/key`
    fn delete(&self, namespace: &str, key: &str) -> BlobResult<()>;

    /// Check whether `namespace/key` exists
    fn exists(&self, namespace: &str, key: &str) -> BlobResult<bool>;

    /// List every key stored in the namespace
    fn list(&self, namespace: &str) -> BlobResult<Vec<String>>;
}
