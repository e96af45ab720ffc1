//! # Blob Store
//!
//! Namespaced key-value blob storage. Each invocation receives a
//! [`NamespacedBlobs`] handle pinned to one namespace; [`BlobBackend`]
//! implementations provide the actual bytes.

pub mod backend;
pub mod errors;
pub mod local;
pub mod namespace;

pub use backend::BlobBackend;
pub use errors::{BlobError, BlobResult};
pub use local::LocalBlobStore;
pub use namespace::NamespacedBlobs;
