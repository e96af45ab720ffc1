//! # Local Filesystem Blob Backend

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use super::backend::BlobBackend;
use super::errors::{BlobError, BlobResult};

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").expect("segment pattern is valid")
    })
}

/// Validate a namespace: one path segment, no traversal.
pub fn validate_namespace(namespace: &str) -> BlobResult<()> {
    if segment_pattern().is_match(namespace) {
        Ok(())
    } else {
        Err(BlobError::InvalidNamespace(namespace.to_string()))
    }
}

/// Validate a key: slash-separated segments, each well-formed.
pub fn validate_key(key: &str) -> BlobResult<()> {
    if key.is_empty() {
        return Err(BlobError::InvalidKey(key.to_string()));
    }
    for segment in key.split('/') {
        if !segment_pattern().is_match(segment) {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
    }
    Ok(())
}

/// Local filesystem blob backend.
///
/// Blobs are stored as files under `root/namespace/key`; namespaces and key
/// segments are validated before touching the filesystem.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, namespace: &str, key: &str) -> BlobResult<PathBuf> {
        validate_namespace(namespace)?;
        validate_key(key)?;
        Ok(self.root.join(namespace).join(key))
    }
}

fn collect_keys(dir: &Path, prefix: &str, out: &mut Vec<String>) -> BlobResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| BlobError::IoError(e.to_string()))?;

    for entry in entries {
        let entry = entry.map_err(|e| BlobError::IoError(e.to_string()))?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        let key = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        let file_type = entry.file_type().map_err(|e| BlobError::IoError(e.to_string()))?;
        if file_type.is_dir() {
            collect_keys(&entry.path(), &key, out)?;
        } else {
            out.push(key);
        }
    }

    Ok(())
}

impl BlobBackend for LocalBlobStore {
    fn put(&self, namespace: &str, key: &str, data: &[u8]) -> BlobResult<()> {
        let path = self.blob_path(namespace, key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BlobError::IoError(e.to_string()))?;
        }

        fs::write(&path, data).map_err(|e| BlobError::IoError(e.to_string()))
    }

    fn get(&self, namespace: &str, key: &str) -> BlobResult<Vec<u8>> {
        let path = self.blob_path(namespace, key)?;

        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlobError::NotFound(format!("{}/{}", namespace, key))
            } else {
                BlobError::IoError(e.to_string())
            }
        })
    }

    fn delete(&self, namespace: &str, key: &str) -> BlobResult<()> {
        let path = self.blob_path(namespace, key)?;

        fs::remove_file(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlobError::NotFound(format!("{}/{}", namespace, key))
            } else {
                BlobError::IoError(e.to_string())
            }
        })
    }

    fn exists(&self, namespace: &str, key: &str) -> BlobResult<bool> {
        Ok(self.blob_path(namespace, key)?.exists())
    }

    fn list(&self, namespace: &str) -> BlobResult<Vec<String>> {
        validate_namespace(namespace)?;

        let dir = self.root.join(namespace);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        collect_keys(&dir, "", &mut keys)?;
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_get() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp.path());

        store.put("app1", "greeting.txt", b"hello").unwrap();
        assert_eq!(store.get("app1", "greeting.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_nested_key() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp.path());

        store.put("app1", "a/b/c.bin", b"nested").unwrap();
        assert_eq!(store.get("app1", "a/b/c.bin").unwrap(), b"nested");
    }

    #[test]
    fn test_delete() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp.path());

        store.put("app1", "bye.txt", b"bye").unwrap();
        assert!(store.exists("app1", "bye.txt").unwrap());

        store.delete("app1", "bye.txt").unwrap();
        assert!(!store.exists("app1", "bye.txt").unwrap());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp.path());

        let result = store.get("app1", "absent.txt");
        assert!(matches!(result, Err(BlobError::NotFound(_))));
    }

    #[test]
    fn test_list_is_sorted_and_recursive() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp.path());

        store.put("app1", "b.txt", b"1").unwrap();
        store.put("app1", "a/1.txt", b"2").unwrap();
        store.put("app2", "other.txt", b"3").unwrap();

        let keys = store.list("app1").unwrap();
        assert_eq!(keys, vec!["a/1.txt".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn test_traversal_rejected() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp.path());

        assert!(matches!(
            store.put("..", "key", b"x"),
            Err(BlobError::InvalidNamespace(_))
        ));
        assert!(matches!(
            store.put("app1", "../escape", b"x"),
            Err(BlobError::InvalidKey(_))
        ));
        assert!(matches!(
            store.get("app1", ""),
            Err(BlobError::InvalidKey(_))
        ));
    }
}
