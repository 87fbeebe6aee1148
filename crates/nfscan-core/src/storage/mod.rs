//! Object storage boundary and a local-filesystem implementation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::StorageError;

/// Bucket + key addressed object storage.
pub trait ObjectStore: Send + Sync {
    /// Read an object's bytes.
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Copy an object within a bucket, overwriting the destination.
    fn copy(&self, bucket: &str, source_key: &str, destination_key: &str) -> Result<(), StorageError>;

    /// Delete an object.
    fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        (**self).get(bucket, key)
    }

    fn copy(&self, bucket: &str, source_key: &str, destination_key: &str) -> Result<(), StorageError> {
        (**self).copy(bucket, source_key, destination_key)
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        (**self).delete(bucket, key)
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        (**self).exists(bucket, key)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        (**self).get(bucket, key)
    }

    fn copy(&self, bucket: &str, source_key: &str, destination_key: &str) -> Result<(), StorageError> {
        (**self).copy(bucket, source_key, destination_key)
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        (**self).delete(bucket, key)
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        (**self).exists(bucket, key)
    }
}

/// Object store rooted at a directory: bucket `b`, key `k/x.png` lives at
/// `<root>/b/k/x.png`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path of an object. Keys may not escape their bucket.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(StorageError::InvalidKey(bucket.to_string()));
        }
        if key.is_empty()
            || key.contains('\\')
            || !Path::new(key)
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(bucket).join(key))
    }

    fn not_found(bucket: &str, key: &str) -> StorageError {
        StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

impl ObjectStore for LocalStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Self::not_found(bucket, key),
            _ => StorageError::Io(e),
        })
    }

    fn copy(&self, bucket: &str, source_key: &str, destination_key: &str) -> Result<(), StorageError> {
        let source = self.object_path(bucket, source_key)?;
        let destination = self.object_path(bucket, destination_key)?;

        if !source.is_file() {
            return Err(Self::not_found(bucket, source_key));
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &destination)?;
        debug!("Copied {} -> {}", source.display(), destination.display());
        Ok(())
    }

    fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Self::not_found(bucket, key),
            _ => StorageError::Io(e),
        })?;
        debug!("Deleted {}", path.display());
        Ok(())
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        Ok(self.object_path(bucket, key)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(bucket: &str, key: &str, content: &[u8]) -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(bucket).join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_get_and_exists() {
        let (_dir, store) = store_with("notas", "inv1.png", b"png");
        assert_eq!(store.get("notas", "inv1.png").unwrap(), b"png");
        assert!(store.exists("notas", "inv1.png").unwrap());
        assert!(!store.exists("notas", "inv2.png").unwrap());
        assert!(matches!(
            store.get("notas", "inv2.png"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn test_copy_creates_category_directory() {
        let (_dir, store) = store_with("notas", "inv1.png", b"png");
        store.copy("notas", "inv1.png", "cash/inv1.png").unwrap();
        assert!(store.exists("notas", "inv1.png").unwrap());
        assert_eq!(store.get("notas", "cash/inv1.png").unwrap(), b"png");
    }

    #[test]
    fn test_copy_missing_source() {
        let (_dir, store) = store_with("notas", "inv1.png", b"png");
        assert!(matches!(
            store.copy("notas", "missing.png", "cash/missing.png"),
            Err(StorageError::NotFound { .. })
        ));
        assert!(!store.exists("notas", "cash/missing.png").unwrap());
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store_with("notas", "inv1.png", b"png");
        store.delete("notas", "inv1.png").unwrap();
        assert!(!store.exists("notas", "inv1.png").unwrap());
        assert!(matches!(
            store.delete("notas", "inv1.png"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn test_keys_cannot_escape_bucket() {
        let store = LocalStore::new("/tmp/root");
        for key in ["../x.png", "/etc/passwd", "a/../../b", "", "a\\b"] {
            assert!(
                matches!(store.object_path("notas", key), Err(StorageError::InvalidKey(_))),
                "{key}"
            );
        }
        for bucket in ["", "..", "a/b"] {
            assert!(store.object_path(bucket, "x.png").is_err(), "{bucket}");
        }
        assert_eq!(
            store.object_path("notas", "cash/x.png").unwrap(),
            PathBuf::from("/tmp/root/notas/cash/x.png")
        );
    }
}
