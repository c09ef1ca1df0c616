//! Local filesystem object storage.
//!
//! Objects are flat files under a configured root directory, addressed by an
//! opaque key. Keys are restricted to a safe character set so a key can never
//! escape the root.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key")]
    InvalidKey,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed object store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Keys are limited to alphanumerics, dash, underscore and dot, and may
    /// not start with a dot.
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty()
            && !key.starts_with('.')
            && key.len() <= 128
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !Self::is_valid_key(key) {
            return Err(StorageError::InvalidKey);
        }
        Ok(self.root.join(key))
    }

    /// Writes an object, creating the root directory on first use.
    pub async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        fs::create_dir_all(&self.root).await?;
        let mut file = fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    /// Opens an object for streaming reads.
    pub async fn open(&self, key: &str) -> Result<fs::File, StorageError> {
        let path = self.object_path(key)?;
        Ok(fs::File::open(&path).await?)
    }

    /// Removes an object. Missing objects are not an error.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// The storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage(tag: &str) -> LocalStorage {
        let root = std::env::temp_dir().join(format!("quizdeck-storage-{}-{}", tag, std::process::id()));
        LocalStorage::new(root)
    }

    #[test]
    fn test_valid_keys() {
        assert!(LocalStorage::is_valid_key("abc123.png"));
        assert!(LocalStorage::is_valid_key("editor-55e1_v2.jpeg"));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(!LocalStorage::is_valid_key(""));
        assert!(!LocalStorage::is_valid_key(".hidden"));
        assert!(!LocalStorage::is_valid_key("../escape"));
        assert!(!LocalStorage::is_valid_key("a/b"));
        assert!(!LocalStorage::is_valid_key(&"x".repeat(200)));
    }

    #[tokio::test]
    async fn test_put_open_delete_round_trip() {
        let storage = temp_storage("roundtrip");
        storage.put("object.bin", b"payload").await.unwrap();

        let file = storage.open("object.bin").await.unwrap();
        let metadata = file.metadata().await.unwrap();
        assert_eq!(metadata.len(), 7);

        storage.delete("object.bin").await.unwrap();
        assert!(storage.open("object.bin").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let storage = temp_storage("delete-missing");
        storage.delete("never-existed.bin").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_rejects_bad_key() {
        let storage = temp_storage("bad-key");
        let result = storage.put("../outside", b"x").await;
        assert!(matches!(result, Err(StorageError::InvalidKey)));
    }
}
