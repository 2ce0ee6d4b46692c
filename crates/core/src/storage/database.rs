//! Database-delegated storage.
//!
//! Writes nothing itself: the orchestration layer keeps the bytes on the
//! document row, and cascading deletes of that row are the cleanup.

use bytes::Bytes;
use uuid::Uuid;

use super::backend::{StorageBackend, UploadedFile};
use super::error::StorageError;

/// Prefix of every path handed out by [`DatabaseStorage`].
pub const DATABASE_PATH_PREFIX: &str = "database://";

/// Name recorded on document rows whose bytes live on the row itself.
pub const DATABASE_BACKEND: &str = "database";

/// Marker backend whose content lives in the database.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseStorage;

impl StorageBackend for DatabaseStorage {
    fn name(&self) -> &'static str {
        DATABASE_BACKEND
    }

    async fn save(&self, _file: &UploadedFile, relative_dir: &str) -> Result<String, StorageError> {
        let dir = relative_dir.trim_matches('/');
        Ok(format!("{DATABASE_PATH_PREFIX}{dir}/{}", Uuid::new_v4()))
    }

    async fn get(&self, _path: &str) -> Result<Bytes, StorageError> {
        Err(StorageError::Unsupported {
            operation: "get",
            backend: DATABASE_BACKEND,
        })
    }

    async fn delete(&self, _path: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn exists(&self, _path: &str) -> Result<bool, StorageError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> UploadedFile {
        UploadedFile::new("cv.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.7"))
    }

    #[tokio::test]
    async fn test_save_returns_marker_path() {
        let storage = DatabaseStorage;
        let first = storage.save(&file(), "abc/cv").await.unwrap();
        let second = storage.save(&file(), "/abc/cv/").await.unwrap();

        assert!(first.starts_with("database://abc/cv/"));
        assert!(second.starts_with("database://abc/cv/"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_get_always_fails() {
        let storage = DatabaseStorage;
        let path = storage.save(&file(), "abc/cv").await.unwrap();
        let err = storage.get(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Unsupported { operation: "get", .. }));
    }

    #[tokio::test]
    async fn test_delete_and_exists_are_noops() {
        let storage = DatabaseStorage;
        storage.delete("database://anything").await.unwrap();
        assert!(storage.exists("database://anything").await.unwrap());
    }
}
