//! Storage backend contract and the configured backend selection.

use std::future::Future;

use bytes::Bytes;

use super::config::{StorageConfig, StorageKind};
use super::database::DatabaseStorage;
use super::error::StorageError;
use super::local::LocalStorage;

/// A file received from a client, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename supplied by the client.
    pub original_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// File content.
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Create an uploaded file; `size` is taken from the content length.
    #[must_use]
    pub fn new(original_name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Lower-cased extension of the original filename, restricted to ASCII
    /// alphanumerics. `None` if there is no usable extension.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.original_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
            return None;
        }
        if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Capability set every storage backend offers.
///
/// Paths are the opaque strings returned by [`save`](Self::save); callers
/// persist them on the document record and hand them back unchanged.
pub trait StorageBackend: Send + Sync {
    /// Short backend name, persisted as the document's storage discriminator.
    fn name(&self) -> &'static str;

    /// Persist `file` under `relative_dir`, returning its storage path.
    fn save(
        &self,
        file: &UploadedFile,
        relative_dir: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;

    /// Read the bytes stored at `path`.
    fn get(&self, path: &str) -> impl Future<Output = Result<Bytes, StorageError>> + Send;

    /// Remove the bytes stored at `path`.
    fn delete(&self, path: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Whether anything is stored at `path`.
    fn exists(&self, path: &str) -> impl Future<Output = Result<bool, StorageError>> + Send;
}

/// The backend selected at startup.
#[derive(Debug, Clone)]
pub enum Storage {
    /// Bytes stored on the metadata record by the caller.
    Database(DatabaseStorage),
    /// Bytes stored under a base directory.
    Local(LocalStorage),
}

impl Storage {
    /// Build the backend named by `config.kind`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` for the reserved object-store
    /// backend, which has no implementation.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match config.kind {
            StorageKind::Database => Ok(Self::Database(DatabaseStorage)),
            StorageKind::Local => LocalStorage::new(&config.local_root).map(Self::Local),
            StorageKind::S3 => Err(StorageError::configuration(
                "the s3 storage backend is reserved and not implemented",
            )),
        }
    }

    /// True when the caller must keep the bytes on the document record.
    #[must_use]
    pub const fn stores_content_inline(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl StorageBackend for Storage {
    fn name(&self) -> &'static str {
        match self {
            Self::Database(s) => s.name(),
            Self::Local(s) => s.name(),
        }
    }

    async fn save(&self, file: &UploadedFile, relative_dir: &str) -> Result<String, StorageError> {
        match self {
            Self::Database(s) => s.save(file, relative_dir).await,
            Self::Local(s) => s.save(file, relative_dir).await,
        }
    }

    async fn get(&self, path: &str) -> Result<Bytes, StorageError> {
        match self {
            Self::Database(s) => s.get(path).await,
            Self::Local(s) => s.get(path).await,
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        match self {
            Self::Database(s) => s.delete(path).await,
            Self::Local(s) => s.delete(path).await,
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        match self {
            Self::Database(s) => s.exists(path).await,
            Self::Local(s) => s.exists(path).await,
        }
    }
}
