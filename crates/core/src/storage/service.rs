//! Storage service: the configured backend plus upload limits.

use bytes::Bytes;

use super::backend::{Storage, StorageBackend, UploadedFile};
use super::config::StorageConfig;
use super::error::StorageError;

/// Location of a document's bytes as recorded on its metadata row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Backend that wrote the bytes.
    pub backend: String,
    /// Path returned by that backend.
    pub path: String,
}

/// Storage service for application documents.
///
/// Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct StorageService {
    backend: Storage,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` if the configured backend cannot be built.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let backend = Storage::from_config(&config)?;
        tracing::info!(
            backend = backend.name(),
            max_file_size = config.max_file_size,
            "Document storage initialized"
        );
        Ok(Self { backend, config })
    }

    /// Get the storage configuration.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Name of the active backend.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.backend.name()
    }

    /// True when document bytes must be kept on the document record.
    #[must_use]
    pub const fn stores_content_inline(&self) -> bool {
        self.backend.stores_content_inline()
    }

    /// Validate upload parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is too large or has an invalid MIME type.
    pub fn validate_upload(&self, file: &UploadedFile) -> Result<(), StorageError> {
        self.config.validate_upload(&file.mime_type, file.size)
    }

    /// Persist bytes, returning the storage path.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub async fn save(&self, file: &UploadedFile, relative_dir: &str) -> Result<String, StorageError> {
        self.backend.save(file, relative_dir).await
    }

    /// Read bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is missing, escapes the base or the backend cannot serve reads.
    pub async fn get(&self, path: &str) -> Result<Bytes, StorageError> {
        self.backend.get(path).await
    }

    /// Delete bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.backend.delete(path).await
    }

    /// Check whether bytes exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe fails.
    pub async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        self.backend.exists(path).await
    }

    /// Read the bytes of a recorded file through the active backend.
    ///
    /// # Errors
    ///
    /// Returns `InactiveBackend` if another backend wrote the file, otherwise
    /// whatever the backend read returns.
    pub async fn read(&self, file: &StoredFile) -> Result<Bytes, StorageError> {
        if file.backend != self.provider_name() {
            return Err(StorageError::InactiveBackend {
                backend: file.backend.clone(),
                active: self.provider_name(),
            });
        }
        self.backend.get(&file.path).await
    }

    /// Delete the bytes of a superseded or orphaned record, logging instead of failing.
    ///
    /// Files written by a backend other than the active one are skipped.
    pub async fn discard(&self, file: &StoredFile) {
        if file.backend != self.provider_name() {
            tracing::warn!(
                backend = %file.backend,
                path = %file.path,
                active = self.provider_name(),
                "Skipping file stored by an inactive backend"
            );
            return;
        }
        if let Err(e) = self.backend.delete(&file.path).await {
            tracing::warn!(error = %e, path = %file.path, "Failed to discard stored file");
        }
    }

    /// Discard every file in `files`.
    pub async fn discard_all(&self, files: &[StoredFile]) {
        for file in files {
            self.discard(file).await;
        }
    }
}
