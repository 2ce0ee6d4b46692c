//! Local filesystem storage.

use std::path::{Component, Path};

use bytes::Bytes;
use opendal::{ErrorKind, Operator, services};
use uuid::Uuid;

use super::backend::{StorageBackend, UploadedFile};
use super::error::StorageError;

/// Stores files under a fixed base directory through an `OpenDAL` filesystem operator.
///
/// Every path is resolved lexically against the base before it reaches the
/// operator. Absolute paths, drive prefixes and `..` components that climb
/// above the base are refused with [`StorageError::AccessDenied`].
#[derive(Debug, Clone)]
pub struct LocalStorage {
    operator: Operator,
}

impl LocalStorage {
    /// Create a backend rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the root is not valid UTF-8 or the
    /// operator cannot be built.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let builder = services::Fs::default().root(
            root.as_ref()
                .to_str()
                .ok_or_else(|| StorageError::configuration("invalid local storage root"))?,
        );
        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();
        Ok(Self { operator })
    }

    /// Normalize `path` into components below the base directory.
    fn normalize(path: &str) -> Result<Vec<String>, StorageError> {
        let mut parts: Vec<String> = Vec::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| StorageError::access_denied(path))?;
                    parts.push(part.to_string());
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(StorageError::access_denied(path));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::access_denied(path));
                }
            }
        }
        Ok(parts)
    }

    /// Resolve a stored path to an operator key naming a file below the base.
    fn resolve(path: &str) -> Result<String, StorageError> {
        let parts = Self::normalize(path)?;
        if parts.is_empty() {
            return Err(StorageError::access_denied(path));
        }
        Ok(parts.join("/"))
    }
}

impl StorageBackend for LocalStorage {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn save(&self, file: &UploadedFile, relative_dir: &str) -> Result<String, StorageError> {
        let mut parts = Self::normalize(relative_dir)?;

        let filename = match file.extension() {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        parts.push(filename);
        let key = parts.join("/");

        // The fs service creates missing parent directories.
        self.operator.write(&key, file.bytes.clone()).await?;

        tracing::debug!(path = %key, size = file.size, "Stored file on local disk");
        Ok(key)
    }

    async fn get(&self, path: &str) -> Result<Bytes, StorageError> {
        let key = Self::resolve(path)?;
        match self.operator.read(&key).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(path)),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let key = Self::resolve(path)?;
        match self.operator.delete(&key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let key = Self::resolve(path)?;
        Ok(self.operator.exists(&key).await?)
    }
}
