//! Storage configuration types.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Which storage backend holds document bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Bytes live on the document's database row.
    #[default]
    Database,
    /// Bytes live in files under a base directory.
    Local,
    /// Remote object store. Recognized but not implemented.
    S3,
}

impl StorageKind {
    /// Discriminator persisted on each document record.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

impl FromStr for StorageKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(StorageError::configuration(format!(
                "unknown storage backend '{other}' (expected database, local or s3)"
            ))),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Selected backend.
    pub kind: StorageKind,
    /// Base directory for the local backend.
    pub local_root: PathBuf,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 5MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Create a new storage config with default limits.
    #[must_use]
    pub fn new(kind: StorageKind) -> Self {
        Self {
            kind,
            local_root: PathBuf::from("./uploads"),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Local filesystem config rooted at `root`.
    #[must_use]
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(StorageKind::Local).with_local_root(root)
    }

    /// Build from the raw settings section of the application config.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` if the backend name is unknown.
    pub fn from_settings(
        settings: &jobboard_shared::config::StorageSettings,
    ) -> Result<Self, StorageError> {
        let kind = settings.backend.parse()?;
        Ok(Self::new(kind)
            .with_local_root(&settings.local_path)
            .with_max_file_size(settings.max_file_size))
    }

    /// Set the local base directory.
    #[must_use]
    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = root.into();
        self
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set allowed MIME types.
    #[must_use]
    pub fn with_allowed_mime_types(mut self, types: Vec<String>) -> Self {
        self.allowed_mime_types = types;
        self
    }

    /// PDF, DOC and DOCX.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        vec![
            "application/pdf".to_string(),
            "application/msword".to_string(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        ]
    }

    /// Check if a MIME type is allowed. Parameters such as `; charset=` are ignored.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        self.allowed_mime_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(essence))
    }

    /// Validate an upload against the size limit and MIME allow-list.
    ///
    /// # Errors
    ///
    /// Returns `FileTooLarge` or `InvalidMimeType`.
    pub fn validate_upload(&self, mime_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.max_file_size {
            return Err(StorageError::file_too_large(size, self.max_file_size));
        }
        if !self.is_mime_type_allowed(mime_type) {
            return Err(StorageError::invalid_mime_type(mime_type));
        }
        Ok(())
    }
}
