//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File size exceeds maximum allowed.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// MIME type not allowed.
    #[error("MIME type '{mime_type}' is not allowed")]
    InvalidMimeType {
        /// The invalid MIME type.
        mime_type: String,
    },

    /// File not found in storage.
    #[error("file not found: {path}")]
    NotFound {
        /// Path that was not found.
        path: String,
    },

    /// Path resolves outside the storage base directory.
    #[error("access denied: path '{path}' escapes the storage directory")]
    AccessDenied {
        /// Offending path.
        path: String,
    },

    /// Operation not offered by the active backend.
    #[error("operation '{operation}' is not supported by the {backend} storage backend")]
    Unsupported {
        /// Operation name.
        operation: &'static str,
        /// Backend name.
        backend: &'static str,
    },

    /// File was written by a backend other than the active one.
    #[error("file stored by the {backend} backend cannot be read through the active {active} backend")]
    InactiveBackend {
        /// Backend recorded on the row.
        backend: String,
        /// Active backend.
        active: &'static str,
    },

    /// Storage configuration error. Fatal at startup.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Underlying storage operation failure.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                path: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl StorageError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an access denied error.
    #[must_use]
    pub fn access_denied(path: impl Into<String>) -> Self {
        Self::AccessDenied { path: path.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// True for rejected input (size or type), as opposed to backend failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::FileTooLarge { .. } | Self::InvalidMimeType { .. })
    }
}
