//! Document byte storage.
//!
//! Two interchangeable backends behind [`StorageBackend`]:
//!
//! - [`LocalStorage`]: files under a base directory, traversal-safe
//! - [`DatabaseStorage`]: hands out marker paths; the caller keeps the bytes on the document row
//!
//! The backend is chosen once at startup from [`StorageConfig`] and held by
//! [`StorageService`], which also enforces the upload size and MIME limits.

mod backend;
mod config;
mod database;
mod error;
mod local;
mod service;

pub use backend::{Storage, StorageBackend, UploadedFile};
pub use config::{StorageConfig, StorageKind};
pub use database::{DATABASE_BACKEND, DATABASE_PATH_PREFIX, DatabaseStorage};
pub use error::StorageError;
pub use local::LocalStorage;
pub use service::{StorageService, StoredFile};

use jobboard_shared::AppError;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileTooLarge { .. } | StorageError::InvalidMimeType { .. } => {
                Self::Validation(err.to_string())
            }
            StorageError::AccessDenied { .. } => Self::Forbidden(err.to_string()),
            StorageError::Configuration(msg) => Self::Configuration(msg),
            // A record whose bytes are gone is a backend fault, not a missing resource.
            StorageError::NotFound { .. }
            | StorageError::Unsupported { .. }
            | StorageError::InactiveBackend { .. }
            | StorageError::Operation(_) => {
                Self::Storage(err.to_string())
            }
        }
    }
}
