//! Document error types.

use thiserror::Error;
use uuid::Uuid;

use crate::policy::Denial;
use crate::storage::StorageError;

/// Document operation errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document not found.
    #[error("document not found: {0}")]
    NotFound(Uuid),

    /// Application not found.
    #[error("application not found: {0}")]
    ApplicationNotFound(Uuid),

    /// The record says the bytes are on the row but none are there.
    #[error("content missing for document {0}")]
    ContentMissing(Uuid),

    /// Refused by the access policy.
    #[error(transparent)]
    Denied(#[from] Denial),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl DocumentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<DocumentError> for jobboard_shared::AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) | DocumentError::ApplicationNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            DocumentError::ContentMissing(_) => Self::Storage(err.to_string()),
            DocumentError::Denied(denial) => denial.into(),
            DocumentError::Storage(e) => e.into(),
            DocumentError::Repository(msg) => Self::Database(msg),
        }
    }
}
