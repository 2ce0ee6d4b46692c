//! Offer error types.

use thiserror::Error;
use uuid::Uuid;

use crate::policy::Denial;

/// Offer operation errors.
#[derive(Debug, Error)]
pub enum OfferError {
    /// Offer not found (or paused and hidden from the requester).
    #[error("offer not found: {0}")]
    NotFound(Uuid),

    /// Invalid offer content.
    #[error("invalid offer: {0}")]
    Validation(String),

    /// Refused by the access policy.
    #[error(transparent)]
    Denied(#[from] Denial),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl OfferError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<OfferError> for jobboard_shared::AppError {
    fn from(err: OfferError) -> Self {
        match err {
            OfferError::NotFound(_) => Self::NotFound(err.to_string()),
            OfferError::Validation(msg) => Self::Validation(msg),
            OfferError::Denied(denial) => denial.into(),
            OfferError::Repository(msg) => Self::Database(msg),
        }
    }
}
