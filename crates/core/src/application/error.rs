//! Application error types.

use thiserror::Error;
use uuid::Uuid;

use crate::policy::Denial;

/// Application operation errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Application not found.
    #[error("application not found: {0}")]
    NotFound(Uuid),

    /// Offer not found, or paused and hidden from the requester.
    #[error("offer not found: {0}")]
    OfferNotFound(Uuid),

    /// The user already applied to this offer.
    #[error("already applied to offer {0}")]
    AlreadyApplied(Uuid),

    /// Refused by the access policy.
    #[error(transparent)]
    Denied(#[from] Denial),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ApplicationError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<ApplicationError> for jobboard_shared::AppError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound(_) | ApplicationError::OfferNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ApplicationError::AlreadyApplied(_) => Self::Conflict(err.to_string()),
            ApplicationError::Denied(denial) => denial.into(),
            ApplicationError::Repository(msg) => Self::Database(msg),
        }
    }
}
