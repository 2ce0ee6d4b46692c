//! Access policy evaluator.
//!
//! Every decision is a pure function of the requesting identity (id and
//! role) and the ownership facts of the resources involved. Nothing here
//! touches the database; callers load the facts and pass them in.
//!
//! Rules:
//!
//! | Action | Allowed for |
//! |---|---|
//! | view application, view/list its documents | applicant, or recruiter owning the offer |
//! | upload/delete document, withdraw application | applicant only |
//! | change application status | recruiter owning the offer |
//! | create application | anyone but the offer's recruiter, once per offer |
//! | create offer | recruiters |
//! | modify/delete offer, list its applications | recruiter owning the offer, or admin |
//! | view offer | anyone when active; only the owning recruiter when paused |
//! | modify user account | the account owner |

mod rules;

#[cfg(test)]
mod tests;

pub use rules::*;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::Role;

/// The authenticated identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID.
    pub user_id: Uuid,
    /// User role.
    pub role: Role,
}

impl Actor {
    /// Create an actor.
    #[must_use]
    pub const fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    /// No identity was presented.
    #[error("authentication required")]
    NotAuthenticated,
    /// The identity is known but not allowed to perform the action.
    #[error("not allowed to perform this action")]
    Forbidden,
    /// The resource must look absent to this requester.
    #[error("resource not found")]
    NotFound,
    /// The action would violate a uniqueness rule.
    #[error("resource already exists")]
    Conflict,
}

/// Result of a policy check.
pub type Decision = Result<(), Denial>;

/// Ownership facts about an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationFacts {
    /// User who submitted the application.
    pub applicant_id: Uuid,
    /// Recruiter owning the offer applied to.
    pub recruiter_id: Uuid,
}

/// Ownership and visibility facts about an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferFacts {
    /// Recruiter owning the offer.
    pub recruiter_id: Uuid,
    /// True when the offer is paused.
    pub paused: bool,
}

impl From<Denial> for jobboard_shared::AppError {
    fn from(denial: Denial) -> Self {
        let msg = denial.to_string();
        match denial {
            Denial::NotAuthenticated => Self::Unauthorized(msg),
            Denial::Forbidden => Self::Forbidden(msg),
            Denial::NotFound => Self::NotFound(msg),
            Denial::Conflict => Self::Conflict(msg),
        }
    }
}
