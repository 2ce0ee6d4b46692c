//! Application types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::offer::OfferStatus;
use crate::policy::{ApplicationFacts, OfferFacts};

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// The recruiter has not opened it yet.
    #[default]
    NotViewed,
    /// The recruiter has opened it.
    Viewed,
}

impl ApplicationStatus {
    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotViewed => "NOT_VIEWED",
            Self::Viewed => "VIEWED",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOT_VIEWED" => Some(Self::NotViewed),
            "VIEWED" => Some(Self::Viewed),
            _ => None,
        }
    }
}

/// An application by a user to an offer.
#[derive(Debug, Clone, Serialize)]
pub struct Application {
    /// Application ID.
    pub id: Uuid,
    /// Applicant.
    pub user_id: Uuid,
    /// Offer applied to.
    pub offer_id: Uuid,
    /// Company of the offer at application time.
    pub company_id: Option<Uuid>,
    /// Review status.
    pub status: ApplicationStatus,
    /// Title of the offer.
    pub offer_title: String,
    /// Recruiter owning the offer.
    pub recruiter_id: Uuid,
    /// Submitted at.
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Ownership facts for the access policy.
    #[must_use]
    pub const fn facts(&self) -> ApplicationFacts {
        ApplicationFacts {
            applicant_id: self.user_id,
            recruiter_id: self.recruiter_id,
        }
    }
}

/// What applying needs to know about the target offer.
#[derive(Debug, Clone)]
pub struct OfferSummary {
    /// Offer ID.
    pub id: Uuid,
    /// Recruiter owning the offer.
    pub recruiter_id: Uuid,
    /// Company owning the offer.
    pub company_id: Option<Uuid>,
    /// Title.
    pub title: String,
    /// Publication status.
    pub status: OfferStatus,
}

impl OfferSummary {
    /// Ownership facts for the access policy.
    #[must_use]
    pub fn facts(&self) -> OfferFacts {
        OfferFacts {
            recruiter_id: self.recruiter_id,
            paused: self.status == OfferStatus::Paused,
        }
    }
}

/// Input for inserting an application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    /// Applicant.
    pub user_id: Uuid,
    /// Offer applied to.
    pub offer_id: Uuid,
    /// Company copied from the offer.
    pub company_id: Option<Uuid>,
}
