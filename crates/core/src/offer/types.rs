//! Offer types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates an enum that travels as SCREAMING_SNAKE_CASE strings on the
/// wire and in the database.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Convert to the stored string value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Parse from the stored string value.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Employment contract offered.
    ContractType {
        /// Permanent full-time.
        FullTime => "FULL_TIME",
        /// Part-time.
        PartTime => "PART_TIME",
        /// Fixed-term.
        FixedTerm => "FIXED_TERM",
        /// Internship.
        Internship => "INTERNSHIP",
        /// Apprenticeship.
        Apprenticeship => "APPRENTICESHIP",
        /// Freelance mission.
        Freelance => "FREELANCE",
    }
}

wire_enum! {
    /// Required experience.
    ExperienceLevel {
        /// No experience required.
        Entry => "ENTRY",
        /// Junior.
        Junior => "JUNIOR",
        /// Mid-level.
        Mid => "MID",
        /// Senior.
        Senior => "SENIOR",
        /// Lead.
        Lead => "LEAD",
    }
}

wire_enum! {
    /// Where the work happens.
    RemotePolicy {
        /// On site.
        OnSite => "ON_SITE",
        /// Partly remote.
        Hybrid => "HYBRID",
        /// Fully remote.
        FullRemote => "FULL_REMOTE",
    }
}

wire_enum! {
    /// Disability the position is adapted to.
    DisabilityCategory {
        /// Reduced mobility.
        Mobility => "MOBILITY",
        /// Visual impairment.
        Visual => "VISUAL",
        /// Hearing impairment.
        Hearing => "HEARING",
        /// Cognitive impairment.
        Cognitive => "COGNITIVE",
        /// Chronic illness.
        ChronicIllness => "CHRONIC_ILLNESS",
    }
}

wire_enum! {
    /// Publication status.
    OfferStatus {
        /// Visible to everyone, accepts applications.
        Active => "ACTIVE",
        /// Hidden from everyone but the owning recruiter.
        Paused => "PAUSED",
    }
}

/// Join enum values into the comma separated form stored in set columns.
#[must_use]
pub fn join_set<T>(values: &[T], as_str: impl Fn(&T) -> &'static str) -> String {
    values.iter().map(as_str).collect::<Vec<_>>().join(",")
}

/// Split a comma separated set column, dropping unknown entries.
#[must_use]
pub fn split_set<T>(raw: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(parse)
        .collect()
}

/// A job offer.
#[derive(Debug, Clone, Serialize)]
pub struct Offer {
    /// Offer ID.
    pub id: Uuid,
    /// Owning recruiter.
    pub recruiter_id: Uuid,
    /// Owning company.
    pub company_id: Option<Uuid>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Location.
    pub location: String,
    /// Contract types offered (at least one).
    pub contract_types: Vec<ContractType>,
    /// Required experience.
    pub experience_level: Option<ExperienceLevel>,
    /// Remote work policy.
    pub remote_policy: Option<RemotePolicy>,
    /// Disability compatibility tags.
    pub disability_compatible: Vec<DisabilityCategory>,
    /// Publication status.
    pub status: OfferStatus,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last modified at.
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// True when the offer is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.status == OfferStatus::Paused
    }

    /// Ownership facts for the access policy.
    #[must_use]
    pub fn facts(&self) -> crate::policy::OfferFacts {
        crate::policy::OfferFacts {
            recruiter_id: self.recruiter_id,
            paused: self.is_paused(),
        }
    }
}

/// Client input for a new offer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOfferInput {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Location.
    pub location: String,
    /// Contract types offered.
    pub contract_types: Vec<ContractType>,
    /// Required experience.
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    /// Remote work policy.
    #[serde(default)]
    pub remote_policy: Option<RemotePolicy>,
    /// Disability compatibility tags.
    #[serde(default)]
    pub disability_compatible: Vec<DisabilityCategory>,
}

/// Partial update of an offer. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOfferInput {
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// Contract types offered.
    pub contract_types: Option<Vec<ContractType>>,
    /// Required experience.
    pub experience_level: Option<ExperienceLevel>,
    /// Remote work policy.
    pub remote_policy: Option<RemotePolicy>,
    /// Disability compatibility tags.
    pub disability_compatible: Option<Vec<DisabilityCategory>>,
}

/// Validated offer ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewOffer {
    /// Owning recruiter.
    pub recruiter_id: Uuid,
    /// Owning company.
    pub company_id: Uuid,
    /// Offer content.
    pub content: CreateOfferInput,
}
