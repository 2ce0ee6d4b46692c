//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password, verify_password_or_dummy};

use serde::{Deserialize, Serialize};

/// Platform-wide user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Applies to offers and uploads documents.
    Applicant,
    /// Publishes offers on behalf of a company and reviews applications.
    Recruiter,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Convert to the wire/database string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applicant => "APPLICANT",
            Self::Recruiter => "RECRUITER",
            Self::Admin => "ADMIN",
        }
    }

    /// Parse from the wire/database string value (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "APPLICANT" => Some(Self::Applicant),
            "RECRUITER" => Some(Self::Recruiter),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns true if this role may be chosen at self-registration.
    #[must_use]
    pub const fn is_self_registrable(&self) -> bool {
        matches!(self, Self::Applicant | Self::Recruiter)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
