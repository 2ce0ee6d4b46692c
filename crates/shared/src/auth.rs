//! Authentication types for JWT and account payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role (`APPLICANT`, `RECRUITER` or `ADMIN`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(email)]
    pub email: String,
    /// User password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(email)]
    pub email: String,
    /// User password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// First name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    /// Last name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Requested role (`APPLICANT` or `RECRUITER`).
    pub role: String,
    /// Company name, required for recruiters.
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    /// Company sector, used when the company is created implicitly.
    pub company_sector: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth and account responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Role.
    pub role: String,
    /// Company the user belongs to (recruiters).
    pub company_id: Option<Uuid>,
}

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New first name.
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    /// New last name.
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    /// New email.
    #[validate(email)]
    pub email: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password, re-verified before the change.
    pub current_password: String,
    /// New password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub new_password: String,
}

/// Create company request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    /// Company name (unique).
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Business sector.
    #[validate(length(min = 1, max = 100))]
    pub sector: String,
}
