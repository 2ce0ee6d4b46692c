//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Offers, applications and documents implement the repository traits declared
//! in the core crate; the others return `DbErr` directly.

pub mod application;
pub mod company;
pub mod document;
pub mod offer;
pub mod stats;
pub mod user;

pub use application::ApplicationRepository;
pub use company::CompanyRepository;
pub use document::DocumentRepository;
pub use offer::OfferRepository;
pub use stats::{ApplicantStats, RecruiterStats, StatsRepository};
pub use user::{CreateUserInput, UpdateProfileInput, UserRepository};

use sea_orm::{DbErr, SqlErr};

/// True if the error is a unique constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
