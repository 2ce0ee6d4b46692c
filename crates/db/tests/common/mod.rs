//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory `SQLite` database with the schema applied.

#![allow(dead_code)]

use jobboard_core::auth::Role;
use jobboard_core::offer::{ContractType, CreateOfferInput, NewOffer, Offer, OfferRepository as _};
use jobboard_db::entities::users;
use jobboard_db::migration::{Migrator, MigratorTrait};
use jobboard_db::{CompanyRepository, CreateUserInput, OfferRepository, UserRepository};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Fresh in-memory database with migrations applied.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open sqlite database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Insert a user with a unique email.
pub async fn create_user(db: &DatabaseConnection, role: Role, company_id: Option<Uuid>) -> users::Model {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            email: format!("user-{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$test_hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            company_id,
        })
        .await
        .expect("Failed to create user")
}

/// Insert a recruiter attached to a fresh company.
pub async fn create_recruiter(db: &DatabaseConnection) -> users::Model {
    let company = CompanyRepository::new(db.clone())
        .create(&format!("Company {}", Uuid::new_v4()), "Software")
        .await
        .expect("Failed to create company");
    create_user(db, Role::Recruiter, Some(company.id)).await
}

/// Insert an ACTIVE offer owned by the recruiter.
pub async fn create_offer(db: &DatabaseConnection, recruiter: &users::Model, title: &str) -> Offer {
    OfferRepository::new(db.clone())
        .create(NewOffer {
            recruiter_id: recruiter.id,
            company_id: recruiter.company_id.expect("recruiter has a company"),
            content: CreateOfferInput {
                title: title.to_string(),
                description: "Build things".to_string(),
                location: "Paris".to_string(),
                contract_types: vec![ContractType::FullTime],
                experience_level: None,
                remote_policy: None,
                disability_compatible: vec![],
            },
        })
        .await
        .expect("Failed to create offer")
}
