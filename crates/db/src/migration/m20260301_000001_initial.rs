//! Initial database migration.
//!
//! Creates the companies, users, offers, applications and documents tables.
//! The SQL sticks to types and constraints understood by both `PostgreSQL`
//! and `SQLite`, and every statement runs on its own.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(OFFERS_SQL).await?;
        db.execute_unprepared(APPLICATIONS_SQL).await?;
        db.execute_unprepared(APPLICATION_DOCUMENTS_SQL).await?;

        for index in INDEXES_SQL {
            db.execute_unprepared(index).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in [
            "application_documents",
            "applications",
            "offers",
            "users",
            "companies",
        ] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table}"))
                .await?;
        }
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    sector VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    role VARCHAR(20) NOT NULL CHECK (role IN ('APPLICANT', 'RECRUITER', 'ADMIN')),
    company_id UUID REFERENCES companies(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const OFFERS_SQL: &str = r"
CREATE TABLE offers (
    id UUID PRIMARY KEY,
    recruiter_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    company_id UUID REFERENCES companies(id) ON DELETE SET NULL,
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    location VARCHAR(255) NOT NULL,
    contract_types VARCHAR(255) NOT NULL,
    experience_level VARCHAR(20),
    remote_policy VARCHAR(20),
    disability_compatible VARCHAR(255) NOT NULL,
    status VARCHAR(20) NOT NULL CHECK (status IN ('ACTIVE', 'PAUSED')),
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const APPLICATIONS_SQL: &str = r"
CREATE TABLE applications (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    offer_id UUID NOT NULL REFERENCES offers(id) ON DELETE CASCADE,
    company_id UUID REFERENCES companies(id) ON DELETE SET NULL,
    status VARCHAR(20) NOT NULL CHECK (status IN ('NOT_VIEWED', 'VIEWED')),
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT uq_applications_user_offer UNIQUE (user_id, offer_id)
)";

const APPLICATION_DOCUMENTS_SQL: &str = r"
CREATE TABLE application_documents (
    id UUID PRIMARY KEY,
    application_id UUID NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    document_type VARCHAR(20) NOT NULL CHECK (document_type IN ('CV', 'COVER_LETTER')),
    original_name VARCHAR(255) NOT NULL,
    mime_type VARCHAR(255) NOT NULL,
    size BIGINT NOT NULL CHECK (size >= 0),
    storage_backend VARCHAR(20) NOT NULL,
    storage_path VARCHAR(1024) NOT NULL,
    file_data BYTEA,
    uploaded_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT uq_application_documents_type UNIQUE (application_id, document_type)
)";

const INDEXES_SQL: &[&str] = &[
    "CREATE INDEX idx_users_company ON users(company_id)",
    "CREATE INDEX idx_offers_recruiter ON offers(recruiter_id, created_at)",
    "CREATE INDEX idx_offers_status ON offers(status, created_at)",
    "CREATE INDEX idx_applications_offer ON applications(offer_id, created_at)",
];
