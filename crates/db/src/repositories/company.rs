//! Company repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::companies;

/// Company repository.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all companies by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<companies::Model>, DbErr> {
        companies::Entity::find()
            .order_by_asc(companies::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a company by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find()
            .filter(companies::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a duplicate name.
    pub async fn create(&self, name: &str, sector: &str) -> Result<companies::Model, DbErr> {
        let company = companies::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            sector: Set(sector.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        company.insert(&self.db).await
    }

    /// Returns the company with this name, creating it if needed.
    ///
    /// Used at recruiter registration. A concurrent insert of the same name
    /// is resolved by reading the winner's row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_or_create(
        &self,
        name: &str,
        sector: &str,
    ) -> Result<companies::Model, DbErr> {
        if let Some(company) = self.find_by_name(name).await? {
            return Ok(company);
        }

        match self.create(name, sector).await {
            Ok(company) => Ok(company),
            Err(e) if is_unique_violation(&e) => self
                .find_by_name(name)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound(format!("company {name}"))),
            Err(e) => Err(e),
        }
    }
}
