//! User repository for database operations.

use jobboard_core::auth::Role;
use jobboard_core::storage::StoredFile;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect, QueryTrait, Set,
};
use uuid::Uuid;

use super::document::stored_files_for;
use crate::entities::{applications, offers, sea_orm_active_enums::UserRole, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login email.
    pub email: String,
    /// Argon2 hash of the password.
    pub password_hash: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Platform role.
    pub role: Role,
    /// Company, for recruiters.
    pub company_id: Option<Uuid>,
}

/// Profile fields a user may change. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// New email.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including a duplicate email.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            role: Set(to_db_role(input.role)),
            company_id: Set(input.company_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Updates profile fields. Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_profile(
        &self,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = user.into_active_model();
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Replaces the password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, DbErr> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash),
            )
            .col_expr(
                users::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Deletes a user. Offers and applications cascade.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = users::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Files of every document that goes away with the user: documents of
    /// the user's own applications and of applications to the user's offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stored_files(&self, id: Uuid) -> Result<Vec<StoredFile>, DbErr> {
        let own_offers = offers::Entity::find()
            .select_only()
            .column(offers::Column::Id)
            .filter(offers::Column::RecruiterId.eq(id))
            .into_query();

        let scope = applications::Entity::find().filter(
            Condition::any()
                .add(applications::Column::UserId.eq(id))
                .add(applications::Column::OfferId.in_subquery(own_offers)),
        );

        stored_files_for(&self.db, scope).await
    }
}

/// Convert domain role to database enum.
#[must_use]
pub const fn to_db_role(role: Role) -> UserRole {
    match role {
        Role::Applicant => UserRole::Applicant,
        Role::Recruiter => UserRole::Recruiter,
        Role::Admin => UserRole::Admin,
    }
}

/// Convert database role to domain enum.
#[must_use]
pub const fn from_db_role(role: &UserRole) -> Role {
    match role {
        UserRole::Applicant => Role::Applicant,
        UserRole::Recruiter => Role::Recruiter,
        UserRole::Admin => Role::Admin,
    }
}
