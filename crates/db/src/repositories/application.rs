//! Application repository for database operations.

use chrono::Utc;
use jobboard_core::application::{
    Application, ApplicationError, ApplicationRepository as ApplicationRepoTrait,
    ApplicationStatus, NewApplication, OfferSummary,
};
use jobboard_core::storage::StoredFile;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::document::stored_files_for;
use super::is_unique_violation;
use super::offer::from_db_status as from_db_offer_status;
use crate::entities::{
    applications, offers, sea_orm_active_enums::ApplicationStatus as DbApplicationStatus,
};

/// Application repository implementation.
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    db: DatabaseConnection,
}

impl ApplicationRepository {
    /// Create a new application repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_all(
        &self,
        query: Select<applications::Entity>,
    ) -> Result<Vec<Application>, ApplicationError> {
        let rows = query
            .order_by_desc(applications::Column::CreatedAt)
            .order_by_desc(applications::Column::Id)
            .find_also_related(offers::Entity)
            .all(&self.db)
            .await
            .map_err(|e| ApplicationError::repository(e.to_string()))?;

        rows.into_iter()
            .map(|(application, offer)| to_domain(application, offer))
            .collect()
    }
}

impl ApplicationRepoTrait for ApplicationRepository {
    async fn find_offer(&self, offer_id: Uuid) -> Result<Option<OfferSummary>, ApplicationError> {
        let offer = offers::Entity::find_by_id(offer_id)
            .one(&self.db)
            .await
            .map_err(|e| ApplicationError::repository(e.to_string()))?;

        Ok(offer.map(|o| OfferSummary {
            id: o.id,
            recruiter_id: o.recruiter_id,
            company_id: o.company_id,
            title: o.title,
            status: from_db_offer_status(&o.status),
        }))
    }

    async fn exists_for_user(&self, user_id: Uuid, offer_id: Uuid) -> Result<bool, ApplicationError> {
        let count = applications::Entity::find()
            .filter(applications::Column::UserId.eq(user_id))
            .filter(applications::Column::OfferId.eq(offer_id))
            .count(&self.db)
            .await
            .map_err(|e| ApplicationError::repository(e.to_string()))?;

        Ok(count > 0)
    }

    async fn create(&self, input: NewApplication) -> Result<Application, ApplicationError> {
        let id = Uuid::now_v7();
        let active_model = applications::ActiveModel {
            id: Set(id),
            user_id: Set(input.user_id),
            offer_id: Set(input.offer_id),
            company_id: Set(input.company_id),
            status: Set(DbApplicationStatus::NotViewed),
            created_at: Set(Utc::now().into()),
        };

        active_model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ApplicationError::AlreadyApplied(input.offer_id)
            } else {
                ApplicationError::repository(e.to_string())
            }
        })?;

        self.find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound(id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, ApplicationError> {
        let row = applications::Entity::find_by_id(id)
            .find_also_related(offers::Entity)
            .one(&self.db)
            .await
            .map_err(|e| ApplicationError::repository(e.to_string()))?;

        row.map(|(application, offer)| to_domain(application, offer))
            .transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Application>, ApplicationError> {
        self.fetch_all(
            applications::Entity::find().filter(applications::Column::UserId.eq(user_id)),
        )
        .await
    }

    async fn list_by_offer(&self, offer_id: Uuid) -> Result<Vec<Application>, ApplicationError> {
        self.fetch_all(
            applications::Entity::find().filter(applications::Column::OfferId.eq(offer_id)),
        )
        .await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationError> {
        let active_model = applications::ActiveModel {
            id: Set(id),
            status: Set(to_db_status(status)),
            ..Default::default()
        };

        active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => ApplicationError::NotFound(id),
            other => ApplicationError::repository(other.to_string()),
        })?;

        self.find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApplicationError> {
        let result = applications::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ApplicationError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn stored_files(&self, id: Uuid) -> Result<Vec<StoredFile>, ApplicationError> {
        let scope = applications::Entity::find().filter(applications::Column::Id.eq(id));

        stored_files_for(&self.db, scope)
            .await
            .map_err(|e| ApplicationError::repository(e.to_string()))
    }
}

/// Convert domain status to database enum.
pub(crate) const fn to_db_status(status: ApplicationStatus) -> DbApplicationStatus {
    match status {
        ApplicationStatus::NotViewed => DbApplicationStatus::NotViewed,
        ApplicationStatus::Viewed => DbApplicationStatus::Viewed,
    }
}

/// Convert database status to domain enum.
const fn from_db_status(status: &DbApplicationStatus) -> ApplicationStatus {
    match status {
        DbApplicationStatus::NotViewed => ApplicationStatus::NotViewed,
        DbApplicationStatus::Viewed => ApplicationStatus::Viewed,
    }
}

/// Convert database model and its offer to domain model.
fn to_domain(
    model: applications::Model,
    offer: Option<offers::Model>,
) -> Result<Application, ApplicationError> {
    let offer = offer.ok_or_else(|| {
        ApplicationError::repository(format!("application {} has no offer", model.id))
    })?;

    Ok(Application {
        id: model.id,
        user_id: model.user_id,
        offer_id: model.offer_id,
        company_id: model.company_id,
        status: from_db_status(&model.status),
        offer_title: offer.title,
        recruiter_id: offer.recruiter_id,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
