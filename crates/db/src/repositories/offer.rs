//! Offer repository for database operations.

use chrono::Utc;
use jobboard_core::offer::{
    ContractType, CreateOfferInput, DisabilityCategory, ExperienceLevel, NewOffer, Offer,
    OfferError, OfferRepository as OfferRepoTrait, OfferStatus, RemotePolicy, join_set, split_set,
};
use jobboard_core::storage::StoredFile;
use jobboard_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::document::stored_files_for;
use crate::entities::{applications, offers, sea_orm_active_enums::OfferStatus as DbOfferStatus, users};

/// Offer repository implementation.
#[derive(Debug, Clone)]
pub struct OfferRepository {
    db: DatabaseConnection,
}

impl OfferRepository {
    /// Create a new offer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> Result<offers::Model, OfferError> {
        offers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?
            .ok_or(OfferError::NotFound(id))
    }
}

impl OfferRepoTrait for OfferRepository {
    async fn create(&self, input: NewOffer) -> Result<Offer, OfferError> {
        let now = Utc::now().into();
        let content = input.content;

        let active_model = offers::ActiveModel {
            id: Set(Uuid::now_v7()),
            recruiter_id: Set(input.recruiter_id),
            company_id: Set(Some(input.company_id)),
            title: Set(content.title),
            description: Set(content.description),
            location: Set(content.location),
            contract_types: Set(join_set(&content.contract_types, ContractType::as_str)),
            experience_level: Set(content.experience_level.map(|v| v.as_str().to_string())),
            remote_policy: Set(content.remote_policy.map(|v| v.as_str().to_string())),
            disability_compatible: Set(join_set(
                &content.disability_compatible,
                DisabilityCategory::as_str,
            )),
            status: Set(DbOfferStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Offer>, OfferError> {
        let model = offers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn update(&self, id: Uuid, content: CreateOfferInput) -> Result<Offer, OfferError> {
        let mut active = self.find_model(id).await?.into_active_model();
        active.title = Set(content.title);
        active.description = Set(content.description);
        active.location = Set(content.location);
        active.contract_types = Set(join_set(&content.contract_types, ContractType::as_str));
        active.experience_level = Set(content.experience_level.map(|v| v.as_str().to_string()));
        active.remote_policy = Set(content.remote_policy.map(|v| v.as_str().to_string()));
        active.disability_compatible = Set(join_set(
            &content.disability_compatible,
            DisabilityCategory::as_str,
        ));
        active.updated_at = Set(Utc::now().into());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn set_status(&self, id: Uuid, status: OfferStatus) -> Result<Offer, OfferError> {
        let mut active = self.find_model(id).await?.into_active_model();
        active.status = Set(to_db_status(status));
        active.updated_at = Set(Utc::now().into());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, OfferError> {
        let result = offers::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn list_active(&self, page: PageRequest) -> Result<(Vec<Offer>, u64), OfferError> {
        let query = offers::Entity::find().filter(offers::Column::Status.eq(DbOfferStatus::Active));

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        let models = query
            .order_by_desc(offers::Column::CreatedAt)
            .order_by_desc(offers::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok((models.into_iter().map(to_domain).collect(), total))
    }

    async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Offer>, OfferError> {
        let models = offers::Entity::find()
            .filter(offers::Column::RecruiterId.eq(recruiter_id))
            .order_by_desc(offers::Column::CreatedAt)
            .order_by_desc(offers::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn recruiter_company(&self, recruiter_id: Uuid) -> Result<Option<Uuid>, OfferError> {
        let company: Option<Option<Uuid>> = users::Entity::find_by_id(recruiter_id)
            .select_only()
            .column(users::Column::CompanyId)
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))?;

        Ok(company.flatten())
    }

    async fn stored_files(&self, offer_id: Uuid) -> Result<Vec<StoredFile>, OfferError> {
        let scope = applications::Entity::find().filter(applications::Column::OfferId.eq(offer_id));

        stored_files_for(&self.db, scope)
            .await
            .map_err(|e| OfferError::repository(e.to_string()))
    }
}

/// Convert domain status to database enum.
pub(crate) const fn to_db_status(status: OfferStatus) -> DbOfferStatus {
    match status {
        OfferStatus::Active => DbOfferStatus::Active,
        OfferStatus::Paused => DbOfferStatus::Paused,
    }
}

/// Convert database status to domain enum.
pub(crate) const fn from_db_status(status: &DbOfferStatus) -> OfferStatus {
    match status {
        DbOfferStatus::Active => OfferStatus::Active,
        DbOfferStatus::Paused => OfferStatus::Paused,
    }
}

/// Convert database model to domain model.
///
/// Unknown values in the set columns are dropped rather than failing the read.
fn to_domain(model: offers::Model) -> Offer {
    Offer {
        id: model.id,
        recruiter_id: model.recruiter_id,
        company_id: model.company_id,
        title: model.title,
        description: model.description,
        location: model.location,
        contract_types: split_set(&model.contract_types, ContractType::parse),
        experience_level: model.experience_level.as_deref().and_then(ExperienceLevel::parse),
        remote_policy: model.remote_policy.as_deref().and_then(RemotePolicy::parse),
        disability_compatible: split_set(&model.disability_compatible, DisabilityCategory::parse),
        status: from_db_status(&model.status),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
