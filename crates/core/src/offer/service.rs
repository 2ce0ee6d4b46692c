//! Offer service implementation.

use std::sync::Arc;

use jobboard_shared::types::{PageRequest, PageResponse};
use uuid::Uuid;

use super::error::OfferError;
use super::types::{CreateOfferInput, NewOffer, Offer, OfferStatus, UpdateOfferInput};
use crate::policy::{self, Actor};
use crate::storage::{StorageService, StoredFile};

/// Repository trait for offer persistence.
pub trait OfferRepository: Send + Sync {
    /// Insert a new offer with status ACTIVE.
    fn create(
        &self,
        input: NewOffer,
    ) -> impl std::future::Future<Output = Result<Offer, OfferError>> + Send;

    /// Find an offer by ID, whatever its status.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Offer>, OfferError>> + Send;

    /// Replace the editable content of an offer.
    fn update(
        &self,
        id: Uuid,
        content: CreateOfferInput,
    ) -> impl std::future::Future<Output = Result<Offer, OfferError>> + Send;

    /// Change the publication status.
    fn set_status(
        &self,
        id: Uuid,
        status: OfferStatus,
    ) -> impl std::future::Future<Output = Result<Offer, OfferError>> + Send;

    /// Delete an offer. Its applications and their documents go with it.
    fn delete(&self, id: Uuid) -> impl std::future::Future<Output = Result<bool, OfferError>> + Send;

    /// Page through ACTIVE offers, newest first. Returns the page and the total count.
    fn list_active(
        &self,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<(Vec<Offer>, u64), OfferError>> + Send;

    /// All offers owned by a recruiter, newest first.
    fn list_by_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Offer>, OfferError>> + Send;

    /// Company the recruiter belongs to.
    fn recruiter_company(
        &self,
        recruiter_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Uuid>, OfferError>> + Send;

    /// Files stored for documents of the offer's applications.
    fn stored_files(
        &self,
        offer_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<StoredFile>, OfferError>> + Send;
}

/// Check the content rules shared by creation and update.
///
/// # Errors
///
/// Returns `OfferError::Validation` naming the first offending field.
pub fn validate_content(content: &CreateOfferInput) -> Result<(), OfferError> {
    for (field, value) in [
        ("title", &content.title),
        ("description", &content.description),
        ("location", &content.location),
    ] {
        if value.trim().is_empty() {
            return Err(OfferError::validation(format!("{field} must not be empty")));
        }
    }
    if content.contract_types.is_empty() {
        return Err(OfferError::validation(
            "at least one contract type is required",
        ));
    }
    Ok(())
}

fn merge(offer: &Offer, update: UpdateOfferInput) -> CreateOfferInput {
    CreateOfferInput {
        title: update.title.unwrap_or_else(|| offer.title.clone()),
        description: update
            .description
            .unwrap_or_else(|| offer.description.clone()),
        location: update.location.unwrap_or_else(|| offer.location.clone()),
        contract_types: update
            .contract_types
            .unwrap_or_else(|| offer.contract_types.clone()),
        experience_level: update.experience_level.or(offer.experience_level),
        remote_policy: update.remote_policy.or(offer.remote_policy),
        disability_compatible: update
            .disability_compatible
            .unwrap_or_else(|| offer.disability_compatible.clone()),
    }
}

/// Offer service.
pub struct OfferService<R: OfferRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: OfferRepository> OfferService<R> {
    /// Create a new offer service.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// Publish a new offer under the recruiter's company.
    ///
    /// # Errors
    ///
    /// Returns `Denied` for non-recruiters, `Validation` for bad content or a
    /// recruiter without a company.
    pub async fn create(&self, actor: &Actor, input: CreateOfferInput) -> Result<Offer, OfferError> {
        policy::create_offer(actor)?;
        validate_content(&input)?;

        let company_id = self
            .repo
            .recruiter_company(actor.user_id)
            .await?
            .ok_or_else(|| OfferError::validation("recruiter has no company"))?;

        let offer = self
            .repo
            .create(NewOffer {
                recruiter_id: actor.user_id,
                company_id,
                content: input,
            })
            .await?;

        tracing::info!(offer_id = %offer.id, recruiter_id = %actor.user_id, "Offer created");
        Ok(offer)
    }

    /// Get an offer. Paused offers are `NotFound` for everyone but their owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the offer is absent or hidden.
    pub async fn get(&self, actor: Option<&Actor>, id: Uuid) -> Result<Offer, OfferError> {
        let offer = self.find(id).await?;
        policy::view_offer(actor, &offer.facts()).map_err(|_| OfferError::NotFound(id))?;
        Ok(offer)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Denied` or `Validation`.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateOfferInput,
    ) -> Result<Offer, OfferError> {
        let offer = self.find(id).await?;
        policy::manage_offer(actor, &offer.facts())?;

        let content = merge(&offer, input);
        validate_content(&content)?;
        self.repo.update(id, content).await
    }

    /// Pause or re-activate an offer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Denied`.
    pub async fn set_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: OfferStatus,
    ) -> Result<Offer, OfferError> {
        let offer = self.find(id).await?;
        policy::manage_offer(actor, &offer.facts())?;

        let offer = self.repo.set_status(id, status).await?;
        tracing::info!(offer_id = %id, status = %status, "Offer status changed");
        Ok(offer)
    }

    /// Delete an offer along with its applications, then discard their stored files.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Denied`.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), OfferError> {
        let offer = self.find(id).await?;
        policy::manage_offer(actor, &offer.facts())?;

        let files = self.repo.stored_files(id).await?;
        if !self.repo.delete(id).await? {
            return Err(OfferError::NotFound(id));
        }
        self.storage.discard_all(&files).await;

        tracing::info!(offer_id = %id, files = files.len(), "Offer deleted");
        Ok(())
    }

    /// Page through active offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_active(&self, page: PageRequest) -> Result<PageResponse<Offer>, OfferError> {
        let page = page.normalized();
        let (offers, total) = self.repo.list_active(page).await?;
        Ok(PageResponse::new(offers, page.page, page.per_page, total))
    }

    /// All offers owned by the actor, in every status.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Offer>, OfferError> {
        self.repo.list_by_recruiter(actor.user_id).await
    }

    async fn find(&self, id: Uuid) -> Result<Offer, OfferError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(OfferError::NotFound(id))
    }
}
