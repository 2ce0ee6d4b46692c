//! Application service implementation.

use std::sync::Arc;

use uuid::Uuid;

use super::error::ApplicationError;
use super::types::{Application, ApplicationStatus, NewApplication, OfferSummary};
use crate::policy::{self, Actor, Denial};
use crate::storage::{StorageService, StoredFile};

/// Repository trait for application persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ApplicationRepository: Send + Sync {
    /// Load the facts about an offer needed to apply to it.
    fn find_offer(
        &self,
        offer_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<OfferSummary>, ApplicationError>> + Send;

    /// Whether the user already applied to the offer.
    fn exists_for_user(
        &self,
        user_id: Uuid,
        offer_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, ApplicationError>> + Send;

    /// Insert an application with status NOT_VIEWED.
    ///
    /// Must fail with `AlreadyApplied` when the (user, offer) pair already exists.
    fn create(
        &self,
        input: NewApplication,
    ) -> impl std::future::Future<Output = Result<Application, ApplicationError>> + Send;

    /// Find application by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Application>, ApplicationError>> + Send;

    /// Applications submitted by a user, newest first.
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Application>, ApplicationError>> + Send;

    /// Applications received by an offer, newest first.
    fn list_by_offer(
        &self,
        offer_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Application>, ApplicationError>> + Send;

    /// Change the review status.
    fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> impl std::future::Future<Output = Result<Application, ApplicationError>> + Send;

    /// Delete an application and its document records.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, ApplicationError>> + Send;

    /// Files stored for the application's documents.
    fn stored_files(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<StoredFile>, ApplicationError>> + Send;
}

/// Application service.
pub struct ApplicationService<R: ApplicationRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: ApplicationRepository> ApplicationService<R> {
    /// Create a new application service.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// Apply to an offer.
    ///
    /// # Errors
    ///
    /// - `OfferNotFound` if the offer is absent, or paused and not owned by the actor
    /// - `Denied(Forbidden)` if the actor owns the offer
    /// - `AlreadyApplied` on a second application to the same offer
    pub async fn apply(&self, actor: &Actor, offer_id: Uuid) -> Result<Application, ApplicationError> {
        let offer = self
            .repo
            .find_offer(offer_id)
            .await?
            .ok_or(ApplicationError::OfferNotFound(offer_id))?;
        policy::view_offer(Some(actor), &offer.facts())
            .map_err(|_| ApplicationError::OfferNotFound(offer_id))?;

        let already_applied = self.repo.exists_for_user(actor.user_id, offer_id).await?;
        policy::create_application(actor, offer.recruiter_id, already_applied).map_err(
            |denial| match denial {
                Denial::Conflict => ApplicationError::AlreadyApplied(offer_id),
                other => other.into(),
            },
        )?;

        let application = self
            .repo
            .create(NewApplication {
                user_id: actor.user_id,
                offer_id,
                company_id: offer.company_id,
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            offer_id = %offer_id,
            user_id = %actor.user_id,
            "Application submitted"
        );
        Ok(application)
    }

    /// Get an application visible to the actor.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Denied(Forbidden)`.
    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Application, ApplicationError> {
        let application = self.find(id).await?;
        policy::view_application(actor, &application.facts())?;
        Ok(application)
    }

    /// Applications submitted by the actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Application>, ApplicationError> {
        self.repo.list_by_user(actor.user_id).await
    }

    /// Applications received by an offer.
    ///
    /// # Errors
    ///
    /// Returns `OfferNotFound`, or `Denied(Forbidden)` unless the actor owns the offer or is an admin.
    pub async fn list_for_offer(
        &self,
        actor: &Actor,
        offer_id: Uuid,
    ) -> Result<Vec<Application>, ApplicationError> {
        let offer = self
            .repo
            .find_offer(offer_id)
            .await?
            .ok_or(ApplicationError::OfferNotFound(offer_id))?;
        policy::manage_offer(actor, &offer.facts())?;
        self.repo.list_by_offer(offer_id).await
    }

    /// Change the review status. Only the offer's recruiter may do this.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Denied(Forbidden)`.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationError> {
        let application = self.find(id).await?;
        policy::update_application_status(actor, &application.facts())?;
        self.repo.update_status(id, status).await
    }

    /// Withdraw an application, then discard its stored files.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Denied(Forbidden)`.
    pub async fn withdraw(&self, actor: &Actor, id: Uuid) -> Result<(), ApplicationError> {
        let application = self.find(id).await?;
        policy::withdraw_application(actor, &application.facts())?;

        let files = self.repo.stored_files(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ApplicationError::NotFound(id));
        }
        self.storage.discard_all(&files).await;

        tracing::info!(application_id = %id, files = files.len(), "Application withdrawn");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Application, ApplicationError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound(id))
    }
}
