//! Dashboard counters for the current user.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    QueryTrait, Select,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{
    applications, offers,
    sea_orm_active_enums::{ApplicationStatus, OfferStatus},
};

/// Counters shown to a recruiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecruiterStats {
    /// Offers owned.
    pub offers_total: u64,
    /// Offers currently ACTIVE.
    pub offers_active: u64,
    /// Applications received across all offers.
    pub applications_total: u64,
    /// Received applications not yet reviewed.
    pub applications_not_viewed: u64,
}

/// Counters shown to an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicantStats {
    /// Applications submitted.
    pub applications_total: u64,
    /// Submitted applications a recruiter has reviewed.
    pub applications_viewed: u64,
    /// Submitted applications still waiting.
    pub applications_not_viewed: u64,
}

/// Read-only counting queries.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db: DatabaseConnection,
}

impl StatsRepository {
    /// Creates a new stats repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Counters over a recruiter's offers and the applications they received.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn recruiter(&self, recruiter_id: Uuid) -> Result<RecruiterStats, DbErr> {
        let own_offers = || offers::Entity::find().filter(offers::Column::RecruiterId.eq(recruiter_id));
        let received = || {
            applications::Entity::find().filter(
                applications::Column::OfferId.in_subquery(
                    own_offers()
                        .select_only()
                        .column(offers::Column::Id)
                        .into_query(),
                ),
            )
        };

        Ok(RecruiterStats {
            offers_total: own_offers().count(&self.db).await?,
            offers_active: own_offers()
                .filter(offers::Column::Status.eq(OfferStatus::Active))
                .count(&self.db)
                .await?,
            applications_total: received().count(&self.db).await?,
            applications_not_viewed: self
                .count_with_status(received(), ApplicationStatus::NotViewed)
                .await?,
        })
    }

    /// Counters over an applicant's own applications.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn applicant(&self, user_id: Uuid) -> Result<ApplicantStats, DbErr> {
        let own = || applications::Entity::find().filter(applications::Column::UserId.eq(user_id));

        Ok(ApplicantStats {
            applications_total: own().count(&self.db).await?,
            applications_viewed: self
                .count_with_status(own(), ApplicationStatus::Viewed)
                .await?,
            applications_not_viewed: self
                .count_with_status(own(), ApplicationStatus::NotViewed)
                .await?,
        })
    }

    async fn count_with_status(
        &self,
        query: Select<applications::Entity>,
        status: ApplicationStatus,
    ) -> Result<u64, DbErr> {
        query
            .filter(applications::Column::Status.eq(status))
            .count(&self.db)
            .await
    }
}
