//! Job offer routes.
//!
//! Listing and reading offers is public; everything else needs a token.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    ApiResult, AppState,
    middleware::{AuthUser, MaybeAuthUser},
};
use jobboard_core::offer::{CreateOfferInput, Offer, OfferService, OfferStatus, UpdateOfferInput};
use jobboard_db::OfferRepository;
use jobboard_shared::types::{PageRequest, PageResponse};

/// Public offer routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/offers", get(list_offers))
        .route("/offers/{id}", get(get_offer))
}

/// Offer routes behind authentication.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/offers", post(create_offer))
        .route("/offers/mine", get(list_my_offers))
        .route("/offers/{id}", put(update_offer).delete(delete_offer))
        .route("/offers/{id}/status", patch(set_offer_status))
}

/// Request body for changing publication status.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// New status.
    pub status: OfferStatus,
}

fn service(state: &AppState) -> OfferService<OfferRepository> {
    OfferService::new(
        state.storage.clone(),
        Arc::new(OfferRepository::new((*state.db).clone())),
    )
}

/// GET /offers
async fn list_offers(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<Offer>>> {
    Ok(Json(service(&state).list_active(page).await?))
}

/// GET /offers/{id}
async fn get_offer(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Offer>> {
    let actor = auth.actor();
    Ok(Json(service(&state).get(actor.as_ref(), id).await?))
}

/// POST /offers
async fn create_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateOfferInput>,
) -> ApiResult<(StatusCode, Json<Offer>)> {
    let offer = service(&state).create(&auth.actor(), payload).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

/// GET /offers/mine
async fn list_my_offers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Offer>>> {
    Ok(Json(service(&state).list_mine(&auth.actor()).await?))
}

/// PUT /offers/{id}
async fn update_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOfferInput>,
) -> ApiResult<Json<Offer>> {
    Ok(Json(service(&state).update(&auth.actor(), id, payload).await?))
}

/// PATCH /offers/{id}/status
async fn set_offer_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> ApiResult<Json<Offer>> {
    Ok(Json(
        service(&state)
            .set_status(&auth.actor(), id, payload.status)
            .await?,
    ))
}

/// DELETE /offers/{id}
async fn delete_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service(&state).delete(&auth.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
