//! Application routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiResult, AppState, middleware::AuthUser};
use jobboard_core::application::{Application, ApplicationService, ApplicationStatus};
use jobboard_db::ApplicationRepository;

/// Creates the application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/offers/{id}/apply", post(apply))
        .route("/offers/{id}/applications", get(list_for_offer))
        .route("/applications/mine", get(list_mine))
        .route(
            "/applications/{id}",
            get(get_application).delete(withdraw),
        )
        .route("/applications/{id}/status", patch(update_status))
}

/// Request body for a review status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status.
    pub status: ApplicationStatus,
}

fn service(state: &AppState) -> ApplicationService<ApplicationRepository> {
    ApplicationService::new(
        state.storage.clone(),
        Arc::new(ApplicationRepository::new((*state.db).clone())),
    )
}

/// POST /offers/{id}/apply
async fn apply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<Application>)> {
    let application = service(&state).apply(&auth.actor(), offer_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /offers/{id}/applications
async fn list_for_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offer_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Application>>> {
    Ok(Json(
        service(&state)
            .list_for_offer(&auth.actor(), offer_id)
            .await?,
    ))
}

/// GET /applications/mine
async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Application>>> {
    Ok(Json(service(&state).list_mine(&auth.actor()).await?))
}

/// GET /applications/{id}
async fn get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Application>> {
    Ok(Json(service(&state).get(&auth.actor(), id).await?))
}

/// PATCH /applications/{id}/status
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Application>> {
    Ok(Json(
        service(&state)
            .update_status(&auth.actor(), id, payload.status)
            .await?,
    ))
}

/// DELETE /applications/{id}
async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service(&state).withdraw(&auth.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
