//! Account routes for the signed-in user.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, put},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiError, ApiResult, AppState, middleware::AuthUser};
use jobboard_core::auth::{hash_password, verify_password};
use jobboard_core::policy;
use jobboard_db::entities::users;
use jobboard_db::{UpdateProfileInput, UserRepository, from_db_role, is_unique_violation};
use jobboard_shared::auth::{ChangePasswordRequest, UpdateProfileRequest, UserInfo};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(me))
        .route("/users/{id}", patch(update_profile).delete(delete_user))
        .route("/users/{id}/password", put(change_password))
}

/// Public view of a user row.
pub(crate) fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        role: from_db_role(&user.role).as_str().to_string(),
        company_id: user.company_id,
    }
}

async fn find_user(repo: &UserRepository, id: Uuid) -> ApiResult<users::Model> {
    repo.find_by_id(id)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found(format!("user {id}")))
}

/// GET /users/me
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let repo = UserRepository::new((*state.db).clone());
    let user = find_user(&repo, auth.user_id()).await?;
    Ok(Json(user_info(&user)))
}

/// PATCH /users/{id}
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserInfo>> {
    policy::modify_user(&auth.actor(), id)?;
    payload.validate()?;

    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .update_profile(
            id,
            UpdateProfileInput {
                email: payload.email,
                first_name: payload.first_name,
                last_name: payload.last_name,
            },
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("An account with this email already exists")
            } else {
                ApiError::database(e)
            }
        })?
        .ok_or_else(|| ApiError::not_found(format!("user {id}")))?;

    Ok(Json(user_info(&user)))
}

/// PUT /users/{id}/password
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    policy::modify_user(&auth.actor(), id)?;
    payload.validate()?;

    let repo = UserRepository::new((*state.db).clone());
    let user = find_user(&repo, id).await?;

    if !verify_password(&payload.current_password, &user.password_hash).map_err(ApiError::internal)? {
        return Err(ApiError::validation("current password is incorrect"));
    }

    let password_hash = hash_password(&payload.new_password).map_err(ApiError::internal)?;
    repo.update_password(id, &password_hash)
        .await
        .map_err(ApiError::database)?;

    info!(user_id = %id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{id}
///
/// The row goes first and the cascades take offers, applications and
/// document records with it; the stored bytes are discarded afterwards.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::modify_user(&auth.actor(), id)?;

    let repo = UserRepository::new((*state.db).clone());
    let files = repo.stored_files(id).await.map_err(ApiError::database)?;

    if !repo.delete(id).await.map_err(ApiError::database)? {
        return Err(ApiError::not_found(format!("user {id}")));
    }
    state.storage.discard_all(&files).await;

    info!(user_id = %id, files = files.len(), "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
