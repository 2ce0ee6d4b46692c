//! Authentication routes for registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use tracing::{info, warn};
use validator::Validate;

use super::users::user_info;
use crate::{ApiError, ApiResult, AppState};
use jobboard_core::auth::{Role, hash_password, verify_password_or_dummy};
use jobboard_db::{CompanyRepository, CreateUserInput, UserRepository, from_db_role, is_unique_violation};
use jobboard_shared::auth::{LoginRequest, LoginResponse, RegisterRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// POST /auth/login - Authenticate user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    payload.validate()?;
    let user_repo = UserRepository::new((*state.db).clone());

    let user = user_repo
        .find_by_email(&payload.email)
        .await
        .map_err(ApiError::database)?;

    // Verify against a dummy hash when the user is unknown so both paths cost the same.
    let verified = verify_password_or_dummy(
        &payload.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    );
    let Some(user) = user.filter(|_| verified) else {
        info!(email = %payload.email, "Failed login attempt");
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let role = from_db_role(&user.role);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, role.as_str())
        .map_err(ApiError::internal)?;

    info!(user_id = %user.id, "User logged in successfully");

    Ok(Json(LoginResponse {
        user: user_info(&user),
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// POST /auth/register - Register a new applicant or recruiter.
///
/// Recruiters name their company; it is created on first use.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    payload.validate()?;

    let role = Role::parse(&payload.role)
        .filter(Role::is_self_registrable)
        .ok_or_else(|| ApiError::validation("role must be APPLICANT or RECRUITER"))?;

    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo
        .email_exists(&payload.email)
        .await
        .map_err(ApiError::database)?
    {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let company_id = if role == Role::Recruiter {
        let name = payload
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::validation("company_name is required for recruiters"))?;
        let company = CompanyRepository::new((*state.db).clone())
            .find_or_create(name, payload.company_sector.as_deref().unwrap_or_default())
            .await
            .map_err(ApiError::database)?;
        Some(company.id)
    } else {
        None
    };

    let password_hash = hash_password(&payload.password).map_err(ApiError::internal)?;

    let user = user_repo
        .create(CreateUserInput {
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            role,
            company_id,
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!("Concurrent registration with the same email");
                ApiError::conflict("An account with this email already exists")
            } else {
                ApiError::database(e)
            }
        })?;

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, role.as_str())
        .map_err(ApiError::internal)?;

    info!(user_id = %user.id, role = %role, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            user: user_info(&user),
            access_token,
            expires_in: state.jwt_service.access_token_expires_in(),
        }),
    ))
}
