//! Company routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;
use validator::Validate;

use crate::{ApiError, ApiResult, AppState, middleware::AuthUser};
use jobboard_db::entities::companies;
use jobboard_db::{CompanyRepository, is_unique_violation};
use jobboard_shared::auth::CreateCompanyRequest;

/// Creates the company routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/companies", get(list_companies).post(create_company))
}

/// GET /companies
async fn list_companies(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<companies::Model>>> {
    let companies = CompanyRepository::new((*state.db).clone())
        .list()
        .await
        .map_err(ApiError::database)?;
    Ok(Json(companies))
}

/// POST /companies
async fn create_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<companies::Model>)> {
    payload.validate()?;

    let company = CompanyRepository::new((*state.db).clone())
        .create(payload.name.trim(), payload.sector.trim())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict(format!("company {} already exists", payload.name))
            } else {
                ApiError::database(e)
            }
        })?;

    info!(company_id = %company.id, user_id = %auth.user_id(), "Company created");
    Ok((StatusCode::CREATED, Json(company)))
}
