//! Per-user dashboard counters.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{ApiError, ApiResult, AppState, middleware::AuthUser};
use jobboard_core::auth::Role;
use jobboard_db::StatsRepository;

/// Creates the stats routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats/me", get(my_stats))
}

/// GET /stats/me
///
/// Recruiters see counters over their offers, everyone else over their own applications.
async fn my_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<axum::response::Response> {
    let repo = StatsRepository::new((*state.db).clone());

    let response = match auth.role() {
        Role::Recruiter => Json(
            repo.recruiter(auth.user_id())
                .await
                .map_err(ApiError::database)?,
        )
        .into_response(),
        Role::Applicant | Role::Admin => Json(
            repo.applicant(auth.user_id())
                .await
                .map_err(ApiError::database)?,
        )
        .into_response(),
    };
    Ok(response)
}
