//! JSON error envelope for handlers.
//!
//! Every failure leaves the API as `{"error": CODE, "message": text}`.
//! Server-side failures are logged and answered with a generic message;
//! the detail is only attached when the server runs in dev mode.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jobboard_shared::AppError;
use serde::Serialize;
use tracing::error;

use crate::AppState;

const GENERIC_MESSAGE: &str = "An internal error occurred";

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Wrap a database failure.
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self(AppError::Database(err.to_string()))
    }

    /// Wrap an unexpected failure.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self(AppError::Internal(err.to_string()))
    }

    /// Reject the request input.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }

    /// Resource absent.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(AppError::NotFound(msg.into()))
    }

    /// Uniqueness conflict.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self(AppError::Conflict(msg.into()))
    }

    /// Missing or bad credentials.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(msg.into()))
    }
}

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Detail of a 5xx, carried to [`expose_internal_detail`].
#[derive(Debug, Clone)]
struct InternalDetail {
    code: &'static str,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.0.error_code();

        if !self.0.is_internal() {
            return (
                status,
                Json(ErrorBody {
                    error: code,
                    message: self.0.to_string(),
                }),
            )
                .into_response();
        }

        error!(error = %self.0, code, "request failed");
        let mut response = (
            status,
            Json(ErrorBody {
                error: code,
                message: GENERIC_MESSAGE.to_string(),
            }),
        )
            .into_response();
        response.extensions_mut().insert(InternalDetail {
            code,
            detail: self.0.to_string(),
        });
        response
    }
}

/// Rewrites 5xx bodies to include the internal detail when `dev_mode` is on.
pub async fn expose_internal_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.dev_mode {
        return response;
    }

    match response.extensions().get::<InternalDetail>().cloned() {
        Some(InternalDetail { code, detail }) => (
            response.status(),
            Json(ErrorBody {
                error: code,
                message: format!("{GENERIC_MESSAGE}: {detail}"),
            }),
        )
            .into_response(),
        None => response,
    }
}
