//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod applications;
pub mod auth;
pub mod companies;
pub mod documents;
pub mod health;
pub mod offers;
pub mod stats;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(users::routes())
        .merge(companies::routes())
        .merge(offers::routes())
        .merge(applications::routes())
        .merge(documents::routes(state.storage.config().max_file_size))
        .merge(stats::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(offers::public_routes())
        .merge(protected_routes)
}
