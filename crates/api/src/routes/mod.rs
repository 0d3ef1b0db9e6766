//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::session_middleware};

pub mod auth;
pub mod files;
pub mod health;
pub mod sync;
pub mod sync_configs;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require a session
    let protected_routes = Router::new()
        .merge(files::routes())
        .merge(sync_configs::routes())
        .merge(sync::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
