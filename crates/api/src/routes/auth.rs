//! Session routes.
//!
//! A session is opened by presenting a provider access token. The token is
//! checked against the provider's profile endpoint, and the resulting account
//! ID scopes every sync configuration of the session.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{info, warn};

use cloudsync_core::drive::DriveResolver;
use cloudsync_shared::auth::{SessionRequest, SessionResponse, SessionUser};
use cloudsync_shared::{AppError, CloudProvider};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::bearer_token;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/session", post(open_session))
        .route("/auth/status", get(session_status))
}

/// POST `/auth/session` - Exchange a provider access token for a session.
async fn open_session(
    State(state): State<AppState>,
    Json(payload): Json<SessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let provider = CloudProvider::parse(&payload.provider)
        .filter(|p| state.drives.supports(*p))
        .ok_or_else(|| AppError::UnsupportedProvider(payload.provider.clone()))?;

    if payload.access_token.trim().is_empty() {
        return Err(AppError::Validation("access_token is required".to_string()).into());
    }

    let client = state
        .drives
        .connect(provider, &payload.access_token)
        .ok_or_else(|| AppError::UnsupportedProvider(provider.to_string()))?;

    let profile = client.account_profile().await.map_err(|e| {
        warn!(provider = %provider, error = %e, "provider rejected session token");
        ApiError::from(e)
    })?;

    let claims = state
        .sessions
        .claims_for(provider, &profile.id, payload.access_token)
        .with_profile(profile.display_name, profile.email);
    let session_token = state.sessions.issue(&claims)?;

    info!(owner_id = claims.owner_id(), provider = %provider, "session opened");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_token,
            expires_in: state.sessions.expires_in(),
            user: SessionUser::from(&claims),
        }),
    ))
}

/// GET `/auth/status` - Report whether the request carries a valid session.
async fn session_status(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let claims = bearer_token(&headers).and_then(|token| state.sessions.validate(token).ok());

    match claims {
        Some(claims) => Json(json!({
            "authenticated": true,
            "user": SessionUser::from(&claims)
        })),
        None => Json(json!({ "authenticated": false })),
    }
}
