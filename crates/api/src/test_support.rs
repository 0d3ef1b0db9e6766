//! Helpers shared by router tests.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cloudsync_core::drive::{DriveClientFactory, DriveEndpoints};
use cloudsync_core::sync::ExecutorSettings;
use cloudsync_shared::{CloudProvider, SessionConfig, SessionService};

use crate::{AppState, ListingDefaults, RouterOptions, create_router};

/// State whose drive clients talk to `base` (a mock server).
pub fn test_state(base: &str) -> AppState {
    AppState::new(
        SessionService::new(SessionConfig {
            secret: "router-test-secret".to_string(),
            expires_secs: 900,
        }),
        DriveClientFactory::new(reqwest::Client::new(), DriveEndpoints::with_base(base)),
        ExecutorSettings::default(),
        ListingDefaults::default(),
    )
}

/// Full application router.
pub fn app(state: &AppState) -> Router {
    create_router(state.clone(), &RouterOptions::default())
}

/// Issues a session token for an account.
pub fn session_token(state: &AppState, provider: CloudProvider, account_id: &str) -> String {
    let claims = state
        .sessions
        .claims_for(provider, account_id, format!("{provider}-access-token"));
    state.sessions.issue(&claims).unwrap()
}

/// Sends a request and decodes the JSON response body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
