//! Sync configuration routes.
//!
//! Every configuration is scoped to the session owner; another owner's ID
//! behaves as if it did not exist.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::info;

use cloudsync_core::sync::{CreateSyncConfigInput, UpdateSyncConfigInput};
use cloudsync_shared::{AppError, SyncConfigId};

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthSession;

/// Creates the sync configuration router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync-configs", get(list_configs).post(create_config))
        .route(
            "/sync-configs/{config_id}",
            get(get_config).put(update_config).delete(delete_config),
        )
}

/// Parses a configuration ID from a path segment.
///
/// A malformed ID cannot name an existing configuration, so it is reported
/// as not found.
pub(crate) fn parse_config_id(raw: &str) -> ApiResult<SyncConfigId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Sync configuration {raw} not found")).into())
}

/// GET `/sync-configs` - List the owner's configurations.
async fn list_configs(
    State(state): State<AppState>,
    auth: AuthSession,
) -> ApiResult<impl IntoResponse> {
    let configs = state.configs.list(auth.owner_id()).await?;
    Ok(Json(json!({ "success": true, "configs": configs })))
}

/// POST `/sync-configs` - Create a configuration.
async fn create_config(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<CreateSyncConfigInput>,
) -> ApiResult<impl IntoResponse> {
    let config = state.configs.create(auth.owner_id(), payload).await?;

    info!(
        owner_id = auth.owner_id(),
        config_id = %config.id,
        sync_mode = %config.sync_mode,
        "sync configuration created"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "config": config })),
    ))
}

/// GET `/sync-configs/{config_id}`
async fn get_config(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(config_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_config_id(&config_id)?;
    let config = state.configs.get(auth.owner_id(), id).await?;
    Ok(Json(json!({ "success": true, "config": config })))
}

/// PUT `/sync-configs/{config_id}` - Merge changes into a configuration.
async fn update_config(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(config_id): Path<String>,
    Json(payload): Json<UpdateSyncConfigInput>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_config_id(&config_id)?;
    let config = state.configs.update(auth.owner_id(), id, payload).await?;

    info!(owner_id = auth.owner_id(), config_id = %id, "sync configuration updated");
    Ok(Json(json!({ "success": true, "config": config })))
}

/// DELETE `/sync-configs/{config_id}`
async fn delete_config(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(config_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_config_id(&config_id)?;
    if !state.configs.delete(auth.owner_id(), id).await? {
        return Err(AppError::NotFound(format!("Sync configuration {id} not found")).into());
    }

    info!(owner_id = auth.owner_id(), config_id = %id, "sync configuration deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Sync configuration deleted"
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;
    use serde_json::{Value, json};

    use cloudsync_shared::CloudProvider;

    use crate::AppState;
    use crate::test_support::{app, send, session_token, test_state};

    fn valid_body() -> Value {
        json!({
            "local_path": "/home/ada/notes",
            "remote_path": "Backups/Notes",
            "provider": "google",
            "sync_mode": "upload_only"
        })
    }

    async fn create(state: &AppState, token: &str, body: Value) -> (StatusCode, Value) {
        send(app(state), "POST", "/api/v1/sync-configs", Some(token), Some(body)).await
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let state = test_state("http://127.0.0.1:9");
        let token = session_token(&state, CloudProvider::Google, "1177");

        let (status, body) = create(&state, &token, valid_body()).await;

        assert_eq!(status, StatusCode::CREATED);
        let config = &body["config"];
        assert_eq!(config["owner_id"], "google:1177");
        assert_eq!(config["delete_delay_days"], 0);
        assert_eq!(config["enabled"], true);
        assert!(config["last_sync_time"].is_null());
    }

    #[rstest]
    #[case::blank_local_path(json!({ "local_path": " " }), "VALIDATION_ERROR")]
    #[case::unknown_provider(json!({ "provider": "dropbox" }), "UNSUPPORTED_PROVIDER")]
    #[case::unknown_mode(json!({ "sync_mode": "mirror" }), "INVALID_MODE")]
    #[case::negative_delay(json!({ "delete_delay_days": -1 }), "VALIDATION_ERROR")]
    #[tokio::test]
    async fn test_create_rejects_invalid_input(#[case] overrides: Value, #[case] code: &str) {
        let state = test_state("http://127.0.0.1:9");
        let token = session_token(&state, CloudProvider::Google, "1177");
        let mut body = valid_body();
        for (key, value) in overrides.as_object().unwrap() {
            body[key] = value.clone();
        }

        let (status, response) = create(&state, &token, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], code);
    }

    #[tokio::test]
    async fn test_configs_are_owner_scoped() {
        let state = test_state("http://127.0.0.1:9");
        let alice = session_token(&state, CloudProvider::Google, "alice");
        let bob = session_token(&state, CloudProvider::Microsoft, "bob");

        let (_, created) = create(&state, &alice, valid_body()).await;
        let id = created["config"]["id"].as_str().unwrap();

        let (_, listed) = send(app(&state), "GET", "/api/v1/sync-configs", Some(&bob), None).await;
        assert_eq!(listed["configs"], json!([]));

        let uri = format!("/api/v1/sync-configs/{id}");
        let (status, _) = send(app(&state), "GET", &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(app(&state), "GET", &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["remote_path"], "Backups/Notes");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let state = test_state("http://127.0.0.1:9");
        let token = session_token(&state, CloudProvider::Google, "1177");
        let (_, created) = create(&state, &token, valid_body()).await;
        let uri = format!("/api/v1/sync-configs/{}", created["config"]["id"].as_str().unwrap());

        let (status, body) = send(
            app(&state),
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "enabled": false, "sync_mode": "two_way" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["enabled"], false);
        assert_eq!(body["config"]["sync_mode"], "two_way");
        assert_eq!(body["config"]["local_path"], "/home/ada/notes");
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let state = test_state("http://127.0.0.1:9");
        let token = session_token(&state, CloudProvider::Google, "1177");
        let (_, created) = create(&state, &token, valid_body()).await;
        let uri = format!("/api/v1/sync-configs/{}", created["config"]["id"].as_str().unwrap());

        let (status, _) = send(app(&state), "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app(&state), "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let state = test_state("http://127.0.0.1:9");
        let token = session_token(&state, CloudProvider::Google, "1177");

        let (status, _) = send(
            app(&state),
            "GET",
            "/api/v1/sync-configs/not-a-uuid",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
