//! Sync execution route.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use cloudsync_core::sync::SyncFile;

use super::sync_configs::parse_config_id;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthSession;

/// Creates the sync execution router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sync/execute/{config_id}", post(execute_sync))
}

/// Optional upload batch for an execution.
#[derive(Debug, Default, Deserialize)]
struct ExecuteRequest {
    files: Option<Vec<SyncFile>>,
}

/// POST `/sync/execute/{config_id}` - Run a sync configuration.
///
/// Item failures are reported in `results.errors` with a 200 response.
async fn execute_sync(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(config_id): Path<String>,
    payload: Option<Json<ExecuteRequest>>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_config_id(&config_id)?;
    let files = payload.and_then(|Json(request)| request.files);

    let outcome = state
        .executor
        .execute(auth.owner_id(), id, &auth, files)
        .await?;

    info!(
        owner_id = auth.owner_id(),
        config_id = %id,
        errors = outcome.result.errors.len(),
        "sync executed"
    );

    Ok(Json(json!({
        "success": true,
        "config_id": outcome.config_id,
        "sync_mode": outcome.sync_mode,
        "folder": outcome.folder,
        "results": outcome.result,
        "synced_at": outcome.synced_at,
        "delete_delay_days": outcome.delete_delay_days,
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use wiremock::matchers::{any, bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use cloudsync_shared::CloudProvider;

    use crate::AppState;
    use crate::test_support::{app, send, session_token, test_state};

    async fn create_config(state: &AppState, token: &str, body: Value) -> String {
        let (status, created) =
            send(app(state), "POST", "/api/v1/sync-configs", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        created["config"]["id"].as_str().unwrap().to_string()
    }

    async fn silent_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_execute_upload_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(bearer_token("google-access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{ "id": "F1", "name": "Backups/Notes" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u1",
                "name": "todo.txt"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let state = test_state(&server.uri());
        let token = session_token(&state, CloudProvider::Google, "1177");
        let id = create_config(
            &state,
            &token,
            json!({
                "local_path": "/notes",
                "remote_path": "/Backups/Notes/",
                "provider": "google",
                "sync_mode": "upload_only",
                "delete_delay_days": 3
            }),
        )
        .await;

        let (status, body) = send(
            app(&state),
            "POST",
            &format!("/api/v1/sync/execute/{id}"),
            Some(&token),
            Some(json!({ "files": [{ "filename": "todo.txt", "content": "milk" }] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["sync_mode"], "upload_only");
        assert_eq!(body["folder"]["id"], "F1");
        assert_eq!(body["results"]["uploaded"][0]["id"], "u1");
        assert_eq!(body["results"]["errors"], json!([]));
        assert_eq!(body["delete_delay_days"], 3);

        let (_, config) = send(
            app(&state),
            "GET",
            &format!("/api/v1/sync-configs/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(config["config"]["last_sync_time"], body["synced_at"]);
    }

    #[tokio::test]
    async fn test_execute_disabled_config() {
        let server = silent_server().await;
        let state = test_state(&server.uri());
        let token = session_token(&state, CloudProvider::Google, "1177");
        let id = create_config(
            &state,
            &token,
            json!({
                "local_path": "/notes",
                "remote_path": "Notes",
                "provider": "google",
                "sync_mode": "download_only",
                "enabled": false
            }),
        )
        .await;

        let (status, body) = send(
            app(&state),
            "POST",
            &format!("/api/v1/sync/execute/{id}"),
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "SYNC_DISABLED");
    }

    #[tokio::test]
    async fn test_execute_without_provider_credential() {
        let server = silent_server().await;
        let state = test_state(&server.uri());
        let token = session_token(&state, CloudProvider::Google, "1177");
        let id = create_config(
            &state,
            &token,
            json!({
                "local_path": "/notes",
                "remote_path": "Notes",
                "provider": "microsoft",
                "sync_mode": "download_only"
            }),
        )
        .await;

        let (status, body) = send(
            app(&state),
            "POST",
            &format!("/api/v1/sync/execute/{id}"),
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn test_execute_upload_mode_requires_files() {
        let server = silent_server().await;
        let state = test_state(&server.uri());
        let token = session_token(&state, CloudProvider::Google, "1177");
        let id = create_config(
            &state,
            &token,
            json!({
                "local_path": "/notes",
                "remote_path": "Notes",
                "provider": "google",
                "sync_mode": "upload_then_delete"
            }),
        )
        .await;

        let (status, body) = send(
            app(&state),
            "POST",
            &format!("/api/v1/sync/execute/{id}"),
            Some(&token),
            Some(json!({ "files": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_execute_other_owners_config() {
        let state = test_state("http://127.0.0.1:9");
        let alice = session_token(&state, CloudProvider::Google, "alice");
        let bob = session_token(&state, CloudProvider::Google, "bob");
        let id = create_config(
            &state,
            &alice,
            json!({
                "local_path": "/notes",
                "remote_path": "Notes",
                "provider": "google",
                "sync_mode": "download_only"
            }),
        )
        .await;

        let (status, _) = send(
            app(&state),
            "POST",
            &format!("/api/v1/sync/execute/{id}"),
            Some(&bob),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
