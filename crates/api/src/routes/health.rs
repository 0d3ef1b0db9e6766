//! Health check and index endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;
use serde_json::{Value, json};

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET `/` - Lists the API surface.
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "name": "CloudSync API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/v1/health",
            "auth": {
                "session": "POST /api/v1/auth/session",
                "status": "GET /api/v1/auth/status"
            },
            "files": {
                "upload": "POST /api/v1/sync/upload",
                "download": "GET /api/v1/sync/download",
                "list": "GET /api/v1/sync/list",
                "metadata": "GET /api/v1/sync/files/{file_id}",
                "delete": "DELETE /api/v1/sync/delete/{file_id}",
                "folder_upload": "POST /api/v1/sync/folder/upload",
                "folder_list": "GET /api/v1/sync/folder/list"
            },
            "sync_configs": {
                "list": "GET /api/v1/sync-configs",
                "create": "POST /api/v1/sync-configs",
                "get": "GET /api/v1/sync-configs/{config_id}",
                "update": "PUT /api/v1/sync-configs/{config_id}",
                "delete": "DELETE /api/v1/sync-configs/{config_id}",
                "execute": "POST /api/v1/sync/execute/{config_id}"
            }
        }
    }))
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
