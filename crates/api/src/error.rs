//! HTTP mapping of application errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use cloudsync_core::drive::DriveError;
use cloudsync_core::sync::SyncError;
use cloudsync_shared::{AppError, SessionError};

/// Error returned by handlers.
///
/// Renders as `{"error": <code>, "message": <description>}` with the status
/// code of the wrapped [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        Self(err.into())
    }
}

impl From<DriveError> for ApiError {
    fn from(err: DriveError) -> Self {
        Self(err.into())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self(match err {
            SessionError::Expired => AppError::Unauthorized("session has expired".to_string()),
            SessionError::DecodingError(_) => {
                AppError::Unauthorized("invalid or malformed session token".to_string())
            }
            SessionError::EncodingError(msg) => AppError::Internal(msg),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_body_carries_code_and_message() {
        let (status, body) = render(SyncError::Disabled("abc".to_string()).into()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "SYNC_DISABLED");
        assert!(body["message"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_drive_failures_are_bad_gateway() {
        let (status, body) = render(DriveError::Upload("quota".to_string()).into()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "UPLOAD_ERROR");
    }

    #[tokio::test]
    async fn test_expired_session_requires_auth() {
        let (status, body) = render(SessionError::Expired.into()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "AUTH_REQUIRED");
    }
}
