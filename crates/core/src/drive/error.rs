//! Drive adapter error types.

use serde::Deserialize;
use thiserror::Error;

use cloudsync_shared::AppError;

/// Drive operation errors.
///
/// Vendor failures carry the message reported by the provider API.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Input rejected before any vendor call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Remote object not found.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Provider rejected the bearer credential.
    #[error("provider rejected credentials: {0}")]
    Unauthorized(String),

    /// Upload failed.
    #[error("failed to upload file: {0}")]
    Upload(String),

    /// Download failed.
    #[error("failed to download file: {0}")]
    Download(String),

    /// Delete failed.
    #[error("failed to delete file: {0}")]
    Delete(String),

    /// Folder lookup or creation failed.
    #[error("failed to create/get folder: {0}")]
    Folder(String),

    /// Listing failed.
    #[error("failed to list files: {0}")]
    List(String),

    /// Metadata lookup failed.
    #[error("failed to get file metadata: {0}")]
    Metadata(String),

    /// Request never produced a vendor response.
    #[error("provider request failed: {0}")]
    Transport(String),
}

impl DriveError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<DriveError> for AppError {
    fn from(err: DriveError) -> Self {
        match err {
            DriveError::Validation(msg) => Self::Validation(msg),
            DriveError::NotFound(msg) => Self::NotFound(msg),
            DriveError::Unauthorized(msg) => Self::Unauthorized(msg),
            DriveError::Upload(msg) => Self::Upload(msg),
            DriveError::Download(msg) => Self::Download(msg),
            DriveError::Delete(msg) => Self::Delete(msg),
            DriveError::Folder(msg) => Self::Folder(msg),
            DriveError::List(msg) | DriveError::Metadata(msg) | DriveError::Transport(msg) => {
                Self::ExternalService(msg)
            }
        }
    }
}

/// Error envelope shared by Drive v3 and Microsoft Graph.
#[derive(Debug, Deserialize)]
struct VendorErrorBody {
    error: VendorError,
}

#[derive(Debug, Deserialize)]
struct VendorError {
    message: Option<String>,
    code: Option<serde_json::Value>,
}

/// Outcome of a non-2xx vendor response.
#[derive(Debug)]
pub(crate) struct VendorFailure {
    pub status: reqwest::StatusCode,
    pub message: String,
}

impl VendorFailure {
    /// Reads the vendor's error message out of a failed response.
    pub(crate) async fn read(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = parse_vendor_message(&body)
            .unwrap_or_else(|| format!("{status}: {}", body.trim()).trim_end_matches(": ").to_string());
        Self { status, message }
    }

    /// Maps the failure to an operation error, promoting 401s.
    pub(crate) fn into_error(self, op: fn(String) -> DriveError) -> DriveError {
        if self.status == reqwest::StatusCode::UNAUTHORIZED {
            DriveError::Unauthorized(self.message)
        } else {
            op(self.message)
        }
    }
}

fn parse_vendor_message(body: &str) -> Option<String> {
    let parsed: VendorErrorBody = serde_json::from_str(body).ok()?;
    match (parsed.error.message, parsed.error.code) {
        (Some(message), _) if !message.is_empty() => Some(message),
        (_, Some(code)) => Some(code.to_string().trim_matches('"').to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_google_error() {
        let body = r#"{"error":{"code":404,"message":"File not found: abc.","errors":[]}}"#;
        assert_eq!(
            parse_vendor_message(body).as_deref(),
            Some("File not found: abc.")
        );
    }

    #[test]
    fn test_parse_graph_error() {
        let body = r#"{"error":{"code":"itemNotFound","message":"The resource could not be found."}}"#;
        assert_eq!(
            parse_vendor_message(body).as_deref(),
            Some("The resource could not be found.")
        );
    }

    #[test]
    fn test_parse_error_without_message_uses_code() {
        let body = r#"{"error":{"code":"accessDenied"}}"#;
        assert_eq!(parse_vendor_message(body).as_deref(), Some("accessDenied"));
    }

    #[test]
    fn test_parse_non_json_body() {
        assert_eq!(parse_vendor_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn test_into_app_error() {
        assert!(matches!(
            AppError::from(DriveError::Upload("x".into())),
            AppError::Upload(_)
        ));
        assert!(matches!(
            AppError::from(DriveError::Validation("x".into())),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(DriveError::List("x".into())),
            AppError::ExternalService(_)
        ));
    }
}
