//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every variant maps to a stable classification code and HTTP status so
/// that callers can tell failures apart without parsing messages.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid session, or the session cannot act for the requested provider.
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Sync configuration is disabled.
    #[error("Sync configuration is disabled: {0}")]
    Disabled(String),

    /// Provider tag is unknown or not offered.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Sync mode is not part of the fixed enumeration.
    #[error("Invalid sync mode: {0}")]
    InvalidMode(String),

    /// Remote upload failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Remote download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// Remote delete failed.
    #[error("Delete failed: {0}")]
    Delete(String),

    /// Remote folder could not be resolved or created.
    #[error("Folder resolution failed: {0}")]
    Folder(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Disabled(_) => 409,
            Self::Validation(_) | Self::UnsupportedProvider(_) | Self::InvalidMode(_) => 400,
            Self::Upload(_)
            | Self::Download(_)
            | Self::Delete(_)
            | Self::Folder(_)
            | Self::ExternalService(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "AUTH_REQUIRED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Disabled(_) => "SYNC_DISABLED",
            Self::UnsupportedProvider(_) => "UNSUPPORTED_PROVIDER",
            Self::InvalidMode(_) => "INVALID_MODE",
            Self::Upload(_) => "UPLOAD_ERROR",
            Self::Download(_) => "DOWNLOAD_ERROR",
            Self::Delete(_) => "DELETE_ERROR",
            Self::Folder(_) => "FOLDER_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
