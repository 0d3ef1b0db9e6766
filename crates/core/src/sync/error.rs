//! Sync error types.

use thiserror::Error;

use cloudsync_shared::AppError;

use crate::drive::DriveError;

/// Sync configuration and execution errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Configuration absent for this owner.
    #[error("Sync configuration not found: {0}")]
    NotFound(String),

    /// Configuration is disabled.
    #[error("Sync configuration {0} is disabled")]
    Disabled(String),

    /// Provider unknown or not offered.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Sync mode outside the fixed enumeration.
    #[error("Invalid sync mode: {0}")]
    InvalidMode(String),

    /// No credential for the configuration's provider.
    #[error("Not authenticated with {0}")]
    AuthRequired(String),

    /// Whole-execution adapter failure.
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl SyncError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound(id.to_string())
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Validation(msg) => Self::Validation(msg),
            SyncError::NotFound(msg) => Self::NotFound(msg),
            SyncError::Disabled(msg) => Self::Disabled(msg),
            SyncError::UnsupportedProvider(msg) => Self::UnsupportedProvider(msg),
            SyncError::InvalidMode(msg) => Self::InvalidMode(msg),
            SyncError::AuthRequired(msg) => Self::Unauthorized(msg),
            SyncError::Drive(err) => err.into(),
        }
    }
}
