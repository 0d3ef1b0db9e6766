//! Sync configuration and execution types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cloudsync_shared::{CloudProvider, SyncConfigId};

use crate::drive::{FileDescriptor, FolderDescriptor};

/// Direction and cleanup behaviour of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Push local files to the remote folder.
    UploadOnly,
    /// Push, then remove local copies after the delete delay.
    UploadThenDelete,
    /// Pull the remote folder.
    DownloadOnly,
    /// Pull, then remove remote copies after the delete delay.
    DownloadThenDelete,
    /// Push the supplied batch, then pull.
    TwoWay,
}

impl SyncMode {
    /// Every mode.
    pub const ALL: [Self; 5] = [
        Self::UploadOnly,
        Self::UploadThenDelete,
        Self::DownloadOnly,
        Self::DownloadThenDelete,
        Self::TwoWay,
    ];

    /// Returns the wire name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UploadOnly => "upload_only",
            Self::UploadThenDelete => "upload_then_delete",
            Self::DownloadOnly => "download_only",
            Self::DownloadThenDelete => "download_then_delete",
            Self::TwoWay => "two_way",
        }
    }

    /// Parses a mode from its wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == s)
    }

    /// Whether the mode requires a batch of files to upload.
    #[must_use]
    pub const fn requires_batch(&self) -> bool {
        matches!(self, Self::UploadOnly | Self::UploadThenDelete)
    }

    /// Whether the mode runs a download phase.
    #[must_use]
    pub const fn downloads(&self) -> bool {
        matches!(
            self,
            Self::DownloadOnly | Self::DownloadThenDelete | Self::TwoWay
        )
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored sync configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncConfiguration {
    /// Configuration ID.
    pub id: SyncConfigId,
    /// Owning principal.
    pub owner_id: String,
    /// Local path label.
    pub local_path: String,
    /// Remote folder path.
    pub remote_path: String,
    /// Provider the configuration targets.
    pub provider: CloudProvider,
    /// Sync mode.
    pub sync_mode: SyncMode,
    /// Days to wait before deleting synced copies.
    pub delete_delay_days: u32,
    /// Disabled configurations are never executed.
    pub enabled: bool,
    /// When the configuration was last executed.
    pub last_sync_time: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a sync configuration.
///
/// Provider and mode arrive as raw strings and are validated by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSyncConfigInput {
    /// Local path label.
    #[serde(default)]
    pub local_path: String,
    /// Remote folder path.
    #[serde(default)]
    pub remote_path: String,
    /// Provider tag.
    #[serde(default)]
    pub provider: String,
    /// Sync mode name.
    #[serde(default)]
    pub sync_mode: String,
    /// Delete delay in days.
    pub delete_delay_days: Option<i64>,
    /// Enabled flag.
    pub enabled: Option<bool>,
}

/// Partial update of a sync configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSyncConfigInput {
    /// New local path label.
    pub local_path: Option<String>,
    /// New remote folder path.
    pub remote_path: Option<String>,
    /// New provider tag.
    pub provider: Option<String>,
    /// New sync mode name.
    pub sync_mode: Option<String>,
    /// New delete delay in days.
    pub delete_delay_days: Option<i64>,
    /// New enabled flag.
    pub enabled: Option<bool>,
}

/// Validated changes applied by the store.
#[derive(Debug, Clone, Default)]
pub struct SyncConfigPatch {
    /// New local path label.
    pub local_path: Option<String>,
    /// New remote folder path.
    pub remote_path: Option<String>,
    /// New provider.
    pub provider: Option<CloudProvider>,
    /// New sync mode.
    pub sync_mode: Option<SyncMode>,
    /// New delete delay.
    pub delete_delay_days: Option<u32>,
    /// New enabled flag.
    pub enabled: Option<bool>,
}

/// A file supplied for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFile {
    /// Target file name.
    pub filename: String,
    /// File content.
    pub content: String,
}

impl SyncFile {
    /// Creates a file to upload.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A downloaded remote file with its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedFile {
    /// Remote descriptor.
    #[serde(flatten)]
    pub file: FileDescriptor,
    /// Downloaded content.
    pub content: String,
}

/// A per-item failure captured during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncItemError {
    /// File name, or the folder path for listing failures.
    pub file: String,
    /// Remote file ID, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Failure message.
    pub message: String,
}

/// Accumulated per-item results of one execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Files uploaded, in input order.
    pub uploaded: Vec<FileDescriptor>,
    /// Files downloaded, in listing order.
    pub downloaded: Vec<DownloadedFile>,
    /// Files deleted. Deletion is not performed, so this stays empty.
    pub deleted: Vec<FileDescriptor>,
    /// Per-item failures.
    pub errors: Vec<SyncItemError>,
}

/// Outcome of a completed execution.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// Executed configuration.
    pub config_id: SyncConfigId,
    /// Mode that ran.
    pub sync_mode: SyncMode,
    /// Resolved remote folder.
    pub folder: FolderDescriptor,
    /// Per-item results.
    pub result: SyncResult,
    /// Recorded `last_sync_time`.
    pub synced_at: DateTime<Utc>,
    /// Configured delete delay.
    pub delete_delay_days: u32,
}
