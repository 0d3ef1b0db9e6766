//! Executes a sync configuration against its provider.
//!
//! ```text
//! find ─► enabled? ─► provider supported? ─► credential? ─► batch present?
//!                                                              │
//!            resolve/create folder (failure aborts) ◄──────────┘
//!                           │
//!        upload phase ──► download phase ──► record last_sync_time
//! ```
//!
//! Failures of individual uploads and downloads never abort the run; they
//! are collected in [`SyncResult::errors`]. A folder that cannot be resolved
//! or listed aborts it, and `last_sync_time` is left untouched.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use cloudsync_shared::{CloudProvider, SyncConfigId};

use super::error::SyncError;
use super::store::SyncConfigRepository;
use super::types::{DownloadedFile, SyncFile, SyncItemError, SyncMode, SyncOutcome, SyncResult};
use crate::drive::path::normalize_folder_path;
use crate::drive::{DEFAULT_FOLDER_PAGE_SIZE, DriveProvider, DriveResolver, FolderDescriptor};

/// Supplies provider credentials for an owner.
pub trait CredentialSupplier: Send + Sync {
    /// Returns the bearer token for `provider`, if the owner has one.
    fn credential(&self, owner_id: &str, provider: CloudProvider) -> Option<String>;
}

/// Executor tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Maximum in-flight item operations per phase.
    pub max_concurrency: usize,
    /// Page size for folder listings in download phases.
    pub folder_page_size: u32,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            folder_page_size: DEFAULT_FOLDER_PAGE_SIZE,
        }
    }
}

/// Runs sync configurations.
pub struct SyncExecutor<R: SyncConfigRepository, D: DriveResolver> {
    configs: Arc<R>,
    drives: Arc<D>,
    settings: ExecutorSettings,
}

impl<R: SyncConfigRepository, D: DriveResolver> Clone for SyncExecutor<R, D> {
    fn clone(&self) -> Self {
        Self {
            configs: Arc::clone(&self.configs),
            drives: Arc::clone(&self.drives),
            settings: self.settings,
        }
    }
}

impl<R: SyncConfigRepository, D: DriveResolver> SyncExecutor<R, D> {
    /// Create a new executor.
    #[must_use]
    pub fn new(configs: Arc<R>, drives: Arc<D>, settings: ExecutorSettings) -> Self {
        Self {
            configs,
            drives,
            settings,
        }
    }

    /// Execute one configuration for `owner_id`.
    ///
    /// `files` is the upload batch; upload modes require a non-empty one.
    ///
    /// # Errors
    ///
    /// Checked in order, before any provider call:
    /// - `NotFound` if the owner has no such configuration
    /// - `Disabled` if the configuration is disabled
    /// - `UnsupportedProvider` if the resolver cannot serve its provider
    /// - `AuthRequired` if no credential is available
    /// - `Validation` if an upload mode has no files
    ///
    /// Then `Drive` if the remote folder cannot be resolved or listed. Per-item
    /// failures are reported in the outcome instead.
    pub async fn execute(
        &self,
        owner_id: &str,
        config_id: SyncConfigId,
        credentials: &impl CredentialSupplier,
        files: Option<Vec<SyncFile>>,
    ) -> Result<SyncOutcome, SyncError> {
        let config = self
            .configs
            .find(owner_id, config_id)
            .await?
            .ok_or_else(|| SyncError::not_found(config_id))?;

        if !config.enabled {
            return Err(SyncError::Disabled(config_id.to_string()));
        }
        if !self.drives.supports(config.provider) {
            return Err(SyncError::UnsupportedProvider(config.provider.to_string()));
        }
        let token = credentials
            .credential(owner_id, config.provider)
            .ok_or_else(|| SyncError::AuthRequired(config.provider.to_string()))?;

        let files = files.unwrap_or_default();
        if config.sync_mode.requires_batch() && files.is_empty() {
            return Err(SyncError::validation(format!(
                "files are required for {} sync",
                config.sync_mode
            )));
        }

        let client = self
            .drives
            .connect(config.provider, &token)
            .ok_or_else(|| SyncError::UnsupportedProvider(config.provider.to_string()))?;

        info!(
            owner_id,
            config_id = %config_id,
            provider = %config.provider,
            sync_mode = %config.sync_mode,
            "executing sync"
        );

        let folder = client.resolve_or_create_folder(&config.remote_path).await?;
        let folder_path = normalize_folder_path(&config.remote_path)
            .unwrap_or_else(|_| config.remote_path.clone());

        let mut result = SyncResult::default();
        let uploads = match config.sync_mode {
            SyncMode::UploadOnly | SyncMode::UploadThenDelete | SyncMode::TwoWay => files,
            SyncMode::DownloadOnly | SyncMode::DownloadThenDelete => Vec::new(),
        };
        if !uploads.is_empty() {
            self.upload_phase(&client, &folder, uploads, &mut result).await;
        }
        if config.sync_mode.downloads() {
            self.download_phase(&client, &folder, &folder_path, &mut result)
                .await?;
        }

        let synced_at = match self.configs.touch_last_sync(owner_id, config_id).await? {
            Some(updated) => updated.last_sync_time.unwrap_or_else(Utc::now),
            None => {
                warn!(config_id = %config_id, "configuration removed during execution");
                Utc::now()
            }
        };

        info!(
            config_id = %config_id,
            uploaded = result.uploaded.len(),
            downloaded = result.downloaded.len(),
            errors = result.errors.len(),
            "sync completed"
        );

        Ok(SyncOutcome {
            config_id,
            sync_mode: config.sync_mode,
            folder,
            result,
            synced_at,
            delete_delay_days: config.delete_delay_days,
        })
    }

    async fn upload_phase(
        &self,
        client: &D::Client,
        folder: &FolderDescriptor,
        files: Vec<SyncFile>,
        result: &mut SyncResult,
    ) {
        let folder_id = folder.id.as_str();
        let outcomes: Vec<_> = stream::iter(files)
            .map(|file| async move {
                let uploaded = client
                    .upload_into_folder(folder_id, &file.filename, &file.content)
                    .await;
                (file, uploaded)
            })
            .buffered(self.settings.max_concurrency.max(1))
            .collect()
            .await;

        for (file, uploaded) in outcomes {
            match uploaded {
                Ok(descriptor) => result.uploaded.push(descriptor),
                Err(e) => {
                    warn!(file = %file.filename, error = %e, "upload failed");
                    result.errors.push(SyncItemError {
                        file: file.filename,
                        file_id: None,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    async fn download_phase(
        &self,
        client: &D::Client,
        folder: &FolderDescriptor,
        folder_path: &str,
        result: &mut SyncResult,
    ) -> Result<(), SyncError> {
        let listing = client
            .list_in_folder(&folder.id, Some(self.settings.folder_page_size))
            .await
            .inspect_err(|e| warn!(folder = folder_path, error = %e, "folder listing failed"))?;

        let outcomes: Vec<_> = stream::iter(listing.into_iter().filter(|item| !item.is_folder))
            .map(|file| async move {
                let content = client.download(&file.id).await;
                (file, content)
            })
            .buffered(self.settings.max_concurrency.max(1))
            .collect()
            .await;

        for (file, content) in outcomes {
            match content {
                Ok(content) => result.downloaded.push(DownloadedFile { file, content }),
                Err(e) => {
                    warn!(file = %file.name, error = %e, "download failed");
                    result.errors.push(SyncItemError {
                        file: file.name,
                        file_id: Some(file.id),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
