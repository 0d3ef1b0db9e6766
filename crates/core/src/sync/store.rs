//! Sync configuration storage and validation.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use cloudsync_shared::{CloudProvider, SyncConfigId};

use super::error::SyncError;
use super::types::{
    CreateSyncConfigInput, SyncConfigPatch, SyncConfiguration, SyncMode, UpdateSyncConfigInput,
};

/// Repository trait for sync configuration persistence.
///
/// Every lookup is scoped by owner: another owner's configuration behaves
/// exactly like a missing one.
pub trait SyncConfigRepository: Send + Sync {
    /// Store a new configuration.
    fn create(
        &self,
        config: SyncConfiguration,
    ) -> impl Future<Output = Result<SyncConfiguration, SyncError>> + Send;

    /// List an owner's configurations in insertion order.
    fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<SyncConfiguration>, SyncError>> + Send;

    /// Find a configuration by ID.
    fn find(
        &self,
        owner_id: &str,
        id: SyncConfigId,
    ) -> impl Future<Output = Result<Option<SyncConfiguration>, SyncError>> + Send;

    /// Apply a validated patch and refresh `updated_at`.
    fn update(
        &self,
        owner_id: &str,
        id: SyncConfigId,
        patch: SyncConfigPatch,
    ) -> impl Future<Output = Result<Option<SyncConfiguration>, SyncError>> + Send;

    /// Delete a configuration. Returns whether it existed.
    fn delete(
        &self,
        owner_id: &str,
        id: SyncConfigId,
    ) -> impl Future<Output = Result<bool, SyncError>> + Send;

    /// Record an execution by setting `last_sync_time`.
    fn touch_last_sync(
        &self,
        owner_id: &str,
        id: SyncConfigId,
    ) -> impl Future<Output = Result<Option<SyncConfiguration>, SyncError>> + Send;
}

/// Returns a timestamp strictly after `previous`.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Volatile repository keyed by owner.
///
/// Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemorySyncConfigRepository {
    configs: Arc<DashMap<String, Vec<SyncConfiguration>>>,
}

impl InMemorySyncConfigRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository over an existing backing map.
    #[must_use]
    pub fn with_backing(configs: Arc<DashMap<String, Vec<SyncConfiguration>>>) -> Self {
        Self { configs }
    }

    fn modify(
        &self,
        owner_id: &str,
        id: SyncConfigId,
        apply: impl FnOnce(&mut SyncConfiguration),
    ) -> Option<SyncConfiguration> {
        let mut entry = self.configs.get_mut(owner_id)?;
        let config = entry.iter_mut().find(|c| c.id == id)?;
        apply(config);
        Some(config.clone())
    }
}

impl SyncConfigRepository for InMemorySyncConfigRepository {
    async fn create(&self, config: SyncConfiguration) -> Result<SyncConfiguration, SyncError> {
        self.configs
            .entry(config.owner_id.clone())
            .or_default()
            .push(config.clone());
        Ok(config)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<SyncConfiguration>, SyncError> {
        Ok(self
            .configs
            .get(owner_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn find(
        &self,
        owner_id: &str,
        id: SyncConfigId,
    ) -> Result<Option<SyncConfiguration>, SyncError> {
        Ok(self
            .configs
            .get(owner_id)
            .and_then(|entry| entry.iter().find(|c| c.id == id).cloned()))
    }

    async fn update(
        &self,
        owner_id: &str,
        id: SyncConfigId,
        patch: SyncConfigPatch,
    ) -> Result<Option<SyncConfiguration>, SyncError> {
        Ok(self.modify(owner_id, id, |config| {
            if let Some(local_path) = patch.local_path {
                config.local_path = local_path;
            }
            if let Some(remote_path) = patch.remote_path {
                config.remote_path = remote_path;
            }
            if let Some(provider) = patch.provider {
                config.provider = provider;
            }
            if let Some(sync_mode) = patch.sync_mode {
                config.sync_mode = sync_mode;
            }
            if let Some(delay) = patch.delete_delay_days {
                config.delete_delay_days = delay;
            }
            if let Some(enabled) = patch.enabled {
                config.enabled = enabled;
            }
            config.updated_at = advance(config.updated_at);
        }))
    }

    async fn delete(&self, owner_id: &str, id: SyncConfigId) -> Result<bool, SyncError> {
        let Some(mut entry) = self.configs.get_mut(owner_id) else {
            return Ok(false);
        };
        let before = entry.len();
        entry.retain(|c| c.id != id);
        Ok(entry.len() < before)
    }

    async fn touch_last_sync(
        &self,
        owner_id: &str,
        id: SyncConfigId,
    ) -> Result<Option<SyncConfiguration>, SyncError> {
        Ok(self.modify(owner_id, id, |config| {
            let floor = config
                .last_sync_time
                .map_or(config.updated_at, |last| last.max(config.updated_at));
            let now = advance(floor);
            config.last_sync_time = Some(now);
            config.updated_at = now;
        }))
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), SyncError> {
    if value.trim().is_empty() {
        Err(SyncError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn parse_provider(value: &str) -> Result<CloudProvider, SyncError> {
    CloudProvider::parse(value).ok_or_else(|| SyncError::UnsupportedProvider(value.to_string()))
}

fn parse_mode(value: &str) -> Result<SyncMode, SyncError> {
    SyncMode::parse(value).ok_or_else(|| SyncError::InvalidMode(value.to_string()))
}

fn parse_delay(value: i64) -> Result<u32, SyncError> {
    if value < 0 {
        return Err(SyncError::validation("delete_delay_days must be non-negative"));
    }
    u32::try_from(value).map_err(|_| SyncError::validation("delete_delay_days is too large"))
}

/// Validating front for a [`SyncConfigRepository`].
pub struct SyncConfigService<R: SyncConfigRepository> {
    repo: Arc<R>,
}

impl<R: SyncConfigRepository> Clone for SyncConfigService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: SyncConfigRepository> SyncConfigService<R> {
    /// Create a new sync configuration service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repo)
    }

    /// Create a configuration for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is blank (`Validation`)
    /// - The provider is unknown (`UnsupportedProvider`)
    /// - The sync mode is unknown (`InvalidMode`)
    /// - `delete_delay_days` is negative (`Validation`)
    pub async fn create(
        &self,
        owner_id: &str,
        input: CreateSyncConfigInput,
    ) -> Result<SyncConfiguration, SyncError> {
        require_non_blank("local_path", &input.local_path)?;
        require_non_blank("remote_path", &input.remote_path)?;
        require_non_blank("provider", &input.provider)?;
        require_non_blank("sync_mode", &input.sync_mode)?;

        let provider = parse_provider(&input.provider)?;
        let sync_mode = parse_mode(&input.sync_mode)?;
        let delete_delay_days = input.delete_delay_days.map(parse_delay).transpose()?;

        let now = Utc::now();
        let config = SyncConfiguration {
            id: SyncConfigId::new(),
            owner_id: owner_id.to_string(),
            local_path: input.local_path,
            remote_path: input.remote_path,
            provider,
            sync_mode,
            delete_delay_days: delete_delay_days.unwrap_or(0),
            enabled: input.enabled.unwrap_or(true),
            last_sync_time: None,
            created_at: now,
            updated_at: now,
        };

        debug!(owner_id, config_id = %config.id, "creating sync configuration");
        self.repo.create(config).await
    }

    /// List the owner's configurations.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<SyncConfiguration>, SyncError> {
        self.repo.list_by_owner(owner_id).await
    }

    /// Get one configuration.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::NotFound` if the owner has no such configuration.
    pub async fn get(
        &self,
        owner_id: &str,
        id: SyncConfigId,
    ) -> Result<SyncConfiguration, SyncError> {
        self.repo
            .find(owner_id, id)
            .await?
            .ok_or_else(|| SyncError::not_found(id))
    }

    /// Merge the provided fields into a configuration.
    ///
    /// # Errors
    ///
    /// Returns the same validation errors as [`Self::create`] for the fields
    /// present, and `SyncError::NotFound` if the configuration is absent.
    pub async fn update(
        &self,
        owner_id: &str,
        id: SyncConfigId,
        input: UpdateSyncConfigInput,
    ) -> Result<SyncConfiguration, SyncError> {
        if let Some(local_path) = &input.local_path {
            require_non_blank("local_path", local_path)?;
        }
        if let Some(remote_path) = &input.remote_path {
            require_non_blank("remote_path", remote_path)?;
        }

        let patch = SyncConfigPatch {
            provider: input.provider.as_deref().map(parse_provider).transpose()?,
            sync_mode: input.sync_mode.as_deref().map(parse_mode).transpose()?,
            delete_delay_days: input.delete_delay_days.map(parse_delay).transpose()?,
            local_path: input.local_path,
            remote_path: input.remote_path,
            enabled: input.enabled,
        };

        self.repo
            .update(owner_id, id, patch)
            .await?
            .ok_or_else(|| SyncError::not_found(id))
    }

    /// Delete a configuration. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn delete(&self, owner_id: &str, id: SyncConfigId) -> Result<bool, SyncError> {
        self.repo.delete(owner_id, id).await
    }

    /// Record an execution.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::NotFound` if the configuration is absent.
    pub async fn touch_last_sync(
        &self,
        owner_id: &str,
        id: SyncConfigId,
    ) -> Result<SyncConfiguration, SyncError> {
        self.repo
            .touch_last_sync(owner_id, id)
            .await?
            .ok_or_else(|| SyncError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn service() -> SyncConfigService<InMemorySyncConfigRepository> {
        SyncConfigService::new(Arc::new(InMemorySyncConfigRepository::new()))
    }

    fn valid_input() -> CreateSyncConfigInput {
        CreateSyncConfigInput {
            local_path: "/home/ada/notes".to_string(),
            remote_path: "/Backups/Notes".to_string(),
            provider: "google".to_string(),
            sync_mode: "upload_only".to_string(),
            delete_delay_days: None,
            enabled: None,
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let config = service().create("google:1", valid_input()).await.unwrap();

        assert_eq!(config.owner_id, "google:1");
        assert_eq!(config.provider, CloudProvider::Google);
        assert_eq!(config.sync_mode, SyncMode::UploadOnly);
        assert_eq!(config.delete_delay_days, 0);
        assert!(config.enabled);
        assert!(config.last_sync_time.is_none());
        assert_eq!(config.created_at, config.updated_at);
    }

    #[rstest]
    #[case::blank_local(|i: &mut CreateSyncConfigInput| i.local_path = "  ".into(), "VALIDATION")]
    #[case::blank_remote(|i: &mut CreateSyncConfigInput| i.remote_path = String::new(), "VALIDATION")]
    #[case::missing_provider(|i: &mut CreateSyncConfigInput| i.provider = String::new(), "VALIDATION")]
    #[case::unknown_provider(|i: &mut CreateSyncConfigInput| i.provider = "dropbox".into(), "PROVIDER")]
    #[case::unknown_mode(|i: &mut CreateSyncConfigInput| i.sync_mode = "mirror".into(), "MODE")]
    #[case::negative_delay(|i: &mut CreateSyncConfigInput| i.delete_delay_days = Some(-1), "VALIDATION")]
    #[tokio::test]
    async fn test_create_validation(
        #[case] mutate: fn(&mut CreateSyncConfigInput),
        #[case] expected: &str,
    ) {
        let mut input = valid_input();
        mutate(&mut input);

        let err = service().create("google:1", input).await.unwrap_err();
        let kind = match err {
            SyncError::Validation(_) => "VALIDATION",
            SyncError::UnsupportedProvider(_) => "PROVIDER",
            SyncError::InvalidMode(_) => "MODE",
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(kind, expected);
    }

    #[tokio::test]
    async fn test_owner_isolation() {
        let service = service();
        let config = service.create("google:1", valid_input()).await.unwrap();

        assert!(matches!(
            service.get("google:2", config.id).await,
            Err(SyncError::NotFound(_))
        ));
        assert!(service.list("google:2").await.unwrap().is_empty());
        assert!(!service.delete("google:2", config.id).await.unwrap());
        assert!(
            service
                .update("google:2", config.id, UpdateSyncConfigInput::default())
                .await
                .is_err()
        );
        assert!(service.get("google:1", config.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let service = service();
        let first = service.create("o", valid_input()).await.unwrap();
        let second = service.create("o", valid_input()).await.unwrap();

        let ids: Vec<_> = service.list("o").await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update_merges_and_refreshes_updated_at() {
        let service = service();
        let config = service.create("o", valid_input()).await.unwrap();

        let updated = service
            .update(
                "o",
                config.id,
                UpdateSyncConfigInput {
                    sync_mode: Some("two_way".to_string()),
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.sync_mode, SyncMode::TwoWay);
        assert!(!updated.enabled);
        assert_eq!(updated.remote_path, config.remote_path);
        assert!(updated.updated_at > config.created_at);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_fields() {
        let service = service();
        let config = service.create("o", valid_input()).await.unwrap();

        let bad_mode = UpdateSyncConfigInput {
            sync_mode: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update("o", config.id, bad_mode).await,
            Err(SyncError::InvalidMode(_))
        ));

        let bad_delay = UpdateSyncConfigInput {
            delete_delay_days: Some(-3),
            ..Default::default()
        };
        assert!(matches!(
            service.update("o", config.id, bad_delay).await,
            Err(SyncError::Validation(_))
        ));

        // Nothing was applied.
        let unchanged = service.get("o", config.id).await.unwrap();
        assert_eq!(unchanged, config);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let service = service();
        let config = service.create("o", valid_input()).await.unwrap();

        assert!(service.delete("o", config.id).await.unwrap());
        assert!(!service.delete("o", config.id).await.unwrap());
        assert!(service.get("o", config.id).await.is_err());
    }

    #[tokio::test]
    async fn test_touch_last_sync_is_strictly_increasing() {
        let service = service();
        let config = service.create("o", valid_input()).await.unwrap();

        let first = service.touch_last_sync("o", config.id).await.unwrap();
        let second = service.touch_last_sync("o", config.id).await.unwrap();

        let t1 = first.last_sync_time.unwrap();
        let t2 = second.last_sync_time.unwrap();
        assert!(t1 > config.created_at);
        assert!(t2 > t1);
    }

    #[tokio::test]
    async fn test_shared_backing_map() {
        let backing = Arc::new(DashMap::new());
        let a = InMemorySyncConfigRepository::with_backing(Arc::clone(&backing));
        let b = InMemorySyncConfigRepository::with_backing(Arc::clone(&backing));

        let config = SyncConfigService::new(Arc::new(a))
            .create("o", valid_input())
            .await
            .unwrap();
        assert!(b.find("o", config.id).await.unwrap().is_some());
    }
}
