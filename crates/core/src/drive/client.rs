//! Provider dispatch and client construction.

use std::sync::Arc;

use cloudsync_shared::CloudProvider;

use super::config::DriveEndpoints;
use super::error::DriveError;
use super::google::GoogleDriveClient;
use super::onedrive::OneDriveClient;
use super::provider::DriveProvider;
use super::types::{AccountProfile, FileDescriptor, FolderDescriptor};

/// A drive client for any supported provider.
#[derive(Debug, Clone)]
pub enum DriveClient {
    /// Google Drive.
    Google(GoogleDriveClient),
    /// Microsoft OneDrive.
    OneDrive(OneDriveClient),
}

macro_rules! dispatch {
    ($self:ident, $client:ident => $call:expr) => {
        match $self {
            DriveClient::Google($client) => $call,
            DriveClient::OneDrive($client) => $call,
        }
    };
}

impl DriveClient {
    /// Fetches the account behind the client's token.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Unauthorized` if the provider rejects the token.
    pub async fn account_profile(&self) -> Result<AccountProfile, DriveError> {
        dispatch!(self, c => c.account_profile().await)
    }
}

impl DriveProvider for DriveClient {
    fn provider(&self) -> CloudProvider {
        dispatch!(self, c => c.provider())
    }

    async fn upload(&self, name: &str, content: &str) -> Result<FileDescriptor, DriveError> {
        dispatch!(self, c => c.upload(name, content).await)
    }

    async fn download(&self, file_id: &str) -> Result<String, DriveError> {
        dispatch!(self, c => c.download(file_id).await)
    }

    async fn download_by_name(&self, name: &str) -> Result<String, DriveError> {
        dispatch!(self, c => c.download_by_name(name).await)
    }

    async fn list(
        &self,
        query: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Vec<FileDescriptor>, DriveError> {
        dispatch!(self, c => c.list(query, page_size).await)
    }

    async fn delete(&self, file_id: &str) -> Result<(), DriveError> {
        dispatch!(self, c => c.delete(file_id).await)
    }

    async fn metadata(&self, file_id: &str) -> Result<FileDescriptor, DriveError> {
        dispatch!(self, c => c.metadata(file_id).await)
    }

    async fn find_folder(&self, path: &str) -> Result<Option<FolderDescriptor>, DriveError> {
        dispatch!(self, c => c.find_folder(path).await)
    }

    async fn create_folder(&self, path: &str) -> Result<FolderDescriptor, DriveError> {
        dispatch!(self, c => c.create_folder(path).await)
    }

    async fn upload_into_folder(
        &self,
        folder_id: &str,
        name: &str,
        content: &str,
    ) -> Result<FileDescriptor, DriveError> {
        dispatch!(self, c => c.upload_into_folder(folder_id, name, content).await)
    }

    async fn list_in_folder(
        &self,
        folder_id: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<FileDescriptor>, DriveError> {
        dispatch!(self, c => c.list_in_folder(folder_id, page_size).await)
    }
}

/// Produces a [`DriveProvider`] for a provider and bearer token.
pub trait DriveResolver: Send + Sync {
    /// Client type handed out.
    type Client: DriveProvider;

    /// Whether this resolver can serve `provider`.
    fn supports(&self, provider: CloudProvider) -> bool;

    /// Builds a client, or `None` when the provider is unsupported.
    fn connect(&self, provider: CloudProvider, token: &str) -> Option<Self::Client>;
}

/// Builds [`DriveClient`]s sharing one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct DriveClientFactory {
    http: reqwest::Client,
    endpoints: Arc<DriveEndpoints>,
    enabled: Vec<CloudProvider>,
}

impl DriveClientFactory {
    /// Create a factory with every provider enabled.
    #[must_use]
    pub fn new(http: reqwest::Client, endpoints: DriveEndpoints) -> Self {
        Self {
            http,
            endpoints: Arc::new(endpoints),
            enabled: CloudProvider::ALL.to_vec(),
        }
    }

    /// Restrict the factory to the given providers.
    #[must_use]
    pub fn with_enabled(mut self, providers: impl IntoIterator<Item = CloudProvider>) -> Self {
        self.enabled = providers.into_iter().collect();
        self
    }
}

impl DriveResolver for DriveClientFactory {
    type Client = DriveClient;

    fn supports(&self, provider: CloudProvider) -> bool {
        self.enabled.contains(&provider)
    }

    fn connect(&self, provider: CloudProvider, token: &str) -> Option<DriveClient> {
        if !self.supports(provider) {
            return None;
        }
        let client = match provider {
            CloudProvider::Google => DriveClient::Google(GoogleDriveClient::new(
                self.http.clone(),
                Arc::clone(&self.endpoints),
                token,
            )),
            CloudProvider::Microsoft => DriveClient::OneDrive(OneDriveClient::new(
                self.http.clone(),
                Arc::clone(&self.endpoints),
                token,
            )),
        };
        Some(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> DriveClientFactory {
        DriveClientFactory::new(reqwest::Client::new(), DriveEndpoints::default())
    }

    #[test]
    fn test_connect_picks_variant() {
        let factory = factory();
        let google = factory.connect(CloudProvider::Google, "t").unwrap();
        let onedrive = factory.connect(CloudProvider::Microsoft, "t").unwrap();

        assert!(matches!(google, DriveClient::Google(_)));
        assert_eq!(onedrive.provider(), CloudProvider::Microsoft);
    }

    #[test]
    fn test_disabled_provider_is_unsupported() {
        let factory = factory().with_enabled([CloudProvider::Google]);

        assert!(factory.supports(CloudProvider::Google));
        assert!(!factory.supports(CloudProvider::Microsoft));
        assert!(factory.connect(CloudProvider::Microsoft, "t").is_none());
    }
}
