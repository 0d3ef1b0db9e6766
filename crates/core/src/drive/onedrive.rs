//! Microsoft Graph (OneDrive) adapter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use cloudsync_shared::CloudProvider;

use super::config::DriveEndpoints;
use super::error::DriveError;
use super::http::{self, ErrorKind};
use super::path::{content_mime, encode_path, split_parent, validate_file_name};
use super::provider::DriveProvider;
use super::types::{AccountProfile, FileDescriptor, FolderDescriptor};
use super::{DEFAULT_FOLDER_PAGE_SIZE, DEFAULT_LIST_PAGE_SIZE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveItem {
    id: String,
    name: String,
    size: Option<u64>,
    created_date_time: Option<DateTime<Utc>>,
    last_modified_date_time: Option<DateTime<Utc>>,
    web_url: Option<String>,
    file: Option<FileFacet>,
    folder: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileFacet {
    mime_type: Option<String>,
}

impl From<DriveItem> for FileDescriptor {
    fn from(item: DriveItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            size: item.size,
            created_at: item.created_date_time,
            modified_at: item.last_modified_date_time,
            web_url: item.web_url,
            mime_type: item.file.and_then(|f| f.mime_type),
            is_folder: item.folder.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DriveItemList {
    #[serde(default)]
    value: Vec<DriveItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphUser {
    id: String,
    display_name: Option<String>,
    mail: Option<String>,
    user_principal_name: Option<String>,
}

/// Quotes a literal for an OData function argument.
fn odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// OneDrive client bound to one access token.
#[derive(Debug, Clone)]
pub struct OneDriveClient {
    http: reqwest::Client,
    endpoints: Arc<DriveEndpoints>,
    token: String,
}

impl OneDriveClient {
    /// Create a client for the given access token.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        endpoints: Arc<DriveEndpoints>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoints,
            token: token.into(),
        }
    }

    fn drive_url(&self, rest: &str) -> String {
        format!("{}/me/drive/{rest}", self.endpoints.graph_base)
    }

    fn item_url(&self, item_id: &str, rest: &str) -> String {
        self.drive_url(&format!("items/{}{rest}", urlencoding::encode(item_id)))
    }

    async fn fetch_items(
        &self,
        url: String,
        page_size: u32,
        kind: ErrorKind,
    ) -> Result<Vec<FileDescriptor>, DriveError> {
        let top = page_size.to_string();
        let request = self.http.get(url).query(&[("$top", top.as_str())]);
        let response = http::send(request, &self.token, kind).await?;
        let list: DriveItemList = http::json(response, kind).await?;

        // Most recently modified first.
        let mut files: Vec<FileDescriptor> = list
            .value
            .into_iter()
            .take(page_size as usize)
            .map(Into::into)
            .collect();
        files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(files)
    }

    async fn put_content(
        &self,
        url: String,
        name: &str,
        content: &str,
    ) -> Result<FileDescriptor, DriveError> {
        let request = self
            .http
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_mime(name))
            .body(content.to_owned());
        let response = http::send(request, &self.token, DriveError::Upload).await?;
        let item: DriveItem = http::json(response, DriveError::Upload).await?;
        Ok(item.into())
    }

    async fn create_child(
        &self,
        parent_id: Option<&str>,
        name: &str,
    ) -> Result<FolderDescriptor, DriveError> {
        let url = match parent_id {
            Some(id) => self.item_url(id, "/children"),
            None => self.drive_url("root/children"),
        };
        let request = self.http.post(url).json(&json!({
            "name": name,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "rename"
        }));
        let response = http::send(request, &self.token, DriveError::Folder).await?;
        let item: DriveItem = http::json(response, DriveError::Folder).await?;
        Ok(FolderDescriptor::new(item.id, item.name))
    }

    /// Returns the ID of the folder at `path`, creating missing segments
    /// from the root down.
    async fn ensure_folder(&self, path: &str) -> Result<String, DriveError> {
        let mut parent_id: Option<String> = None;
        let mut prefix = String::new();
        let mut missing = false;

        for segment in path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            // Below a created segment nothing can exist yet.
            let existing = if missing {
                None
            } else {
                self.find_folder(&prefix).await?
            };
            let id = match existing {
                Some(folder) => folder.id,
                None => {
                    missing = true;
                    debug!(path = %prefix, "creating missing onedrive parent folder");
                    self.create_child(parent_id.as_deref(), segment).await?.id
                }
            };
            parent_id = Some(id);
        }

        parent_id.ok_or_else(|| DriveError::validation("folder path is empty"))
    }

    /// Fetches the signed-in user from Graph `/me`.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Unauthorized` if Graph rejects the token.
    pub async fn account_profile(&self) -> Result<AccountProfile, DriveError> {
        let request = self.http.get(format!("{}/me", self.endpoints.graph_base));
        let response = http::send(request, &self.token, DriveError::Transport).await?;
        let user: GraphUser = http::json(response, DriveError::Transport).await?;
        Ok(AccountProfile {
            id: user.id,
            display_name: user.display_name,
            email: user.mail.or(user.user_principal_name),
        })
    }
}

impl DriveProvider for OneDriveClient {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Microsoft
    }

    async fn upload(&self, name: &str, content: &str) -> Result<FileDescriptor, DriveError> {
        debug!(name, "uploading to onedrive root");
        let url = self.drive_url(&format!("root:/{}:/content", urlencoding::encode(name)));
        self.put_content(url, name, content).await
    }

    async fn download(&self, file_id: &str) -> Result<String, DriveError> {
        let request = self.http.get(self.item_url(file_id, "/content"));
        let response = http::send(request, &self.token, DriveError::Download).await?;
        http::text(response, DriveError::Download).await
    }

    async fn download_by_name(&self, name: &str) -> Result<String, DriveError> {
        let request = self.http.get(
            self.drive_url(&format!("root:/{}:/content", urlencoding::encode(name))),
        );
        let response = http::send(request, &self.token, DriveError::Download).await?;
        http::text(response, DriveError::Download).await
    }

    async fn list(
        &self,
        query: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Vec<FileDescriptor>, DriveError> {
        let url = match query {
            Some(term) if !term.is_empty() => self.drive_url(&format!(
                "root/search(q='{}')",
                urlencoding::encode(&odata_literal(term))
            )),
            _ => self.drive_url("root/children"),
        };
        self.fetch_items(url, page_size.unwrap_or(DEFAULT_LIST_PAGE_SIZE), DriveError::List)
            .await
    }

    async fn delete(&self, file_id: &str) -> Result<(), DriveError> {
        let request = self.http.delete(self.item_url(file_id, ""));
        http::send(request, &self.token, DriveError::Delete).await?;
        Ok(())
    }

    async fn metadata(&self, file_id: &str) -> Result<FileDescriptor, DriveError> {
        let request = self.http.get(self.item_url(file_id, ""));
        let response = http::send(request, &self.token, DriveError::Metadata).await?;
        let item: DriveItem = http::json(response, DriveError::Metadata).await?;
        Ok(item.into())
    }

    async fn find_folder(&self, path: &str) -> Result<Option<FolderDescriptor>, DriveError> {
        let request = self
            .http
            .get(self.drive_url(&format!("root:/{}", encode_path(path))));
        let Some(response) = http::send_optional(request, &self.token, DriveError::Folder).await?
        else {
            return Ok(None);
        };
        let item: DriveItem = http::json(response, DriveError::Folder).await?;
        Ok(item
            .folder
            .is_some()
            .then(|| FolderDescriptor::new(item.id, item.name)))
    }

    async fn create_folder(&self, path: &str) -> Result<FolderDescriptor, DriveError> {
        debug!(path, "creating onedrive folder");
        let (parent, leaf) = split_parent(path);
        let parent_id = match parent {
            Some(parent) => Some(self.ensure_folder(parent).await?),
            None => None,
        };
        self.create_child(parent_id.as_deref(), leaf).await
    }

    async fn upload_into_folder(
        &self,
        folder_id: &str,
        name: &str,
        content: &str,
    ) -> Result<FileDescriptor, DriveError> {
        let name = validate_file_name(name)?;
        let url = self.item_url(
            folder_id,
            &format!(":/{}:/content", urlencoding::encode(name)),
        );
        self.put_content(url, name, content).await
    }

    async fn list_in_folder(
        &self,
        folder_id: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<FileDescriptor>, DriveError> {
        self.fetch_items(
            self.item_url(folder_id, "/children"),
            page_size.unwrap_or(DEFAULT_FOLDER_PAGE_SIZE),
            DriveError::List,
        )
        .await
    }
}
