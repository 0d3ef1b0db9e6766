//! Google Drive v3 adapter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use cloudsync_shared::CloudProvider;

use super::config::DriveEndpoints;
use super::error::DriveError;
use super::http::{self, ErrorKind};
use super::path::{content_mime, validate_file_name};
use super::provider::DriveProvider;
use super::types::{AccountProfile, FileDescriptor, FolderDescriptor};
use super::{DEFAULT_FOLDER_PAGE_SIZE, DEFAULT_LIST_PAGE_SIZE};

const FILE_FIELDS: &str = "id,name,mimeType,createdTime,modifiedTime,size,webViewLink";
const LIST_FIELDS: &str = "files(id,name,mimeType,createdTime,modifiedTime,size,webViewLink)";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Picks a multipart boundary that does not occur in `content`.
fn multipart_boundary(content: &str) -> String {
    loop {
        let boundary = format!("cloudsync-{}", Uuid::new_v4().simple());
        if !content.contains(&boundary) {
            return boundary;
        }
    }
}

/// Drive v3 file resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleFile {
    id: String,
    name: String,
    mime_type: Option<String>,
    created_time: Option<DateTime<Utc>>,
    modified_time: Option<DateTime<Utc>>,
    /// Drive reports sizes as decimal strings.
    size: Option<String>,
    web_view_link: Option<String>,
}

impl From<GoogleFile> for FileDescriptor {
    fn from(file: GoogleFile) -> Self {
        let is_folder = file.mime_type.as_deref() == Some(FOLDER_MIME);
        Self {
            id: file.id,
            name: file.name,
            size: file.size.and_then(|s| s.parse().ok()),
            created_at: file.created_time,
            modified_at: file.modified_time,
            web_url: file.web_view_link,
            mime_type: file.mime_type,
            is_folder,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleFileList {
    #[serde(default)]
    files: Vec<GoogleFile>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
}

/// Escapes a literal for use inside a single-quoted `q` term.
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Google Drive client bound to one access token.
#[derive(Debug, Clone)]
pub struct GoogleDriveClient {
    http: reqwest::Client,
    endpoints: Arc<DriveEndpoints>,
    token: String,
}

impl GoogleDriveClient {
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

    fn file_url(&self, file_id: &str) -> String {
        format!(
            "{}/files/{}",
            self.endpoints.google_api_base,
            urlencoding::encode(file_id)
        )
    }

    /// Runs a `files.list` query ordered by recency.
    async fn search(
        &self,
        q: &str,
        page_size: u32,
        fields: &str,
        kind: ErrorKind,
    ) -> Result<Vec<GoogleFile>, DriveError> {
        let page_size = page_size.to_string();
        let request = self
            .http
            .get(format!("{}/files", self.endpoints.google_api_base))
            .query(&[
                ("q", q),
                ("pageSize", page_size.as_str()),
                ("orderBy", "modifiedTime desc"),
                ("fields", fields),
            ]);
        let response = http::send(request, &self.token, kind).await?;
        let list: GoogleFileList = http::json(response, kind).await?;
        Ok(list.files)
    }

    /// Creates a file with a `multipart/related` upload.
    async fn create_file(
        &self,
        metadata: serde_json::Value,
        mime: &str,
        content: &str,
    ) -> Result<FileDescriptor, DriveError> {
        let boundary = multipart_boundary(content);
        let body = format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n\
             --{boundary}\r\nContent-Type: {mime}\r\n\r\n{content}\r\n--{boundary}--"
        );
        let request = self
            .http
            .post(format!("{}/files", self.endpoints.google_upload_base))
            .query(&[("uploadType", "multipart"), ("fields", FILE_FIELDS)])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body);

        let response = http::send(request, &self.token, DriveError::Upload).await?;
        let file: GoogleFile = http::json(response, DriveError::Upload).await?;
        Ok(file.into())
    }

    /// Fetches the account behind the token from the userinfo endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Unauthorized` if Google rejects the token.
    pub async fn account_profile(&self) -> Result<AccountProfile, DriveError> {
        let request = self.http.get(&self.endpoints.google_userinfo_url);
        let response = http::send(request, &self.token, DriveError::Transport).await?;
        let info: GoogleUserInfo = http::json(response, DriveError::Transport).await?;
        Ok(AccountProfile {
            id: info.sub,
            display_name: info.name,
            email: info.email,
        })
    }
}

impl DriveProvider for GoogleDriveClient {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Google
    }

    async fn upload(&self, name: &str, content: &str) -> Result<FileDescriptor, DriveError> {
        debug!(name, "uploading to google drive root");
        let mime = content_mime(name);
        self.create_file(json!({ "name": name, "mimeType": mime }), mime, content)
            .await
    }

    async fn download(&self, file_id: &str) -> Result<String, DriveError> {
        let request = self
            .http
            .get(self.file_url(file_id))
            .query(&[("alt", "media")]);
        let response = http::send(request, &self.token, DriveError::Download).await?;
        http::text(response, DriveError::Download).await
    }

    async fn download_by_name(&self, name: &str) -> Result<String, DriveError> {
        let q = format!("name='{}' and trashed=false", escape_query(name));
        let matches = self.search(&q, 1, "files(id,name)", DriveError::Download).await?;
        let file = matches
            .into_iter()
            .next()
            .ok_or_else(|| DriveError::not_found(name))?;
        self.download(&file.id).await
    }

    async fn list(
        &self,
        query: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Vec<FileDescriptor>, DriveError> {
        let q = match query {
            Some(term) if !term.is_empty() => {
                format!("name contains '{}' and trashed=false", escape_query(term))
            }
            _ => "trashed=false".to_string(),
        };
        let files = self
            .search(
                &q,
                page_size.unwrap_or(DEFAULT_LIST_PAGE_SIZE),
                LIST_FIELDS,
                DriveError::List,
            )
            .await?;
        Ok(files.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, file_id: &str) -> Result<(), DriveError> {
        let request = self.http.delete(self.file_url(file_id));
        http::send(request, &self.token, DriveError::Delete).await?;
        Ok(())
    }

    async fn metadata(&self, file_id: &str) -> Result<FileDescriptor, DriveError> {
        let request = self
            .http
            .get(self.file_url(file_id))
            .query(&[("fields", FILE_FIELDS)]);
        let response = http::send(request, &self.token, DriveError::Metadata).await?;
        let file: GoogleFile = http::json(response, DriveError::Metadata).await?;
        Ok(file.into())
    }

    async fn find_folder(&self, path: &str) -> Result<Option<FolderDescriptor>, DriveError> {
        let q = format!(
            "name='{}' and mimeType='{FOLDER_MIME}' and trashed=false",
            escape_query(path)
        );
        let folders = self.search(&q, 1, "files(id,name)", DriveError::Folder).await?;
        Ok(folders
            .into_iter()
            .next()
            .map(|f| FolderDescriptor::new(f.id, f.name)))
    }

    async fn create_folder(&self, path: &str) -> Result<FolderDescriptor, DriveError> {
        debug!(path, "creating google drive folder");
        let request = self
            .http
            .post(format!("{}/files", self.endpoints.google_api_base))
            .query(&[("fields", "id,name")])
            .json(&json!({ "name": path, "mimeType": FOLDER_MIME }));
        let response = http::send(request, &self.token, DriveError::Folder).await?;
        let folder: GoogleFile = http::json(response, DriveError::Folder).await?;
        Ok(FolderDescriptor::new(folder.id, folder.name))
    }

    async fn upload_into_folder(
        &self,
        folder_id: &str,
        name: &str,
        content: &str,
    ) -> Result<FileDescriptor, DriveError> {
        let name = validate_file_name(name)?;
        let mime = content_mime(name);
        self.create_file(
            json!({ "name": name, "parents": [folder_id], "mimeType": mime }),
            mime,
            content,
        )
        .await
    }

    async fn list_in_folder(
        &self,
        folder_id: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<FileDescriptor>, DriveError> {
        let q = format!("'{}' in parents and trashed=false", escape_query(folder_id));
        let files = self
            .search(
                &q,
                page_size.unwrap_or(DEFAULT_FOLDER_PAGE_SIZE),
                LIST_FIELDS,
                DriveError::List,
            )
            .await?;
        Ok(files.into_iter().map(Into::into).collect())
    }
}
