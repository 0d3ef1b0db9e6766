//! The capability set every drive adapter offers.

use std::future::Future;

use cloudsync_shared::CloudProvider;

use super::error::DriveError;
use super::path::normalize_folder_path;
use super::types::{FileDescriptor, FolderDescriptor};

/// Remote file operations against one provider account.
///
/// Implemented by each vendor adapter and by [`super::DriveClient`], which
/// dispatches on the provider.
pub trait DriveProvider: Send + Sync {
    /// Provider this adapter talks to.
    fn provider(&self) -> CloudProvider;

    /// Uploads a file to the drive root.
    fn upload(
        &self,
        name: &str,
        content: &str,
    ) -> impl Future<Output = Result<FileDescriptor, DriveError>> + Send;

    /// Downloads a file's content by ID.
    fn download(&self, file_id: &str) -> impl Future<Output = Result<String, DriveError>> + Send;

    /// Downloads a file's content by name.
    fn download_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<String, DriveError>> + Send;

    /// Lists recent files, optionally filtered by a name search.
    fn list(
        &self,
        query: Option<&str>,
        page_size: Option<u32>,
    ) -> impl Future<Output = Result<Vec<FileDescriptor>, DriveError>> + Send;

    /// Deletes a file by ID.
    fn delete(&self, file_id: &str) -> impl Future<Output = Result<(), DriveError>> + Send;

    /// Fetches metadata for a file by ID.
    fn metadata(
        &self,
        file_id: &str,
    ) -> impl Future<Output = Result<FileDescriptor, DriveError>> + Send;

    /// Looks up a folder by normalized path.
    fn find_folder(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Option<FolderDescriptor>, DriveError>> + Send;

    /// Creates a folder for a normalized path.
    fn create_folder(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<FolderDescriptor, DriveError>> + Send;

    /// Uploads a file into a folder.
    fn upload_into_folder(
        &self,
        folder_id: &str,
        name: &str,
        content: &str,
    ) -> impl Future<Output = Result<FileDescriptor, DriveError>> + Send;

    /// Lists the children of a folder.
    fn list_in_folder(
        &self,
        folder_id: &str,
        page_size: Option<u32>,
    ) -> impl Future<Output = Result<Vec<FileDescriptor>, DriveError>> + Send;

    /// Returns the folder at `path`, creating it when absent.
    ///
    /// The path is normalized and validated before any vendor call. Two
    /// concurrent resolvers may both miss the lookup and create duplicates.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Validation` for malformed paths and the vendor
    /// error of the lookup or creation otherwise.
    fn resolve_or_create_folder(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<FolderDescriptor, DriveError>> + Send {
        async move {
            let normalized = normalize_folder_path(path)?;
            if let Some(folder) = self.find_folder(&normalized).await? {
                return Ok(folder);
            }
            self.create_folder(&normalized).await
        }
    }
}
