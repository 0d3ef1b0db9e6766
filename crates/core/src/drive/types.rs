//! Provider-neutral descriptors returned by drive adapters.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A remote file or folder as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    /// Provider-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Size in bytes, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Browser link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Whether the item is a folder.
    pub is_folder: bool,
}

impl FileDescriptor {
    /// Creates a bare file descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: None,
            created_at: None,
            modified_at: None,
            web_url: None,
            mime_type: None,
            is_folder: false,
        }
    }
}

/// A resolved remote folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderDescriptor {
    /// Provider-assigned identifier.
    pub id: String,
    /// Folder name.
    pub name: String,
}

impl FolderDescriptor {
    /// Creates a folder descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Identity of the account behind a provider token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountProfile {
    /// Stable account identifier.
    pub id: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
}
