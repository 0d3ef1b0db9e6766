//! Cloud drive adapters.
//!
//! Each vendor API is wrapped behind [`DriveProvider`], a uniform set of
//! file operations. Clients are built per request from a bearer token:
//!
//! ```text
//! DriveClientFactory::connect(provider, token)
//!         │
//!         ▼
//!   DriveClient ──► GoogleDriveClient (Drive v3)
//!               └─► OneDriveClient    (Microsoft Graph)
//! ```

mod client;
mod config;
mod error;
mod google;
mod http;
mod onedrive;
pub mod path;
mod provider;
mod types;

pub use client::{DriveClient, DriveClientFactory, DriveResolver};
pub use config::{DriveEndpoints, build_http_client};
pub use error::DriveError;
pub use google::GoogleDriveClient;
pub use onedrive::OneDriveClient;
pub use provider::DriveProvider;
pub use types::{AccountProfile, FileDescriptor, FolderDescriptor};

/// Default page size for root listings.
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 10;

/// Default page size for folder listings.
pub const DEFAULT_FOLDER_PAGE_SIZE: u32 = 100;
