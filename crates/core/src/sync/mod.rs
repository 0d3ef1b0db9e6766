//! Sync configurations and their execution.

pub mod error;
pub mod executor;
pub mod store;
pub mod types;


pub use error::SyncError;
pub use executor::{CredentialSupplier, ExecutorSettings, SyncExecutor};
pub use store::{InMemorySyncConfigRepository, SyncConfigRepository, SyncConfigService};
pub use types::{
    CreateSyncConfigInput, DownloadedFile, SyncConfigPatch, SyncConfiguration, SyncFile,
    SyncItemError, SyncMode, SyncOutcome, SyncResult, UpdateSyncConfigInput,
};
