//! Shared types, errors, and configuration for CloudSync.
//!
//! This crate provides common types used across all other crates:
//! - Cloud provider tags and typed IDs
//! - Application-wide error taxonomy
//! - Signed session tokens and their claims
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod types;


pub use auth::SessionClaims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::{SessionConfig, SessionError, SessionService};
pub use types::{CloudProvider, SyncConfigId};
