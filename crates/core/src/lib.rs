//! Core sync logic for CloudSync.
//!
//! This crate contains the drive adapters and the sync engine with ZERO web
//! framework dependencies.
//!
//! # Modules
//!
//! - `drive` - Provider adapters for Google Drive and OneDrive
//! - `sync` - Sync configurations, their store and the executor

pub mod drive;
pub mod sync;
