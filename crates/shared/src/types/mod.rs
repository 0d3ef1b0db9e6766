//! Common types used across the application.

pub mod id;
pub mod provider;

#[cfg(test)]
mod id_tests;

pub use id::*;
pub use provider::CloudProvider;
