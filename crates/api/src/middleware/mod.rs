//! Request middleware and extractors.

pub mod auth;

pub use auth::{AuthSession, session_middleware};
