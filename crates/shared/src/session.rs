//! Session token generation and validation.
//!
//! Sessions are stateless HS256 JWTs wrapping [`SessionClaims`].

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::SessionClaims;
use crate::types::CloudProvider;

/// Session token configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Session lifetime in seconds.
    pub expires_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expires_secs: 86400,
        }
    }
}

/// Errors that can occur during session token operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Token encoding failed.
    #[error("failed to encode session token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode session token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("session has expired")]
    Expired,
}

/// Session service for token operations.
#[derive(Clone)]
pub struct SessionService {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("expires_secs", &self.config.expires_secs)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl SessionService {
    /// Creates a new session service with the given configuration.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Builds claims for a provider account, expiring after the configured lifetime.
    #[must_use]
    pub fn claims_for(
        &self,
        provider: CloudProvider,
        account_id: &str,
        access_token: impl Into<String>,
    ) -> SessionClaims {
        let expires_at = Utc::now() + Duration::seconds(self.config.expires_secs);
        SessionClaims::new(provider, account_id, access_token, expires_at)
    }

    /// Signs claims into a session token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EncodingError` if token generation fails.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| SessionError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a session token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Expired` if the token has expired.
    /// Returns `SessionError::DecodingError` if the token is malformed or forged.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = Validation::default();

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::DecodingError(e.to_string()),
            })
    }

    /// Returns the session lifetime in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.config.expires_secs
    }
}
