//! Authentication types for session tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CloudProvider;

/// Claims carried by a session token.
///
/// The provider access token rides along so that drive operations can be
/// performed on behalf of the session owner without server-side state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (owner ID, `<provider>:<account id>`).
    pub sub: String,
    /// Provider the session was established with.
    pub provider: CloudProvider,
    /// Bearer credential for the provider API.
    pub access_token: String,
    /// Display name reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl SessionClaims {
    /// Creates new claims for an authenticated provider account.
    #[must_use]
    pub fn new(
        provider: CloudProvider,
        account_id: &str,
        access_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: owner_id(provider, account_id),
            provider,
            access_token: access_token.into(),
            name: None,
            email: None,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Attaches profile details.
    #[must_use]
    pub fn with_profile(mut self, name: Option<String>, email: Option<String>) -> Self {
        self.name = name;
        self.email = email;
        self
    }

    /// Returns the owner ID used to scope sync configurations.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.sub
    }
}

/// Builds the owner ID for a provider account.
#[must_use]
pub fn owner_id(provider: CloudProvider, account_id: &str) -> String {
    format!("{provider}:{account_id}")
}

/// Request to open a session from a provider access token.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    /// Provider tag (`google` or `microsoft`).
    pub provider: String,
    /// OAuth access token issued by the provider.
    pub access_token: String,
}

/// Session user info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    /// Owner ID.
    pub id: String,
    /// Provider tag.
    pub provider: CloudProvider,
    /// Display name.
    pub display_name: Option<String>,
    /// Email.
    pub email: Option<String>,
}

impl From<&SessionClaims> for SessionUser {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            id: claims.sub.clone(),
            provider: claims.provider,
            display_name: claims.name.clone(),
            email: claims.email.clone(),
        }
    }
}

/// Response after a session has been opened.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// Signed session token, sent back as `Authorization: Bearer`.
    pub session_token: String,
    /// Session lifetime in seconds.
    pub expires_in: i64,
    /// Authenticated user.
    pub user: SessionUser,
}
