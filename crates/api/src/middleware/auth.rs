//! Session middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use cloudsync_core::sync::CredentialSupplier;
use cloudsync_shared::{AppError, CloudProvider, SessionClaims};

use crate::AppState;
use crate::error::ApiError;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Returns the bearer token of a request, if any.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
}

/// Session middleware that validates session tokens.
///
/// Valid claims are stored in request extensions for [`AuthSession`].
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ApiError(AppError::Unauthorized(
            "Authorization header with Bearer session token is required".to_string(),
        ))
        .into_response();
    };

    match state.sessions.validate(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extractor for the authenticated session.
///
/// ```ignore
/// async fn handler(session: AuthSession) -> impl IntoResponse {
///     let owner = session.owner_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionClaims);

impl AuthSession {
    /// Returns the owner ID of the session.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        self.0.owner_id()
    }

    /// Returns the provider the session was opened with.
    #[must_use]
    pub fn provider(&self) -> CloudProvider {
        self.0.provider
    }

    /// Returns the provider access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.0.access_token
    }

    /// Returns the inner claims.
    #[must_use]
    pub fn claims(&self) -> &SessionClaims {
        &self.0
    }
}

impl CredentialSupplier for AuthSession {
    fn credential(&self, owner_id: &str, provider: CloudProvider) -> Option<String> {
        (owner_id == self.owner_id() && provider == self.provider())
            .then(|| self.0.access_token.clone())
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(AuthSession)
            .ok_or_else(|| ApiError(AppError::Unauthorized("no active session".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(provider: CloudProvider) -> AuthSession {
        AuthSession(SessionClaims::new(
            provider,
            "42",
            "provider-token",
            Utc::now() + Duration::hours(1),
        ))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_credential_only_for_matching_provider() {
        let session = session(CloudProvider::Google);

        assert_eq!(
            session.credential("google:42", CloudProvider::Google).as_deref(),
            Some("provider-token")
        );
        assert!(session.credential("google:42", CloudProvider::Microsoft).is_none());
        assert!(session.credential("google:7", CloudProvider::Google).is_none());
    }
}
