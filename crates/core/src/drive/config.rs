//! Vendor endpoint configuration.

use std::time::Duration;

/// Base URLs for the vendor APIs.
///
/// Overridable so adapters can be pointed at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEndpoints {
    /// Drive v3 metadata API base.
    pub google_api_base: String,
    /// Drive v3 media upload base.
    pub google_upload_base: String,
    /// OpenID userinfo endpoint.
    pub google_userinfo_url: String,
    /// Microsoft Graph base.
    pub graph_base: String,
}

impl DriveEndpoints {
    /// Default Drive v3 API base.
    pub const GOOGLE_API_BASE: &'static str = "https://www.googleapis.com/drive/v3";
    /// Default Drive v3 upload base.
    pub const GOOGLE_UPLOAD_BASE: &'static str = "https://www.googleapis.com/upload/drive/v3";
    /// Default userinfo endpoint.
    pub const GOOGLE_USERINFO_URL: &'static str = "https://www.googleapis.com/oauth2/v3/userinfo";
    /// Default Graph base.
    pub const GRAPH_BASE: &'static str = "https://graph.microsoft.com/v1.0";

    /// Points every vendor at the same base URL.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            google_api_base: format!("{base}/drive/v3"),
            google_upload_base: format!("{base}/upload/drive/v3"),
            google_userinfo_url: format!("{base}/oauth2/v3/userinfo"),
            graph_base: format!("{base}/v1.0"),
        }
    }
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            google_api_base: Self::GOOGLE_API_BASE.to_string(),
            google_upload_base: Self::GOOGLE_UPLOAD_BASE.to_string(),
            google_userinfo_url: Self::GOOGLE_USERINFO_URL.to_string(),
            graph_base: Self::GRAPH_BASE.to_string(),
        }
    }
}

/// Builds the shared HTTP client used by all adapters.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cloudsync/", env!("CARGO_PKG_VERSION")))
        .build()
}
