//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session token configuration.
    pub session: SessionSettings,
    /// Cloud provider endpoints and switches.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Sync executor tuning.
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a single request, including a whole sync execution.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Allowed CORS origin; `*` allows any.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    300
}

fn default_cors_origin() -> String {
    "*".to_string()
}

/// Session token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Secret key for signing session tokens.
    pub secret: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_expiry")]
    pub expiry_secs: u64,
}

fn default_session_expiry() -> u64 {
    86400 // 24 hours
}

/// Cloud provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    /// Timeout applied to every vendor HTTP call.
    #[serde(default = "default_provider_timeout")]
    pub request_timeout_secs: u64,
    /// Google Drive settings.
    #[serde(default)]
    pub google: GoogleSettings,
    /// Microsoft OneDrive settings.
    #[serde(default)]
    pub microsoft: MicrosoftSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_provider_timeout(),
            google: GoogleSettings::default(),
            microsoft: MicrosoftSettings::default(),
        }
    }
}

fn default_provider_timeout() -> u64 {
    30
}

/// Google Drive endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleSettings {
    /// Whether Google Drive is offered.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Drive v3 metadata API base.
    #[serde(default = "default_google_api_base")]
    pub api_base: String,
    /// Drive v3 upload API base.
    #[serde(default = "default_google_upload_base")]
    pub upload_base: String,
    /// OpenID userinfo endpoint.
    #[serde(default = "default_google_userinfo")]
    pub userinfo_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_base: default_google_api_base(),
            upload_base: default_google_upload_base(),
            userinfo_url: default_google_userinfo(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_google_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_google_upload_base() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}

fn default_google_userinfo() -> String {
    "https://www.googleapis.com/oauth2/v3/userinfo".to_string()
}

/// Microsoft Graph endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MicrosoftSettings {
    /// Whether OneDrive is offered.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Graph API base.
    #[serde(default = "default_graph_base")]
    pub graph_base: String,
}

impl Default for MicrosoftSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            graph_base: default_graph_base(),
        }
    }
}

fn default_graph_base() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

/// Sync executor tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    /// Maximum number of per-file transfers in flight during one execution.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Default page size for root listings.
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
    /// Default page size for folder listings.
    #[serde(default = "default_folder_page_size")]
    pub folder_page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            list_page_size: default_list_page_size(),
            folder_page_size: default_folder_page_size(),
        }
    }
}

fn default_max_concurrency() -> usize {
    4
}

fn default_list_page_size() -> u32 {
    10
}

fn default_folder_page_size() -> u32 {
    100
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CLOUDSYNC").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_requires_session_secret() {
        temp_env::with_vars_unset(["CLOUDSYNC__SESSION__SECRET"], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_load_defaults() {
        temp_env::with_var("CLOUDSYNC__SESSION__SECRET", Some("s3cret"), || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.session.secret, "s3cret");
            assert_eq!(config.session.expiry_secs, 86400);
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.server.cors_origin, "*");
            assert!(config.providers.google.enabled);
            assert!(config.providers.microsoft.enabled);
            assert_eq!(
                config.providers.microsoft.graph_base,
                "https://graph.microsoft.com/v1.0"
            );
            assert_eq!(config.sync.max_concurrency, 4);
            assert_eq!(config.sync.folder_page_size, 100);
        });
    }

    #[test]
    fn test_load_env_overrides() {
        temp_env::with_vars(
            [
                ("CLOUDSYNC__SESSION__SECRET", Some("s3cret")),
                ("CLOUDSYNC__SERVER__PORT", Some("9090")),
                ("CLOUDSYNC__PROVIDERS__GOOGLE__ENABLED", Some("false")),
                ("CLOUDSYNC__SYNC__MAX_CONCURRENCY", Some("8")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.port, 9090);
                assert!(!config.providers.google.enabled);
                assert!(config.providers.microsoft.enabled);
                assert_eq!(config.sync.max_concurrency, 8);
            },
        );
    }
}
