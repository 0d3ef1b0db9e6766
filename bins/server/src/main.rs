//! CloudSync API Server
//!
//! Main entry point for the CloudSync service.

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudsync_api::{AppState, ListingDefaults, RouterOptions, create_router};
use cloudsync_core::drive::{DriveClientFactory, DriveEndpoints, build_http_client};
use cloudsync_core::sync::ExecutorSettings;
use cloudsync_shared::{AppConfig, CloudProvider, SessionConfig, SessionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudsync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Drive clients share one HTTP connection pool
    let http = build_http_client(Duration::from_secs(config.providers.request_timeout_secs))
        .context("Failed to build HTTP client")?;
    let google = &config.providers.google;
    let microsoft = &config.providers.microsoft;
    let endpoints = DriveEndpoints {
        google_api_base: google.api_base.clone(),
        google_upload_base: google.upload_base.clone(),
        google_userinfo_url: google.userinfo_url.clone(),
        graph_base: microsoft.graph_base.clone(),
    };
    let enabled = [
        (CloudProvider::Google, google.enabled),
        (CloudProvider::Microsoft, microsoft.enabled),
    ]
    .into_iter()
    .filter_map(|(provider, on)| on.then_some(provider));
    let drives = DriveClientFactory::new(http, endpoints).with_enabled(enabled);
    info!(
        google = google.enabled,
        microsoft = microsoft.enabled,
        "Drive providers configured"
    );

    // Create session service
    let sessions = SessionService::new(SessionConfig {
        secret: config.session.secret.clone(),
        expires_secs: i64::try_from(config.session.expiry_secs)
            .context("session.expiry_secs is out of range")?,
    });

    // Create application state
    let state = AppState::new(
        sessions,
        drives,
        ExecutorSettings {
            max_concurrency: config.sync.max_concurrency,
            folder_page_size: config.sync.folder_page_size,
        },
        ListingDefaults {
            list_page_size: config.sync.list_page_size,
            folder_page_size: config.sync.folder_page_size,
        },
    );

    // Create router
    let options = RouterOptions {
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        cors_origin: config.server.cors_origin.clone(),
        ..RouterOptions::default()
    };
    let app = create_router(state, &options);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
