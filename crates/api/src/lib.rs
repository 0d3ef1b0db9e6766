//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for drive operations and sync configurations
//! - Session middleware
//! - Error responses

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, header::AUTHORIZATION},
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use cloudsync_core::drive::DriveClientFactory;
use cloudsync_core::sync::{
    ExecutorSettings, InMemorySyncConfigRepository, SyncConfigService, SyncExecutor,
};
use cloudsync_shared::SessionService;

/// Configuration store used by the API.
pub type ConfigStore = InMemorySyncConfigRepository;

/// Listing defaults for the direct file routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingDefaults {
    /// Page size for root listings.
    pub list_page_size: u32,
    /// Page size for folder listings.
    pub folder_page_size: u32,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self {
            list_page_size: cloudsync_core::drive::DEFAULT_LIST_PAGE_SIZE,
            folder_page_size: cloudsync_core::drive::DEFAULT_FOLDER_PAGE_SIZE,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session token service.
    pub sessions: Arc<SessionService>,
    /// Drive client factory.
    pub drives: Arc<DriveClientFactory>,
    /// Sync configuration service.
    pub configs: SyncConfigService<ConfigStore>,
    /// Sync executor.
    pub executor: SyncExecutor<ConfigStore, DriveClientFactory>,
    /// Listing defaults.
    pub listing: ListingDefaults,
}

impl AppState {
    /// Wire the state over a fresh in-memory configuration store.
    #[must_use]
    pub fn new(
        sessions: SessionService,
        drives: DriveClientFactory,
        executor: ExecutorSettings,
        listing: ListingDefaults,
    ) -> Self {
        let store = Arc::new(ConfigStore::new());
        let drives = Arc::new(drives);
        Self {
            sessions: Arc::new(sessions),
            configs: SyncConfigService::new(Arc::clone(&store)),
            executor: SyncExecutor::new(store, Arc::clone(&drives), executor),
            drives,
            listing,
        }
    }
}

/// HTTP-level router settings.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Request timeout.
    pub request_timeout: Duration,
    /// Allowed CORS origin, `*` for any.
    pub cors_origin: String,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(300),
            cors_origin: "*".to_string(),
            body_limit: 10 * 1024 * 1024,
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::from(Any)
    } else {
        match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!(origin, "invalid CORS origin, allowing any");
                AllowOrigin::from(Any)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the main application router.
pub fn create_router(state: AppState, options: &RouterOptions) -> Router {
    Router::new()
        .route("/", get(routes::health::api_index))
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(RequestBodyLimitLayer::new(options.body_limit))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION]))
        .layer(cors_layer(&options.cors_origin))
        .with_state(state)
}
