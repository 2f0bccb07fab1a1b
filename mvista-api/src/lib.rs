//! mvista-api library - MusicVista catalog browse and insights service

use std::sync::Arc;
use std::time::Instant;

use axum::http::{header, HeaderValue, Method, Uri};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod services;

use api::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog database pool
    pub db: SqlitePool,
    /// Service start, for uptime reporting
    pub started_at: Instant,
    /// Deployment environment name
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(db: SqlitePool, environment: &str) -> Self {
        Self {
            db,
            started_at: Instant::now(),
            environment: Arc::from(environment),
        }
    }
}

/// CORS policy allowing GET requests from the configured front-end origins
///
/// An origin of `*` allows any origin; credentials are then not allowed,
/// since browsers reject a wildcard origin on credentialed requests.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ]);

    if origins.iter().any(|origin| origin.trim() == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route {} not found", uri.path()))
}

/// Build application router
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::artist_routes())
        .merge(api::album_routes())
        .merge(api::track_routes())
        .merge(api::insight_routes())
        .fallback(route_not_found)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
