//! Health check and service info endpoints

use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use mvista_common::api::{HealthResponse, ServiceInfo};
use mvista_common::time::now_rfc3339;

use crate::AppState;

/// GET /health
///
/// Liveness probe; does not touch the database.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        message: "MusicVista API server is running normally".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: now_rfc3339(),
    })
}

/// GET /api
pub async fn service_info() -> Json<ServiceInfo> {
    let endpoints: BTreeMap<String, String> = ["artists", "albums", "tracks", "insights"]
        .into_iter()
        .map(|name| (name.to_string(), format!("/api/{}", name)))
        .collect();
    Json(ServiceInfo {
        success: true,
        message: "MusicVista API Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
        timestamp: now_rfc3339(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api", get(service_info))
}
