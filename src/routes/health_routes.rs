//! Health check endpoint.

use axum::{Json, Router, response::IntoResponse, routing::any};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    timestamp: String,
}

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", any(health_check))
}

/// Reports that the process is up, with the current UTC time in RFC 3339.
///
/// Does not touch request metrics.
async fn health_check() -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
