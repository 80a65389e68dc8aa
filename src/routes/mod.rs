//! HTTP route definitions and handlers.
//!
//! Three surfaces: the informational page (also the fallback for any
//! unmatched path), the health check, and the Prometheus scrape endpoint.

mod health_routes;
mod info_routes;
mod metrics_routes;

pub use info_routes::{RECORDED_STATUS, write_info_page};

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(info_routes::routes())
        .merge(health_routes::routes())
        .merge(metrics_routes::routes())
        .fallback(info_routes::info_page)
        .with_state(state)
}
