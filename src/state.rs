//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! the resolved configuration and the metrics registry.

use crate::config::ServerConfig;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; both fields are shared
/// handles, so every clone sees the same values.
#[derive(Clone)]
pub struct AppState {
    /// Configuration resolved at startup.
    pub config: Arc<ServerConfig>,
    /// Request counter, duration histogram and in-flight gauge.
    pub metrics: Metrics,
}

impl AppState {
    /// Builds the state with a fresh metrics registry.
    ///
    /// # Errors
    ///
    /// Fails if the metric instruments cannot be registered.
    pub fn new(config: Arc<ServerConfig>) -> Result<Self, prometheus::Error> {
        Ok(AppState {
            config,
            metrics: Metrics::new()?,
        })
    }
}
