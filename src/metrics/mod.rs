//! Metrics collection and exposition for Prometheus.
//!
//! This module provides the request counter, duration histogram and
//! in-flight gauge shared by every handler.

mod guard;
mod recorder;

pub use guard::InFlightGuard;
pub use recorder::{
    Metrics, MetricsRecorder, REQUEST_DURATION_SECONDS, REQUESTS_IN_FLIGHT, REQUESTS_TOTAL,
};
