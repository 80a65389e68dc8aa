//! Metrics recording implementation using Prometheus.

use prometheus::proto::Metric;
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_with_registry,
};

/// Name of the request counter.
pub const REQUESTS_TOTAL: &str = "http_requests_total";
/// Name of the request duration histogram.
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
/// Name of the in-flight gauge.
pub const REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

/// Trait for recording per-request metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Marks a request as started (in-flight gauge +1).
    fn request_started(&self);

    /// Marks a request as finished (in-flight gauge -1).
    fn request_finished(&self);

    /// Records one completed request.
    fn record_request(&self, method: &str, endpoint: &str, status: &str);

    /// Records the duration of a completed request.
    fn record_duration(&self, method: &str, endpoint: &str, duration_secs: f64);
}

/// Prometheus metrics collector.
///
/// Cloning is cheap: every clone shares the same registry and instruments.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_requests_in_flight: IntGauge,
}

impl Metrics {
    /// Creates a new metrics instance backed by its own Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if an instrument cannot be registered.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Registers the request instruments into `registry`.
    ///
    /// Registering twice into the same registry fails with
    /// `prometheus::Error::AlreadyReg`.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        let http_requests_total = register_int_counter_vec_with_registry!(
            Opts::new(REQUESTS_TOTAL, "Total number of HTTP requests"),
            &["method", "endpoint", "status"],
            &registry
        )?;

        let http_request_duration_seconds = register_histogram_vec_with_registry!(
            REQUEST_DURATION_SECONDS,
            "HTTP request duration in seconds",
            &["method", "endpoint"],
            prometheus::DEFAULT_BUCKETS.to_vec(),
            &registry
        )?;

        let http_requests_in_flight = register_int_gauge_with_registry!(
            Opts::new(
                REQUESTS_IN_FLIGHT,
                "Current number of HTTP requests being processed"
            ),
            &registry
        )?;

        Ok(Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
        })
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Current number of in-flight requests.
    pub fn in_flight(&self) -> i64 {
        self.http_requests_in_flight.get()
    }

    /// Current request count for a label set, 0 if never observed.
    pub fn requests_total(&self, method: &str, endpoint: &str, status: &str) -> u64 {
        self.find(
            REQUESTS_TOTAL,
            &[("method", method), ("endpoint", endpoint), ("status", status)],
        )
        .map(|m| m.get_counter().get_value() as u64)
        .unwrap_or(0)
    }

    /// Number of duration samples recorded for a label set.
    pub fn duration_count(&self, method: &str, endpoint: &str) -> u64 {
        self.find(
            REQUEST_DURATION_SECONDS,
            &[("method", method), ("endpoint", endpoint)],
        )
        .map(|m| m.get_histogram().get_sample_count())
        .unwrap_or(0)
    }

    /// Sum of duration samples (seconds) recorded for a label set.
    pub fn duration_sum(&self, method: &str, endpoint: &str) -> f64 {
        self.find(
            REQUEST_DURATION_SECONDS,
            &[("method", method), ("endpoint", endpoint)],
        )
        .map(|m| m.get_histogram().get_sample_sum())
        .unwrap_or(0.0)
    }

    // Looks a series up through `gather` so reads never create empty series.
    fn find(&self, name: &str, labels: &[(&str, &str)]) -> Option<Metric> {
        self.registry
            .gather()
            .into_iter()
            .find(|family| family.get_name() == name)?
            .get_metric()
            .iter()
            .find(|metric| {
                labels.iter().all(|(key, value)| {
                    metric
                        .get_label()
                        .iter()
                        .any(|pair| pair.get_name() == *key && pair.get_value() == *value)
                })
            })
            .cloned()
    }
}

impl MetricsRecorder for Metrics {
    fn request_started(&self) {
        self.http_requests_in_flight.inc();
    }

    fn request_finished(&self) {
        self.http_requests_in_flight.dec();
    }

    fn record_request(&self, method: &str, endpoint: &str, status: &str) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, status])
            .inc();
    }

    fn record_duration(&self, method: &str, endpoint: &str, duration_secs: f64) {
        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration_secs);
    }
}
