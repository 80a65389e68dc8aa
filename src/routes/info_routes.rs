//! The informational page served on `/` and every unmatched path.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use axum::{Router, routing::any};
use chrono::Local;
use http::header::{CONTENT_TYPE, USER_AGENT};
use percent_encoding::percent_decode_str;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::metrics::{InFlightGuard, MetricsRecorder};
use crate::page::{PageDetails, RequestDetails, SERVER_NAME, SERVER_VERSION, render_page};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Status label recorded for every page request.
///
/// The page handler has no failure response, so every request is counted as
/// a success even if writing the body fails.
pub const RECORDED_STATUS: &str = "200";

/// Registers the page route. Unmatched paths reach [`info_page`] through the
/// router fallback.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", any(info_page))
}

/// Renders the page for `request` into `writer` and records request metrics.
///
/// The in-flight gauge is held for the whole call. Counter and histogram are
/// updated after the write, whether or not it succeeded; the write result is
/// returned unchanged.
pub fn write_info_page<M, W>(
    recorder: &M,
    config: &ServerConfig,
    request: &RequestDetails<'_>,
    writer: &mut W,
) -> io::Result<()>
where
    M: MetricsRecorder,
    W: Write,
{
    let _in_flight = InFlightGuard::new(recorder);
    let start = Instant::now();

    info!(method = request.method, path = request.path, "Serving info page");

    let details = PageDetails {
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        environment: &config.environment,
        hostname: &config.hostname,
        request,
        elapsed: start.elapsed(),
    };
    let written = render_page(writer, &details);
    if let Err(e) = &written {
        warn!(method = request.method, path = request.path, error = %e, "Failed to write info page");
    }

    let duration = start.elapsed().as_secs_f64();
    recorder.record_request(request.method, request.path, RECORDED_STATUS);
    recorder.record_duration(request.method, request.path, duration);

    written
}

/// Handler for `/` and the router fallback.
pub(crate) async fn info_page(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, HTTPError> {
    let user_agent = headers
        .get(USER_AGENT)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .unwrap_or_default();
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let remote_addr = connect_info
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let request = RequestDetails {
        method: method.as_str(),
        path: &path,
        user_agent: &user_agent,
        remote_addr: &remote_addr,
    };

    let mut body = Vec::new();
    // Writing into a Vec cannot fail; failures are logged inside anyway.
    let _ = write_info_page(&state.metrics, &state.config, &request, &mut body);

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header("X-Server", SERVER_NAME)
        .header("X-Version", SERVER_VERSION)
        .body(Body::from(body))
        .map_err(|e| HTTPError::internal(e.to_string()))
}
