#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, Response};
use ha_server::config::ServerConfig;
use ha_server::metrics::Metrics;
use ha_server::routes::create_router;
use ha_server::state::AppState;

pub const TEST_PEER_PORT: u16 = 40123;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        environment: "testing".to_string(),
        hostname: "test-host".to_string(),
        ..ServerConfig::default()
    }
}

/// Builds the router and returns a handle on its metrics.
pub fn build_app(config: ServerConfig) -> (Router, Metrics) {
    let state = AppState::new(Arc::new(config)).expect("metrics should register");
    let metrics = state.metrics.clone();
    (create_router(state), metrics)
}

pub fn request(path: &str, method: Method) -> Request<Body> {
    request_with_agent(path, method, "ha-server-tests/1.0")
}

pub fn request_with_agent(path: &str, method: Method, user_agent: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header("User-Agent", user_agent)
        .body(Body::empty())
        .expect("failed to build request");

    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        TEST_PEER_PORT,
    )));

    request
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// Finds the sample `name{...}` carrying all of `labels` in a text exposition.
pub fn scrape_value(exposition: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let (series, value) = line.rsplit_once(' ')?;
            let rest = series.strip_prefix(name)?;
            if !(rest.is_empty() || rest.starts_with('{')) {
                return None;
            }
            let matches = labels
                .iter()
                .all(|(key, val)| rest.contains(&format!("{}=\"{}\"", key, val)));
            matches.then(|| value.parse::<f64>().ok()).flatten()
        })
        .next()
}
