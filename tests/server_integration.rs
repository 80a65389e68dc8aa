mod common;

use std::sync::Arc;

use ha_server::error::StartupError;
use ha_server::startup::serve;
use ha_server::state::AppState;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use common::test_config;

#[tokio::test]
async fn serves_over_tcp_and_shuts_down_gracefully() {
    let state = AppState::new(Arc::new(test_config())).expect("metrics should register");
    let metrics = state.metrics.clone();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind an ephemeral port");
    let address = listener.local_addr().expect("listener has an address");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, state, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::builder()
        .user_agent("tcp-integration/2.0")
        .build()
        .expect("client should build");

    let page = client
        .get(format!("http://{}/some/page", address))
        .send()
        .await
        .expect("page request should succeed");
    assert_eq!(page.status(), reqwest::StatusCode::OK);
    assert_eq!(page.headers()["x-server"], "Golang-HA-Server");
    let body = page.text().await.expect("page body");
    assert!(body.contains("tcp-integration/2.0"));
    assert!(body.contains("/some/page"));
    assert!(body.contains("127.0.0.1:"), "page should show the peer address");

    let health = client
        .post(format!("http://{}/health", address))
        .send()
        .await
        .expect("health request should succeed");
    assert_eq!(health.status(), reqwest::StatusCode::OK);
    let health: serde_json::Value =
        serde_json::from_str(&health.text().await.expect("health body")).expect("health is JSON");
    assert_eq!(health["status"], "healthy");

    let scrape = client
        .get(format!("http://{}/metrics", address))
        .send()
        .await
        .expect("scrape should succeed")
        .text()
        .await
        .expect("scrape body");
    assert!(scrape.contains("http_requests_total"));
    assert_eq!(metrics.requests_total("GET", "/some/page", "200"), 1);

    stop_tx.send(()).expect("server should still be running");
    server
        .await
        .expect("server task should not panic")
        .expect("server should stop cleanly");
}

#[tokio::test]
async fn bind_failure_is_reported() {
    let occupied = TcpListener::bind("0.0.0.0:0")
        .await
        .expect("should bind an ephemeral port");
    let port = occupied.local_addr().expect("listener has an address").port();

    let config = ha_server::config::ServerConfig {
        port,
        ..test_config()
    };
    let result = ha_server::startup::run(Arc::new(config)).await;

    match result {
        Err(StartupError::Bind { address, .. }) => {
            assert_eq!(address, format!("0.0.0.0:{}", port));
        }
        other => panic!("expected a bind error, got {:?}", other.map(|_| ())),
    }
}
