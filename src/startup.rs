//! Application startup and server initialization.
//!
//! This module builds the shared state, binds the listener and serves the
//! router until a shutdown signal arrives.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// Registers the metrics, binds to `0.0.0.0:<port>` and serves until SIGINT
/// or SIGTERM.
///
/// # Errors
///
/// Returns an error if the metrics cannot be registered, the listener fails
/// to bind (e.g. the port is in use), or the server fails while running.
/// None of these are retried.
pub async fn run(config: Arc<ServerConfig>) -> Result<(), StartupError> {
    let state = AppState::new(config.clone())?;

    let address = config.bind_address();
    info!(
        port = config.port,
        environment = %config.environment,
        hostname = %config.hostname,
        "Starting server on {}",
        address
    );

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    info!("Server started, serving on port {}", config.port);
    info!("Metrics available at http://localhost:{}/metrics", config.port);
    info!("Health check available at http://localhost:{}/health", config.port);

    serve(listener, state, shutdown_signal()).await
}

/// Serves the router on an already bound listener until `shutdown` resolves.
///
/// Handlers see the peer address through `ConnectInfo<SocketAddr>`.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = routes::create_router(state);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(StartupError::Serve)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
