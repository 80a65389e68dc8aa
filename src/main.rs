use std::process::ExitCode;
use std::sync::Arc;

use ha_server::config::load_config;
use ha_server::startup;
use ha_server::utils::logger::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging()) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    match startup::run(Arc::new(config)).await {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
