use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;
use crate::error::StartupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Console,
    Json,
}

fn parse_level(level: &str) -> Result<LevelFilter, StartupError> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(StartupError::InvalidLogLevel(level.to_string())),
    }
}

fn parse_format(format: &str) -> Result<LogFormat, StartupError> {
    match format.trim().to_lowercase().as_str() {
        "console" => Ok(LogFormat::Console),
        "json" => Ok(LogFormat::Json),
        _ => Err(StartupError::InvalidLogFormat(format.to_string())),
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` directives are not consulted; the level comes from the config.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), StartupError> {
    let level_filter = parse_level(&logging_config.level)?;
    let format = parse_format(&logging_config.format)?;

    let filter_layer = EnvFilter::default().add_directive(level_filter.into());

    match format {
        LogFormat::Json => {
            // One JSON object per line, for log shippers
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .try_init()?;
        }
        LogFormat::Console => {
            // Human-readable console output with ANSI colors
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt::layer().pretty())
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level(" debug ").unwrap(), LevelFilter::DEBUG);
        assert!(matches!(
            parse_level("loud"),
            Err(StartupError::InvalidLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn parses_formats() {
        assert_eq!(parse_format("json").unwrap(), LogFormat::Json);
        assert_eq!(parse_format("Console").unwrap(), LogFormat::Console);
        assert!(parse_format("xml").is_err());
    }

    #[test]
    fn init_rejects_bad_level_before_installing() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            format: "console".to_string(),
        };
        assert!(matches!(
            init_logging(&config),
            Err(StartupError::InvalidLogLevel(_))
        ));
    }
}
