use std::collections::BTreeMap;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use super::env_value;
use super::logging::{LoggingConfig, DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_HOSTNAME: &str = "unknown";

/// Environment variables the server reads. Everything else is ignored.
const ENV_KEYS: [&str; 5] = ["PORT", "ENVIRONMENT", "HOSTNAME", "LOG_LEVEL", "LOG_FORMAT"];

/// Server configuration, resolved once at startup from the environment.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(deserialize_with = "env_value::port")]
    pub port: u16,
    pub environment: String,
    pub hostname: String,
    pub log_level: String,
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl ServerConfig {
    /// The figment the configuration is extracted from.
    ///
    /// Environment values are merged as plain strings: the `Env` provider
    /// would otherwise parse `007` as a number or `[blue]` as an array.
    pub fn figment() -> Figment {
        let raw_env: BTreeMap<String, String> = Env::raw()
            .only(&ENV_KEYS)
            .iter()
            .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
            .collect();

        Figment::new()
            .merge(Serialized::defaults(ServerConfig::default()))
            .merge(Serialized::globals(raw_env))
    }

    /// Address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
        }
    }

    // An empty variable counts as unset; any other value is used as is.
    fn fill_blanks(mut self) -> Self {
        for (value, default) in [
            (&mut self.environment, DEFAULT_ENVIRONMENT),
            (&mut self.hostname, DEFAULT_HOSTNAME),
            (&mut self.log_level, DEFAULT_LOG_LEVEL),
            (&mut self.log_format, DEFAULT_LOG_FORMAT),
        ] {
            if value.is_empty() {
                *value = default.to_string();
            }
        }
        self
    }
}

/// Load config from `PORT`, `ENVIRONMENT`, `HOSTNAME`, `LOG_LEVEL` and `LOG_FORMAT`.
pub fn load_config() -> Result<ServerConfig, figment::Error> {
    ServerConfig::figment()
        .extract::<ServerConfig>()
        .map(ServerConfig::fill_blanks)
}
