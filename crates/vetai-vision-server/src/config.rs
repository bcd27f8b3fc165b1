//! Server configuration from the environment.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_LOG_FILTER: &str = "info,vetai_vision_server=debug";

pub const ENV_BIND_ADDR: &str = "VETAI_BIND_ADDR";
pub const ENV_LOG: &str = "VETAI_LOG";
/// Credentials for a hosted vision service. Read so deployments can carry
/// them; the simulated detector does not use them.
pub const ENV_VISION_CREDENTIALS: &str = "GOOGLE_CLOUD_CREDENTIALS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {var} value {value:?}: {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    pub vision_credentials: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_value = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                var: ENV_BIND_ADDR,
                value: bind_value.clone(),
                source,
            })?;

        Ok(Self {
            bind_addr,
            log_filter: lookup(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            vision_credentials: lookup(ENV_VISION_CREDENTIALS).filter(|c| !c.trim().is_empty()),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            vision_credentials: None,
        }
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_filter", &self.log_filter)
            .field("vision_credentials", &self.vision_credentials.is_some())
            .finish()
    }
}
