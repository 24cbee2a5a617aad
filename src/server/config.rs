//! # Server Configuration Module
//!
//! Configuration for the cipher web server.
//!
//! ## Configuration Sources
//!
//! Configuration can be loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Default values
//!
//! `ServerConfig` is also serde-serializable so it can be logged or stored
//! as JSON.

use crate::error::{CipherWebError, Result};
use clap::{ArgAction, Parser};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::net::SocketAddr;
use tracing::{metadata::ParseLevelError, Level};

/// Wrapper for `tracing::Level` to handle serialization/deserialization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLevel(Level);

impl LogLevel {
    /// Returns the inner `tracing::Level` value.
    #[must_use]
    pub fn inner(&self) -> Level {
        self.0
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        Self(level)
    }
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        log_level.0
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self(s.parse().map_err(serde::de::Error::custom)?))
    }
}

/// Server configuration
///
/// ## Security Settings
/// - `max_payload_size` bounds how much of a request body is buffered
/// - `request_timeout_ms` bounds how long a single request may take
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(
    name = "cipher-web",
    about = "HTTP service for Atbash, Caesar and Affine substitution ciphers",
    version,
    long_about = None
)]
pub struct ServerConfig {
    /// Network address to bind the server to
    ///
    /// Use "0.0.0.0:5000" to bind to all interfaces, or "127.0.0.1:5000"
    /// for localhost only.
    #[arg(
        short = 'b',
        long = "bind",
        value_name = "ADDRESS:PORT",
        default_value = "0.0.0.0:5000",
        env = "CIPHER_WEB_BIND_ADDR",
        help = "Network address to bind the server to"
    )]
    pub bind_addr: SocketAddr,

    /// Logging level for the server
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        env = "LOG_LEVEL",
        help = "Logging level (error, warn, info, debug, trace)"
    )]
    pub log_level: LogLevel,

    /// Maximum request payload size in bytes
    ///
    /// Larger bodies are rejected before any JSON parsing.
    #[arg(
        short = 'm',
        long = "max-payload-size",
        value_name = "BYTES",
        default_value_t = crate::MAX_PAYLOAD_SIZE,
        env = "MAX_PAYLOAD_SIZE",
        help = "Maximum request payload size in bytes"
    )]
    pub max_payload_size: usize,

    /// Request timeout in milliseconds
    #[arg(
        short = 't',
        long = "request-timeout",
        value_name = "MILLISECONDS",
        default_value_t = crate::REQUEST_TIMEOUT_MS,
        env = "REQUEST_TIMEOUT_MS",
        help = "Request timeout in milliseconds"
    )]
    pub request_timeout_ms: u64,

    /// Number of worker threads for the server
    ///
    /// If not specified, defaults to twice the number of CPU cores, capped at 16.
    #[arg(
        short = 'w',
        long = "worker-threads",
        value_name = "COUNT",
        env = "WORKER_THREADS",
        help = "Number of worker threads (default: 2x CPU cores, max 16)"
    )]
    pub worker_threads: Option<usize>,

    /// Enable Prometheus metrics endpoint at /metrics
    #[arg(
        long = "enable-metrics",
        env = "ENABLE_METRICS",
        default_value_t = false,
        action = ArgAction::Set,
        value_name = "BOOL",
        help = "Enable Prometheus metrics endpoint"
    )]
    pub enable_metrics: bool,

    /// Enable health check endpoint at /health
    #[arg(
        long = "enable-health-check",
        env = "ENABLE_HEALTH_CHECK",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL",
        help = "Enable health check endpoint"
    )]
    pub enable_health_check: bool,
}

impl ServerConfig {
    /// Create a new configuration with default values
    ///
    /// ## Example
    /// ```rust
    /// use cipher_web::ServerConfig;
    ///
    /// let config = ServerConfig::new();
    /// assert_eq!(config.bind_addr.port(), 5000);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from command-line arguments and environment
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Load configuration from environment variables only
    ///
    /// Variables that are not set keep their defaults.
    ///
    /// ## Errors
    /// - `CipherWebError::ConfigError`: if a variable is set but unparseable
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(bind_addr) = env_var("CIPHER_WEB_BIND_ADDR", "bind address")? {
            config.bind_addr = bind_addr;
        }
        if let Some(log_level) = env_var("LOG_LEVEL", "log level")? {
            config.log_level = log_level;
        }
        if let Some(max_size) = env_var("MAX_PAYLOAD_SIZE", "max payload size")? {
            config.max_payload_size = max_size;
        }
        if let Some(timeout) = env_var("REQUEST_TIMEOUT_MS", "request timeout")? {
            config.request_timeout_ms = timeout;
        }
        if let Some(workers) = env_var("WORKER_THREADS", "worker threads")? {
            config.worker_threads = Some(workers);
        }
        if let Some(metrics) = env_var("ENABLE_METRICS", "enable metrics")? {
            config.enable_metrics = metrics;
        }
        if let Some(health) = env_var("ENABLE_HEALTH_CHECK", "enable health check")? {
            config.enable_health_check = health;
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// ## Errors
    /// - `CipherWebError::ConfigError`: for a zero payload size, timeout or
    ///   worker count
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.ip().is_unspecified() {
            tracing::warn!(
                "Binding to wildcard address {} - ensure this is secure for your environment",
                self.bind_addr
            );
        }

        if self.max_payload_size == 0 {
            return Err(CipherWebError::config_error(
                "Maximum payload size cannot be zero",
                None,
            ));
        }

        if self.max_payload_size > 100 * 1024 * 1024 {
            tracing::warn!(
                "Very large maximum payload size: {} bytes - this may impact performance",
                self.max_payload_size
            );
        }

        if self.request_timeout_ms == 0 {
            return Err(CipherWebError::config_error(
                "Request timeout cannot be zero",
                None,
            ));
        }

        if let Some(workers) = self.worker_threads {
            if workers == 0 {
                return Err(CipherWebError::config_error(
                    "Worker thread count cannot be zero",
                    None,
                ));
            }

            if workers > 64 {
                tracing::warn!(
                    "Very high worker thread count: {} - this may cause excessive context switching",
                    workers
                );
            }
        }

        Ok(())
    }

    /// Get the number of worker threads to run
    ///
    /// Returns the configured count, or 2x the available parallelism capped
    /// at 16 (at least 4 when parallelism cannot be determined).
    #[must_use]
    pub fn get_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get() * 2)
                .unwrap_or(4)
                .min(16)
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], crate::DEFAULT_PORT)),
            log_level: LogLevel::from(Level::INFO),
            max_payload_size: crate::MAX_PAYLOAD_SIZE,
            request_timeout_ms: crate::REQUEST_TIMEOUT_MS,
            worker_threads: None,
            enable_metrics: false,
            enable_health_check: true,
        }
    }
}

/// Read and parse an optional environment variable
fn env_var<T>(name: &str, label: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map(Some).map_err(|e| {
            CipherWebError::config_error(format!("Invalid {label} '{raw}': {e}"), Some(Box::new(e)))
        }),
        Err(_) => Ok(None),
    }
}
