//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection pool configuration
///
/// Read-only once the pool has been constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Name used in the pool's tracing span
    #[serde(default = "default_pool_name")]
    pub name: String,

    /// Capacity of each client's outbound queue
    #[serde(default = "default_send_queue_size")]
    pub send_queue_size: usize,

    /// When set, `Pool::new_client` does not start the client
    #[serde(default)]
    pub disable_client_autostart: bool,

    /// Largest inbound message accepted from a peer (bytes)
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// Deadline for a single frame write (ms)
    #[serde(default = "default_write_wait")]
    pub write_wait_ms: u64,

    /// Time allowed between pongs before the peer is presumed dead (ms)
    #[serde(default = "default_pong_wait")]
    pub pong_wait_ms: u64,

    /// Interval between pings; must be shorter than `pong_wait_ms`
    #[serde(default = "default_ping_period")]
    pub ping_period_ms: u64,
}

fn default_pool_name() -> String {
    "wspool".to_string()
}

fn default_send_queue_size() -> usize {
    256
}

fn default_max_message_size() -> usize {
    512 * 1024 // 512 KB
}

fn default_write_wait() -> u64 {
    10_000 // 10 seconds
}

fn default_pong_wait() -> u64 {
    60_000 // 60 seconds
}

fn default_ping_period() -> u64 {
    default_pong_wait() * 9 / 10
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: default_pool_name(),
            send_queue_size: default_send_queue_size(),
            disable_client_autostart: false,
            max_message_size: default_max_message_size(),
            write_wait_ms: default_write_wait(),
            pong_wait_ms: default_pong_wait(),
            ping_period_ms: default_ping_period(),
        }
    }
}

impl PoolConfig {
    // Durations are floored at 1 ms: a zero period cannot drive a ticker

    pub fn write_wait(&self) -> Duration {
        Duration::from_millis(self.write_wait_ms.max(1))
    }

    pub fn pong_wait(&self) -> Duration {
        Duration::from_millis(self.pong_wait_ms.max(1))
    }

    pub fn ping_period(&self) -> Duration {
        Duration::from_millis(self.ping_period_ms.max(1))
    }

    /// Check that the values can drive a pool
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.send_queue_size == 0 {
            return Err(ConfigError::Invalid(
                "pool.send_queue_size must be at least 1".to_string(),
            ));
        }
        if self.max_message_size == 0 {
            return Err(ConfigError::Invalid(
                "pool.max_message_size must be at least 1".to_string(),
            ));
        }
        if self.ping_period_ms == 0 || self.ping_period_ms >= self.pong_wait_ms {
            return Err(ConfigError::Invalid(format!(
                "pool.ping_period_ms ({}) must be non-zero and shorter than pool.pong_wait_ms ({})",
                self.ping_period_ms, self.pong_wait_ms
            )));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.pool.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.pool.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("wspool").join("config.toml")),
            Some(PathBuf::from("/etc/wspool/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("WSPOOL_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("WSPOOL_PORT") {
            self.server.port = port;
        }

        // Pool overrides
        if let Ok(name) = std::env::var("WSPOOL_POOL_NAME") {
            self.pool.name = name;
        }
        if let Some(size) = env_parse("WSPOOL_SEND_QUEUE_SIZE") {
            self.pool.send_queue_size = size;
        }
        if let Some(size) = env_parse("WSPOOL_MAX_MESSAGE_SIZE") {
            self.pool.max_message_size = size;
        }
        if let Some(disabled) = env_parse("WSPOOL_DISABLE_CLIENT_AUTOSTART") {
            self.pool.disable_client_autostart = disabled;
        }
        if let Some(ms) = env_parse("WSPOOL_WRITE_WAIT_MS") {
            self.pool.write_wait_ms = ms;
        }
        if let Some(ms) = env_parse("WSPOOL_PONG_WAIT_MS") {
            self.pool.pong_wait_ms = ms;
        }
        if let Some(ms) = env_parse("WSPOOL_PING_PERIOD_MS") {
            self.pool.ping_period_ms = ms;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("WSPOOL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WSPOOL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# wspool Configuration
#
# Environment variables override these settings:
# - WSPOOL_HOST
# - WSPOOL_PORT
# - WSPOOL_POOL_NAME
# - WSPOOL_SEND_QUEUE_SIZE
# - WSPOOL_MAX_MESSAGE_SIZE
# - WSPOOL_DISABLE_CLIENT_AUTOSTART
# - WSPOOL_WRITE_WAIT_MS
# - WSPOOL_PONG_WAIT_MS
# - WSPOOL_PING_PERIOD_MS
# - WSPOOL_LOG_LEVEL
# - WSPOOL_LOG_FORMAT

[pool]
# Name attached to the pool's log span
name = "wspool"

# Outbound messages buffered per client before senders wait
send_queue_size = 256

# Start clients as soon as they are created
disable_client_autostart = false

# Largest inbound message accepted (bytes)
max_message_size = 524288

# Deadline for writing a single frame (ms)
write_wait_ms = 10000

# Time allowed between pongs (ms)
pong_wait_ms = 60000

# Ping interval, must be shorter than pong_wait_ms (ms)
ping_period_ms = 54000

[server]
host = "0.0.0.0"
port = 8090

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
