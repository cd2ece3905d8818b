// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub request_log: RequestLogConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, defaults to the number of CPU cores
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Diagnostic logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log accepted connections and persisted records
    pub access_log: bool,
    /// Info/access log file path (stdout when unset)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr when unset)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Where per-request records are written
#[derive(Debug, Deserialize, Clone)]
pub struct RequestLogConfig {
    pub directory: String,
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_backlog() -> i32 {
    1024
}
