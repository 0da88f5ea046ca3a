// Configuration types module
// Defines all configuration-related data structures and their defaults

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_ALLOW_ORIGIN: &str = "*";
pub const DEFAULT_INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];
pub const DEFAULT_ACCESS_LOG_FORMAT: &str = "common";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, CPU count when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
        }
    }
}

/// Served directory configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilesConfig {
    /// Directory to serve, relative paths resolve against the working directory
    pub root: String,
    /// Files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
    /// Generate an HTML listing for directories without an index file
    pub directory_listing: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            index_files: DEFAULT_INDEX_FILES.iter().map(ToString::to_string).collect(),
            directory_listing: true,
        }
    }
}

/// HTTP response configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Access-Control-Allow-Origin` header added to every response
    pub allow_origin: String,
    pub server_name: String,
    /// Honour `Range: bytes=` requests
    pub enable_ranges: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allow_origin: DEFAULT_ALLOW_ORIGIN.to_string(),
            server_name: default_server_name(),
            enable_ranges: true,
        }
    }
}

pub fn default_server_name() -> String {
    format!("cors-serve/{}", env!("CARGO_PKG_VERSION"))
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (common or combined)
    pub access_log_format: String,
    /// Access log file path (optional, stderr if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            access_log: true,
            access_log_format: DEFAULT_ACCESS_LOG_FORMAT.to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}
