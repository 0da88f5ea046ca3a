// Configuration module entry point
// Loads layered configuration and builds the immutable request-time state

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::ServeError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, FilesConfig, HttpConfig, LoggingConfig, ServerConfig};

/// Configuration file looked up in the working directory (any extension the `config` crate knows)
///
/// With the default root the working directory is also served, so this file
/// is downloadable like any other.
pub const CONFIG_FILE: &str = "cors-serve";

/// Environment variable prefix, e.g. `CORS_SERVE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "CORS_SERVE";

impl Config {
    /// Load configuration from the default file and environment
    pub fn load() -> Result<Self, ServeError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error: every key has a default that
    /// reproduces the fixed `localhost:8000`, working-directory, `*` setup.
    pub fn load_from(config_path: &str) -> Result<Self, ServeError> {
        let index_files: Vec<String> = types::DEFAULT_INDEX_FILES
            .iter()
            .map(ToString::to_string)
            .collect();

        let settings = config::Config::builder()
            .set_default("server.host", types::DEFAULT_HOST)?
            .set_default("server.port", i64::from(types::DEFAULT_PORT))?
            .set_default("files.root", types::DEFAULT_ROOT)?
            .set_default("files.index_files", index_files)?
            .set_default("files.directory_listing", true)?
            .set_default("http.allow_origin", types::DEFAULT_ALLOW_ORIGIN)?
            .set_default("http.server_name", types::default_server_name())?
            .set_default("http.enable_ranges", true)?
            .set_default("logging.level", types::DEFAULT_LOG_LEVEL)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", types::DEFAULT_ACCESS_LOG_FORMAT)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Resolve the configured host and port, preferring IPv4 like the
    /// classic `localhost` binding does
    pub fn socket_addr(&self) -> Result<SocketAddr, ServeError> {
        let target = (self.server.host.as_str(), self.server.port);
        let addrs: Vec<SocketAddr> = target
            .to_socket_addrs()
            .map_err(|e| {
                ServeError::Address(format!("{}:{}: {e}", self.server.host, self.server.port))
            })?
            .collect();

        addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| {
                ServeError::Address(format!(
                    "{}:{} resolved to no addresses",
                    self.server.host, self.server.port
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-missing-cors-serve-config").unwrap();
        assert_eq!(cfg.server.host, "localhost");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.files.root, ".");
        assert_eq!(cfg.files.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.files.directory_listing);
        assert_eq!(cfg.http.allow_origin, "*");
        assert!(cfg.http.server_name.starts_with("cors-serve/"));
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
    }

    #[test]
    fn test_default_impl_matches_loaded_defaults() {
        let loaded = Config::load_from("definitely-missing-cors-serve-config").unwrap();
        let built = Config::default();
        assert_eq!(loaded.server.port, built.server.port);
        assert_eq!(loaded.server.host, built.server.host);
        assert_eq!(loaded.files.index_files, built.files.index_files);
        assert_eq!(loaded.http.allow_origin, built.http.allow_origin);
    }

    #[test]
    fn test_socket_addr_prefers_ipv4() {
        let mut cfg = Config::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8123;
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr, "127.0.0.1:8123".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_localhost_resolves_to_loopback() {
        let addr = Config::default().socket_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8000);
    }
}
