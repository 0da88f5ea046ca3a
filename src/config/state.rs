// Application state module
// Immutable request-time state built once from the loaded configuration

use std::path::Path;

use hyper::header::HeaderValue;

use super::types::Config;
use crate::error::ServeError;
use crate::handler::StaticFiles;
use crate::logger::AccessLogFormat;

/// Application state, shared read-only by every connection task
pub struct AppState {
    pub files: StaticFiles,
    /// Appended to every response by the CORS decorator
    pub allow_origin: HeaderValue,
    pub server_name: HeaderValue,
    pub access_log: Option<AccessLogFormat>,
}

impl AppState {
    /// Build state from configuration, resolving the served root
    ///
    /// The root is canonicalized here so that later containment checks
    /// compare canonical paths on both sides.
    pub fn new(config: &Config) -> Result<Self, ServeError> {
        let root_path = Path::new(&config.files.root);
        let root = root_path.canonicalize().map_err(|source| ServeError::Root {
            path: root_path.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ServeError::Root {
                path: root,
                source: std::io::Error::other("not a directory"),
            });
        }

        let files = StaticFiles::new(
            root,
            config.files.index_files.clone(),
            config.files.directory_listing,
            config.http.enable_ranges,
        );

        Ok(Self {
            files,
            allow_origin: header_value("http.allow_origin", &config.http.allow_origin)?,
            server_name: header_value("http.server_name", &config.http.server_name)?,
            access_log: config
                .logging
                .access_log
                .then(|| AccessLogFormat::parse(&config.logging.access_log_format)),
        })
    }
}

fn header_value(key: &str, value: &str) -> Result<HeaderValue, ServeError> {
    HeaderValue::from_str(value).map_err(|e| {
        ServeError::Config(config::ConfigError::Message(format!(
            "{key} is not a valid header value ({value:?}): {e}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_defaults() {
        let state = AppState::new(&Config::default()).unwrap();
        assert_eq!(state.allow_origin, "*");
        assert!(state.files.root().is_absolute());
        assert!(state.access_log.is_some());
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let mut cfg = Config::default();
        cfg.files.root = "/definitely/not/a/served/root".to_string();
        assert!(matches!(
            AppState::new(&cfg),
            Err(ServeError::Root { .. })
        ));
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let mut cfg = Config::default();
        cfg.http.allow_origin = "bad\nvalue".to_string();
        assert!(matches!(AppState::new(&cfg), Err(ServeError::Config(_))));
    }

    #[test]
    fn test_access_log_disabled() {
        let mut cfg = Config::default();
        cfg.logging.access_log = false;
        assert!(AppState::new(&cfg).unwrap().access_log.is_none());
    }
}
