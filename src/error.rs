//! Startup error type
//!
//! Per-request failures never reach this type: they are answered with an
//! HTTP error response. Everything here is fatal before the serve loop starts.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ServeError {
    /// Configuration could not be loaded or deserialized
    Config(config::ConfigError),
    /// Host/port did not resolve to a socket address
    Address(String),
    /// Served root directory is missing or unreadable
    Root { path: PathBuf, source: io::Error },
    /// Listening socket could not be bound (address in use, no permission)
    Bind { addr: SocketAddr, source: io::Error },
    /// Runtime or log file setup failed
    Io(io::Error),
}

impl ServeError {
    /// Whether the failure is the "address already in use" flavour of bind error
    pub fn is_addr_in_use(&self) -> bool {
        matches!(self, Self::Bind { source, .. } if source.kind() == io::ErrorKind::AddrInUse)
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Address(msg) => write!(f, "invalid address: {msg}"),
            Self::Root { path, source } => {
                write!(f, "cannot serve directory '{}': {source}", path.display())
            }
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Root { source, .. } | Self::Bind { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Address(_) => None,
        }
    }
}

impl From<config::ConfigError> for ServeError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for ServeError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_message() {
        let err = ServeError::Bind {
            addr: "127.0.0.1:8000".parse().unwrap(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(err.is_addr_in_use());
        assert!(err.to_string().starts_with("failed to bind 127.0.0.1:8000"));
    }

    #[test]
    fn test_other_errors_are_not_addr_in_use() {
        let err = ServeError::Address("nowhere:0".to_string());
        assert!(!err.is_addr_in_use());
        assert_eq!(err.to_string(), "invalid address: nowhere:0");
    }
}
