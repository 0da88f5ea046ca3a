// Server module entry point
// Binds the listener, prints the banner and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// Rust 不允许 loop 作为模块名（关键字），改用 server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::ServeError;
use crate::logger;

// Re-export commonly used types
pub use listener::bind_listener;
pub use server_loop::run_server_loop;
pub use signal::ShutdownSignal;

/// A bound, not yet running, file server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    host: String,
}

impl Server {
    /// Build request state and bind the listening socket
    ///
    /// Fails with `ServeError::Bind` when the port is already taken; nothing
    /// has been served at that point.
    pub fn bind(config: &Config) -> Result<Self, ServeError> {
        let state = AppState::new(config)?;
        let listener = bind_listener(config.socket_addr()?)?;

        Ok(Self {
            listener,
            state: Arc::new(state),
            host: config.server.host.clone(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServeError> {
        Ok(self.listener.local_addr()?)
    }

    /// URL announced in the banner, using the configured host name
    pub fn url(&self) -> Result<String, ServeError> {
        Ok(format!("http://{}:{}", self.host, self.local_addr()?.port()))
    }

    /// Serve until `shutdown` is triggered, then release the socket
    pub async fn run(self, shutdown: Arc<ShutdownSignal>) {
        run_server_loop(self.listener, self.state, shutdown).await;
    }
}

/// Bind, announce and serve until interrupted
///
/// Returns only after SIGINT/SIGTERM, or immediately with an error when
/// startup fails.
pub async fn start(config: &Config) -> Result<(), ServeError> {
    let server = Server::bind(config)?;
    logger::log_server_start(&server.url()?);

    let shutdown = Arc::new(ShutdownSignal::new());
    signal::install(Arc::clone(&shutdown));

    server.run(shutdown).await;
    Ok(())
}
