// Connection handling module
// Serves a single accepted TCP connection on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::http::CorsService;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// The request handler is wrapped in `CorsService`, so every response that
/// leaves the handler carries the allow-origin header.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address, used for access logging
/// * `state` - Shared application state
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let allow_origin = state.allow_origin.clone();

        let service = CorsService::new(
            service_fn(move |req: Request<Incoming>| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, &state, peer_addr).await }
            }),
            allow_origin,
        );

        // HTTP/1.1 keep-alive is the protocol default
        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
