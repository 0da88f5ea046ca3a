//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the file server, common headers and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;

use chrono::Utc;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderValue, DATE, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode};

use crate::config::AppState;
use crate::http::{self, conditional};
use crate::logger::{self, AccessLogEntry, AccessLogFormat};

/// Main entry point for HTTP request handling
///
/// Never fails: every outcome, including unsupported methods, is an HTTP
/// response. The CORS header is not added here but by the wrapping service.
pub async fn handle_request<B>(
    req: Request<B>,
    state: &AppState,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let is_head = *method == Method::HEAD;

    let mut response = match *method {
        Method::GET | Method::HEAD => {
            let (path, query) = (req.uri().path(), req.uri().query());
            let headers = req.headers();
            state.files.serve(path, query, headers, is_head).await
        }
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_error_response(
                StatusCode::NOT_IMPLEMENTED,
                &format!("Unsupported method ('{method}')"),
                false,
            )
        }
    };

    let headers = response.headers_mut();
    headers.insert(SERVER, state.server_name.clone());
    if let Ok(date) = HeaderValue::from_str(&conditional::http_date(Utc::now())) {
        headers.insert(DATE, date);
    }

    if let Some(format) = state.access_log {
        log_access(&req, &response, peer, format);
    }

    Ok(response)
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer: SocketAddr,
    format: AccessLogFormat,
) {
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);

    let mut entry = AccessLogEntry::new(peer.ip().to_string(), req.method().to_string(), target);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact();
    entry.referer = header_string(req, REFERER);
    entry.user_agent = header_string(req, USER_AGENT);

    logger::log_access(&entry, format);
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
