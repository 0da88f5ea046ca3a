//! cors-serve
//!
//! Local static file server for development. Serves the working directory
//! on `http://localhost:8000` and adds `Access-Control-Allow-Origin: *` to
//! every response, so pages on other origins can fetch the files.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServeError;
