//! HTTP protocol layer module
//!
//! Protocol-level building blocks, decoupled from file system access:
//! content types, ranges, conditional requests, response builders and the
//! CORS service decorator.

pub mod conditional;
pub mod cors;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use cors::CorsService;
pub use range::{parse_range, ByteRange, RangeOutcome};
pub use response::{
    build_304_response, build_416_response, build_error_response, build_file_response,
    build_html_response, build_partial_response, build_redirect_response,
};
