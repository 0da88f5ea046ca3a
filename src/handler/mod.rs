//! Request handler module
//!
//! Method dispatch, request path translation, and static file and
//! directory listing responses.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
pub use static_files::StaticFiles;
