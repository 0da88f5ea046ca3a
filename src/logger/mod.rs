//! Logger module
//!
//! Provides logging utilities for the file server:
//! - Startup banner (the only stdout output)
//! - Access logging in common or combined format
//! - Error, warning and info logging to stderr or a file

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};
pub use writer::Level;

use crate::config::Config;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        Level::parse(&config.logging.level),
    )
}

/// Write to error log
fn write_diagnostic(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write_diagnostic(level, message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => eprintln!("{message}"),
    }
}

/// Announce the listening URL and how to stop the server
pub fn log_server_start(url: &str) {
    println!("Starting server at {url}");
    println!("Press Ctrl+C to stop the server");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_diagnostic(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write_diagnostic(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_diagnostic(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_diagnostic(Level::Info, &format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    write_access(&entry.format(format));
}
