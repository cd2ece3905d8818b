//! Logger module
//!
//! Diagnostic logging for the server:
//! - Server lifecycle logging
//! - Connection and record-persistence access logging
//! - Error and warning logging
//! - File-based logging support

pub mod writer;

pub use writer::LogWriter;

use crate::config::Config;
use crate::request_log::PersistError;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<Arc<LogWriter>> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Request log server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Request records: {}", config.request_log.directory));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_info("[Shutdown] Stopped accepting connections");
}

pub fn log_record_persisted(writer: &LogWriter, method: &str, uri: &str, path: &Path) {
    writer.write_info(&format!("[Record] {method} {uri} -> {}", path.display()));
}

/// One entry per failed persistence, with the underlying cause
pub fn log_persist_failure(writer: &LogWriter, err: &PersistError) {
    match std::error::Error::source(err) {
        Some(cause) => writer.write_error(&format!("[ERROR] {err}: {cause}")),
        None => writer.write_error(&format!("[ERROR] {err}")),
    }
}
