//! Logger module
//!
//! Provides logging utilities for the brand server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<LogLevel>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write through the global writer, or straight to the console before `init`
fn write(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level >= LogLevel::Warn => eprintln!("{message}"),
        None if level == LogLevel::Info => println!("{message}"),
        None => {}
    }
}

fn write_info(message: &str) {
    write(LogLevel::Info, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, backend: &str) {
    write_info("======================================");
    write_info("Brand server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!("Store backend: {backend}"));
    write_info(&format!("Static assets: {}", config.static_files.dir));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_store_connected(backend: &str) {
    write_info(&format!("[Store] Connected to {backend}"));
}

pub fn log_store_unreachable(err: &impl std::fmt::Display) {
    write(
        LogLevel::Error,
        &format!("[ERROR] Error connecting to MongoDB: {err}"),
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(
        LogLevel::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_debug(message: &str) {
    write(LogLevel::Debug, &format!("[DEBUG] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown_started(active: usize) {
    write_info(&format!(
        "\n[Shutdown] Listener closed, waiting for {active} active connection(s)"
    ));
}

pub fn log_shutdown_complete() {
    write_info("[Shutdown] ✓ Server stopped");
}
