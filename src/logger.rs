//! Logger module
//!
//! Console logging for the playground server: startup banner, per-request
//! access lines, warnings and errors. Info goes to stdout, problems to
//! stderr.

use chrono::{DateTime, Local};
use hyper::Version;
use std::path::Path;

const BANNER_RULE: &str = "============================================================";

fn write_info(message: &str) {
    println!("{message}");
}

fn write_error(message: &str) {
    eprintln!("{message}");
}

/// Print the startup banner once the listener is bound
pub fn log_server_start(port: u16, root: &Path) {
    write_info(BANNER_RULE);
    write_info("  Options Greeks Interactive Playground");
    write_info(BANNER_RULE);
    write_info(&format!("\nServer running at: http://localhost:{port}"));
    write_info(&format!("Serving files from: {}", root.display()));
    write_info("\nFeatures:");
    write_info("  - Live Greeks calculator with real-time charts");
    write_info("  - Six-module course with 24 lessons");
    write_info("  - Interactive practice exercises and quizzes");
    write_info("  - Trading challenges and simulations");
    write_info("\nPress Ctrl+C to stop the server");
    write_info(BANNER_RULE);
}

/// Print the farewell on interrupt-triggered shutdown
pub fn log_server_stop() {
    write_info("\nServer stopped. Thanks for learning!");
    write_info(BANNER_RULE);
}

/// Startup failure: the configured root directory does not exist
pub fn log_missing_root(root: &str) {
    write_error(&format!("Error: '{root}' directory not found!"));
    write_error("Make sure the server binary sits next to the playground assets.");
}

pub fn log_access(method: &str, path: &str, version: Version, status: u16, body_bytes: u64) {
    write_info(&format_access_line(
        &Local::now(),
        method,
        path,
        version,
        status,
        body_bytes,
    ));
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

/// One access-log line per request, Common Log Format style timestamp
fn format_access_line(
    time: &DateTime<Local>,
    method: &str,
    path: &str,
    version: Version,
    status: u16,
    body_bytes: u64,
) -> String {
    format!(
        "[{}] \"{} {} {:?}\" {} {}",
        time.format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        path,
        version,
        status,
        body_bytes,
    )
}
