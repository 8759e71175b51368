//! Metrics module
//!
//! Prometheus counters for requests, stored files and errors.

pub mod server;

use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, Counter, CounterVec};

lazy_static! {
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "disk_uploadr_requests_total",
        "Total HTTP requests by route and status",
        &["route", "status"]
    ).unwrap();

    pub static ref FILES_STORED_TOTAL: Counter = register_counter!(
        "disk_uploadr_files_stored_total",
        "Total files written to the upload directory"
    ).unwrap();

    pub static ref UPLOAD_BYTES_TOTAL: Counter = register_counter!(
        "disk_uploadr_upload_bytes_total",
        "Total bytes written to the upload directory"
    ).unwrap();

    pub static ref ERRORS_TOTAL: CounterVec = register_counter_vec!(
        "disk_uploadr_errors_total",
        "Total upload errors",
        &["type"]
    ).unwrap();
}

/// Record a finished request
pub fn record_request(route: &str, status: u16) {
    let status = status.to_string();
    REQUESTS_TOTAL
        .with_label_values(&[route, status.as_str()])
        .inc();
}

/// Record one part written to disk, whether or not its request succeeds
pub fn record_stored_file(bytes: u64) {
    FILES_STORED_TOTAL.inc();
    UPLOAD_BYTES_TOTAL.inc_by(bytes as f64);
}

/// Record an error
pub fn record_error(error_type: &str) {
    ERRORS_TOTAL.with_label_values(&[error_type]).inc();
}
