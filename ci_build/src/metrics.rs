//! Prometheus-style counters for build status reporting.
//!
//! Only the `metrics` facade is used here; whichever binary embeds the crate
//! installs the exporter.

use metrics::counter;

/// Record a status report prepared for the remote host.
pub fn status_reported(state: &str) {
    counter!("ci_build_status_reports_total", "state" => state.to_string()).increment(1);
}

/// Record a status value that failed validation.
pub fn status_rejected() {
    counter!("ci_build_status_rejected_total").increment(1);
}
