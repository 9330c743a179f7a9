//! Services built on top of the build record.

pub mod status_report;
