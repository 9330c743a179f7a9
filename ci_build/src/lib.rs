//! Centrix CI build records.
//!
//! A build record is one execution of a project's pipeline: its identity,
//! its status as it moves from `pending` to a terminal state, the artifacts
//! it produced, and enough replay metadata to run it again. The crate also
//! derives what gets reported to the git host (commit sha, branch label,
//! commit link, commit status payload).
//!
//! Scheduling, execution, persistence and the HTTP client that posts
//! statuses live elsewhere.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;

pub use error::BuildError;
pub use models::build::{BuildConfig, BuildKey, BuildRecord};
pub use models::status::{BuildStatus, RemoteState, StatusChange};
