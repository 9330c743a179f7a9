//! Error types for build record operations.

use thiserror::Error;

/// Errors raised synchronously by [`crate::models::build::BuildRecord`].
///
/// None of these are transient; the caller has to fix its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Invalid build status '{0}'")]
    InvalidStatus(String),

    #[error("Build has no git fork config; cannot resolve commit sha")]
    MissingForkConfig,

    #[error("Build has no project repository config; cannot link to remote commit")]
    MissingProjectLink,
}
