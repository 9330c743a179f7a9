//! CI build data models.

pub mod artifact;
pub mod build;
pub mod git_fork_config;
pub mod project;
pub mod status;
