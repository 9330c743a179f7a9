//! ci.artifact — Build artifacts (logs, test results, binaries).

use serde::{Deserialize, Serialize};

/// Output produced by a build. Stored and interpreted elsewhere; a build
/// record only collects them in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub artifact_type: String,
    /// Storage-provider specific location.
    pub reference: Option<String>,
    pub size_bytes: Option<i64>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, artifact_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            reference: None,
            size_bytes: None,
        }
    }
}
