//! ci.build.fork — Git coordinates identifying exactly what source was built.

use serde::{Deserialize, Serialize};

/// Everything needed to check out the same remote, branch and commit again
/// when an old build is re-run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitForkConfig {
    pub sha: String,
    /// Empty when the fork was checked out at a bare commit.
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub clone_url: Option<String>,
    /// Full ref, e.g. `refs/pull/12/head`.
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

impl GitForkConfig {
    pub fn new(sha: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            branch: branch.into(),
            ..Self::default()
        }
    }
}
