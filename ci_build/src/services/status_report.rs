//! Commit status payloads for the git host.
//!
//! Posting is left to the notification dispatcher; this only derives what it
//! sends.

use serde::Serialize;

use crate::config::ReportConfig;
use crate::error::BuildError;
use crate::models::build::BuildRecord;
use crate::models::status::{BuildStatus, RemoteState};

/// Body of a commit status update, plus the commit it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    #[serde(skip)]
    pub sha: String,
    pub state: RemoteState,
    pub description: String,
    pub target_url: String,
    pub context: String,
}

impl StatusReport {
    /// Build the report for the build's current status.
    ///
    /// A build without a status yet is reported as pending.
    pub fn for_build(build: &BuildRecord, config: &ReportConfig) -> Result<Self, BuildError> {
        let sha = build.sha()?.to_string();
        let status = build.status().unwrap_or(BuildStatus::Pending);
        let state = status.remote_state();

        let description = build
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| status.default_description().to_string());

        let base = config.dashboard_url.trim_end_matches('/');
        let target_url = match build.key() {
            Some(key) => format!("{base}/projects/{}/builds/{}", key.project_id, key.number),
            None => base.to_string(),
        };

        let context = [build.platform.trim(), build.lane.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .fold(config.status_context.clone(), |ctx, part| format!("{ctx}/{part}"));

        crate::metrics::status_reported(state.as_str());
        tracing::debug!(
            build_number = build.number(),
            sha = %sha,
            state = %state,
            "Prepared status report"
        );

        Ok(Self {
            sha,
            state,
            description,
            target_url,
            context,
        })
    }

    /// JSON body for the host's commit status endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "state": self.state,
            "description": self.description,
            "target_url": self.target_url,
            "context": self.context,
        })
    }
}
