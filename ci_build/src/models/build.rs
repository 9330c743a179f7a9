//! ci.build — A single execution of a project's pipeline.
//!
//! A build is identified by `project.id` + `number`. Identity and replay
//! fields are fixed at construction; status, duration and artifacts change
//! while the build runs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::BuildError;
use crate::models::artifact::Artifact;
use crate::models::git_fork_config::GitForkConfig;
use crate::models::project::Project;
use crate::models::status::{self, BuildStatus, StatusChange};

/// Duration of a build that has not run yet.
pub const DURATION_NOT_STARTED: i64 = -1;

const SHORT_SHA_LEN: usize = 7;

/// Global identity of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildKey {
    pub project_id: i64,
    pub number: i64,
}

impl fmt::Display for BuildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.project_id, self.number)
    }
}

/// Everything a build is created with.
///
/// Deserializes from stored JSON; `project` is never part of the payload
/// and is attached by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    #[serde(skip)]
    pub project: Option<Arc<Project>>,
    pub number: i64,
    #[serde(default, deserialize_with = "status::deserialize_lenient")]
    pub status: Option<BuildStatus>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default = "not_started")]
    pub duration: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub lane: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub git_fork_config: Option<GitForkConfig>,
    #[serde(default)]
    pub build_tools: BTreeMap<String, String>,
}

fn not_started() -> i64 {
    DURATION_NOT_STARTED
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project: None,
            number: 0,
            status: None,
            timestamp: Utc::now(),
            duration: DURATION_NOT_STARTED,
            description: None,
            trigger: String::new(),
            lane: String::new(),
            platform: String::new(),
            parameters: BTreeMap::new(),
            git_fork_config: None,
            build_tools: BTreeMap::new(),
        }
    }
}

/// A build record.
///
/// Mutating the record needs `&mut`, so one execution flow owns it at a time.
#[derive(Debug, Clone, Serialize)]
pub struct BuildRecord {
    #[serde(rename = "project_id", serialize_with = "serialize_project_id")]
    project: Option<Arc<Project>>,
    number: i64,
    status: Option<BuildStatus>,
    timestamp: DateTime<Utc>,
    /// Seconds the build ran for, [`DURATION_NOT_STARTED`] until it starts.
    pub duration: i64,
    artifacts: Vec<Artifact>,
    /// Shown next to the remote commit status.
    pub description: Option<String>,
    /// What caused the build: manual, commit, pull_request, nightly.
    pub trigger: String,
    /// Lane name (without platform) used, kept so the build can be re-run.
    pub lane: String,
    /// Platform name (without lane) used.
    pub platform: String,
    /// Parameters passed to the lane. Not consumed by anything yet.
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Version of each build tool used.
    pub build_tools: BTreeMap<String, String>,
    git_fork_config: Option<GitForkConfig>,
}

fn serialize_project_id<S>(project: &Option<Arc<Project>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    project.as_ref().map(|p| p.id).serialize(serializer)
}

impl BuildRecord {
    /// Artifacts are only ever appended after creation, so the record always
    /// starts without any.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            project: config.project,
            number: config.number,
            status: config.status,
            timestamp: config.timestamp,
            duration: config.duration,
            artifacts: Vec::new(),
            description: config.description,
            trigger: config.trigger,
            lane: config.lane,
            platform: config.platform,
            parameters: config.parameters,
            build_tools: config.build_tools,
            git_fork_config: config.git_fork_config,
        }
    }

    pub fn project(&self) -> Option<&Arc<Project>> {
        self.project.as_ref()
    }

    /// Move the build to another project.
    ///
    /// Rarely legitimate (project migration, re-import). Callers own any
    /// follow-up such as renumbering.
    pub fn reparent(&mut self, new_project: Arc<Project>) {
        tracing::info!(
            build_number = self.number,
            from_project = ?self.project.as_ref().map(|p| p.id),
            to_project = new_project.id,
            "Build reparented"
        );
        self.project = Some(new_project);
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    /// `None` while the build is not attached to a project.
    pub fn key(&self) -> Option<BuildKey> {
        self.project.as_ref().map(|p| BuildKey {
            project_id: p.id,
            number: self.number,
        })
    }

    pub fn status(&self) -> Option<BuildStatus> {
        self.status
    }

    /// Set the status from its textual form.
    ///
    /// `None` leaves the current status untouched and returns `Ok(None)`;
    /// loaders may hand over a placeholder before the real status is known.
    /// Anything outside the fixed status set is rejected and the current
    /// status is kept.
    pub fn set_status(&mut self, value: Option<&str>) -> Result<Option<StatusChange>, BuildError> {
        let Some(raw) = value else {
            return Ok(None);
        };

        match raw.parse::<BuildStatus>() {
            Ok(status) => Ok(Some(self.apply_status(status))),
            Err(e) => {
                tracing::warn!(build_number = self.number, status = raw, "Rejected build status");
                crate::metrics::status_rejected();
                Err(e)
            }
        }
    }

    /// Commit an already-validated status.
    pub fn apply_status(&mut self, status: BuildStatus) -> StatusChange {
        let change = StatusChange {
            from: self.status,
            to: status,
        };
        self.status = Some(status);
        tracing::debug!(
            build_number = self.number,
            from = ?change.from,
            to = %status,
            "Build status changed"
        );
        change
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn has_started(&self) -> bool {
        self.duration >= 0
    }

    /// Record the final duration together with the terminal status.
    pub fn finish(&mut self, duration_secs: i64, status: BuildStatus) -> StatusChange {
        self.duration = duration_secs;
        self.apply_status(status)
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    pub fn git_fork_config(&self) -> Option<&GitForkConfig> {
        self.git_fork_config.as_ref()
    }

    /// Commit sha this build ran against.
    pub fn sha(&self) -> Result<&str, BuildError> {
        self.git_fork_config
            .as_ref()
            .map(|fork| fork.sha.as_str())
            .ok_or(BuildError::MissingForkConfig)
    }

    /// Browser link to the built commit on the project's git host.
    pub fn link_to_remote_commit(&self) -> Result<String, BuildError> {
        let repo = self
            .project
            .as_ref()
            .and_then(|p| p.repo_config.as_ref())
            .ok_or(BuildError::MissingProjectLink)?;
        Ok(repo.link_to_remote_commit(self.sha()?))
    }

    /// Branch name when there is one, otherwise the short sha.
    ///
    /// Forks checked out at a bare commit have no branch. A sha shorter than
    /// the short form is returned whole.
    pub fn human_friendly_branch_info(&self) -> Result<&str, BuildError> {
        let fork = self
            .git_fork_config
            .as_ref()
            .ok_or(BuildError::MissingForkConfig)?;
        if !fork.branch.is_empty() {
            return Ok(&fork.branch);
        }

        let sha = fork.sha.as_str();
        let end = sha
            .char_indices()
            .nth(SHORT_SHA_LEN)
            .map_or(sha.len(), |(idx, _)| idx);
        Ok(&sha[..end])
    }

    /// Hash of everything that determines what a re-run would execute.
    ///
    /// Two builds of the same project, commit, branch, lane, platform and
    /// parameters share a fingerprint.
    pub fn fingerprint(&self) -> Result<String, BuildError> {
        use sha2::{Digest, Sha256};

        let fork = self
            .git_fork_config
            .as_ref()
            .ok_or(BuildError::MissingForkConfig)?;

        let mut hasher = Sha256::new();
        let project_id = self.project.as_ref().map(|p| p.id.to_string()).unwrap_or_default();
        update_field(&mut hasher, project_id.as_bytes());
        for part in [&fork.sha, &fork.branch, &self.lane, &self.platform] {
            update_field(&mut hasher, part.as_bytes());
        }
        for (key, value) in &self.parameters {
            update_field(&mut hasher, key.as_bytes());
            update_field(&mut hasher, value.to_string().as_bytes());
        }

        let hash = hasher.finalize();
        Ok(hex::encode(&hash[..16]))
    }
}

/// Length-prefixed so adjacent fields can't run into each other.
fn update_field(hasher: &mut sha2::Sha256, bytes: &[u8]) {
    use sha2::Digest;

    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
