//! ci.build.status — The fixed set of states a build can be in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BuildError;

/// Lifecycle state of a build.
///
/// Determines how a build is persisted and what gets pushed to the remote
/// host. Any status may follow any other; only membership is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Success,
    Pending,
    MissingFastfile,
    Failure,
    InstallingXcode,
    Running,
    CiProblem,
}

impl BuildStatus {
    /// Every status, in canonical order.
    pub const ALL: [BuildStatus; 7] = [
        BuildStatus::Success,
        BuildStatus::Pending,
        BuildStatus::MissingFastfile,
        BuildStatus::Failure,
        BuildStatus::InstallingXcode,
        BuildStatus::Running,
        BuildStatus::CiProblem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Success => "success",
            BuildStatus::Pending => "pending",
            BuildStatus::MissingFastfile => "missing_fastfile",
            BuildStatus::Failure => "failure",
            BuildStatus::InstallingXcode => "installing_xcode",
            BuildStatus::Running => "running",
            BuildStatus::CiProblem => "ci_problem",
        }
    }

    /// Commit-status state accepted by the git host.
    ///
    /// Hosts only know four states, so the in-progress statuses collapse to
    /// `pending` and a missing Fastfile is reported as a plain `failure`.
    pub fn remote_state(&self) -> RemoteState {
        match self {
            BuildStatus::Success => RemoteState::Success,
            BuildStatus::Pending | BuildStatus::InstallingXcode | BuildStatus::Running => {
                RemoteState::Pending
            }
            BuildStatus::Failure | BuildStatus::MissingFastfile => RemoteState::Failure,
            BuildStatus::CiProblem => RemoteState::Error,
        }
    }

    /// Whether the build has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            BuildStatus::Success
                | BuildStatus::Failure
                | BuildStatus::MissingFastfile
                | BuildStatus::CiProblem
        )
    }

    /// Default human-readable description for a remote status.
    pub fn default_description(&self) -> &'static str {
        match self {
            BuildStatus::Success => "All green",
            BuildStatus::Pending => "Build is queued",
            BuildStatus::MissingFastfile => "No Fastfile found in the repository",
            BuildStatus::Failure => "Build failed",
            BuildStatus::InstallingXcode => "Installing Xcode",
            BuildStatus::Running => "Build is running",
            BuildStatus::CiProblem => "The CI encountered an internal problem",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildStatus {
    type Err = BuildError;

    /// Parses the canonical form exactly. A single leading `:` is accepted;
    /// case and whitespace are significant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(':').unwrap_or(s);
        BuildStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == name)
            .ok_or_else(|| BuildError::InvalidStatus(s.to_string()))
    }
}

/// State vocabulary of a remote commit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteState {
    Success,
    Pending,
    Failure,
    Error,
}

impl RemoteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteState::Success => "success",
            RemoteState::Pending => "pending",
            RemoteState::Failure => "failure",
            RemoteState::Error => "error",
        }
    }
}

impl fmt::Display for RemoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed status transition, handed to whoever dispatches notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: Option<BuildStatus>,
    pub to: BuildStatus,
}

impl StatusChange {
    /// True when the remote host would see a different state.
    pub fn changes_remote_state(&self) -> bool {
        self.from.map(|s| s.remote_state()) != Some(self.to.remote_state())
    }
}

/// Deserialize an optional status, treating null, `""` and `0` as absent.
///
/// Stored records may carry a placeholder before the real status is known.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<BuildStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(serde_json::Value::String(s)) => s.parse().map(Some).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(BuildError::InvalidStatus(other.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_canonical_name() {
        for status in BuildStatus::ALL {
            assert_eq!(status.as_str().parse::<BuildStatus>().unwrap(), status);
        }
    }

    #[test]
    fn parse_accepts_symbol_prefix() {
        assert_eq!(":ci_problem".parse::<BuildStatus>().unwrap(), BuildStatus::CiProblem);
        assert!("::ci_problem".parse::<BuildStatus>().is_err());
    }

    #[test]
    fn parse_is_case_and_whitespace_sensitive() {
        for raw in ["Running", " running ", "RUNNING", " success\n", "Failure"] {
            assert_eq!(
                raw.parse::<BuildStatus>(),
                Err(BuildError::InvalidStatus(raw.to_string())),
                "input: {raw:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "bogus".parse::<BuildStatus>().unwrap_err();
        assert_eq!(err, BuildError::InvalidStatus("bogus".to_string()));
        assert!("cancelled".parse::<BuildStatus>().is_err());
        assert!("".parse::<BuildStatus>().is_err());
    }

    #[test]
    fn remote_state_mapping() {
        assert_eq!(BuildStatus::Success.remote_state(), RemoteState::Success);
        assert_eq!(BuildStatus::InstallingXcode.remote_state(), RemoteState::Pending);
        assert_eq!(BuildStatus::Running.remote_state(), RemoteState::Pending);
        assert_eq!(BuildStatus::MissingFastfile.remote_state(), RemoteState::Failure);
        assert_eq!(BuildStatus::CiProblem.remote_state(), RemoteState::Error);
    }

    #[test]
    fn finished_statuses() {
        let finished: Vec<_> = BuildStatus::ALL.into_iter().filter(|s| s.is_finished()).collect();
        assert_eq!(
            finished,
            vec![
                BuildStatus::Success,
                BuildStatus::MissingFastfile,
                BuildStatus::Failure,
                BuildStatus::CiProblem,
            ]
        );
    }

    #[test]
    fn status_change_remote_visibility() {
        let quiet = StatusChange { from: Some(BuildStatus::Pending), to: BuildStatus::Running };
        assert!(!quiet.changes_remote_state());

        let loud = StatusChange { from: Some(BuildStatus::Running), to: BuildStatus::Failure };
        assert!(loud.changes_remote_state());

        let first = StatusChange { from: None, to: BuildStatus::Pending };
        assert!(first.changes_remote_state());
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_lenient")]
        status: Option<BuildStatus>,
    }

    #[test]
    fn lenient_deserialization_treats_placeholders_as_absent() {
        for raw in [r#"{}"#, r#"{"status":null}"#, r#"{"status":""}"#, r#"{"status":0}"#] {
            let holder: Holder = serde_json::from_str(raw).unwrap();
            assert_eq!(holder.status, None, "input: {raw}");
        }

        let holder: Holder = serde_json::from_str(r#"{"status":"installing_xcode"}"#).unwrap();
        assert_eq!(holder.status, Some(BuildStatus::InstallingXcode));

        assert!(serde_json::from_str::<Holder>(r#"{"status":"bogus"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"status":3}"#).is_err());
    }
}
