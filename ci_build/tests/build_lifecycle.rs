//! Drives a build record through a full pipeline run via the public API.

use std::sync::Arc;

use ci_build::config::ReportConfig;
use ci_build::models::artifact::Artifact;
use ci_build::models::git_fork_config::GitForkConfig;
use ci_build::models::project::{Project, RepoConfig};
use ci_build::services::status_report::StatusReport;
use ci_build::{BuildConfig, BuildError, BuildRecord, BuildStatus, RemoteState};

fn new_build() -> BuildRecord {
    let project = Arc::new(Project::new(
        5,
        "mobile-app",
        Some(RepoConfig::github("acme/mobile-app")),
    ));
    BuildRecord::new(BuildConfig {
        project: Some(project),
        number: 101,
        status: Some(BuildStatus::Pending),
        trigger: "pull_request".to_string(),
        lane: "test".to_string(),
        platform: "ios".to_string(),
        git_fork_config: Some(GitForkConfig {
            sha: "abcdef1234567".to_string(),
            branch: String::new(),
            clone_url: Some("https://github.com/contributor/mobile-app.git".to_string()),
            git_ref: Some("refs/pull/17/head".to_string()),
        }),
        build_tools: [("xcode".to_string(), "15.2".to_string())].into_iter().collect(),
        ..BuildConfig::default()
    })
}

#[test]
fn pipeline_run_from_pending_to_failure() {
    let mut build = new_build();
    let config = ReportConfig {
        dashboard_url: "https://ci.acme.dev".to_string(),
        status_context: "acme-ci".to_string(),
    };

    let mut remote_updates = Vec::new();
    for status in ["installing_xcode", "running"] {
        let change = build.set_status(Some(status)).unwrap().unwrap();
        if change.changes_remote_state() {
            remote_updates.push(StatusReport::for_build(&build, &config).unwrap().state);
        }
    }
    // Still pending on the remote side.
    assert!(remote_updates.is_empty());

    assert!(matches!(
        build.set_status(Some("exploded")),
        Err(BuildError::InvalidStatus(_))
    ));
    assert_eq!(build.status(), Some(BuildStatus::Running));

    build.add_artifact(Artifact::new("fastlane.log", "log"));
    let change = build.finish(240, BuildStatus::Failure);
    assert!(change.changes_remote_state());

    let report = StatusReport::for_build(&build, &config).unwrap();
    assert_eq!(report.state, RemoteState::Failure);
    assert_eq!(report.sha, "abcdef1234567");
    assert_eq!(report.target_url, "https://ci.acme.dev/projects/5/builds/101");
    assert_eq!(report.context, "acme-ci/ios/test");

    assert_eq!(build.human_friendly_branch_info().unwrap(), "abcdef1");
    assert_eq!(
        build.link_to_remote_commit().unwrap(),
        "https://github.com/acme/mobile-app/commit/abcdef1234567"
    );
    assert_eq!(build.artifacts().len(), 1);
    assert_eq!(build.duration, 240);
}

#[test]
fn migrated_build_links_to_new_host() {
    let mut build = new_build();
    let fingerprint = build.fingerprint().unwrap();

    build.reparent(Arc::new(Project::new(
        8,
        "mobile-app",
        Some(RepoConfig::gitlab("acme/mobile-app")),
    )));

    assert_eq!(build.key().unwrap().to_string(), "8#101");
    assert_eq!(
        build.link_to_remote_commit().unwrap(),
        "https://gitlab.com/acme/mobile-app/-/commit/abcdef1234567"
    );
    assert_ne!(build.fingerprint().unwrap(), fingerprint);
}

#[test]
fn stored_record_reloads_through_config() {
    let mut build = new_build();
    build.set_status(Some("success")).unwrap();
    build.add_artifact(Artifact::new("app.ipa", "binary"));

    let stored = serde_json::to_string(&build).unwrap();
    let mut reloaded = BuildRecord::new(serde_json::from_str::<BuildConfig>(&stored).unwrap());

    assert_eq!(reloaded.status(), Some(BuildStatus::Success));
    assert_eq!(reloaded.timestamp(), build.timestamp());
    assert_eq!(reloaded.git_fork_config(), build.git_fork_config());
    assert!(reloaded.artifacts().is_empty());
    assert!(reloaded.project().is_none());

    reloaded.set_status(None).unwrap();
    assert_eq!(reloaded.status(), Some(BuildStatus::Success));
}
