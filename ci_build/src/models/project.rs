//! ci.project — The project a build belongs to, and where its code lives.

use serde::{Deserialize, Serialize};

/// Git hosting provider a repository lives on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoHost {
    GitHub,
    GitLab,
    /// Self-hosted forge; `web_url` is the base used for browser links.
    Custom { web_url: String },
}

/// Remote repository configuration of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub host: RepoHost,
    /// `owner/name` on the host.
    pub full_name: String,
}

impl RepoConfig {
    pub fn github(full_name: impl Into<String>) -> Self {
        Self {
            host: RepoHost::GitHub,
            full_name: full_name.into(),
        }
    }

    pub fn gitlab(full_name: impl Into<String>) -> Self {
        Self {
            host: RepoHost::GitLab,
            full_name: full_name.into(),
        }
    }

    /// Browser URL of the repository.
    pub fn html_url(&self) -> String {
        match &self.host {
            RepoHost::GitHub => format!("https://github.com/{}", self.full_name),
            RepoHost::GitLab => format!("https://gitlab.com/{}", self.full_name),
            RepoHost::Custom { web_url } => {
                format!("{}/{}", web_url.trim_end_matches('/'), self.full_name)
            }
        }
    }

    /// Browser URL of a single commit.
    pub fn link_to_remote_commit(&self, sha: &str) -> String {
        match self.host {
            RepoHost::GitLab => format!("{}/-/commit/{sha}", self.html_url()),
            RepoHost::GitHub | RepoHost::Custom { .. } => {
                format!("{}/commit/{sha}", self.html_url())
            }
        }
    }
}

/// A registered project. Builds hold a shared reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub repo_config: Option<RepoConfig>,
}

impl Project {
    pub fn new(id: i64, name: impl Into<String>, repo_config: Option<RepoConfig>) -> Self {
        Self {
            id,
            name: name.into(),
            repo_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_commit_link() {
        let repo = RepoConfig::github("centrixsystems/ci");
        assert_eq!(
            repo.link_to_remote_commit("abc123"),
            "https://github.com/centrixsystems/ci/commit/abc123"
        );
    }

    #[test]
    fn gitlab_commit_link() {
        let repo = RepoConfig::gitlab("group/app");
        assert_eq!(
            repo.link_to_remote_commit("abc123"),
            "https://gitlab.com/group/app/-/commit/abc123"
        );
    }

    #[test]
    fn custom_host_trims_trailing_slash() {
        let repo = RepoConfig {
            host: RepoHost::Custom {
                web_url: "https://git.example.com/".to_string(),
            },
            full_name: "team/app".to_string(),
        };
        assert_eq!(repo.html_url(), "https://git.example.com/team/app");
        assert_eq!(
            repo.link_to_remote_commit("ff00"),
            "https://git.example.com/team/app/commit/ff00"
        );
    }
}
