//! Status reporting configuration — loaded from environment variables.

const DEFAULT_DASHBOARD_URL: &str = "http://localhost:9090/ci";
const DEFAULT_STATUS_CONTEXT: &str = "centrix-ci";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    /// Dashboard base URL used for commit status links.
    pub dashboard_url: String,
    /// Context prefix shown next to the commit status on the git host.
    pub status_context: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            status_context: DEFAULT_STATUS_CONTEXT.to_string(),
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Self {
        let dashboard_url = std::env::var("CI_DASHBOARD_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());
        let status_context = std::env::var("CI_STATUS_CONTEXT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS_CONTEXT.to_string());

        if dashboard_url == DEFAULT_DASHBOARD_URL {
            tracing::warn!("CI_DASHBOARD_URL not set -- status links point at localhost");
        }

        Self {
            dashboard_url,
            status_context,
        }
    }
}
