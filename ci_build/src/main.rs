//! Centrix CI build inspector.
//!
//! Loads a stored build record (JSON) and prints what the platform derives
//! from it: identity, branch label, commit link, and the commit status that
//! would be posted to the git host.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use ci_build::config::ReportConfig;
use ci_build::models::project::{Project, RepoConfig};
use ci_build::services::status_report::StatusReport;
use ci_build::{BuildConfig, BuildRecord};

#[derive(Parser)]
#[command(name = "centrix-ci-build", about = "Inspect Centrix CI build records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print identity and derived fields of a build
    Inspect(BuildArgs),
    /// Print the commit status payload for a build
    Report {
        #[command(flatten)]
        build: BuildArgs,

        /// Apply this status before reporting
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Stored build record (JSON)
    path: PathBuf,

    /// Project id the build belongs to
    #[arg(long, env = "CI_PROJECT_ID")]
    project_id: Option<i64>,

    /// Repository as `owner/name`
    #[arg(long, env = "CI_PROJECT_REPO")]
    repo: Option<String>,

    /// Git host of the repository
    #[arg(long, value_enum, default_value = "github")]
    host: Host,
}

#[derive(Clone, Copy, ValueEnum)]
enum Host {
    Github,
    Gitlab,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Inspect(args) => {
            let build = load_build(&args)?;
            print_summary(&build)?;
        }
        Command::Report { build, status } => {
            let mut record = load_build(&build)?;
            if let Some(change) = record.set_status(status.as_deref())? {
                tracing::info!(from = ?change.from, to = %change.to, "Applied status");
            }
            let report = StatusReport::for_build(&record, &ReportConfig::from_env())?;
            println!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    Ok(())
}

fn load_build(args: &BuildArgs) -> anyhow::Result<BuildRecord> {
    let config = read_config(&args.path)?;
    let mut build = BuildRecord::new(config);

    if let Some(project_id) = args.project_id {
        let repo_config = args.repo.as_ref().map(|name| match args.host {
            Host::Github => RepoConfig::github(name.as_str()),
            Host::Gitlab => RepoConfig::gitlab(name.as_str()),
        });
        let name = args.repo.clone().unwrap_or_else(|| format!("project-{project_id}"));
        build.reparent(Arc::new(Project::new(project_id, name, repo_config)));
    }

    Ok(build)
}

fn read_config(path: &Path) -> anyhow::Result<BuildConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading build record {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing build record {}", path.display()))
}

fn print_summary(build: &BuildRecord) -> anyhow::Result<()> {
    let key = build
        .key()
        .map(|k| k.to_string())
        .unwrap_or_else(|| format!("?#{}", build.number()));
    let status = build
        .status()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unset".to_string());

    println!("build:       {key}");
    println!("status:      {status}");
    println!("started at:  {}", build.timestamp().to_rfc3339());
    if build.has_started() {
        println!("duration:    {}s", build.duration);
    }
    println!("trigger:     {}", build.trigger);
    println!("lane:        {} {}", build.platform, build.lane);
    println!("sha:         {}", build.sha()?);
    println!("branch:      {}", build.human_friendly_branch_info()?);
    match build.link_to_remote_commit() {
        Ok(link) => println!("commit:      {link}"),
        Err(e) => tracing::debug!("No commit link: {e}"),
    }
    println!("fingerprint: {}", build.fingerprint()?);
    for (tool, version) in &build.build_tools {
        println!("tool:        {tool} {version}");
    }

    Ok(())
}
