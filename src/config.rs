use std::env;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::cmd::generate::GenerateArgs;
use crate::domain::repository::RepoSlug;
use crate::domain::scope::{ScopePriority, parse_override};
use crate::error::{AppError, AppResult};
use crate::infra::github::DEFAULT_API_URL;

pub const DEFAULT_TICKET_BASE_URL: &str = "https://konghq.atlassian.net/browse/";
const DEFAULT_WEB_URL: &str = "https://github.com";

/// How a fragment's commit context is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResolutionStrategy {
    /// Trace the file's originating commit locally, then ask GitHub for its pull request.
    #[default]
    Locator,
    /// Ask GitHub for the file's commit history and mine the commit message as well.
    History,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub repo_path: PathBuf,
    pub changelog_paths: Vec<PathBuf>,
    pub title: String,
    pub api_repo: RepoSlug,
    pub issue_repo: RepoSlug,
    pub with_tickets: bool,
    pub ticket_base_url: String,
    pub web_base_url: String,
    pub link_org: String,
    pub strategy: ResolutionStrategy,
    pub scope_priority: ScopePriority,
    pub github_token: String,
    pub github_api_url: String,
}

/// Values read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub github_server_url: Option<String>,
}

impl Environment {
    pub fn capture() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|value| !value.trim().is_empty());
        Self {
            github_token: read("GITHUB_TOKEN"),
            github_api_url: read("GITHUB_API_URL"),
            github_server_url: read("GITHUB_SERVER_URL"),
        }
    }
}

impl AppConfig {
    pub fn load(args: &GenerateArgs) -> AppResult<Self> {
        Self::resolve(args, Environment::capture())
    }

    pub fn resolve(args: &GenerateArgs, environment: Environment) -> AppResult<Self> {
        let github_token = environment.github_token.ok_or_else(|| {
            AppError::Configuration("environment variable GITHUB_TOKEN is required".to_string())
        })?;

        let changelog_paths: Vec<PathBuf> = args
            .changelog_paths
            .iter()
            .filter(|path| !path.as_os_str().is_empty())
            .cloned()
            .collect();
        if changelog_paths.is_empty() {
            return Err(AppError::Configuration(
                "at least one changelog path is required".to_string(),
            ));
        }

        let api_repo: RepoSlug = args.github_api_repo.parse()?;
        let issue_repo: RepoSlug = args.github_issue_repo.parse()?;

        let overrides = args
            .scope_priorities
            .iter()
            .map(|value| parse_override(value))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            repo_path: args.repo_path.clone(),
            changelog_paths,
            title: args.title.clone(),
            link_org: args
                .link_org
                .clone()
                .unwrap_or_else(|| issue_repo.owner.clone()),
            api_repo,
            issue_repo,
            with_tickets: args.with_jiras,
            ticket_base_url: args.ticket_base_url.clone(),
            web_base_url: environment
                .github_server_url
                .unwrap_or_else(|| DEFAULT_WEB_URL.to_string()),
            strategy: args.strategy,
            scope_priority: ScopePriority::default().with_overrides(&overrides),
            github_token,
            github_api_url: environment
                .github_api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}
