use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::{DEFAULT_TICKET_BASE_URL, ResolutionStrategy};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::render;
use crate::workflow::collect::collect;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// The repository path (/path/to/your/repository).
    #[arg(long)]
    pub repo_path: PathBuf,

    /// Changelog folder paths relative to the repository (changelog/unreleased/kong).
    #[arg(
        long = "changelog-paths",
        alias = "changelog-path",
        value_delimiter = ',',
        num_args = 1..,
        required = true
    )]
    pub changelog_paths: Vec<PathBuf>,

    /// The title of the generated changelog (Kong).
    #[arg(long)]
    pub title: String,

    /// Repository used to compose issue links (OWNER/REPO).
    #[arg(long)]
    pub github_issue_repo: String,

    /// Repository queried through the GitHub API (OWNER/REPO).
    #[arg(long)]
    pub github_api_repo: String,

    /// Display Jira links.
    #[arg(long)]
    pub with_jiras: bool,

    /// How each fragment's pull request is resolved.
    #[arg(long, value_enum, default_value_t = ResolutionStrategy::Locator)]
    pub strategy: ResolutionStrategy,

    /// Prefix joined with a ticket id to build its link.
    #[arg(long, default_value = DEFAULT_TICKET_BASE_URL)]
    pub ticket_base_url: String,

    /// Organization whose issue and pull request URLs are picked up from descriptions.
    /// Defaults to the owner of --github-issue-repo.
    #[arg(long)]
    pub link_org: Option<String>,

    /// Extra scope ordering, as NAME=PRIORITY (repeatable; lower sorts first).
    #[arg(long = "scope-priority", value_name = "NAME=PRIORITY")]
    pub scope_priorities: Vec<String>,

    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Collects the changelog and renders it; nothing is rendered if any fragment fails.
pub async fn run(ctx: &AppContext, format: OutputFormat) -> AppResult<String> {
    let document = collect(ctx).await?;

    match format {
        OutputFormat::Markdown => render::markdown(&document, ctx.config.with_tickets),
        OutputFormat::Json => render::json(&document, ctx.config.with_tickets),
    }
}
