//! In-memory service implementations for workflow tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, DEFAULT_TICKET_BASE_URL, ResolutionStrategy};
use crate::context::AppContext;
use crate::domain::pull_request::{CommitSummary, PullRequestSummary};
use crate::domain::repository::RepoSlug;
use crate::domain::scope::ScopePriority;
use crate::error::{AppError, AppResult};
use crate::services::{HostingPlatformService, VersionControlService};

#[derive(Default)]
pub struct FakeGit {
    commits: HashMap<PathBuf, String>,
}

impl FakeGit {
    pub fn with_commit(mut self, path: impl Into<PathBuf>, sha: &str) -> Self {
        self.commits.insert(path.into(), sha.to_string());
        self
    }
}

#[async_trait]
impl VersionControlService for FakeGit {
    async fn originating_commit(&self, path: &Path) -> AppResult<String> {
        self.commits
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::NotFound(path.to_path_buf()))
    }
}

#[derive(Default)]
pub struct FakePlatform {
    pulls: HashMap<String, Vec<PullRequestSummary>>,
    history: HashMap<String, Vec<CommitSummary>>,
}

impl FakePlatform {
    pub fn with_pulls(mut self, sha: &str, pulls: Vec<PullRequestSummary>) -> Self {
        self.pulls.insert(sha.to_string(), pulls);
        self
    }

    pub fn with_history(mut self, path: &str, commits: Vec<CommitSummary>) -> Self {
        self.history.insert(path.to_string(), commits);
        self
    }
}

#[async_trait]
impl HostingPlatformService for FakePlatform {
    async fn pull_requests_for_commit(
        &self,
        _repo: &RepoSlug,
        sha: &str,
    ) -> AppResult<Vec<PullRequestSummary>> {
        Ok(self.pulls.get(sha).cloned().unwrap_or_default())
    }

    async fn commit_history_for_path(
        &self,
        _repo: &RepoSlug,
        path: &str,
    ) -> AppResult<Vec<CommitSummary>> {
        self.history.get(path).cloned().ok_or(AppError::Http {
            status: 404,
            body: format!("no history for {path}"),
        })
    }
}

pub fn merged_pull(number: u64, body: &str) -> PullRequestSummary {
    PullRequestSummary {
        number,
        title: format!("PR {number}"),
        body: Some(body.to_string()),
        merged_at: Some("2024-01-15T10:30:00Z".to_string()),
        html_url: format!("https://github.com/Kong/kong/pull/{number}"),
    }
}

pub fn open_pull(number: u64) -> PullRequestSummary {
    PullRequestSummary {
        merged_at: None,
        ..merged_pull(number, "")
    }
}

pub fn config(repo_path: &Path, strategy: ResolutionStrategy) -> AppConfig {
    AppConfig {
        repo_path: repo_path.to_path_buf(),
        changelog_paths: vec![PathBuf::from("changelog")],
        title: "Kong".to_string(),
        api_repo: RepoSlug::new("Kong", "kong"),
        issue_repo: RepoSlug::new("Kong", "kong"),
        with_tickets: true,
        ticket_base_url: DEFAULT_TICKET_BASE_URL.to_string(),
        web_base_url: "https://github.com".to_string(),
        link_org: "Kong".to_string(),
        strategy,
        scope_priority: ScopePriority::default(),
        github_token: "test-token".to_string(),
        github_api_url: "http://127.0.0.1:1".to_string(),
    }
}

pub fn context(git: FakeGit, platform: FakePlatform, strategy: ResolutionStrategy) -> AppContext {
    AppContext::new(
        config(Path::new("."), strategy),
        Arc::new(git),
        Arc::new(platform),
    )
}
