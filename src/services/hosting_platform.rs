use async_trait::async_trait;

use crate::domain::pull_request::{CommitSummary, PullRequestSummary};
use crate::domain::repository::RepoSlug;
use crate::error::AppResult;

#[async_trait]
pub trait HostingPlatformService: Send + Sync {
    /// Pull requests that contain `sha`, in the order the platform lists them.
    async fn pull_requests_for_commit(
        &self,
        repo: &RepoSlug,
        sha: &str,
    ) -> AppResult<Vec<PullRequestSummary>>;

    /// Commits touching `path`, newest first.
    async fn commit_history_for_path(
        &self,
        repo: &RepoSlug,
        path: &str,
    ) -> AppResult<Vec<CommitSummary>>;
}
