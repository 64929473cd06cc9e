use async_trait::async_trait;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, LINK, USER_AGENT},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::pull_request::{CommitSummary, PullRequestSummary};
use crate::domain::repository::RepoSlug;
use crate::error::{AppError, AppResult};
use crate::services::HostingPlatformService;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const HISTORY_PAGE_SIZE: &str = "100";

const CLIENT_USER_AGENT: &str = concat!("changelog/", env!("CARGO_PKG_VERSION"));

pub struct GithubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(api_url: String, token: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            token,
        }
    }

    fn repo_endpoint(&self, repo: &RepoSlug, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url.trim_end_matches('/'),
            repo.owner,
            repo.name,
            suffix
        )
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> AppResult<Response> {
        debug!("curl '{url}' -H 'Authorization: Bearer ghp_******'");

        let response = self
            .http
            .get(url)
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|err| AppError::Transport(err.to_string()))?;

        let status = response.status();
        if is_rate_limited(&response) {
            return Err(AppError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

fn is_rate_limited(response: &Response) -> bool {
    let exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim() == "0");

    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => exhausted,
        _ => false,
    }
}

/// Target of the `rel="next"` entry of a `Link` header, if any.
fn next_page(response: &Response) -> Option<String> {
    let link = response.headers().get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        params
            .split(';')
            .any(|param| param.trim() == r#"rel="next""#)
            .then(|| {
                target
                    .trim()
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string()
            })
    })
}

#[async_trait]
impl HostingPlatformService for GithubClient {
    async fn pull_requests_for_commit(
        &self,
        repo: &RepoSlug,
        sha: &str,
    ) -> AppResult<Vec<PullRequestSummary>> {
        let url = self.repo_endpoint(repo, &format!("commits/{sha}/pulls"));
        let response = self.get(&url, &[]).await?;

        response.json().await.map_err(|err| {
            AppError::Transport(format!("failed to parse pull requests for {sha}: {err}"))
        })
    }

    async fn commit_history_for_path(
        &self,
        repo: &RepoSlug,
        path: &str,
    ) -> AppResult<Vec<CommitSummary>> {
        let mut url = self.repo_endpoint(repo, "commits");
        let mut query = vec![("path", path), ("per_page", HISTORY_PAGE_SIZE)];
        let mut commits = Vec::new();

        // Newest first; the oldest commit is only known once every page is read.
        loop {
            let response = self.get(&url, &query).await?;
            let next = next_page(&response);
            let payload: Vec<GithubCommitResponse> = response.json().await.map_err(|err| {
                AppError::Transport(format!("failed to parse commits for {path}: {err}"))
            })?;
            commits.extend(payload.into_iter().map(|item| CommitSummary {
                sha: item.sha,
                message: item.commit.message,
            }));

            match next {
                Some(next) => {
                    url = next;
                    query.clear();
                }
                None => break,
            }
        }

        Ok(commits)
    }
}

#[derive(Deserialize)]
struct GithubCommitResponse {
    sha: String,
    commit: GithubCommitDetail,
}

#[derive(Deserialize)]
struct GithubCommitDetail {
    #[serde(default)]
    message: String,
}
