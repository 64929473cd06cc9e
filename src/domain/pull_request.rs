use serde::Deserialize;

/// A pull request as returned by the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    pub merged_at: Option<String>,
    #[serde(default)]
    pub html_url: String,
}

/// A commit as returned by the hosting platform's history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
}

impl PullRequestSummary {
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Picks the most recently merged pull request: the last merged one in the list.
pub fn latest_merged(pulls: &[PullRequestSummary]) -> Option<&PullRequestSummary> {
    pulls.iter().rev().find(|pull| pull.merged_at.is_some())
}
