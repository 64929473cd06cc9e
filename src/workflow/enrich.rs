use std::path::Path;

use tracing::debug;

use crate::config::ResolutionStrategy;
use crate::context::AppContext;
use crate::domain::change::ChangelogEntry;
use crate::domain::pull_request::{PullRequestSummary, latest_merged};
use crate::domain::reference::{ExtractedReferences, ReferenceExtractor};
use crate::domain::ticket::{IssueRef, push_issue, push_ticket};
use crate::error::{AppError, AppResult};

/// Provenance of one fragment: its pull request and the references mined for it.
#[derive(Debug, Clone)]
pub struct CommitContext {
    pub pull_request: PullRequestSummary,
    pub references: ExtractedReferences,
}

pub struct EntryEnricher<'a> {
    ctx: &'a AppContext,
    extractor: ReferenceExtractor,
}

impl<'a> EntryEnricher<'a> {
    pub fn new(ctx: &'a AppContext) -> AppResult<Self> {
        let config = &ctx.config;
        let extractor = ReferenceExtractor::new(
            &config.ticket_base_url,
            &config.web_base_url,
            &config.link_org,
            config.issue_repo.clone(),
        )?;
        Ok(Self { ctx, extractor })
    }

    /// Fills in scope, tickets and issue links for `entry`.
    ///
    /// `path` is the fragment's path relative to the repository root. Values the
    /// fragment declares explicitly are kept; inferred ones only fill empty fields.
    pub async fn enrich(&self, entry: &mut ChangelogEntry, path: &Path) -> AppResult<()> {
        entry.apply_default_scope();

        let context = self
            .commit_context(path)
            .await
            .map_err(|err| AppError::enrichment(path, err))?;
        self.apply(entry, context);
        Ok(())
    }

    pub async fn commit_context(&self, path: &Path) -> AppResult<CommitContext> {
        match self.ctx.config.strategy {
            ResolutionStrategy::Locator => self.locate_context(path).await,
            ResolutionStrategy::History => self.history_context(path).await,
        }
    }

    async fn locate_context(&self, path: &Path) -> AppResult<CommitContext> {
        let commit = self.ctx.version_control.originating_commit(path).await?;
        debug!("file {} original commit: {commit}", path.display());

        let pull_request = self.merged_pull_request(&commit).await?;
        debug!(
            "commit {commit} merged in #{}: {}",
            pull_request.number, pull_request.title
        );
        let references = ExtractedReferences {
            tickets: self.extractor.extract(pull_request.body_text()).tickets,
            issues: Vec::new(),
        };

        Ok(CommitContext {
            pull_request,
            references,
        })
    }

    async fn history_context(&self, path: &Path) -> AppResult<CommitContext> {
        let api_path = path.to_string_lossy().replace('\\', "/");
        let commits = self
            .ctx
            .platform
            .commit_history_for_path(&self.ctx.config.api_repo, &api_path)
            .await?;
        let origin = commits
            .last()
            .ok_or_else(|| AppError::NotFound(path.to_path_buf()))?;
        debug!("file {api_path} original commit: {}", origin.sha);

        let mut references = self.extractor.extract(&origin.message);
        let pull_request = self.merged_pull_request(&origin.sha).await?;
        references.merge(self.extractor.extract(pull_request.body_text()));

        let own_link = if pull_request.html_url.is_empty() {
            IssueRef::for_number(
                pull_request.number,
                &self.ctx.config.web_base_url,
                &self.ctx.config.issue_repo.to_string(),
            )
            .link
        } else {
            pull_request.html_url.clone()
        };
        push_issue(
            &mut references.issues,
            IssueRef {
                label: format!("#{}", pull_request.number),
                link: own_link,
            },
        );

        Ok(CommitContext {
            pull_request,
            references,
        })
    }

    async fn merged_pull_request(&self, sha: &str) -> AppResult<PullRequestSummary> {
        let pulls = self
            .ctx
            .platform
            .pull_requests_for_commit(&self.ctx.config.api_repo, sha)
            .await?;

        latest_merged(&pulls)
            .cloned()
            .ok_or_else(|| AppError::NoMergedPullRequest(sha.to_string()))
    }

    fn apply(&self, entry: &mut ChangelogEntry, context: CommitContext) {
        let CommitContext {
            pull_request,
            references,
        } = context;
        let config = &self.ctx.config;

        if entry.jiras.is_empty() {
            entry.jiras = references.ticket_ids();
        }
        entry.tickets.clear();
        for id in &entry.jiras {
            push_ticket(&mut entry.tickets, self.extractor.ticket_link(id.trim()));
        }

        let declared = !entry.githubs.is_empty() || !entry.prs.is_empty();
        if entry.githubs.is_empty() {
            entry.githubs = entry.prs.clone();
        }
        if entry.githubs.is_empty() {
            entry.githubs.push(pull_request.number);
        }

        let issue_repo = config.issue_repo.to_string();
        entry.issues.clear();
        for number in &entry.githubs {
            push_issue(
                &mut entry.issues,
                IssueRef::for_number(*number, &config.web_base_url, &issue_repo),
            );
        }
        if !declared {
            for issue in references.issues {
                push_issue(&mut entry.issues, issue);
            }
        }
    }
}
