//! Extraction of ticket identifiers and cross-repository links from free text.
//!
//! Pull request descriptions and commit messages mention tickets (`KAG-123`) and
//! link to related issues (`https://github.com/Kong/kong-ee/pull/9`). The
//! extractor turns those mentions into [`TicketRef`] and [`IssueRef`] values.
//! Duplicates are dropped by id or label; the first occurrence wins and output
//! keeps first-occurrence order.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::repository::RepoSlug;
use crate::domain::ticket::{IssueRef, TicketRef, push_issue, push_ticket};
use crate::error::{AppError, AppResult};

static TICKET_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]+-[0-9]+\b").expect("Invalid ticket candidate regex"));

static TICKET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,8}-[0-9]{1,6}$").expect("Invalid ticket id regex"));

/// References mined from one or more pieces of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedReferences {
    pub tickets: Vec<TicketRef>,
    pub issues: Vec<IssueRef>,
}

impl ExtractedReferences {
    /// Folds `other` into `self`, keeping entries already present.
    pub fn merge(&mut self, other: ExtractedReferences) {
        for ticket in other.tickets {
            push_ticket(&mut self.tickets, ticket);
        }
        for issue in other.issues {
            push_issue(&mut self.issues, issue);
        }
    }

    pub fn ticket_ids(&self) -> Vec<String> {
        self.tickets.iter().map(|ticket| ticket.id.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    ticket_base_url: String,
    current_repo: RepoSlug,
    cross_repo: Regex,
}

impl ReferenceExtractor {
    /// `link_org` limits cross-repository links to repositories owned by that organization.
    pub fn new(
        ticket_base_url: &str,
        web_base_url: &str,
        link_org: &str,
        current_repo: RepoSlug,
    ) -> AppResult<Self> {
        let pattern = format!(
            r"{}/((?i:{}))/([A-Za-z0-9_.\-]+)/(?:pull|issues)/([0-9]+)\b",
            regex::escape(web_base_url.trim_end_matches('/')),
            regex::escape(link_org),
        );
        let cross_repo = Regex::new(&pattern).map_err(|err| {
            AppError::Configuration(format!("invalid cross-repository link pattern: {err}"))
        })?;

        Ok(Self {
            ticket_base_url: ticket_base_url.to_string(),
            current_repo,
            cross_repo,
        })
    }

    pub fn ticket_link(&self, id: &str) -> TicketRef {
        TicketRef::new(id, &self.ticket_base_url)
    }

    pub fn extract(&self, text: &str) -> ExtractedReferences {
        let mut found = ExtractedReferences::default();

        for id in ticket_ids(text) {
            push_ticket(&mut found.tickets, self.ticket_link(&id));
        }

        for caps in self.cross_repo.captures_iter(text) {
            let owner = &caps[1];
            let repo = &caps[2];
            let number = &caps[3];
            let label = if self.current_repo.matches(owner, repo) {
                format!("#{number}")
            } else {
                format!("{owner}/{repo}#{number}")
            };
            push_issue(
                &mut found.issues,
                IssueRef {
                    label,
                    link: caps[0].to_string(),
                },
            );
        }

        found
    }
}

/// Distinct ticket ids in `text`, in order of first appearance.
pub fn ticket_ids(text: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for candidate in TICKET_CANDIDATE.find_iter(text) {
        let candidate = candidate.as_str();
        if TICKET_ID.is_match(candidate) && !ids.iter().any(|id| id == candidate) {
            ids.push(candidate.to_string());
        }
    }
    ids
}
