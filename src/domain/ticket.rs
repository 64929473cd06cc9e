use serde::Serialize;

/// A ticket in the external issue tracker, e.g. `KAG-1234`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRef {
    pub id: String,
    pub link: String,
}

/// A pull request or issue on the hosting platform, displayed as `#N` or `OWNER/REPO#N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRef {
    pub label: String,
    pub link: String,
}

impl TicketRef {
    pub fn new(id: &str, base_url: &str) -> Self {
        Self {
            id: id.to_string(),
            link: format!("{base_url}{id}"),
        }
    }
}

impl IssueRef {
    pub fn for_number(number: u64, web_base_url: &str, issue_repo: &str) -> Self {
        Self {
            label: format!("#{number}"),
            link: format!(
                "{}/{}/issues/{}",
                web_base_url.trim_end_matches('/'),
                issue_repo,
                number
            ),
        }
    }
}

/// Appends `ticket` unless one with the same id is already present.
pub fn push_ticket(list: &mut Vec<TicketRef>, ticket: TicketRef) {
    if !list.iter().any(|existing| existing.id == ticket.id) {
        list.push(ticket);
    }
}

/// Appends `issue` unless one with the same label is already present.
pub fn push_issue(list: &mut Vec<IssueRef>, issue: IssueRef) {
    if !list.iter().any(|existing| existing.label == issue.label) {
        list.push(issue);
    }
}
