use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::ticket::{IssueRef, TicketRef};
use crate::error::{AppError, AppResult};

pub const DEFAULT_SCOPE: &str = "Default";

/// One changelog entry, parsed from a fragment file and enriched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangelogEntry {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub scope: String,
    pub prs: Vec<u64>,
    pub githubs: Vec<u64>,
    pub jiras: Vec<String>,
    pub tickets: Vec<TicketRef>,
    pub issues: Vec<IssueRef>,
}

#[derive(Deserialize)]
struct FragmentFile {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
    scope: Option<String>,
    prs: Option<Vec<u64>>,
    githubs: Option<Vec<u64>>,
    jiras: Option<Vec<String>>,
}

impl ChangelogEntry {
    pub fn parse(path: &Path, contents: &str) -> AppResult<Self> {
        let fragment: FragmentFile =
            serde_yaml::from_str(contents).map_err(|err| AppError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        Ok(Self {
            message: fragment.message,
            kind: fragment.kind,
            scope: fragment.scope.unwrap_or_default(),
            prs: fragment.prs.unwrap_or_default(),
            githubs: fragment.githubs.unwrap_or_default(),
            jiras: fragment.jiras.unwrap_or_default(),
            tickets: Vec::new(),
            issues: Vec::new(),
        })
    }

    /// Replaces a blank scope with [`DEFAULT_SCOPE`].
    pub fn apply_default_scope(&mut self) {
        if self.scope.trim().is_empty() {
            self.scope = DEFAULT_SCOPE.to_string();
        }
    }
}
