use std::collections::HashMap;

use crate::domain::change::DEFAULT_SCOPE;
use crate::error::{AppError, AppResult};

/// Priority given to scopes missing from the table; equal to `Default`'s.
pub const UNKNOWN_SCOPE_PRIORITY: u32 = 100;

const BUILTIN_PRIORITIES: &[(&str, u32)] = &[
    ("Performance", 10),
    ("Configuration", 20),
    ("Core", 30),
    ("PDK", 40),
    ("Plugin", 50),
    ("Admin API", 60),
    ("Clustering", 70),
    (DEFAULT_SCOPE, UNKNOWN_SCOPE_PRIORITY),
];

/// Sort order for scopes within a change type. Lower sorts first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePriority {
    table: HashMap<String, u32>,
}

impl Default for ScopePriority {
    fn default() -> Self {
        Self {
            table: BUILTIN_PRIORITIES
                .iter()
                .map(|(scope, priority)| (scope.to_string(), *priority))
                .collect(),
        }
    }
}

impl ScopePriority {
    pub fn priority(&self, scope: &str) -> u32 {
        self.table
            .get(scope)
            .copied()
            .unwrap_or(UNKNOWN_SCOPE_PRIORITY)
    }

    /// Returns a copy with `overrides` applied on top of this table.
    pub fn with_overrides(mut self, overrides: &[(String, u32)]) -> Self {
        for (scope, priority) in overrides {
            self.table.insert(scope.clone(), *priority);
        }
        self
    }

    /// Stable sort: scopes sharing a priority keep their relative order.
    pub fn sort<T>(&self, items: &mut [T], scope_of: impl Fn(&T) -> &str) {
        items.sort_by_key(|item| self.priority(scope_of(item)));
    }
}

/// Parses a `NAME=PRIORITY` override as given on the command line.
pub fn parse_override(value: &str) -> AppResult<(String, u32)> {
    let (name, priority) = value.rsplit_once('=').ok_or_else(|| {
        AppError::Configuration(format!("expected NAME=PRIORITY, got '{value}'"))
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Configuration(format!(
            "scope name missing in '{value}'"
        )));
    }
    let priority = priority.trim().parse::<u32>().map_err(|err| {
        AppError::Configuration(format!("invalid priority in '{value}': {err}"))
    })?;
    Ok((name.to_string(), priority))
}
