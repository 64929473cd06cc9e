//! The grouped changelog: change type → scope → entries.
//!
//! [`EntryBuckets`] accumulates entries in encounter order while fragments are
//! collected. Nothing is sorted until [`EntryBuckets::into_document`] builds the
//! final [`ChangelogDocument`].

use serde::Serialize;

use crate::domain::change::ChangelogEntry;
use crate::domain::scope::ScopePriority;

/// Change types with a fixed position in the output; others follow in encounter order.
const KNOWN_TYPES: &[(&str, &str)] = &[
    ("breaking_change", "Breaking Changes"),
    ("deprecation", "Deprecations"),
    ("dependency", "Dependencies"),
    ("feature", "Features"),
    ("performance", "Performance"),
    ("bugfix", "Fixes"),
];

#[derive(Debug, Clone, Serialize)]
pub struct ChangelogDocument {
    pub title: String,
    pub types: Vec<TypeSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub heading: String,
    pub scopes: Vec<ScopeSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeSection {
    pub scope: String,
    pub entries: Vec<ChangelogEntry>,
}

/// Two-level insertion-ordered map of entries.
#[derive(Debug, Default)]
pub struct EntryBuckets {
    types: Vec<(String, Vec<(String, Vec<ChangelogEntry>)>)>,
}

impl EntryBuckets {
    pub fn insert(&mut self, entry: ChangelogEntry) {
        let type_index = match self.types.iter().position(|(kind, _)| *kind == entry.kind) {
            Some(index) => index,
            None => {
                self.types.push((entry.kind.clone(), Vec::new()));
                self.types.len() - 1
            }
        };
        let scopes = &mut self.types[type_index].1;

        match scopes.iter().position(|(scope, _)| *scope == entry.scope) {
            Some(index) => scopes[index].1.push(entry),
            None => scopes.push((entry.scope.clone(), vec![entry])),
        }
    }

    pub fn len(&self) -> usize {
        self.types
            .iter()
            .flat_map(|(_, scopes)| scopes.iter())
            .map(|(_, entries)| entries.len())
            .sum()
    }

    pub fn into_document(self, title: &str, priorities: &ScopePriority) -> ChangelogDocument {
        let mut types: Vec<TypeSection> = self
            .types
            .into_iter()
            .map(|(kind, scopes)| {
                let mut scopes: Vec<ScopeSection> = scopes
                    .into_iter()
                    .map(|(scope, entries)| ScopeSection { scope, entries })
                    .collect();
                priorities.sort(&mut scopes, |section| section.scope.as_str());

                TypeSection {
                    heading: type_heading(&kind),
                    kind,
                    scopes,
                }
            })
            .collect();
        types.sort_by_key(|section| type_rank(&section.kind));

        ChangelogDocument {
            title: title.to_string(),
            types,
        }
    }
}

fn type_rank(kind: &str) -> usize {
    KNOWN_TYPES
        .iter()
        .position(|(known, _)| *known == kind)
        .unwrap_or(KNOWN_TYPES.len())
}

fn type_heading(kind: &str) -> String {
    KNOWN_TYPES
        .iter()
        .find(|(known, _)| *known == kind)
        .map(|(_, heading)| heading.to_string())
        .unwrap_or_else(|| kind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, scope: &str, message: &str) -> ChangelogEntry {
        ChangelogEntry {
            message: message.to_string(),
            kind: kind.to_string(),
            scope: scope.to_string(),
            ..ChangelogEntry::default()
        }
    }

    #[test]
    fn orders_scopes_by_priority_and_keeps_entry_order() {
        let mut buckets = EntryBuckets::default();
        buckets.insert(entry("bugfix", "Plugin", "p1"));
        buckets.insert(entry("bugfix", "Core", "c1"));
        buckets.insert(entry("bugfix", "Unknown", "u1"));
        buckets.insert(entry("bugfix", "Performance", "perf1"));
        buckets.insert(entry("bugfix", "Plugin", "p2"));
        assert_eq!(buckets.len(), 5);

        let doc = buckets.into_document("Kong", &ScopePriority::default());
        assert_eq!(doc.title, "Kong");
        let scopes: Vec<&str> = doc.types[0]
            .scopes
            .iter()
            .map(|s| s.scope.as_str())
            .collect();
        assert_eq!(scopes, vec!["Performance", "Core", "Plugin", "Unknown"]);

        let plugin: Vec<&str> = doc.types[0].scopes[2]
            .entries
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(plugin, vec!["p1", "p2"]);
    }

    #[test]
    fn known_types_come_first_in_fixed_order() {
        let mut buckets = EntryBuckets::default();
        buckets.insert(entry("chore", "Core", "a"));
        buckets.insert(entry("bugfix", "Core", "b"));
        buckets.insert(entry("feature", "Core", "c"));
        buckets.insert(entry("docs", "Core", "d"));

        let doc = buckets.into_document("t", &ScopePriority::default());
        let kinds: Vec<&str> = doc.types.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["feature", "bugfix", "chore", "docs"]);
        assert_eq!(doc.types[0].heading, "Features");
        assert_eq!(doc.types[2].heading, "chore");
    }

    #[test]
    fn default_scope_sorts_like_an_unknown_scope() {
        let mut buckets = EntryBuckets::default();
        buckets.insert(entry("feature", "Default", "d"));
        buckets.insert(entry("feature", "Mystery", "m"));
        buckets.insert(entry("feature", "Clustering", "c"));

        let doc = buckets.into_document("t", &ScopePriority::default());
        let scopes: Vec<&str> = doc.types[0]
            .scopes
            .iter()
            .map(|s| s.scope.as_str())
            .collect();
        assert_eq!(scopes, vec!["Clustering", "Default", "Mystery"]);
    }
}
