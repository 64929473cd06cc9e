//! Rendering of a [`ChangelogDocument`] for standard output.

use std::fmt::{self, Write as _};

use crate::domain::change::{ChangelogEntry, DEFAULT_SCOPE};
use crate::domain::document::ChangelogDocument;
use crate::error::{AppError, AppResult};

pub fn markdown(doc: &ChangelogDocument, with_tickets: bool) -> AppResult<String> {
    let mut out = String::new();
    write_markdown(&mut out, doc, with_tickets)
        .map_err(|err| AppError::Render(format!("failed to render markdown: {err}")))?;
    Ok(out)
}

/// JSON tree of `doc`. Ticket references are left empty unless `with_tickets` is set.
pub fn json(doc: &ChangelogDocument, with_tickets: bool) -> AppResult<String> {
    let rendered = if with_tickets {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string_pretty(&without_tickets(doc))
    };
    rendered.map_err(|err| AppError::Render(format!("failed to render json: {err}")))
}

fn without_tickets(doc: &ChangelogDocument) -> ChangelogDocument {
    let mut doc = doc.clone();
    doc.types
        .iter_mut()
        .flat_map(|section| section.scopes.iter_mut())
        .flat_map(|scope| scope.entries.iter_mut())
        .for_each(|entry| entry.tickets.clear());
    doc
}

fn write_markdown(out: &mut String, doc: &ChangelogDocument, with_tickets: bool) -> fmt::Result {
    writeln!(out, "## {}", doc.title)?;

    for section in &doc.types {
        writeln!(out)?;
        writeln!(out, "### {}", section.heading)?;

        for scope in &section.scopes {
            writeln!(out)?;
            if scope.scope != DEFAULT_SCOPE {
                writeln!(out, "#### {}", scope.scope)?;
                writeln!(out)?;
            }
            for entry in &scope.entries {
                write_entry(out, entry, with_tickets)?;
            }
        }
    }

    Ok(())
}

fn write_entry(out: &mut String, entry: &ChangelogEntry, with_tickets: bool) -> fmt::Result {
    let mut lines = entry.message.trim().lines();
    write!(out, "- {}", lines.next().unwrap_or_default())?;
    for line in lines {
        write!(out, "\n  {}", line.trim_end())?;
    }

    let mut links: Vec<String> = entry
        .issues
        .iter()
        .map(|issue| format!("[{}]({})", issue.label, issue.link))
        .collect();
    if with_tickets {
        links.extend(
            entry
                .tickets
                .iter()
                .map(|ticket| format!("[{}]({})", ticket.id, ticket.link)),
        );
    }
    if !links.is_empty() {
        write!(out, "\n  {}", links.join(" "))?;
    }

    writeln!(out)
}
