//! Ticket notifications.

use std::fmt::Write;

use crate::base::types::{Fields, Ticket, actor_or_unknown};

use super::{
    Action, RenderError, Renderer,
    changes::{self, ChangeSet, FieldChange, LONG_TEXT_FIELDS},
    comment_header, non_empty,
    text::{self, MentionPattern},
};

/// Everything needed to render one ticket event.
struct TicketNotice<'a> {
    action: Action,
    ticket: &'a Ticket,
    author: &'a str,
    comment: Option<&'a str>,
    changes: Option<ChangeSet>,
    comment_number: Option<u32>,
}

impl Renderer {
    pub(super) fn ticket_created(&self, ticket: &Ticket) -> Result<String, RenderError> {
        let reporter = ticket.text("reporter").ok_or_else(|| RenderError::missing("reporter"))?;

        self.compose_ticket(TicketNotice {
            action: Action::New,
            ticket,
            author: reporter,
            comment: None,
            changes: None,
            comment_number: None,
        })
    }

    pub(super) fn ticket_changed(&self, ticket: &Ticket, author: Option<&str>, comment: Option<&str>, old_values: &Fields, comment_number: Option<u32>) -> Result<String, RenderError> {
        let changes = changes::build(&self.reported_fields, old_values, &ticket.fields, &self.date_format);

        self.compose_ticket(TicketNotice {
            action: Action::Edit,
            ticket,
            author: actor_or_unknown(author),
            comment: non_empty(comment),
            changes: Some(changes),
            comment_number,
        })
    }

    pub(super) fn ticket_comment_modified(&self, ticket: &Ticket, author: Option<&str>, comment: &str, old_comment: &str, comment_number: Option<u32>) -> Result<String, RenderError> {
        let mut changes = ChangeSet::default();
        changes.insert("comment", FieldChange::new(old_comment, comment));

        self.compose_ticket(TicketNotice {
            action: Action::Edit,
            ticket,
            author: actor_or_unknown(author),
            comment: None,
            changes: Some(changes),
            comment_number,
        })
    }

    fn compose_ticket(&self, notice: TicketNotice<'_>) -> Result<String, RenderError> {
        let ticket = notice.ticket;
        let ticket_type = ticket.text("type").ok_or_else(|| RenderError::missing("type"))?;
        let summary = ticket.text("summary").ok_or_else(|| RenderError::missing("summary"))?;
        let author = text::title_case(notice.author);
        let new_status = notice.changes.as_ref().and_then(|c| c.new_status.as_deref());

        let mut out = String::new();

        // Lead with the owner so they get notified.

        if let Some(owner) = non_empty(ticket.text("owner"))
            && owner.to_lowercase() != notice.author.to_lowercase()
        {
            let _ = write!(out, "@{owner} ");
        }

        // Identity line.

        let mut author_shown = notice.comment.is_none() || notice.action.forces_author() || new_status.is_some();

        out.push_str(notice.action.prefix());
        let _ = write!(out, "{} #{}: {}", text::title_case(ticket_type), ticket.id, text::inline(summary));

        if let Some(status) = new_status {
            let _ = write!(out, " ⇒ {status}");
        }

        if author_shown {
            let _ = write!(out, " (by {author})");
        }

        out.push('\n');

        // Attribute rows on creation, change rows on edits.

        if notice.action == Action::New {
            for field in &self.reported_fields {
                let value = ticket.fields.get(field).map(|v| v.display(&self.date_format)).unwrap_or_default();
                if !value.is_empty() {
                    let _ = writeln!(out, " * {}: {}", self.label(field), text::inline(&value));
                }
            }
        }

        if let Some(changes) = notice.changes.as_ref().filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "Changes (by {author})");

            for (field, change) in changes.iter() {
                let _ = writeln!(out, " * {}: {}", self.label(field), change_row(field, change));
            }

            author_shown = true;
        }

        // Long-text blocks.

        let description = match notice.action {
            Action::New => non_empty(ticket.text("description")).map(|d| text::raw_block(d, MentionPattern::Alphanumeric)),
            _ => None,
        };
        let description = description.or_else(|| notice.changes.as_ref().and_then(|c| c.get("description")).map(diff_change));

        if let Some(description) = description {
            let _ = writeln!(out, "<<Description>>\n{description}");
        }

        let comment = notice
            .comment
            .map(|c| text::raw_block(c, MentionPattern::Alphanumeric))
            .or_else(|| notice.changes.as_ref().and_then(|c| c.get("comment")).map(diff_change));

        if let Some(comment) = comment {
            out.push_str(&comment_header(author_shown, &author));
            let _ = writeln!(out, "{comment}");
        }

        // Trailer.

        if let Some(cc) = cc_line(ticket.text("cc"), notice.author) {
            let _ = writeln!(out, "Cc: {cc}");
        }

        let _ = write!(out, "Ticket URL: {}", ticket.url);
        if let Some(number) = notice.comment_number {
            let _ = write!(out, "#comment:{number}");
        }

        Ok(out)
    }
}

/// Value column of a change row.
fn change_row(field: &str, change: &FieldChange) -> String {
    if LONG_TEXT_FIELDS.contains(&field) {
        return "see below".to_string();
    }

    match &change.old {
        Some(old) => format!("{} -> {}", text::inline(old), text::inline(&change.new)),
        None => text::inline(&change.new),
    }
}

fn diff_change(change: &FieldChange) -> String {
    text::diff_block(change.old.as_deref().unwrap_or_default(), &change.new)
}

/// Mention every cc'd user except the author.
fn cc_line(cc: Option<&str>, author: &str) -> Option<String> {
    let author = author.to_lowercase();
    let names: Vec<&str> = cc?.split(',').map(str::trim).filter(|n| !n.is_empty() && n.to_lowercase() != author).collect();

    if names.is_empty() {
        return None;
    }

    Some(text::mentionify(&names.join(", ")))
}
