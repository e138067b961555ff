//! Event to chat message rendering.
//!
//! Every entity kind has its own renderer, and they all share the same shape:
//! - an optional action verb (`New`, `Update`, `Deleted`) and an identity line,
//! - attribute or change rows,
//! - at most one long-text block per field (raw or diffed),
//! - a trailing URL line.
//!
//! Rendering is pure; nothing here performs I/O.

pub mod blog;
pub mod call;
pub mod changes;
pub mod text;
pub mod ticket;
pub mod wiki;

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    base::{
        config::Config,
        types::{Event, Message, format_time},
    },
    interaction::room::RoomResolver,
};

/// Comments posted by automation bots; events carrying them are not announced.
pub const AUTOMATION_MARKERS: [&str; 2] = ["Timesheet2Track", "hamster sum added"];

/// Errors raised while building a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },
}

impl RenderError {
    pub fn missing(field: &str) -> Self {
        RenderError::MissingField { field: field.to_string() }
    }
}

/// What happened to the entity, as shown in front of the identity line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    New,
    Update,
    Edit,
    Deleted,
}

impl Action {
    fn prefix(self) -> &'static str {
        match self {
            Action::New => "New ",
            Action::Update => "Update ",
            Action::Edit => "",
            Action::Deleted => "Deleted ",
        }
    }

    /// Creation and deletion always name their author on the identity line.
    fn forces_author(self) -> bool {
        matches!(self, Action::New | Action::Deleted)
    }
}

/// Renders events into messages.
///
/// Holds only configuration, so it is cheap to share between tasks.
#[derive(Debug, Clone)]
pub struct Renderer {
    reported_fields: Vec<String>,
    field_labels: HashMap<String, String>,
    date_format: String,
    ignored_tickets: HashSet<u64>,
    rooms: RoomResolver,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        Self {
            reported_fields: config.reported_fields(),
            field_labels: config.field_labels.clone(),
            date_format: config.date_format.clone(),
            ignored_tickets: config.ignored_tickets(),
            rooms: RoomResolver::new(config),
        }
    }

    /// Build the message for an event.
    ///
    /// Returns `Ok(None)` when the event is suppressed: an ignored ticket, or a
    /// comment written by an automation bot.
    #[instrument(name = "Renderer::render", skip_all)]
    pub fn render(&self, event: &Event) -> Result<Option<Message>, RenderError> {
        if self.is_suppressed(event) {
            debug!("Event suppressed.");
            return Ok(None);
        }

        let text = match event {
            Event::TicketCreated { ticket } => self.ticket_created(ticket)?,
            Event::TicketChanged {
                ticket,
                author,
                comment,
                old_values,
                comment_number,
            } => self.ticket_changed(ticket, author.as_deref(), comment.as_deref(), old_values, *comment_number)?,
            Event::TicketCommentModified {
                ticket,
                author,
                comment,
                old_comment,
                comment_number,
            } => self.ticket_comment_modified(ticket, author.as_deref(), comment, old_comment, *comment_number)?,
            Event::WikiPageAdded { page, author, comment } => wiki::render(Action::New, page, author.as_deref(), comment.as_deref(), &[]),
            Event::WikiPageChanged { page, author, version, time, comment } => {
                let changes = [("version".to_string(), version.to_string()), ("time".to_string(), format_time(time, &self.date_format))];
                wiki::render(Action::Edit, page, author.as_deref(), comment.as_deref(), &changes)
            }
            Event::WikiPageDeleted { page, author } => wiki::render(Action::Deleted, page, author.as_deref(), None, &[]),
            Event::BlogPostChanged { post, version, author, body, comment } => {
                let action = if *version == 1 { Action::New } else { Action::Update };
                blog::render(action, post, author.as_deref(), Some(body.as_str()), comment.as_deref())
            }
            Event::BlogCommentAdded { post, author, comment } => blog::render(Action::Update, post, author.as_deref(), None, Some(comment.as_str())),
            Event::MissedCall { caller, callee, comment } => call::render(caller, callee, comment.as_deref()),
        };

        let room = self.rooms.resolve(event);

        Ok(Some(Message { room, text }))
    }

    /// Whether the event must not produce any message.
    pub fn is_suppressed(&self, event: &Event) -> bool {
        if let Some(ticket) = event.ticket()
            && self.ignored_tickets.contains(&ticket.id)
        {
            return true;
        }

        match event {
            Event::TicketChanged { comment: Some(comment), .. } | Event::TicketCommentModified { comment, .. } => AUTOMATION_MARKERS.contains(&comment.as_str()),
            _ => false,
        }
    }

    /// Human label of a ticket field.
    fn label(&self, field: &str) -> String {
        self.field_labels.get(field).cloned().unwrap_or_else(|| text::title_case(field))
    }
}

/// Treat empty optional text as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `<<Comment>>` header, naming the author when nothing else did.
fn comment_header(author_shown: bool, author: &str) -> String {
    if author_shown { "<<Comment>>\n".to_string() } else { format!("<<Comment by {author}>>\n") }
}
