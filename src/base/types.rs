//! Common result aliases and the event data model.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Ordered field name → value mapping, as delivered by the host.
pub type Fields = IndexMap<String, FieldValue>;

/// A single field value of a host entity.
///
/// Timestamps are kept apart from text so they are always displayed through
/// the configured date format instead of being compared raw. On the wire a
/// timestamp is an object, `{"time": "<rfc3339>"}`; any plain string is text,
/// even one that looks like a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Time { time: DateTime<Utc> },
}

impl FieldValue {
    /// Render the value for display, formatting timestamps with `date_format`.
    pub fn display(&self, date_format: &str) -> String {
        match self {
            FieldValue::Time { time } => format_time(time, date_format),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

/// Format a timestamp, falling back to RFC 3339 when `date_format` is invalid.
pub fn format_time(time: &DateTime<Utc>, date_format: &str) -> String {
    let mut out = String::new();

    if write!(out, "{}", time.format(date_format)).is_err() {
        return time.to_rfc3339();
    }

    out
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Time { time: value }
    }
}

/// Snapshot of a ticket after the change took place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub fields: Fields,
}

impl Ticket {
    /// Get a text field, treating timestamps as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A wiki page as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPage {
    pub name: String,
    pub url: String,
}

/// A blog post as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub name: String,
    pub title: String,
    pub url: String,
}

/// One lifecycle notification from the host collaboration system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    TicketCreated {
        ticket: Ticket,
    },
    TicketChanged {
        ticket: Ticket,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        comment: Option<String>,
        #[serde(default)]
        old_values: Fields,
        /// Comment number resolved by the host from the change time.
        #[serde(default)]
        comment_number: Option<u32>,
    },
    TicketCommentModified {
        ticket: Ticket,
        #[serde(default)]
        author: Option<String>,
        comment: String,
        old_comment: String,
        #[serde(default)]
        comment_number: Option<u32>,
    },
    WikiPageAdded {
        page: WikiPage,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        comment: Option<String>,
    },
    WikiPageChanged {
        page: WikiPage,
        #[serde(default)]
        author: Option<String>,
        version: u32,
        time: DateTime<Utc>,
        #[serde(default)]
        comment: Option<String>,
    },
    WikiPageDeleted {
        page: WikiPage,
        #[serde(default)]
        author: Option<String>,
    },
    BlogPostChanged {
        post: BlogPost,
        version: u32,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        body: String,
        #[serde(default)]
        comment: Option<String>,
    },
    BlogCommentAdded {
        post: BlogPost,
        #[serde(default)]
        author: Option<String>,
        comment: String,
    },
    MissedCall {
        caller: String,
        callee: String,
        #[serde(default)]
        comment: Option<String>,
    },
}

impl Event {
    /// The kind of entity this event is about, used for room selection.
    pub fn kind(&self) -> EntityKind {
        match self {
            Event::TicketCreated { .. } | Event::TicketChanged { .. } | Event::TicketCommentModified { .. } => EntityKind::Ticket,
            Event::WikiPageAdded { .. } | Event::WikiPageChanged { .. } | Event::WikiPageDeleted { .. } => EntityKind::Wiki,
            Event::BlogPostChanged { .. } | Event::BlogCommentAdded { .. } => EntityKind::Blog,
            Event::MissedCall { .. } => EntityKind::Call,
        }
    }

    /// The ticket snapshot, for ticket events.
    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            Event::TicketCreated { ticket } | Event::TicketChanged { ticket, .. } | Event::TicketCommentModified { ticket, .. } => Some(ticket),
            _ => None,
        }
    }
}

/// Entity kinds, each mapped to its own default room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ticket,
    Wiki,
    Blog,
    Call,
}

/// A rendered chat message, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub room: String,
    pub text: String,
}

/// Normalize an optional actor into a display name.
pub fn actor_or_unknown(author: Option<&str>) -> &str {
    match author {
        Some(author) if !author.is_empty() => author,
        _ => "unknown",
    }
}
