//! Destination room selection.

use crate::base::{
    config::Config,
    types::{EntityKind, Event, Ticket},
};

/// How ticket rooms are picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStrategy {
    /// Every event goes to the configured room of its kind.
    Default,
    /// Tickets are routed by milestone, then by the `support` component.
    Content,
}

/// Maps events to room names.
#[derive(Debug, Clone)]
pub struct RoomResolver {
    strategy: RoomStrategy,
    ticket_room: String,
    wiki_room: String,
    blog_room: String,
    call_room: String,
    milestone_rooms: Vec<String>,
}

impl RoomResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            strategy: if config.room_detection { RoomStrategy::Content } else { RoomStrategy::Default },
            ticket_room: config.ticket_room.clone(),
            wiki_room: config.wiki_room.clone(),
            blog_room: config.blog_room.clone(),
            call_room: config.janusgw_room.clone(),
            milestone_rooms: config.milestone_rooms.iter().map(|r| r.to_lowercase()).collect(),
        }
    }

    pub fn strategy(&self) -> RoomStrategy {
        self.strategy
    }

    /// The configured room for an entity kind.
    pub fn default_room(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Ticket => &self.ticket_room,
            EntityKind::Wiki => &self.wiki_room,
            EntityKind::Blog => &self.blog_room,
            EntityKind::Call => &self.call_room,
        }
    }

    /// Pick the room an event is posted to.
    pub fn resolve(&self, event: &Event) -> String {
        if self.strategy == RoomStrategy::Content
            && let Some(room) = event.ticket().and_then(|t| self.detect(t))
        {
            return room;
        }

        self.default_room(event.kind()).to_string()
    }

    /// Content-based room for a ticket, if any rule matches.
    pub fn detect(&self, ticket: &Ticket) -> Option<String> {
        if let Some(milestone) = ticket.text("milestone").filter(|m| !m.is_empty()) {
            let milestone = milestone.to_lowercase();

            let room = self.milestone_rooms.iter().find(|r| milestone.contains(r.as_str())).cloned().unwrap_or(milestone);

            return Some(room);
        }

        if ticket.text("component") == Some("support") {
            return Some("support".to_string());
        }

        None
    }
}
