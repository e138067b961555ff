//! Field-level deltas between the prior and current state of a ticket.

use indexmap::IndexMap;

use crate::base::types::Fields;

/// Fields rendered as a diff block instead of a row value.
pub const LONG_TEXT_FIELDS: [&str; 2] = ["description", "comment"];

/// One changed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// The previous value; `None` when the field was not set before.
    pub old: Option<String>,
    pub new: String,
}

impl FieldChange {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        let old = old.into();

        Self {
            old: if old.is_empty() { None } else { Some(old) },
            new: new.into(),
        }
    }
}

/// Ordered set of field changes for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub changes: IndexMap<String, FieldChange>,
    /// Display value of the new status, with the resolution in brackets when
    /// one was set in the same change.
    pub new_status: Option<String>,
}

impl ChangeSet {
    pub fn insert(&mut self, field: impl Into<String>, change: FieldChange) {
        self.changes.insert(field.into(), change);
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldChange)> {
        self.changes.iter()
    }
}

/// Compute the reportable changes of a ticket.
///
/// Only fields listed in `reported_fields` and present in `old_values` are
/// considered, in the order of `reported_fields`; a changed description is
/// always kept. Values are compared after date formatting.
pub fn build(reported_fields: &[String], old_values: &Fields, current: &Fields, date_format: &str) -> ChangeSet {
    let mut set = ChangeSet::default();

    let display = |fields: &Fields, name: &str| fields.get(name).map(|v| v.display(date_format)).unwrap_or_default();

    let old_status = old_values.get("status").map(|v| v.display(date_format));
    let status_changed = old_status.is_some_and(|old| old != display(current, "status"));

    if status_changed {
        let mut new_status = display(current, "status");
        if old_values.contains_key("resolution") {
            new_status.push_str(&format!(" [{}]", display(current, "resolution")));
        }
        set.new_status = Some(new_status);
    }

    let candidates = reported_fields.iter().map(String::as_str).chain(std::iter::once("description"));

    for field in candidates {
        if set.changes.contains_key(field) || !old_values.contains_key(field) {
            continue;
        }

        if field == "resolution" && status_changed {
            continue;
        }

        let old = display(old_values, field);
        let new = display(current, field);

        if old != new {
            set.insert(field, FieldChange::new(old, new));
        }
    }

    set
}
