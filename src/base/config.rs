//! Load configuration via `config` crate with env-override support.

use std::{
    collections::{HashMap, HashSet},
    ops::Deref,
    sync::Arc,
};

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

use super::types::Res;

/// Default list of ticket fields that are reported.
fn default_ticket_fields() -> String {
    "type,priority,component,resolution".to_string()
}

/// Default date format for time-typed fields.
fn default_date_format() -> String {
    "%Y/%m/%d".to_string()
}

/// Default timeout for a single dispatch, in milliseconds.
fn default_request_timeout_ms() -> u64 {
    1000
}

/// Configuration for the notifier.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// REST-like API base URL of the chat service (`WEBAPI`).
    pub webapi: String,
    /// Authentication token for the chat service (`TOKEN`).
    #[serde(default)]
    pub token: String,
    /// Room receiving ticket events (`TICKET_ROOM`).
    #[serde(default)]
    pub ticket_room: String,
    /// Room receiving wiki events (`WIKI_ROOM`).
    #[serde(default)]
    pub wiki_room: String,
    /// Room receiving blog events (`BLOG_ROOM`).
    #[serde(default)]
    pub blog_room: String,
    /// Room receiving missed call events (`JANUSGW_ROOM`).
    #[serde(default)]
    pub janusgw_room: String,
    /// Comma-separated, ordered list of ticket fields that are reported (`TICKET_FIELDS`).
    #[serde(default = "default_ticket_fields")]
    pub ticket_fields: String,
    /// Comma-separated list of ticket ids that are never announced (`IGNORE_TICKETS`).
    #[serde(default)]
    pub ignore_tickets: String,
    /// Human readable labels for ticket fields.
    #[serde(default)]
    pub field_labels: HashMap<String, String>,
    /// `chrono` format used for time-typed fields (`DATE_FORMAT`).
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Timeout for one message post, in milliseconds (`REQUEST_TIMEOUT_MS`).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Route tickets by milestone or component instead of `ticket_room` (`ROOM_DETECTION`).
    #[serde(default)]
    pub room_detection: bool,
    /// Milestone substrings that map onto a room of the same name.
    #[serde(default)]
    pub milestone_rooms: Vec<String>,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            webapi: String::new(),
            token: String::new(),
            ticket_room: String::new(),
            wiki_room: String::new(),
            blog_room: String::new(),
            janusgw_room: String::new(),
            ticket_fields: default_ticket_fields(),
            ignore_tickets: String::new(),
            field_labels: HashMap::new(),
            date_format: default_date_format(),
            request_timeout_ms: default_request_timeout_ms(),
            room_detection: false,
            milestone_rooms: Vec::new(),
        }
    }
}

impl ConfigInner {
    /// The reported ticket fields, in order.
    pub fn reported_fields(&self) -> Vec<String> {
        split_list(&self.ticket_fields).map(str::to_string).collect()
    }

    /// The ticket ids to ignore.
    ///
    /// Entries that are not numeric are skipped.
    pub fn ignored_tickets(&self) -> HashSet<u64> {
        split_list(&self.ignore_tickets).filter_map(|id| id.trim_start_matches('#').parse().ok()).collect()
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("LETSCHAT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the loaded values.
    pub fn validate(&self) -> Res<()> {
        if self.webapi.trim().is_empty() {
            return Err(anyhow::anyhow!("The chat service `webapi` must be set."));
        }

        if self.request_timeout_ms < 1 || self.request_timeout_ms > 60000 {
            return Err(anyhow::anyhow!("Request timeout must be between 1 and 60000 milliseconds."));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(anyhow::anyhow!("Invalid `date_format`: `{}`.", self.date_format));
        }

        Ok(())
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> ConfigInner {
        ConfigInner {
            webapi: "http://chat.local".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_reported_fields_keep_order() {
        let mut config = create_test_config();
        config.ticket_fields = "priority, type,,milestone".to_string();

        assert_eq!(config.reported_fields(), vec!["priority", "type", "milestone"]);
    }

    #[test]
    fn test_ignored_tickets_parse() {
        let mut config = create_test_config();
        config.ignore_tickets = "12, #40,abc".to_string();

        let ignored = config.ignored_tickets();
        assert_eq!(ignored.len(), 2);
        assert!(ignored.contains(&12));
        assert!(ignored.contains(&40));
    }

    #[test]
    fn test_validate_rejects_empty_webapi() {
        let mut inner = create_test_config();
        inner.webapi = " ".to_string();

        assert!(Config::from(inner).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut inner = create_test_config();
        inner.request_timeout_ms = 0;

        assert!(Config::from(inner).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let mut inner = create_test_config();
        inner.date_format = "%Y-%Q".to_string();

        assert!(Config::from(inner).validate().is_err());
        assert!(Config::from(create_test_config()).validate().is_ok());
    }

    #[test]
    fn test_default_matches_serde_defaults() {
        let config = ConfigInner::default();

        assert_eq!(config.ticket_fields, "type,priority,component,resolution");
        assert_eq!(config.date_format, "%Y/%m/%d");
        assert_eq!(config.request_timeout_ms, 1000);
        assert_eq!(config.reported_fields(), vec!["type", "priority", "component", "resolution"]);
        assert!(Config::from(ConfigInner { webapi: "http://chat.local".to_string(), ..Default::default() }).validate().is_ok());
    }

    #[test]
    fn test_load_from_file_applies_defaults() {
        let path = std::env::temp_dir().join(format!("letschat-notify-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "webapi = \"http://chat.local/rooms\"").unwrap();
        writeln!(file, "ticket_room = \"dev\"").unwrap();
        writeln!(file, "[field_labels]").unwrap();
        writeln!(file, "priority = \"Prio\"").unwrap();
        drop(file);

        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.webapi, "http://chat.local/rooms");
        assert_eq!(config.ticket_room, "dev");
        assert_eq!(config.ticket_fields, "type,priority,component,resolution");
        assert_eq!(config.date_format, "%Y/%m/%d");
        assert_eq!(config.request_timeout_ms, 1000);
        assert_eq!(config.field_labels.get("priority").map(String::as_str), Some("Prio"));
        assert!(!config.room_detection);
    }
}
