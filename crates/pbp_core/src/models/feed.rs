//! Feed documents
//!
//! Upstream serves either a bare array of play events or an envelope with
//! game metadata around it. Both parse into [`GameFeed`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::event::PlayEvent;
use crate::error::{CoreError, Result};

/// Game status reported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Live,
    Finished,
    Scheduled,
    #[serde(other)]
    Unknown,
}

/// A parsed feed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameFeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FeedStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_count: Option<usize>,
    #[serde(default)]
    pub events: Vec<PlayEvent>,
}

impl GameFeed {
    pub fn from_events(events: Vec<PlayEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == Some(FeedStatus::Finished)
    }
}

/// Parse a feed document from JSON text.
pub fn parse_feed(text: &str) -> Result<GameFeed> {
    // Sniff the shape first; untagged enum errors would hide the real cause.
    let value: serde_json::Value = serde_json::from_str(text).map_err(CoreError::Feed)?;
    let feed = if value.is_array() {
        GameFeed::from_events(serde_json::from_value(value).map_err(CoreError::Feed)?)
    } else {
        serde_json::from_value::<GameFeed>(value).map_err(CoreError::Feed)?
    };

    if let Some(expected) = feed.events_count {
        if expected != feed.events.len() {
            tracing::warn!(
                expected,
                found = feed.events.len(),
                game_id = feed.game_id.as_deref().unwrap_or("-"),
                "feed events_count does not match event list"
            );
        }
    }

    Ok(feed)
}

/// Short content digest of a feed document: first 4 bytes of SHA-256, hex.
pub fn feed_digest(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    hash.iter().take(4).map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCode;

    #[test]
    fn test_parse_bare_array() {
        let feed = parse_feed(r#"[{"code": "B"}, {"code": "1B"}]"#).unwrap();
        assert_eq!(feed.events.len(), 2);
        assert_eq!(feed.events[1].code, EventCode::Single);
        assert!(feed.game_id.is_none());
        assert!(feed.status.is_none());
    }

    #[test]
    fn test_parse_envelope() {
        let text = r#"{
            "game_id": "2025-A-313",
            "status": "finished",
            "events_count": 1,
            "events": [{"code": "HR", "event": "全壘打"}]
        }"#;
        let feed = parse_feed(text).unwrap();
        assert_eq!(feed.game_id.as_deref(), Some("2025-A-313"));
        assert!(feed.is_finished());
        assert_eq!(feed.events[0].code, EventCode::HomeRun);
    }

    #[test]
    fn test_parse_unknown_status() {
        let feed = parse_feed(r#"{"status": "postponed", "events": []}"#).unwrap();
        assert_eq!(feed.status, Some(FeedStatus::Unknown));
    }

    #[test]
    fn test_malformed_feed_is_error() {
        let err = parse_feed("{\"events\": [").unwrap_err();
        assert!(matches!(err, CoreError::Feed(_)));

        let err = parse_feed(r#"[{"event": "no code"}]"#).unwrap_err();
        assert!(matches!(err, CoreError::Feed(_)));
    }

    #[test]
    fn test_bad_directive_does_not_sink_feed() {
        let text = r#"[{"code": "1B", "runner_advances": [
            {"from": 1.5, "to": "home"},
            {"from": true},
            ["not", "an", "object"],
            {"from": "third", "to": "home"}
        ]}]"#;
        let feed = parse_feed(text).unwrap();
        assert_eq!(feed.events.len(), 1);
        assert_eq!(feed.events[0].directives().len(), 1);
    }

    #[test]
    fn test_feed_digest() {
        // sha256("abc") = ba7816bf...
        assert_eq!(feed_digest("abc"), "ba7816bf");
        assert_eq!(feed_digest("abc").len(), 8);
    }
}
