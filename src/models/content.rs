//! Ancillary content: blog posts, FAQ entries, shelter events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: i64,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Event {
    pub fn formatted_date(&self) -> String {
        match self.starts_at {
            Some(dt) => dt.format("%b %d, %Y").to_string(),
            None => "TBD".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_and_formats_date() {
        let json = r#"{
            "id": 5,
            "title": "Open day at the shelter",
            "starts_at": "2026-09-12T10:00:00Z",
            "location": "Refuge de Lyon"
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.formatted_date(), "Sep 12, 2026");
    }

    #[test]
    fn event_without_date_is_tbd() {
        let event: Event =
            serde_json::from_str(r#"{"id": 6, "title": "Collection drive"}"#).unwrap();
        assert_eq!(event.formatted_date(), "TBD");
    }
}
