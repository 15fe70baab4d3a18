//! ForexFactory weekly calendar JSON. Throttles aggressively, so a 429 puts
//! the feed in a 15 minute cooldown.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{clean_text, CalendarFeed, DEFAULT_TITLE};
use crate::fetch::SourceClient;
use crate::models::{derive_event_id, CalendarEvent};
use crate::normalizer::try_parse_timestamp;
use crate::transport::{HttpRequest, HttpTransport};

pub const SOURCE_ID: &str = "ForexFactory";

const ENDPOINT: &str = "https://nfs.faireconomy.media/ff_calendar_thisweek.json";
const COOLDOWN: Duration = Duration::from_secs(900);
const MAX_EVENTS: usize = 100;

/// Parses one event; events without a parseable date are dropped.
pub fn parse_event(raw: &Value) -> Option<CalendarEvent> {
    let text = |key: &str| raw.get(key).and_then(clean_text);
    let datetime = try_parse_timestamp(raw.get("date")?.as_str()?, chrono_tz::UTC)?;
    let title = text("title")
        .or_else(|| text("event"))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let country = text("country");
    let event_id = text("id")
        .map(|id| format!("FF-{}", id))
        .unwrap_or_else(|| derive_event_id("FF", &title, &datetime, country.as_deref()));

    Some(CalendarEvent {
        event_id,
        title,
        country,
        datetime,
        importance: text("impact"),
        forecast: text("forecast"),
        previous: text("previous"),
        actual: text("actual"),
        source: SOURCE_ID.to_string(),
    })
}

pub struct ForexFactoryFeed {
    client: SourceClient,
}

impl ForexFactoryFeed {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: SourceClient::new("FOREXFACTORY", transport).with_cooldown(COOLDOWN),
        }
    }
}

#[async_trait]
impl CalendarFeed for ForexFactoryFeed {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch(&self, _now: DateTime<Utc>) -> Vec<CalendarEvent> {
        let Some(payload) = self.client.get_json(&HttpRequest::get(ENDPOINT)).await else {
            return Vec::new();
        };
        payload
            .as_array()
            .map(|events| {
                events
                    .iter()
                    .take(MAX_EVENTS)
                    .filter_map(parse_event)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn test_parse_event_with_offset_date() {
        let event = parse_event(&json!({
            "title": "CPI m/m", "country": "USD", "date": "2025-03-12T08:30:00-04:00",
            "impact": "High", "forecast": "0.3%", "previous": "0.5%"
        }))
        .unwrap();
        assert_eq!(event.datetime.to_rfc3339(), "2025-03-12T12:30:00+00:00");
        assert_eq!(event.importance.as_deref(), Some("High"));
        assert!(event.event_id.starts_with("FF-"));
        assert!(parse_event(&json!({"title": "No date"})).is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_starts_cooldown() {
        let transport = Arc::new(ScriptedTransport::new().status("faireconomy", 429));
        let feed = ForexFactoryFeed::new(transport.clone());

        assert!(feed.fetch(Utc::now()).await.is_empty());
        assert!(feed.fetch(Utc::now()).await.is_empty());
        assert_eq!(transport.total_calls(), 1);
    }
}
